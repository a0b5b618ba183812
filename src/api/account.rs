use crate::api::{payload, ApiError};
use prosa_api::accounts::AvatarResponse;
use prosa_common::data_uri;
use prosa_models::{db_conn::DbConn, users::User};
use rocket::{http::ContentType, Data};
use rocket_contrib::json::Json;

/// Profile picture upload. Shares the gate machinery with the post
/// endpoints but enforces its own, smaller ceiling.
#[post("/account/avatar", data = "<data>")]
pub fn set_avatar(
    user: User,
    ct: &ContentType,
    data: Data,
    conn: DbConn,
) -> Result<Json<AvatarResponse>, ApiError> {
    let body = payload::read_body(data, payload::AVATAR_MAX_BYTES)?;
    let upload = payload::upload_from_request(ct, &body, payload::AVATAR_MAX_BYTES)?;
    let avatar = data_uri::encode(
        upload.mime.as_deref().unwrap_or("application/octet-stream"),
        &upload.bytes,
    );
    user.set_avatar(&conn, &avatar)?;
    Ok(Json(AvatarResponse { ok: true, avatar }))
}
