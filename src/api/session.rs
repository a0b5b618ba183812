use crate::api::ApiError;
use prosa_api::{posts::OkResponse, sessions::LoginData};
use prosa_models::{
    db_conn::DbConn,
    users::{User, AUTH_COOKIE},
};
use rocket::http::{Cookie, Cookies};
use rocket_contrib::json::Json;

#[post("/session", data = "<data>")]
pub fn create(
    data: Json<LoginData>,
    conn: DbConn,
    mut cookies: Cookies,
) -> Result<Json<OkResponse>, ApiError> {
    let user =
        User::find_by_email(&conn, &data.email).map_err(|_| ApiError::InvalidCredentials)?;
    if !user.auth(&data.password) {
        return Err(ApiError::InvalidCredentials);
    }
    cookies.add_private(Cookie::new(AUTH_COOKIE, user.id.to_string()));
    Ok(Json(OkResponse { ok: true }))
}

#[delete("/session")]
pub fn delete(mut cookies: Cookies) -> Json<OkResponse> {
    if let Some(cookie) = cookies.get_private(AUTH_COOKIE) {
        cookies.remove_private(cookie);
    }
    Json(OkResponse { ok: true })
}
