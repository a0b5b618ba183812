use crate::api::ApiError;
use prosa_api::authors::AuthorData;
use prosa_models::{authors::Author, db_conn::DbConn};
use rocket_contrib::json::Json;

/// Listing used by the editor's author picker.
#[get("/authors")]
pub fn list(conn: DbConn) -> Result<Json<Vec<AuthorData>>, ApiError> {
    let authors = Author::list(&conn)?;
    Ok(Json(authors.iter().map(Author::to_api).collect()))
}
