use rocket::Request;
use rocket_contrib::json::Json;
use serde_json::Value;

#[catch(401)]
pub fn unauthorized(_req: &Request) -> Json<Value> {
    Json(json!({ "error": "You need to be signed in" }))
}

#[catch(403)]
pub fn forbidden(_req: &Request) -> Json<Value> {
    Json(json!({ "error": "You are not allowed to do this" }))
}

#[catch(404)]
pub fn not_found(_req: &Request) -> Json<Value> {
    Json(json!({ "error": "Not found" }))
}

#[catch(500)]
pub fn server_error(_req: &Request) -> Json<Value> {
    Json(json!({ "error": "Internal error" }))
}
