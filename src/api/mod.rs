use rocket::{
    http::Status,
    request::Request,
    response::{self, Responder},
};
use rocket_contrib::json::Json;

use self::payload::PayloadError;

pub mod account;
pub mod authors;
pub mod payload;
pub mod posts;
pub mod session;

#[derive(Debug)]
pub enum ApiError {
    /// Any parse or validation failure from the request gate.
    Payload(PayloadError),
    InvalidCredentials,
    NotFound,
    /// Storage-layer failure (e.g. an invalid author reference).
    Persistence,
}

impl From<PayloadError> for ApiError {
    fn from(err: PayloadError) -> Self {
        ApiError::Payload(err)
    }
}

impl From<prosa_models::Error> for ApiError {
    fn from(err: prosa_models::Error) -> Self {
        match err {
            prosa_models::Error::NotFound => ApiError::NotFound,
            other => {
                tracing::error!("persistence failure: {:?}", other);
                ApiError::Persistence
            }
        }
    }
}

impl<'r> Responder<'r> for ApiError {
    fn respond_to(self, req: &Request) -> response::Result<'r> {
        let (status, message) = match self {
            ApiError::Payload(err) => (Status::BadRequest, err.message()),
            ApiError::InvalidCredentials => {
                (Status::Unauthorized, "Invalid credentials".to_owned())
            }
            ApiError::NotFound => (Status::NotFound, "Not found".to_owned()),
            ApiError::Persistence => (
                Status::InternalServerError,
                "Couldn't save the post".to_owned(),
            ),
        };
        rocket::response::status::Custom(status, Json(json!({ "error": message })))
            .respond_to(req)
    }
}
