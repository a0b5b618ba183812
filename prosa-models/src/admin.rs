use crate::users::User;
use rocket::{
    http::Status,
    request::{self, FromRequest, Request},
    Outcome,
};

/// Wrapper around User to use as a request guard on endpoints reserved to
/// admins. No session yields a 401, a non-admin session a 403.
pub struct Admin(pub User);

impl<'a, 'r> FromRequest<'a, 'r> for Admin {
    type Error = ();

    fn from_request(request: &'a Request<'r>) -> request::Outcome<Self, Self::Error> {
        let user = match User::from_request(request) {
            Outcome::Success(user) => user,
            _ => return Outcome::Failure((Status::Unauthorized, ())),
        };
        if user.is_admin() {
            Outcome::Success(Admin(user))
        } else {
            Outcome::Failure((Status::Forbidden, ()))
        }
    }
}
