use crate::{db_conn::DbConn, schema::users, Error, Result};
use chrono::NaiveDateTime;
use diesel::{self, ExpressionMethods, QueryDsl, RunQueryDsl};
use rocket::{
    outcome::IntoOutcome,
    request::{self, FromRequest, Request},
};

pub const AUTH_COOKIE: &str = "user_id";

const BCRYPT_COST: u32 = 10;

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Admin = 0,
    Normal = 1,
}

#[derive(Clone, Queryable, Identifiable, Serialize)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub display_name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub hashed_password: Option<String>,
    /// Data-URI of the profile picture, if one was uploaded.
    pub avatar: Option<String>,
    /// 0 = admin
    /// anything else = normal user
    pub role: i32,
    pub creation_date: NaiveDateTime,
}

#[derive(Default, Insertable)]
#[table_name = "users"]
pub struct NewUser {
    pub username: String,
    pub display_name: String,
    pub email: String,
    pub hashed_password: Option<String>,
    pub role: i32,
}

impl User {
    insert!(users, NewUser);
    get!(users);
    find_by!(users, find_by_email, email as &str);
    find_by!(users, find_by_name, username as &str);

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin as i32
    }

    pub fn new_local(
        conn: &crate::Connection,
        username: String,
        display_name: String,
        email: String,
        password: String,
        is_admin: bool,
    ) -> Result<User> {
        User::insert(
            conn,
            NewUser {
                username,
                display_name,
                email,
                hashed_password: Some(User::hash_pass(&password)?),
                role: if is_admin {
                    Role::Admin as i32
                } else {
                    Role::Normal as i32
                },
            },
        )
    }

    pub fn hash_pass(pass: &str) -> Result<String> {
        bcrypt::hash(pass, BCRYPT_COST).map_err(|_| Error::InvalidValue)
    }

    pub fn auth(&self, pass: &str) -> bool {
        self.hashed_password
            .as_ref()
            .map(|hash| bcrypt::verify(pass, hash).unwrap_or(false))
            .unwrap_or(false)
    }

    pub fn set_avatar(&self, conn: &crate::Connection, data_uri: &str) -> Result<()> {
        diesel::update(self)
            .set(users::avatar.eq(data_uri))
            .execute(conn)
            .map(|_| ())
            .map_err(Error::from)
    }
}

impl<'a, 'r> FromRequest<'a, 'r> for User {
    type Error = ();

    fn from_request(request: &'a Request<'r>) -> request::Outcome<User, ()> {
        let conn = request.guard::<DbConn>()?;
        request
            .cookies()
            .get_private(AUTH_COOKIE)
            .and_then(|cookie| cookie.value().parse().ok())
            .and_then(|id| User::get(&conn, id).ok())
            .or_forward(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::tests::db;
    use diesel::Connection;

    pub(crate) fn fill_database(conn: &crate::Connection) -> Vec<User> {
        vec![
            ("admin", "The Admin", "admin@example.com", true),
            ("editor", "An Editor", "editor@example.com", false),
        ]
        .into_iter()
        .map(|(username, display_name, email, admin)| {
            User::new_local(
                conn,
                username.to_owned(),
                display_name.to_owned(),
                email.to_owned(),
                "p4ssw0rd".to_owned(),
                admin,
            )
            .unwrap()
        })
        .collect()
    }

    #[test]
    fn auth() {
        let conn = &db();
        conn.test_transaction::<_, (), _>(|| {
            let users = fill_database(conn);
            assert!(users[0].auth("p4ssw0rd"));
            assert!(!users[0].auth("wrong"));
            Ok(())
        });
    }

    #[test]
    fn roles() {
        let conn = &db();
        conn.test_transaction::<_, (), _>(|| {
            let users = fill_database(conn);
            assert!(users[0].is_admin());
            assert!(!users[1].is_admin());
            Ok(())
        });
    }

    #[test]
    fn set_avatar() {
        let conn = &db();
        conn.test_transaction::<_, (), _>(|| {
            let users = fill_database(conn);
            users[0]
                .set_avatar(conn, "data:image/png;base64,aGk=")
                .unwrap();
            let reloaded = User::get(conn, users[0].id).unwrap();
            assert_eq!(
                reloaded.avatar.as_deref(),
                Some("data:image/png;base64,aGk=")
            );
            Ok(())
        });
    }
}
