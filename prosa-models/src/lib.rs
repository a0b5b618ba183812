#[macro_use]
extern crate diesel;
#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate serde_derive;
#[cfg(test)]
#[macro_use]
extern crate diesel_migrations;

pub use config::CONFIG;

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(feature = "postgres")]
pub type Connection = diesel::PgConnection;
#[cfg(feature = "sqlite")]
pub type Connection = diesel::SqliteConnection;

#[derive(Debug)]
pub enum Error {
    Db(diesel::result::Error),
    NotFound,
    InvalidValue,
}

impl From<diesel::result::Error> for Error {
    fn from(err: diesel::result::Error) -> Self {
        match err {
            diesel::result::Error::NotFound => Error::NotFound,
            _ => Error::Db(err),
        }
    }
}

/// Adds a function to a model, that returns the first record matching
/// the given columns.
macro_rules! find_by {
    ($table:ident, $fn:ident, $($col:ident as $type:ty),+) => {
        pub fn $fn(conn: &crate::Connection, $($col: $type),+) -> Result<Self> {
            $table::table
                $(.filter($table::$col.eq($col)))+
                .first(conn)
                .map_err(Error::from)
        }
    };
}

/// Adds a function to a model, that returns all the records matching
/// the given columns.
macro_rules! list_by {
    ($table:ident, $fn:ident, $($col:ident as $type:ty),+) => {
        pub fn $fn(conn: &crate::Connection, $($col: $type),+) -> Result<Vec<Self>> {
            $table::table
                $(.filter($table::$col.eq($col)))+
                .load::<Self>(conn)
                .map_err(Error::from)
        }
    };
}

/// Adds a function to a model to retrieve a record by its id.
macro_rules! get {
    ($table:ident) => {
        pub fn get(conn: &crate::Connection, id: i32) -> Result<Self> {
            $table::table
                .filter($table::id.eq(id))
                .first(conn)
                .map_err(Error::from)
        }
    };
}

/// Adds a function to a model to retrieve the most recently inserted record.
macro_rules! last {
    ($table:ident) => {
        pub fn last(conn: &crate::Connection) -> Result<Self> {
            $table::table
                .order_by($table::id.desc())
                .first(conn)
                .map_err(Error::from)
        }
    };
}

/// Adds a function to a model to insert a new row, working on both
/// supported backends (no RETURNING clause).
macro_rules! insert {
    ($table:ident, $from:ty) => {
        last!($table);
        pub fn insert(conn: &crate::Connection, new: $from) -> Result<Self> {
            diesel::insert_into($table::table)
                .values(new)
                .execute(conn)?;
            Self::last(conn)
        }
    };
}

pub mod admin;
pub mod authors;
pub mod config;
pub mod db_conn;
pub mod posts;
pub mod schema;
pub mod tags;
pub mod users;

#[cfg(all(test, feature = "sqlite"))]
embed_migrations!("../migrations/sqlite");
#[cfg(all(test, feature = "postgres"))]
embed_migrations!("../migrations/postgres");

#[cfg(test)]
pub(crate) mod tests {
    use diesel::Connection as _;

    #[cfg(feature = "sqlite")]
    pub(crate) fn db() -> crate::Connection {
        let conn = crate::Connection::establish(":memory:")
            .expect("Couldn't open an in-memory database");
        crate::embedded_migrations::run(&conn).expect("Couldn't run migrations");
        conn
    }

    #[cfg(feature = "postgres")]
    pub(crate) fn db() -> crate::Connection {
        let conn = crate::Connection::establish(crate::CONFIG.database_url.as_str())
            .expect("Couldn't connect to the database");
        crate::embedded_migrations::run(&conn).expect("Couldn't run migrations");
        conn
    }
}
