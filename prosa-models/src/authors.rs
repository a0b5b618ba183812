use crate::{schema::authors, Error, Result};
use chrono::NaiveDateTime;
use diesel::{self, ExpressionMethods, QueryDsl, RunQueryDsl};
use prosa_api::authors::AuthorData;

#[derive(Clone, Queryable, Identifiable, Serialize)]
pub struct Author {
    pub id: i32,
    pub name: String,
    pub slug: String,
    pub bio: Option<String>,
    pub creation_date: NaiveDateTime,
}

#[derive(Insertable)]
#[table_name = "authors"]
pub struct NewAuthor {
    pub name: String,
    pub slug: String,
    pub bio: Option<String>,
}

impl Author {
    insert!(authors, NewAuthor);
    get!(authors);
    find_by!(authors, find_by_slug, slug as &str);

    pub fn list(conn: &crate::Connection) -> Result<Vec<Author>> {
        authors::table
            .order(authors::name.asc())
            .load::<Author>(conn)
            .map_err(Error::from)
    }

    pub fn to_api(&self) -> AuthorData {
        AuthorData {
            id: self.id,
            name: self.name.clone(),
            slug: self.slug.clone(),
            bio: self.bio.clone(),
        }
    }
}
