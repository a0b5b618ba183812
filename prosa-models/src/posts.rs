use crate::{schema::posts, tags::Tag, users::User, Error, Result};
use chrono::{NaiveDateTime, Utc};
use diesel::{self, ExpressionMethods, QueryDsl, RunQueryDsl};
use prosa_api::posts::PostSnapshot;
use prosa_common::data_uri;

#[derive(Clone, Queryable, Identifiable)]
pub struct Post {
    pub id: i32,
    pub name: String,
    pub content: String,
    pub description: Option<String>,
    /// External URL or data-URI, rendering fallback for `image_blob`.
    pub image: Option<String>,
    pub image_blob: Option<Vec<u8>>,
    pub image_mime: Option<String>,
    pub tag: Option<String>,
    pub author_id: Option<i32>,
    pub featured: bool,
    pub created_by: i32,
    pub creation_date: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// The cover picture of a post, as seen by the storage boundary.
///
/// Writing one form always clears the columns of the others, so `image` and
/// `image_blob` can never both be set by this code.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ImageSource {
    None,
    Url(String),
    Blob(Vec<u8>, Option<String>),
}

impl ImageSource {
    fn into_columns(self) -> (Option<String>, Option<Vec<u8>>, Option<String>) {
        match self {
            ImageSource::None => (None, None, None),
            ImageSource::Url(url) => (Some(url), None, None),
            ImageSource::Blob(bytes, mime) => (None, Some(bytes), mime),
        }
    }
}

/// Canonical update payload handed over by the validation gate.
///
/// Applying it overwrites every editable field of the row; optional fields
/// left `None` are written as NULL, never skipped.
#[derive(Clone)]
pub struct PostUpdate {
    pub name: String,
    pub content: String,
    pub description: Option<String>,
    pub image: ImageSource,
    pub tag: Option<Tag>,
    pub author_id: Option<i32>,
}

#[derive(Insertable)]
#[table_name = "posts"]
struct NewPost {
    name: String,
    content: String,
    description: Option<String>,
    image: Option<String>,
    image_blob: Option<Vec<u8>>,
    image_mime: Option<String>,
    tag: Option<String>,
    author_id: Option<i32>,
    created_by: i32,
}

#[derive(AsChangeset)]
#[table_name = "posts"]
#[changeset_options(treat_none_as_null = "true")]
struct PostChangeset {
    name: String,
    content: String,
    description: Option<String>,
    image: Option<String>,
    image_blob: Option<Vec<u8>>,
    image_mime: Option<String>,
    tag: Option<String>,
    author_id: Option<i32>,
    updated_at: NaiveDateTime,
}

impl Post {
    get!(posts);
    last!(posts);

    pub fn create(conn: &crate::Connection, update: PostUpdate, created_by: &User) -> Result<Post> {
        let (image, image_blob, image_mime) = update.image.into_columns();
        diesel::insert_into(posts::table)
            .values(NewPost {
                name: update.name,
                content: update.content,
                description: update.description,
                image,
                image_blob,
                image_mime,
                tag: update.tag.map(|t| t.as_str().to_owned()),
                author_id: update.author_id,
                created_by: created_by.id,
            })
            .execute(conn)?;
        Self::last(conn)
    }

    /// Full-field overwrite keyed by id; the single atomic upsert of the
    /// authoring pipeline. Not a merge.
    pub fn apply_update(conn: &crate::Connection, id: i32, update: PostUpdate) -> Result<Post> {
        let (image, image_blob, image_mime) = update.image.into_columns();
        let changed = diesel::update(posts::table.filter(posts::id.eq(id)))
            .set(&PostChangeset {
                name: update.name,
                content: update.content,
                description: update.description,
                image,
                image_blob,
                image_mime,
                tag: update.tag.map(|t| t.as_str().to_owned()),
                author_id: update.author_id,
                updated_at: Utc::now().naive_utc(),
            })
            .execute(conn)?;
        if changed == 0 {
            return Err(Error::NotFound);
        }
        Self::get(conn, id)
    }

    /// Narrow update for the featured flag; every other field is untouched.
    pub fn set_featured(conn: &crate::Connection, id: i32, featured: bool) -> Result<Post> {
        let changed = diesel::update(posts::table.filter(posts::id.eq(id)))
            .set((
                posts::featured.eq(featured),
                posts::updated_at.eq(Utc::now().naive_utc()),
            ))
            .execute(conn)?;
        if changed == 0 {
            return Err(Error::NotFound);
        }
        Self::get(conn, id)
    }

    pub fn delete(&self, conn: &crate::Connection) -> Result<()> {
        diesel::delete(self)
            .execute(conn)
            .map(|_| ())
            .map_err(Error::from)
    }

    pub fn count(conn: &crate::Connection) -> Result<i64> {
        posts::table.count().get_result(conn).map_err(Error::from)
    }

    pub fn page(
        conn: &crate::Connection,
        tag: Option<&str>,
        (min, max): (i32, i32),
    ) -> Result<Vec<Post>> {
        let mut query = posts::table.order(posts::updated_at.desc()).into_boxed();
        if let Some(tag) = tag {
            query = query.filter(posts::tag.eq(tag.to_owned()));
        }
        query
            .offset(min.into())
            .limit((max - min).into())
            .load::<Post>(conn)
            .map_err(Error::from)
    }

    pub fn recents(conn: &crate::Connection, limit: i64) -> Result<Vec<Post>> {
        posts::table
            .order(posts::updated_at.desc())
            .limit(limit)
            .load::<Post>(conn)
            .map_err(Error::from)
    }

    /// Render-ready cover source. A real URL takes precedence over stored
    /// bytes; stored bytes over a data-URI kept in `image`.
    pub fn image_display(&self) -> Option<String> {
        match (&self.image, &self.image_blob) {
            (Some(url), _) if !data_uri::is_data_uri(url) => Some(url.clone()),
            (_, Some(blob)) => Some(data_uri::encode(
                self.image_mime.as_deref().unwrap_or("application/octet-stream"),
                blob,
            )),
            (Some(uri), None) => Some(uri.clone()),
            (None, None) => None,
        }
    }

    pub fn to_snapshot(&self) -> PostSnapshot {
        PostSnapshot {
            id: self.id,
            name: self.name.clone(),
            content: self.content.clone(),
            description: self.description.clone(),
            image: self.image_display(),
            tag: self.tag.clone(),
            author_id: self.author_id,
            featured: self.featured,
            creation_date: self.creation_date.format("%Y-%m-%dT%H:%M:%S").to_string(),
            updated_at: self.updated_at.format("%Y-%m-%dT%H:%M:%S").to_string(),
        }
    }
}
