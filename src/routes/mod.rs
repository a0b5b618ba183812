use atom_syndication::{ContentBuilder, Entry, EntryBuilder, FeedBuilder, LinkBuilder};
use chrono::{DateTime, FixedOffset, Utc};
use rocket::{
    http::ContentType,
    response::{Content, NamedFile},
};
use std::path::{Path, PathBuf};

use crate::api::ApiError;
use prosa_models::{admin::Admin, db_conn::DbConn, posts::Post, CONFIG};

pub mod errors;

const ITEMS_PER_PAGE: i32 = 12;

#[derive(Clone, Copy)]
pub struct Page(i32);

impl Page {
    pub fn new(page: i32) -> Page {
        Page(if page < 1 { 1 } else { page })
    }

    pub fn first() -> Page {
        Page(1)
    }

    pub fn limits(self) -> (i32, i32) {
        ((self.0 - 1) * ITEMS_PER_PAGE, self.0 * ITEMS_PER_PAGE)
    }
}

#[get("/static/<file..>", rank = 2)]
pub fn static_files(file: PathBuf) -> Option<NamedFile> {
    NamedFile::open(Path::new("static/").join(file)).ok()
}

/// The editor shell; `prosa-front` takes over once loaded.
#[get("/admin/posts/new")]
pub fn editor_new(_admin: Admin) -> Option<NamedFile> {
    NamedFile::open("static/editor.html").ok()
}

#[get("/admin/posts/<_id>/edit")]
pub fn editor_edit(_id: i32, _admin: Admin) -> Option<NamedFile> {
    NamedFile::open("static/editor.html").ok()
}

fn post_to_atom(post: Post) -> Entry {
    let url = format!("https://{}/posts/{}", CONFIG.base_url, post.id);
    EntryBuilder::default()
        .title(post.name.clone())
        .id(url.clone())
        .updated(DateTime::<FixedOffset>::from_utc(
            post.updated_at,
            FixedOffset::east(0),
        ))
        .content(
            ContentBuilder::default()
                .value(post.content.clone())
                .content_type("text".to_string())
                .build(),
        )
        .links(vec![LinkBuilder::default().href(url).build()])
        .build()
}

#[get("/feed.atom")]
pub fn feed(conn: DbConn) -> Result<Content<String>, ApiError> {
    let entries = Post::recents(&conn, i64::from(ITEMS_PER_PAGE))?
        .into_iter()
        .map(post_to_atom)
        .collect::<Vec<_>>();
    let feed = FeedBuilder::default()
        .title("Prosa")
        .id(format!("https://{}/", CONFIG.base_url))
        .updated(DateTime::<FixedOffset>::from_utc(
            Utc::now().naive_utc(),
            FixedOffset::east(0),
        ))
        .entries(entries)
        .build();
    Ok(Content(
        ContentType::new("application", "atom+xml"),
        feed.to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::Page;

    #[test]
    fn page_limits() {
        assert_eq!(Page::first().limits(), (0, 12));
        assert_eq!(Page::new(3).limits(), (24, 36));
        // out-of-range pages are clamped to the first one
        assert_eq!(Page::new(0).limits(), (0, 12));
        assert_eq!(Page::new(-2).limits(), (0, 12));
    }
}
