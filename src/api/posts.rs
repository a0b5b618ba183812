use crate::api::{
    payload::{self, PostPayload},
    ApiError,
};
use crate::routes::Page;
use prosa_api::posts::{FeaturedData, OkResponse, PostData, PostResponse, PostSnapshot};
use prosa_models::{admin::Admin, db_conn::DbConn, posts::Post};
use rocket::{http::ContentType, Data};
use rocket_contrib::json::Json;

fn echo(post: &Post, with_content: bool) -> PostData {
    PostData {
        id: post.id,
        name: post.name.clone(),
        content: if with_content {
            Some(post.content.clone())
        } else {
            None
        },
        description: post.description.clone(),
        image: post.image_display(),
    }
}

#[post("/admin/posts", data = "<data>")]
pub fn create(
    admin: Admin,
    ct: &ContentType,
    data: Data,
    conn: DbConn,
) -> Result<Json<PostResponse>, ApiError> {
    let body = payload::read_body(data, payload::POST_IMAGE_MAX_BYTES)?;
    let payload = PostPayload::from_request(ct, &body, payload::POST_IMAGE_MAX_BYTES)?;
    let post = Post::create(&conn, payload.into_update(), &admin.0)?;
    Ok(Json(PostResponse {
        ok: true,
        post: echo(&post, false),
    }))
}

#[put("/admin/posts/<id>", data = "<data>")]
pub fn update(
    id: i32,
    _admin: Admin,
    ct: &ContentType,
    data: Data,
    conn: DbConn,
) -> Result<Json<PostResponse>, ApiError> {
    let body = payload::read_body(data, payload::POST_IMAGE_MAX_BYTES)?;
    let payload = PostPayload::from_request(ct, &body, payload::POST_IMAGE_MAX_BYTES)?;
    let post = Post::apply_update(&conn, id, payload.into_update())?;
    Ok(Json(PostResponse {
        ok: true,
        post: echo(&post, true),
    }))
}

/// Narrow update: only the featured flag, nothing else.
#[patch("/admin/posts/<id>", data = "<data>")]
pub fn set_featured(
    id: i32,
    _admin: Admin,
    data: Json<FeaturedData>,
    conn: DbConn,
) -> Result<Json<OkResponse>, ApiError> {
    Post::set_featured(&conn, id, data.featured)?;
    Ok(Json(OkResponse { ok: true }))
}

#[delete("/admin/posts/<id>")]
pub fn delete(id: i32, _admin: Admin, conn: DbConn) -> Result<Json<OkResponse>, ApiError> {
    let post = Post::get(&conn, id)?;
    post.delete(&conn)?;
    Ok(Json(OkResponse { ok: true }))
}

#[get("/posts?<tag>&<page>")]
pub fn list(
    tag: Option<String>,
    page: Option<i32>,
    conn: DbConn,
) -> Result<Json<Vec<PostSnapshot>>, ApiError> {
    let page = page.map(Page::new).unwrap_or_else(Page::first);
    let posts = Post::page(&conn, tag.as_deref(), page.limits())?;
    Ok(Json(posts.iter().map(Post::to_snapshot).collect()))
}

#[get("/posts/<id>")]
pub fn details(id: i32, conn: DbConn) -> Result<Json<PostSnapshot>, ApiError> {
    let post = Post::get(&conn, id)?;
    Ok(Json(post.to_snapshot()))
}
