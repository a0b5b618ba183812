//! Turns a draft into exactly one outbound persistence request.

use prosa_api::posts::{PostResponse, PostUpsertData};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{File, FormData, Request, RequestInit, Response};

use crate::editor::draft::{choose_encoding, Draft, Encoding, ImageState, Snapshot};
use crate::editor::window;

/// Everything a persistence call needs, captured at the moment the save is
/// triggered so the user can keep typing while the request is in flight.
pub struct SaveJob {
    pub id: Option<i32>,
    pub draft: Draft,
    pub file: Option<File>,
    pub snapshot: Snapshot,
}

impl SaveJob {
    pub fn new(draft: &Draft, file: Option<File>) -> SaveJob {
        SaveJob {
            id: draft.id,
            snapshot: draft.snapshot(),
            draft: draft.clone(),
            file,
        }
    }
}

/// JSON body of a save. The cover travels as an URL, or as base64 plus its
/// MIME type when inline bytes are pending; never both.
pub fn build_json_body(draft: &Draft) -> PostUpsertData {
    let (image, image_base64, image_mime) = match &draft.image {
        ImageState::None => (None, None, None),
        ImageState::Url(url) => (Some(url.clone()), None, None),
        ImageState::Inline { base64, mime }
        | ImageState::Attachment { base64, mime, .. } => (
            None,
            Some(base64.clone()),
            if mime.is_empty() {
                None
            } else {
                Some(mime.clone())
            },
        ),
    };
    PostUpsertData {
        name: Some(draft.name.clone()),
        content: Some(draft.content.clone()),
        description: Some(draft.description.clone()),
        image,
        image_base64,
        image_mime,
        tags: Some(draft.tags.clone()),
        tag: None,
        author_id: draft.author_id,
    }
}

/// Pulls the human-readable message out of an error body.
pub fn error_message(body: &str, status: u16) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            value
                .get("error")
                .and_then(|e| e.as_str())
                .map(str::to_owned)
        })
        .unwrap_or_else(|| format!("The server replied with status {}", status))
}

fn build_form_data(job: &SaveJob) -> Result<FormData, JsValue> {
    let form = FormData::new()?;
    form.append_with_str("name", &job.draft.name)?;
    form.append_with_str("content", &job.draft.content)?;
    form.append_with_str("description", &job.draft.description)?;
    // form fields are flat, so the tag list goes through as a JSON string
    form.append_with_str(
        "tags",
        &serde_json::to_string(&job.draft.tags).unwrap_or_else(|_| "[]".to_owned()),
    )?;
    if let Some(author_id) = job.draft.author_id {
        form.append_with_str("authorId", &author_id.to_string())?;
    }
    if let Some(file) = job.file.as_ref() {
        form.append_with_blob_and_filename("file", file, &file.name())?;
    }
    Ok(form)
}

/// Sends exactly one request and resolves once the server has answered.
/// Every non-2xx outcome is reported the same way: an error message, no
/// error kinds, no internal retry.
pub async fn persist(job: &SaveJob) -> Result<PostResponse, JsValue> {
    let (method, url) = match job.id {
        Some(id) => ("PUT", format!("/api/admin/posts/{}", id)),
        None => ("POST", "/api/admin/posts".to_owned()),
    };

    let mut init = RequestInit::new();
    init.method(method);
    let json = matches!(choose_encoding(&job.draft), Encoding::Json);
    let body;
    if json {
        body = serde_json::to_string(&build_json_body(&job.draft))
            .map_err(|_| JsValue::from_str("Couldn't serialize the draft"))?;
        init.body(Some(&JsValue::from_str(&body)));
    } else {
        let form = build_form_data(job)?;
        init.body(Some(form.as_ref()));
    }

    let request = Request::new_with_str_and_init(&url, &init)?;
    if json {
        request.headers().set("Content-Type", "application/json")?;
    }

    let response: Response = JsFuture::from(window().fetch_with_request(&request))
        .await?
        .dyn_into()?;
    let text = JsFuture::from(response.text()?)
        .await?
        .as_string()
        .unwrap_or_default();
    if !response.ok() {
        return Err(JsValue::from_str(&error_message(&text, response.status())));
    }
    serde_json::from_str::<PostResponse>(&text)
        .map_err(|_| JsValue::from_str("Unexpected response from the server"))
}
