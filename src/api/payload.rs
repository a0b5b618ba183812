//! Parsing and validation of post bodies, shared by both wire encodings.
//!
//! A request either carries `multipart/form-data` (scalar fields as text
//! parts, the picture as a binary `file` part) or anything else, which is
//! parsed as JSON (the picture as `imageBase64` + `imageMime`). Both shapes
//! are reduced to the same canonical payload before touching storage, so the
//! rest of the stack never sees which encoding the client picked.

use multipart::server::{
    save::{SaveResult, SavedData},
    Multipart,
};
use prosa_api::accounts::AvatarUpsertData;
use prosa_api::posts::PostUpsertData;
use prosa_models::{
    posts::{ImageSource, PostUpdate},
    tags::Tag,
};
use rocket::http::ContentType;
use rocket::Data;
use std::fs;
use std::io::{Cursor, Read};

/// Hard ceiling for a post cover picture.
pub const POST_IMAGE_MAX_BYTES: usize = 5 * 1024 * 1024;
/// Hard ceiling for a profile picture. Deliberately smaller than the cover
/// ceiling; the two must not be unified.
pub const AVATAR_MAX_BYTES: usize = 2 * 1024 * 1024;

/// Room on top of the (base64-inflated) binary ceiling for the scalar parts
/// of a body.
const SCALAR_ALLOWANCE: usize = 2 * 1024 * 1024;

/// Accepted raster image types. An upload that declares no type at all is
/// let through as "unknown, assume acceptable".
const IMAGE_MIME_TYPES: [&str; 5] = [
    "image/png",
    "image/jpeg",
    "image/gif",
    "image/webp",
    "image/avif",
];

#[derive(Debug, PartialEq, Eq)]
pub enum PayloadError {
    /// Unparseable body.
    MalformedRequest,
    /// A required field is missing or empty.
    ValidationFailed(&'static str),
    /// The binary exceeds the given ceiling (in bytes).
    PayloadTooLarge(usize),
    /// The declared MIME type is not a raster image.
    UnsupportedMediaType,
}

impl PayloadError {
    pub fn message(&self) -> String {
        match self {
            PayloadError::MalformedRequest => "Couldn't parse the request body".to_owned(),
            PayloadError::ValidationFailed(field) => {
                format!("Missing required field: {}", field)
            }
            PayloadError::PayloadTooLarge(cap) => {
                format!("Image too large (max {}MB)", cap / (1024 * 1024))
            }
            PayloadError::UnsupportedMediaType => "Unsupported image type".to_owned(),
        }
    }
}

/// Raw bytes and declared MIME type of an uploaded picture, before
/// validation. Dropped as soon as validation settles.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadCandidate {
    pub bytes: Vec<u8>,
    pub mime: Option<String>,
}

impl UploadCandidate {
    fn validate(&self, cap: usize) -> Result<(), PayloadError> {
        if self.bytes.len() > cap {
            return Err(PayloadError::PayloadTooLarge(cap));
        }
        if let Some(mime) = self.mime.as_deref() {
            if !IMAGE_MIME_TYPES.contains(&mime) {
                return Err(PayloadError::UnsupportedMediaType);
            }
        }
        Ok(())
    }
}

/// Canonical, validated form of a post create/update request.
#[derive(Debug)]
pub struct PostPayload {
    pub name: String,
    pub content: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub tag: Option<Tag>,
    pub author_id: Option<i32>,
    pub upload: Option<UploadCandidate>,
}

impl PostPayload {
    /// Parses either encoding into the canonical payload, applying the
    /// validation rules with `cap` as the binary ceiling.
    pub fn from_request(
        ct: &ContentType,
        body: &[u8],
        cap: usize,
    ) -> Result<PostPayload, PayloadError> {
        let (data, upload) = if ct.is_form_data() {
            parse_multipart(ct, body)?
        } else {
            parse_json(body)?
        };
        PostPayload::validate(data, upload, cap)
    }

    fn validate(
        data: PostUpsertData,
        upload: Option<UploadCandidate>,
        cap: usize,
    ) -> Result<PostPayload, PayloadError> {
        let PostUpsertData {
            name,
            content,
            description,
            image,
            tags,
            tag,
            author_id,
            ..
        } = data;

        let name = match name {
            Some(name) if !name.is_empty() => name,
            _ => return Err(PayloadError::ValidationFailed("name")),
        };
        if let Some(candidate) = upload.as_ref() {
            candidate.validate(cap)?;
        }

        // An out-of-vocabulary tag is dropped, not an error: the post is
        // saved without a tag rather than the whole request failing.
        let tag = tags
            .unwrap_or_else(|| tag.into_iter().collect())
            .iter()
            .find_map(|value| Tag::from_api(value));

        Ok(PostPayload {
            name,
            content: content.unwrap_or_default(),
            description,
            image_url: image,
            tag,
            author_id,
            upload,
        })
    }

    /// Resolves the picture into its storage form. An uploaded binary wins
    /// over an URL; either one clears the other's columns.
    pub fn into_update(self) -> PostUpdate {
        let image = match (self.upload, self.image_url) {
            (Some(candidate), _) => ImageSource::Blob(candidate.bytes, candidate.mime),
            (None, Some(url)) => ImageSource::Url(url),
            (None, None) => ImageSource::None,
        };
        PostUpdate {
            name: self.name,
            content: self.content,
            description: self.description,
            image,
            tag: self.tag,
            author_id: self.author_id,
        }
    }
}

/// Extracts and validates a bare picture upload (the avatar endpoint).
pub fn upload_from_request(
    ct: &ContentType,
    body: &[u8],
    cap: usize,
) -> Result<UploadCandidate, PayloadError> {
    let upload = if ct.is_form_data() {
        parse_multipart(ct, body)?.1
    } else {
        let data: AvatarUpsertData =
            serde_json::from_slice(body).map_err(|_| PayloadError::MalformedRequest)?;
        decode_inline(data.image_base64, data.image_mime)?
    };
    let candidate = upload.ok_or(PayloadError::ValidationFailed("file"))?;
    candidate.validate(cap)?;
    Ok(candidate)
}

/// Reads a request body bounded by the ceiling the endpoint enforces, plus
/// the base64 and scalar-field overhead.
pub fn read_body(data: Data, cap: usize) -> Result<Vec<u8>, PayloadError> {
    let limit = (cap + cap / 3 + SCALAR_ALLOWANCE) as u64;
    let mut body = Vec::new();
    data.open()
        .take(limit + 1)
        .read_to_end(&mut body)
        .map_err(|_| PayloadError::MalformedRequest)?;
    if body.len() as u64 > limit {
        return Err(PayloadError::PayloadTooLarge(cap));
    }
    Ok(body)
}

fn parse_json(body: &[u8]) -> Result<(PostUpsertData, Option<UploadCandidate>), PayloadError> {
    let data: PostUpsertData =
        serde_json::from_slice(body).map_err(|_| PayloadError::MalformedRequest)?;
    let upload = decode_inline(data.image_base64.clone(), data.image_mime.clone())?;
    Ok((data, upload))
}

fn decode_inline(
    image_base64: Option<String>,
    image_mime: Option<String>,
) -> Result<Option<UploadCandidate>, PayloadError> {
    match image_base64 {
        Some(payload) => {
            let bytes = base64::decode(&payload).map_err(|_| PayloadError::MalformedRequest)?;
            Ok(Some(UploadCandidate {
                bytes,
                mime: image_mime,
            }))
        }
        None => Ok(None),
    }
}

fn parse_multipart(
    ct: &ContentType,
    body: &[u8],
) -> Result<(PostUpsertData, Option<UploadCandidate>), PayloadError> {
    let (_, boundary) = ct
        .params()
        .find(|&(k, _)| k == "boundary")
        .ok_or(PayloadError::MalformedRequest)?;

    let entries = match Multipart::with_body(Cursor::new(body), boundary)
        .save()
        .size_limit(body.len() as u64 + 1)
        .memory_threshold(body.len() as u64 + 1)
        .temp()
    {
        SaveResult::Full(entries) => entries,
        SaveResult::Partial(_, _) | SaveResult::Error(_) => {
            return Err(PayloadError::MalformedRequest)
        }
    };

    let text = |name: &str| -> Option<String> {
        entries
            .fields
            .get(name)
            .and_then(|fields| fields.first())
            .and_then(|field| match &field.data {
                SavedData::Text(value) => Some(value.clone()),
                _ => None,
            })
    };

    let tags = match text("tags") {
        Some(raw) => {
            Some(serde_json::from_str::<Vec<String>>(&raw).map_err(|_| PayloadError::MalformedRequest)?)
        }
        None => None,
    };
    let author_id = match text("authorId") {
        Some(raw) => Some(raw.parse::<i32>().map_err(|_| PayloadError::MalformedRequest)?),
        None => None,
    };

    let data = PostUpsertData {
        name: text("name"),
        content: text("content"),
        description: text("description"),
        image: text("image"),
        image_base64: None,
        image_mime: None,
        tags,
        tag: text("tag"),
        author_id,
    };

    let upload = match entries.fields.get("file").and_then(|fields| fields.first()) {
        Some(field) => {
            let bytes = match &field.data {
                SavedData::Bytes(bytes) => bytes.clone(),
                SavedData::File(path, _) => {
                    fs::read(path).map_err(|_| PayloadError::MalformedRequest)?
                }
                SavedData::Text(value) => value.clone().into_bytes(),
            };
            let mime = field.headers.content_type.as_ref().map(|m| m.to_string());
            Some(UploadCandidate { bytes, mime })
        }
        None => None,
    };

    Ok((data, upload))
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOUNDARY: &str = "X-PROSA-TEST-BOUNDARY";

    fn multipart_content_type() -> ContentType {
        ContentType::with_params("multipart", "form-data", ("boundary", BOUNDARY))
    }

    fn multipart_body(
        parts: &[(&str, &str)],
        file: Option<(Option<&str>, &[u8])>,
    ) -> Vec<u8> {
        let mut body = Vec::new();
        for (name, value) in parts {
            body.extend_from_slice(
                format!(
                    "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                    BOUNDARY, name, value
                )
                .as_bytes(),
            );
        }
        if let Some((mime, bytes)) = file {
            body.extend_from_slice(
                format!(
                    "--{}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"cover.png\"\r\n",
                    BOUNDARY
                )
                .as_bytes(),
            );
            if let Some(mime) = mime {
                body.extend_from_slice(format!("Content-Type: {}\r\n", mime).as_bytes());
            }
            body.extend_from_slice(b"\r\n");
            body.extend_from_slice(bytes);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
        body
    }

    #[test]
    fn json_with_only_a_name_normalizes_the_rest_to_null() {
        let payload = PostPayload::from_request(
            &ContentType::JSON,
            br#"{"name": "Conto X"}"#,
            POST_IMAGE_MAX_BYTES,
        )
        .unwrap();
        assert_eq!(payload.name, "Conto X");
        assert_eq!(payload.content, "");
        assert_eq!(payload.description, None);
        assert_eq!(payload.image_url, None);
        assert_eq!(payload.tag, None);
        assert_eq!(payload.author_id, None);
        assert!(payload.upload.is_none());
    }

    #[test]
    fn name_is_required_in_both_encodings() {
        let bodies: Vec<&[u8]> = vec![b"{}", br#"{"name": ""}"#, br#"{"content": "texto"}"#];
        for body in bodies {
            assert_eq!(
                PostPayload::from_request(&ContentType::JSON, body, POST_IMAGE_MAX_BYTES)
                    .unwrap_err(),
                PayloadError::ValidationFailed("name"),
            );
        }

        let body = multipart_body(&[("content", "texto")], None);
        assert_eq!(
            PostPayload::from_request(&multipart_content_type(), &body, POST_IMAGE_MAX_BYTES)
                .unwrap_err(),
            PayloadError::ValidationFailed("name"),
        );
    }

    #[test]
    fn unparseable_bodies_are_malformed() {
        assert_eq!(
            PostPayload::from_request(&ContentType::JSON, b"not json", POST_IMAGE_MAX_BYTES)
                .unwrap_err(),
            PayloadError::MalformedRequest,
        );
        // form-data without a boundary parameter
        let ct = ContentType::new("multipart", "form-data");
        assert_eq!(
            PostPayload::from_request(&ct, b"whatever", POST_IMAGE_MAX_BYTES).unwrap_err(),
            PayloadError::MalformedRequest,
        );
        // invalid base64 in the inline picture
        assert_eq!(
            PostPayload::from_request(
                &ContentType::JSON,
                br#"{"name": "n", "imageBase64": "!!!"}"#,
                POST_IMAGE_MAX_BYTES,
            )
            .unwrap_err(),
            PayloadError::MalformedRequest,
        );
    }

    #[test]
    fn both_encodings_produce_the_same_canonical_payload() {
        let bytes = b"pretend this is a png";
        let json = format!(
            r#"{{"name": "Conto X", "content": "## corpo", "description": "d",
                "tags": ["CONTO"], "authorId": 7,
                "imageBase64": "{}", "imageMime": "image/png"}}"#,
            base64::encode(bytes),
        );
        let from_json = PostPayload::from_request(
            &ContentType::JSON,
            json.as_bytes(),
            POST_IMAGE_MAX_BYTES,
        )
        .unwrap();

        let body = multipart_body(
            &[
                ("name", "Conto X"),
                ("content", "## corpo"),
                ("description", "d"),
                ("tags", r#"["CONTO"]"#),
                ("authorId", "7"),
            ],
            Some((Some("image/png"), bytes)),
        );
        let from_form = PostPayload::from_request(
            &multipart_content_type(),
            &body,
            POST_IMAGE_MAX_BYTES,
        )
        .unwrap();

        assert_eq!(from_json.name, from_form.name);
        assert_eq!(from_json.content, from_form.content);
        assert_eq!(from_json.description, from_form.description);
        assert_eq!(from_json.tag, from_form.tag);
        assert_eq!(from_json.author_id, from_form.author_id);
        assert_eq!(from_json.upload, from_form.upload);
        assert_eq!(from_json.upload.unwrap().bytes, bytes);
    }

    #[test]
    fn size_ceiling_is_exact() {
        let at_cap = vec![0u8; POST_IMAGE_MAX_BYTES];
        let body = multipart_body(&[("name", "n")], Some((Some("image/png"), &at_cap)));
        assert!(PostPayload::from_request(
            &multipart_content_type(),
            &body,
            POST_IMAGE_MAX_BYTES
        )
        .is_ok());

        let over_cap = vec![0u8; POST_IMAGE_MAX_BYTES + 1];
        let body = multipart_body(&[("name", "n")], Some((Some("image/png"), &over_cap)));
        assert_eq!(
            PostPayload::from_request(&multipart_content_type(), &body, POST_IMAGE_MAX_BYTES)
                .unwrap_err(),
            PayloadError::PayloadTooLarge(POST_IMAGE_MAX_BYTES),
        );
    }

    #[test]
    fn too_large_message_names_the_right_ceiling() {
        assert_eq!(
            PayloadError::PayloadTooLarge(POST_IMAGE_MAX_BYTES).message(),
            "Image too large (max 5MB)",
        );
        assert_eq!(
            PayloadError::PayloadTooLarge(AVATAR_MAX_BYTES).message(),
            "Image too large (max 2MB)",
        );
    }

    #[test]
    fn avatar_ceiling_is_smaller_than_the_post_one() {
        let bytes = vec![0u8; 3 * 1024 * 1024];
        let body = multipart_body(&[], Some((Some("image/png"), &bytes)));
        // three megabytes fit a post cover but not an avatar
        assert!(
            upload_from_request(&multipart_content_type(), &body, POST_IMAGE_MAX_BYTES).is_ok()
        );
        assert_eq!(
            upload_from_request(&multipart_content_type(), &body, AVATAR_MAX_BYTES).unwrap_err(),
            PayloadError::PayloadTooLarge(AVATAR_MAX_BYTES),
        );
    }

    #[test]
    fn mime_whitelist_rejects_declared_non_images() {
        let body = multipart_body(&[("name", "n")], Some((Some("application/pdf"), b"%PDF")));
        assert_eq!(
            PostPayload::from_request(&multipart_content_type(), &body, POST_IMAGE_MAX_BYTES)
                .unwrap_err(),
            PayloadError::UnsupportedMediaType,
        );
    }

    #[test]
    fn missing_mime_type_is_accepted() {
        let body = multipart_body(&[("name", "n")], Some((None, b"mystery bytes")));
        let payload = PostPayload::from_request(
            &multipart_content_type(),
            &body,
            POST_IMAGE_MAX_BYTES,
        )
        .unwrap();
        let upload = payload.upload.unwrap();
        assert_eq!(upload.mime, None);
        assert_eq!(upload.bytes, b"mystery bytes");
    }

    #[test]
    fn out_of_vocabulary_tags_are_dropped_not_rejected() {
        let payload = PostPayload::from_request(
            &ContentType::JSON,
            br#"{"name": "n", "tag": "INVALID_TAG"}"#,
            POST_IMAGE_MAX_BYTES,
        )
        .unwrap();
        assert_eq!(payload.tag, None);

        let payload = PostPayload::from_request(
            &ContentType::JSON,
            br#"{"name": "n", "tags": ["INVALID_TAG", "POESIA"]}"#,
            POST_IMAGE_MAX_BYTES,
        )
        .unwrap();
        assert_eq!(payload.tag, Some(Tag::Poesia));
    }

    #[test]
    fn upload_wins_over_url_when_resolving_the_image() {
        let payload = PostPayload::from_request(
            &ContentType::JSON,
            format!(
                r#"{{"name": "n", "image": "https://example.com/a.png",
                    "imageBase64": "{}", "imageMime": "image/png"}}"#,
                base64::encode(b"bytes"),
            )
            .as_bytes(),
            POST_IMAGE_MAX_BYTES,
        )
        .unwrap();
        let update = payload.into_update();
        assert_eq!(
            update.image,
            ImageSource::Blob(b"bytes".to_vec(), Some("image/png".to_owned())),
        );

        let payload = PostPayload::from_request(
            &ContentType::JSON,
            br#"{"name": "n", "image": "https://example.com/a.png"}"#,
            POST_IMAGE_MAX_BYTES,
        )
        .unwrap();
        assert_eq!(
            payload.into_update().image,
            ImageSource::Url("https://example.com/a.png".to_owned()),
        );
    }

    #[test]
    fn avatar_upload_requires_a_picture() {
        assert_eq!(
            upload_from_request(&ContentType::JSON, b"{}", AVATAR_MAX_BYTES).unwrap_err(),
            PayloadError::ValidationFailed("file"),
        );
        let ok = upload_from_request(
            &ContentType::JSON,
            format!(
                r#"{{"imageBase64": "{}", "imageMime": "image/jpeg"}}"#,
                base64::encode(b"jpeg bytes"),
            )
            .as_bytes(),
            AVATAR_MAX_BYTES,
        )
        .unwrap();
        assert_eq!(ok.mime.as_deref(), Some("image/jpeg"));
    }
}
