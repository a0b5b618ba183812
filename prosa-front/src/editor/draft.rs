//! Client-held state of the article being edited.

use prosa_api::posts::PostSnapshot;

/// How the cover picture is currently represented client-side.
///
/// The base64 payload, the MIME type and the preview URI of a selected file
/// live in a single variant, so they can only ever be set and cleared
/// together — there is no way to end up with, say, a cleared file input and
/// a stale base64 payload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ImageState {
    None,
    /// An external URL, previously persisted or typed in.
    Url(String),
    /// A picture already stored inline; travels as base64 in a JSON save.
    Inline { base64: String, mime: String },
    /// A freshly selected file, pending upload as a binary part. The
    /// `web_sys::File` handle itself lives next to the draft and is swapped
    /// in and out together with this variant.
    Attachment {
        base64: String,
        mime: String,
        preview: String,
    },
}

impl ImageState {
    /// Render-ready source for the on-screen preview.
    pub fn display(&self) -> Option<String> {
        match self {
            ImageState::None => None,
            ImageState::Url(url) => Some(url.clone()),
            ImageState::Inline { base64, mime } => {
                Some(format!("data:{};base64,{}", mime, base64))
            }
            ImageState::Attachment { preview, .. } => Some(preview.clone()),
        }
    }

    pub fn is_attachment(&self) -> bool {
        matches!(self, ImageState::Attachment { .. })
    }
}

/// Splits a `data:` URI into its MIME type and base64 payload.
pub fn split_data_uri(uri: &str) -> Option<(String, String)> {
    let rest = uri.strip_prefix("data:")?;
    let comma = rest.find(',')?;
    let mime = rest[..comma].strip_suffix(";base64")?;
    Some((mime.to_owned(), rest[comma + 1..].to_owned()))
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Draft {
    /// Absent until the first manual save of a brand new article.
    pub id: Option<i32>,
    pub name: String,
    pub content: String,
    pub description: String,
    pub tags: Vec<String>,
    pub author_id: Option<i32>,
    pub image: ImageState,
}

/// The persisted-relevant projection of a draft.
///
/// `is_dirty` compares the current projection against the one captured at
/// the last successful save — not against the originally loaded snapshot,
/// otherwise a second autosave would never fire after the first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snapshot {
    pub name: String,
    pub content: String,
    pub description: String,
    pub tags: Vec<String>,
    pub author_id: Option<i32>,
    pub image_display: Option<String>,
    pub attachment_pending: bool,
}

impl Draft {
    pub fn new() -> Draft {
        Draft {
            id: None,
            name: String::new(),
            content: String::new(),
            description: String::new(),
            tags: Vec::new(),
            author_id: None,
            image: ImageState::None,
        }
    }

    /// Seeds a draft from the server-provided snapshot of an existing post.
    pub fn from_snapshot(snapshot: &PostSnapshot) -> Draft {
        let image = match snapshot.image.as_deref() {
            None => ImageState::None,
            Some(value) => match split_data_uri(value) {
                Some((mime, base64)) => ImageState::Inline { base64, mime },
                None => ImageState::Url(value.to_owned()),
            },
        };
        Draft {
            id: Some(snapshot.id),
            name: snapshot.name.clone(),
            content: snapshot.content.clone(),
            description: snapshot.description.clone().unwrap_or_default(),
            tags: snapshot.tag.iter().cloned().collect(),
            author_id: snapshot.author_id,
            image,
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            name: self.name.clone(),
            content: self.content.clone(),
            description: self.description.clone(),
            tags: self.tags.clone(),
            author_id: self.author_id,
            image_display: self.image.display(),
            attachment_pending: self.image.is_attachment(),
        }
    }

    pub fn is_dirty(&self, baseline: &Snapshot) -> bool {
        self.snapshot() != *baseline
    }

    /// The one blocking validation: a save without a title never leaves the
    /// client.
    pub fn has_blocking_error(&self) -> bool {
        self.name.is_empty()
    }

    /// Installs a freshly read file as the pending cover. All three derived
    /// artifacts change in one assignment.
    pub fn select_file(&mut self, base64: String, mime: String, preview: String) {
        self.image = ImageState::Attachment {
            base64,
            mime,
            preview,
        };
    }

    /// Clears the cover entirely; the preview, the base64 payload and the
    /// MIME type go away together.
    pub fn clear_image(&mut self) {
        self.image = ImageState::None;
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Encoding {
    Json,
    Multipart,
}

/// Client half of the encoding contract. The server recovers the same
/// decision by branching on the Content-Type, so the two must stay in step:
/// multipart exactly when a raw file attachment is pending.
pub fn choose_encoding(draft: &Draft) -> Encoding {
    if draft.image.is_attachment() {
        Encoding::Multipart
    } else {
        Encoding::Json
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attachment() -> ImageState {
        ImageState::Attachment {
            base64: "aGk=".to_owned(),
            mime: "image/png".to_owned(),
            preview: "data:image/png;base64,aGk=".to_owned(),
        }
    }

    #[test]
    fn encoding_is_json_without_an_attachment() {
        let mut draft = Draft::new();
        draft.name = "Conto X".to_owned();
        assert_eq!(choose_encoding(&draft), Encoding::Json);

        draft.image = ImageState::Url("https://example.com/a.png".to_owned());
        assert_eq!(choose_encoding(&draft), Encoding::Json);

        draft.image = ImageState::Inline {
            base64: "aGk=".to_owned(),
            mime: "image/png".to_owned(),
        };
        assert_eq!(choose_encoding(&draft), Encoding::Json);
    }

    #[test]
    fn encoding_is_multipart_with_an_attachment() {
        let mut draft = Draft::new();
        draft.image = attachment();
        assert_eq!(choose_encoding(&draft), Encoding::Multipart);
    }

    #[test]
    fn selecting_and_clearing_swap_the_whole_group() {
        let mut draft = Draft::new();
        draft.select_file(
            "aGk=".to_owned(),
            "image/png".to_owned(),
            "data:image/png;base64,aGk=".to_owned(),
        );
        assert!(draft.image.is_attachment());
        assert!(draft.snapshot().attachment_pending);

        draft.clear_image();
        assert_eq!(draft.image, ImageState::None);
        assert_eq!(draft.image.display(), None);
        assert!(!draft.snapshot().attachment_pending);
    }

    #[test]
    fn dirtiness_is_relative_to_the_last_saved_baseline() {
        let mut draft = Draft::new();
        draft.name = "Conto X".to_owned();
        let baseline = draft.snapshot();
        assert!(!draft.is_dirty(&baseline));

        draft.content = "Era uma vez".to_owned();
        assert!(draft.is_dirty(&baseline));

        // a save moves the baseline; the same content stops being dirty
        let baseline = draft.snapshot();
        assert!(!draft.is_dirty(&baseline));

        draft.content.push('.');
        assert!(draft.is_dirty(&baseline));
    }

    #[test]
    fn selecting_a_file_makes_the_draft_dirty() {
        let mut draft = Draft::new();
        draft.name = "Conto X".to_owned();
        let baseline = draft.snapshot();
        draft.image = attachment();
        assert!(draft.is_dirty(&baseline));
    }

    #[test]
    fn blocking_error_tracks_the_title_only() {
        let mut draft = Draft::new();
        assert!(draft.has_blocking_error());
        draft.content = "texto sem título".to_owned();
        assert!(draft.has_blocking_error());
        draft.name = "T".to_owned();
        assert!(!draft.has_blocking_error());
    }

    #[test]
    fn snapshot_seeding_recovers_the_image_state() {
        let mut server = PostSnapshot::default();
        server.id = 7;
        server.name = "Conto X".to_owned();
        server.image = Some("data:image/gif;base64,aGk=".to_owned());
        let draft = Draft::from_snapshot(&server);
        assert_eq!(
            draft.image,
            ImageState::Inline {
                base64: "aGk=".to_owned(),
                mime: "image/gif".to_owned(),
            },
        );

        server.image = Some("https://example.com/cover.gif".to_owned());
        let draft = Draft::from_snapshot(&server);
        assert_eq!(
            draft.image,
            ImageState::Url("https://example.com/cover.gif".to_owned()),
        );
    }

    #[test]
    fn split_data_uri_cases() {
        assert_eq!(
            split_data_uri("data:image/png;base64,aGk="),
            Some(("image/png".to_owned(), "aGk=".to_owned())),
        );
        assert_eq!(split_data_uri("https://example.com/x.png"), None);
        assert_eq!(split_data_uri("data:image/png,raw"), None);
    }
}
