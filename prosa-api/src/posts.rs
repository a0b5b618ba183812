/// Body accepted by the admin create and update endpoints, in its JSON form.
///
/// Multipart requests carry the same fields as text parts (`tags` being
/// JSON-encoded, since form fields are flat), except the binary image which
/// travels as a `file` part instead of `imageBase64`/`imageMime`.
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PostUpsertData {
    pub name: Option<String>,
    pub content: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub image_base64: Option<String>,
    pub image_mime: Option<String>,
    pub tags: Option<Vec<String>>,
    /// Scalar alternative to `tags`, still sent by older clients.
    pub tag: Option<String>,
    pub author_id: Option<i32>,
}

/// The post fields echoed back by the admin write endpoints.
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostData {
    pub id: i32,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct PostResponse {
    pub ok: bool,
    pub post: PostData,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct OkResponse {
    pub ok: bool,
}

#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FeaturedData {
    pub featured: bool,
}

/// Full post representation served by the public read API. It is also the
/// snapshot the editor seeds its draft from.
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PostSnapshot {
    pub id: i32,
    pub name: String,
    pub content: String,
    pub description: Option<String>,
    /// Render-ready cover source: an external URL or a data-URI.
    pub image: Option<String>,
    pub tag: Option<String>,
    pub author_id: Option<i32>,
    pub featured: bool,
    pub creation_date: String,
    pub updated_at: String,
}
