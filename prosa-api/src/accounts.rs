/// JSON form of an avatar upload; multipart uploads use a `file` part instead.
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AvatarUpsertData {
    pub image_base64: Option<String>,
    pub image_mime: Option<String>,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct AvatarResponse {
    pub ok: bool,
    pub avatar: String,
}
