#[derive(Clone, Serialize, Deserialize)]
pub struct AuthorData {
    pub id: i32,
    pub name: String,
    pub slug: String,
    pub bio: Option<String>,
}
