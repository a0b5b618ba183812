#[derive(Clone, Serialize, Deserialize)]
pub struct LoginData {
    pub email: String,
    pub password: String,
}
