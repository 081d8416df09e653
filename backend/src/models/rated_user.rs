use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct RatedUser {
    pub handle: String,
    pub rating: i32,
}
