use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Division {
    pub id: String,
    pub name: String,
    pub stream_id: String,
    pub semester: i32,
    pub strength: i32,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewDivisionRequest {
    pub name: String,
    pub stream_id: String,
    pub semester: i32,
    #[serde(default)]
    pub strength: i32,
}
