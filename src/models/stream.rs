use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Stream {
    pub id: String,
    pub code: String,
    pub name: String,
    pub semesters: i32,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewStreamRequest {
    pub code: String,
    pub name: String,
    pub semesters: i32,
}
