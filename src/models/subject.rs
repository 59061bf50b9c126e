use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Subject {
    pub id: String,
    pub name: String,
    pub code: String,
    pub credits: i32,
    pub stream_code: String,
    pub semester: i32,
    pub lectures_per_week: i32,
    pub tutorials_per_week: i32,
    pub practicals_per_week: i32,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSubjectRequest {
    pub name: String,
    pub code: String,
    #[serde(default)]
    pub credits: i32,
    pub stream_code: String,
    pub semester: i32,
    #[serde(default)]
    pub lectures_per_week: i32,
    #[serde(default)]
    pub tutorials_per_week: i32,
    #[serde(default)]
    pub practicals_per_week: i32,
}
