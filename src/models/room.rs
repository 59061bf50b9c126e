use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::timetable::SessionType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum RoomType {
    Classroom,
    Lab,
}

impl RoomType {
    /// Labs run in lab rooms, everything else in classrooms.
    pub fn for_session(session_type: SessionType) -> Self {
        match session_type {
            SessionType::Lab => RoomType::Lab,
            SessionType::Lecture | SessionType::Tutorial => RoomType::Classroom,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Room {
    pub id: String,
    pub room_number: String,
    pub capacity: i32,
    pub room_type: RoomType,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewRoomRequest {
    pub room_number: String,
    #[serde(default)]
    pub capacity: i32,
    pub room_type: RoomType,
}
