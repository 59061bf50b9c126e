use crate::models::{Room, RoomType, Subject, Teacher};

use super::error::TimetableError;

/// In-memory view of the subjects, teachers and rooms an assignment is
/// resolved against.
///
/// Collections are small, so lookups are linear scans and iteration keeps
/// the order the store returned.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub subjects: Vec<Subject>,
    pub teachers: Vec<Teacher>,
    pub rooms: Vec<Room>,
}

impl Catalog {
    pub fn subject(&self, id: &str) -> Result<&Subject, TimetableError> {
        self.subjects
            .iter()
            .find(|s| s.id == id)
            .ok_or_else(|| TimetableError::not_found("subject", id))
    }

    pub fn teacher(&self, id: &str) -> Result<&Teacher, TimetableError> {
        self.teachers
            .iter()
            .find(|t| t.id == id)
            .ok_or_else(|| TimetableError::not_found("teacher", id))
    }

    pub fn room(&self, id: &str) -> Result<&Room, TimetableError> {
        self.rooms
            .iter()
            .find(|r| r.id == id)
            .ok_or_else(|| TimetableError::not_found("room", id))
    }

    pub fn rooms_of_type(&self, room_type: RoomType) -> impl Iterator<Item = &Room> {
        self.rooms.iter().filter(move |r| r.room_type == room_type)
    }
}
