//! Weekly timetable model: the slot catalog, bookings, the per-division grid,
//! availability checks across grids and the assignment engine.

pub mod assignment;
pub mod availability;
pub mod booking;
pub mod catalog;
pub mod error;
pub mod grid;
pub mod key;
pub mod palette;
pub mod slot;

pub use assignment::{SlotRequest, assign_slot, remove_slot};
pub use availability::{AvailableResources, available_resources, is_resource_available};
pub use booking::{LabPart, Resource, SessionType, SlotBooking};
pub use catalog::Catalog;
pub use error::{TimetableError, ValidationError};
pub use grid::Timetable;
pub use key::TimetableKey;
pub use palette::SubjectPalette;
pub use slot::{Day, TimeSlot};

#[cfg(test)]
pub(crate) mod testing {
    use crate::models::{Room, RoomType, Subject, Teacher, WeeklyLimits};

    use super::Catalog;

    fn subject(id: &str) -> Subject {
        Subject {
            id: id.to_string(),
            name: id.to_uppercase(),
            code: id.to_string(),
            credits: 4,
            stream_code: "CS".to_string(),
            semester: 3,
            lectures_per_week: 3,
            tutorials_per_week: 1,
            practicals_per_week: 1,
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    fn teacher(id: &str, subjects: &[&str]) -> Teacher {
        Teacher {
            id: id.to_string(),
            name: id.to_string(),
            email: format!("{}@example.edu", id),
            specialization: String::new(),
            subject_ids: subjects.iter().map(|s| s.to_string()).collect(),
            cabin: None,
            roles: Vec::new(),
            limits: WeeklyLimits::default(),
            is_teaching_assistant: false,
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    fn room(id: &str, room_type: RoomType) -> Room {
        Room {
            id: id.to_string(),
            room_number: id.to_uppercase(),
            capacity: 60,
            room_type,
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    /// subj1/subj2; teacher1 and teacher2 teach both, teacher3 only subj2;
    /// classrooms room1/room2 and labs lab1/lab2.
    pub fn catalog() -> Catalog {
        Catalog {
            subjects: vec![subject("subj1"), subject("subj2")],
            teachers: vec![
                teacher("teacher1", &["subj1", "subj2"]),
                teacher("teacher2", &["subj1", "subj2"]),
                teacher("teacher3", &["subj2"]),
            ],
            rooms: vec![
                room("room1", RoomType::Classroom),
                room("room2", RoomType::Classroom),
                room("lab1", RoomType::Lab),
                room("lab2", RoomType::Lab),
            ],
        }
    }
}
