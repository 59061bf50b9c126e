use thiserror::Error;

use super::slot::{Day, TimeSlot};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("A lab needs two contiguous slots but {time_slot} is the last slot on {day}")]
    InsufficientSlots { day: Day, time_slot: TimeSlot },

    #[error("{day} {time_slot} is already booked")]
    SlotOccupied { day: Day, time_slot: TimeSlot },

    #[error("Unknown day: {0}")]
    UnknownDay(String),

    #[error("Unknown time slot: {0}")]
    UnknownTimeSlot(String),

    #[error("Unknown session type: {0}")]
    UnknownSessionType(String),

    #[error("Malformed timetable key: {0}")]
    MalformedKey(String),

    #[error("Semester {semester} is outside 1..={max}")]
    SemesterOutOfRange { semester: i32, max: i32 },
}

#[derive(Debug, Error)]
pub enum TimetableError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },
}

impl TimetableError {
    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        TimetableError::NotFound {
            kind,
            id: id.into(),
        }
    }
}
