use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionType {
    Lecture,
    Tutorial,
    Lab,
}

impl SessionType {
    pub fn as_str(self) -> &'static str {
        match self {
            SessionType::Lecture => "lecture",
            SessionType::Tutorial => "tutorial",
            SessionType::Lab => "lab",
        }
    }

    /// Number of contiguous slots one session occupies.
    pub fn span(self) -> usize {
        match self {
            SessionType::Lab => 2,
            SessionType::Lecture | SessionType::Tutorial => 1,
        }
    }
}

impl fmt::Display for SessionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SessionType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lecture" => Ok(SessionType::Lecture),
            "tutorial" => Ok(SessionType::Tutorial),
            "lab" | "practical" => Ok(SessionType::Lab),
            _ => Err(ValidationError::UnknownSessionType(s.to_string())),
        }
    }
}

/// Position of a slot within a two-slot lab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabPart {
    Start,
    Continuation,
}

/// A teacher or room looked up by id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource<'a> {
    Teacher(&'a str),
    Room(&'a str),
}

impl fmt::Display for Resource<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resource::Teacher(id) => write!(f, "teacher {}", id),
            Resource::Room(id) => write!(f, "room {}", id),
        }
    }
}

/// One committed placement in one slot of a timetable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotBooking {
    pub subject_id: String,
    pub teacher_id: String,
    pub room_ids: Vec<String>,
    pub session_type: SessionType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lab_part: Option<LabPart>,
}

impl SlotBooking {
    pub fn new(
        subject_id: impl Into<String>,
        teacher_id: impl Into<String>,
        room_ids: Vec<String>,
        session_type: SessionType,
    ) -> Self {
        let lab_part = (session_type == SessionType::Lab).then_some(LabPart::Start);
        Self {
            subject_id: subject_id.into(),
            teacher_id: teacher_id.into(),
            room_ids,
            session_type,
            lab_part,
        }
    }

    /// The second half of a lab: same subject, teacher and rooms.
    pub fn continuation(&self) -> Self {
        Self {
            lab_part: Some(LabPart::Continuation),
            ..self.clone()
        }
    }

    pub fn is_lab(&self) -> bool {
        self.session_type == SessionType::Lab
    }

    pub fn is_continuation(&self) -> bool {
        self.lab_part == Some(LabPart::Continuation)
    }

    pub fn uses_room(&self, room_id: &str) -> bool {
        self.room_ids.iter().any(|r| r == room_id)
    }

    pub fn uses(&self, resource: Resource<'_>) -> bool {
        match resource {
            Resource::Teacher(id) => self.teacher_id == id,
            Resource::Room(id) => self.uses_room(id),
        }
    }
}
