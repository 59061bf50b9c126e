//! Row shapes as stored, and their conversion into the typed models.
//!
//! Timetable grids are kept as JSON. Older grids store a slot's teacher and
//! room either as an id or as an embedded object, and rooms either as a single
//! `room` or a `rooms` list; everything is normalized into `SlotBooking` here
//! so nothing past this module sees those variants.

use std::collections::BTreeMap;

use serde::Deserialize;
use sqlx::FromRow;
use tracing::warn;

use crate::models::{StoredTimetable, Teacher, WeeklyLimits};
use crate::timetable::{Day, LabPart, SessionType, SlotBooking, TimeSlot, Timetable, TimetableKey};

#[derive(Debug, FromRow)]
pub struct TeacherRow {
    pub id: String,
    pub name: String,
    pub email: String,
    pub specialization: String,
    pub subject_ids: String,
    pub cabin: Option<String>,
    pub roles: String,
    pub max_lectures: Option<i32>,
    pub max_labs: Option<i32>,
    pub max_tutorials: Option<i32>,
    pub is_teaching_assistant: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl TryFrom<TeacherRow> for Teacher {
    type Error = sqlx::Error;

    fn try_from(row: TeacherRow) -> Result<Self, Self::Error> {
        Ok(Teacher {
            id: row.id,
            name: row.name,
            email: row.email,
            specialization: row.specialization,
            subject_ids: parse_id_list(&row.subject_ids)?,
            cabin: row.cabin,
            roles: parse_id_list(&row.roles)?,
            limits: WeeklyLimits {
                max_lectures: row.max_lectures,
                max_labs: row.max_labs,
                max_tutorials: row.max_tutorials,
            },
            is_teaching_assistant: row.is_teaching_assistant,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn parse_id_list(raw: &str) -> Result<Vec<String>, sqlx::Error> {
    let refs: Vec<RawRef> = serde_json::from_str(raw).map_err(|e| sqlx::Error::Decode(Box::new(e)))?;
    Ok(refs.into_iter().map(RawRef::into_id).collect())
}

#[derive(Debug, FromRow)]
pub struct TimetableRow {
    pub name: String,
    pub stream_id: String,
    pub semester: i32,
    pub division_id: String,
    pub data: String,
    pub created_at: String,
    pub updated_at: String,
}

impl TryFrom<TimetableRow> for StoredTimetable {
    type Error = sqlx::Error;

    fn try_from(row: TimetableRow) -> Result<Self, Self::Error> {
        let key = TimetableKey::new(row.stream_id, row.semester, row.division_id);
        let timetable = decode_grid(key, &row.data).map_err(|e| sqlx::Error::Decode(Box::new(e)))?;
        Ok(StoredTimetable {
            name: row.name,
            timetable,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// A reference that is either a bare id or an embedded record with an id.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum RawRef {
    Id(String),
    Embedded { id: String },
}

impl RawRef {
    pub fn into_id(self) -> String {
        match self {
            RawRef::Id(id) | RawRef::Embedded { id } => id,
        }
    }

    /// Blank ids mark empty placeholders.
    pub fn into_non_blank(self) -> Option<String> {
        Some(self.into_id()).filter(|id| !id.trim().is_empty())
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct RawSlot {
    #[serde(default, alias = "subject_id")]
    pub subject: Option<RawRef>,
    #[serde(default, alias = "teacher_id")]
    pub teacher: Option<RawRef>,
    #[serde(default, alias = "room_id")]
    pub room: Option<RawRef>,
    #[serde(default, alias = "room_ids")]
    pub rooms: Vec<RawRef>,
    #[serde(default, alias = "type")]
    pub session_type: Option<String>,
    #[serde(default)]
    pub lab_part: Option<LabPart>,
    #[serde(default, alias = "isLabContinuation")]
    pub is_continuation: bool,
}

impl RawSlot {
    /// `None` for empty placeholders; `Err` names what a partial slot lacks.
    pub fn into_booking(self) -> Result<Option<SlotBooking>, String> {
        let Some(subject) = self.subject.and_then(RawRef::into_non_blank) else {
            return Ok(None);
        };
        let teacher = self.teacher.and_then(RawRef::into_non_blank).ok_or("teacher")?;

        let mut room_ids: Vec<String> = self.rooms.into_iter().filter_map(RawRef::into_non_blank).collect();
        if let Some(id) = self.room.and_then(RawRef::into_non_blank) {
            if !room_ids.contains(&id) {
                room_ids.insert(0, id);
            }
        }
        if room_ids.is_empty() {
            return Err("room".to_string());
        }

        let session_type = match self.session_type {
            Some(raw) => raw.parse::<SessionType>().map_err(|e| e.to_string())?,
            None => SessionType::Lecture,
        };

        let mut booking = SlotBooking::new(subject, teacher, room_ids, session_type);
        if booking.is_lab() {
            booking.lab_part = Some(match (self.lab_part, self.is_continuation) {
                (Some(part), _) => part,
                (None, true) => LabPart::Continuation,
                (None, false) => LabPart::Start,
            });
        }
        Ok(Some(booking))
    }
}

/// Decodes a stored grid, skipping labels outside the slot catalog and cells
/// that are malformed or too incomplete to become a booking. Only a payload
/// that is not a day -> slot map at all is an error.
pub fn decode_grid(key: TimetableKey, data: &str) -> Result<Timetable, serde_json::Error> {
    let raw: BTreeMap<String, BTreeMap<String, serde_json::Value>> = serde_json::from_str(data)?;
    let mut bookings = Vec::new();

    for (day_label, slots) in raw {
        let Ok(day) = day_label.parse::<Day>() else {
            warn!("Skipping unknown day {:?} in timetable {}", day_label, key);
            continue;
        };
        for (slot_label, cell) in slots {
            let Ok(time_slot) = slot_label.parse::<TimeSlot>() else {
                warn!("Skipping unknown time slot {:?} in timetable {}", slot_label, key);
                continue;
            };
            if !cell.is_object() {
                continue;
            }
            let raw_slot: RawSlot = match serde_json::from_value(cell) {
                Ok(raw_slot) => raw_slot,
                Err(e) => {
                    warn!(
                        "Skipping undecodable slot {} {} in timetable {}: {}",
                        day, time_slot, key, e
                    );
                    continue;
                }
            };
            match raw_slot.into_booking() {
                Ok(Some(booking)) => bookings.push((day, time_slot, booking)),
                Ok(None) => {}
                Err(missing) => warn!(
                    "Skipping incomplete slot {} {} in timetable {}: {}",
                    day, time_slot, key, missing
                ),
            }
        }
    }

    Ok(Timetable::from_bookings(key, bookings))
}

pub fn encode_grid(timetable: &Timetable) -> Result<String, serde_json::Error> {
    serde_json::to_string(timetable.days())
}
