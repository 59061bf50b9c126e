use serde::{Deserialize, Serialize};
use tracing::debug;

use super::booking::{SessionType, SlotBooking};
use super::catalog::Catalog;
use super::error::{TimetableError, ValidationError};
use super::grid::Timetable;
use super::slot::{Day, TimeSlot};

/// What the editor wants placed in a slot. Every field may still be unset
/// when the request arrives; `assign_slot` rejects incomplete requests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotRequest {
    pub subject_id: Option<String>,
    pub teacher_id: Option<String>,
    #[serde(default)]
    pub room_ids: Vec<String>,
    pub session_type: Option<SessionType>,
}

impl SlotRequest {
    pub fn new(
        subject_id: impl Into<String>,
        teacher_id: impl Into<String>,
        room_id: impl Into<String>,
        session_type: SessionType,
    ) -> Self {
        Self {
            subject_id: Some(subject_id.into()),
            teacher_id: Some(teacher_id.into()),
            room_ids: vec![room_id.into()],
            session_type: Some(session_type),
        }
    }

    /// Resolves the request into a booking, or names the first unset field.
    pub fn to_booking(&self) -> Result<SlotBooking, ValidationError> {
        let subject_id = non_blank(&self.subject_id).ok_or(ValidationError::MissingField("subject"))?;
        let teacher_id = non_blank(&self.teacher_id).ok_or(ValidationError::MissingField("teacher"))?;
        let room_ids: Vec<String> = self
            .room_ids
            .iter()
            .filter(|r| !r.trim().is_empty())
            .cloned()
            .collect();
        if room_ids.is_empty() {
            return Err(ValidationError::MissingField("room"));
        }
        let session_type = self
            .session_type
            .ok_or(ValidationError::MissingField("session_type"))?;

        Ok(SlotBooking::new(subject_id, teacher_id, room_ids, session_type))
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

/// The slots a session of `session_type` starting at `start` would occupy.
pub fn span(session_type: SessionType, day: Day, start: TimeSlot) -> Result<Vec<TimeSlot>, ValidationError> {
    match session_type {
        SessionType::Lab => {
            let next = start.next().ok_or(ValidationError::InsufficientSlots {
                day,
                time_slot: start,
            })?;
            Ok(vec![start, next])
        }
        SessionType::Lecture | SessionType::Tutorial => Ok(vec![start]),
    }
}

/// Places a validated booking into a copy of `timetable`.
///
/// Occupied target slots are rejected; availability of the teacher and rooms
/// across other timetables is not checked here.
pub fn assign_slot(
    timetable: &Timetable,
    catalog: &Catalog,
    day: Day,
    start: TimeSlot,
    request: &SlotRequest,
) -> Result<Timetable, TimetableError> {
    let booking = request.to_booking()?;

    catalog.subject(&booking.subject_id)?;
    catalog.teacher(&booking.teacher_id)?;
    for room_id in &booking.room_ids {
        catalog.room(room_id)?;
    }

    let slots = span(booking.session_type, day, start)?;
    if let Some(taken) = slots.iter().find(|slot| !timetable.is_free(day, **slot)) {
        return Err(ValidationError::SlotOccupied {
            day,
            time_slot: *taken,
        }
        .into());
    }

    let mut next = timetable.clone();
    if let [first, second] = slots.as_slice() {
        next.set(day, *second, Some(booking.continuation()));
        next.set(day, *first, Some(booking));
    } else {
        next.set(day, start, Some(booking));
    }

    debug!("assigned {} {} in {}", day, start, timetable.key);
    Ok(next)
}

/// Clears the addressed slot, or the whole lab it belongs to: the start and
/// every continuation that follows it.
/// Removing an empty slot returns the timetable unchanged.
pub fn remove_slot(timetable: &Timetable, day: Day, time_slot: TimeSlot) -> Timetable {
    let mut next = timetable.clone();

    let Some(booking) = timetable.get(day, time_slot) else {
        return next;
    };

    if !booking.is_lab() {
        next.clear(day, time_slot);
        return next;
    }

    let mut start = time_slot;
    while timetable.get(day, start).is_some_and(SlotBooking::is_continuation) {
        match start.prev() {
            Some(prev) => start = prev,
            None => break,
        }
    }

    next.clear(day, start);
    let mut after = start.next();
    while let Some(slot) = after {
        if !timetable.get(day, slot).is_some_and(SlotBooking::is_continuation) {
            break;
        }
        next.clear(day, slot);
        after = slot.next();
    }

    debug!("removed lab at {} {} in {}", day, start, timetable.key);
    next
}
