use serde::Serialize;

use crate::models::{Room, RoomType, Teacher};

use super::assignment::{remove_slot, span};
use super::booking::{Resource, SessionType, SlotBooking};
use super::catalog::Catalog;
use super::error::ValidationError;
use super::grid::Timetable;
use super::slot::{Day, TimeSlot, parse_slot_key};

/// True when no candidate timetable has `resource` booked at `day`/`time_slot`.
pub fn is_resource_available(
    resource: Resource<'_>,
    day: Day,
    time_slot: TimeSlot,
    candidates: &[&Timetable],
) -> bool {
    !candidates
        .iter()
        .any(|tt| tt.get(day, time_slot).is_some_and(|b| b.uses(resource)))
}

/// Same check for labels straight off the wire.
pub fn check_availability(
    resource: Resource<'_>,
    day: &str,
    time_slot: &str,
    candidates: &[&Timetable],
) -> Result<bool, ValidationError> {
    let (day, time_slot) = parse_slot_key(day, time_slot)?;
    Ok(is_resource_available(resource, day, time_slot, candidates))
}

/// Checks every slot a session would occupy. A lab is only available when
/// both of its slots are.
pub fn is_span_available(
    resource: Resource<'_>,
    session_type: SessionType,
    day: Day,
    start: TimeSlot,
    candidates: &[&Timetable],
) -> Result<bool, ValidationError> {
    let slots = span(session_type, day, start)?;
    Ok(slots
        .into_iter()
        .all(|slot| is_resource_available(resource, day, slot, candidates)))
}

/// The resources of `booking` already taken somewhere in `candidates`.
pub fn busy_resources<'b>(
    booking: &'b SlotBooking,
    day: Day,
    start: TimeSlot,
    candidates: &[&Timetable],
) -> Result<Vec<Resource<'b>>, ValidationError> {
    let mut wanted = vec![Resource::Teacher(booking.teacher_id.as_str())];
    wanted.extend(booking.room_ids.iter().map(|r| Resource::Room(r.as_str())));

    let mut busy = Vec::new();
    for resource in wanted {
        if !is_span_available(resource, booking.session_type, day, start, candidates)? {
            busy.push(resource);
        }
    }
    Ok(busy)
}

/// A copy of the grid with the slot under edit (and its lab partner) cleared,
/// so re-assigning a slot does not conflict with its own booking.
pub fn excluding_slot(timetable: &Timetable, day: Day, time_slot: TimeSlot) -> Timetable {
    remove_slot(timetable, day, time_slot)
}

#[derive(Debug, Serialize)]
pub struct AvailableResources<'a> {
    pub teachers: Vec<&'a Teacher>,
    pub rooms: Vec<&'a Room>,
}

/// Filters the catalog down to the teachers and rooms free for a session at
/// `day`/`start`. With a subject, only teachers allowed to teach it are
/// offered; rooms are matched to the session type.
pub fn available_resources<'a>(
    catalog: &'a Catalog,
    subject_id: Option<&str>,
    session_type: SessionType,
    day: Day,
    start: TimeSlot,
    candidates: &[&Timetable],
) -> Result<AvailableResources<'a>, ValidationError> {
    span(session_type, day, start)?;

    let mut teachers = Vec::new();
    for teacher in &catalog.teachers {
        if subject_id.is_some_and(|s| !teacher.can_teach(s)) {
            continue;
        }
        if is_span_available(Resource::Teacher(&teacher.id), session_type, day, start, candidates)? {
            teachers.push(teacher);
        }
    }

    let mut rooms = Vec::new();
    for room in catalog.rooms_of_type(RoomType::for_session(session_type)) {
        if is_span_available(Resource::Room(&room.id), session_type, day, start, candidates)? {
            rooms.push(room);
        }
    }

    Ok(AvailableResources { teachers, rooms })
}
