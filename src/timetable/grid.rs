use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::booking::{Resource, SlotBooking};
use super::key::TimetableKey;
use super::slot::{Day, TimeSlot};

pub type DaySlots = BTreeMap<TimeSlot, Option<SlotBooking>>;

/// The weekly grid for one (stream, semester, division).
///
/// `Day` and `TimeSlot` order like the catalog, so iterating the maps always
/// yields Monday..Saturday and the bands in sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Timetable {
    pub key: TimetableKey,
    days: BTreeMap<Day, DaySlots>,
}

impl Timetable {
    /// A grid with every day/time-slot pair present and empty.
    pub fn empty(key: TimetableKey) -> Self {
        let days = Day::ALL
            .into_iter()
            .map(|day| (day, TimeSlot::ALL.into_iter().map(|slot| (slot, None)).collect()))
            .collect();
        Self { key, days }
    }

    /// Builds a grid from sparse bookings, filling the gaps with empty slots.
    pub fn from_bookings<I>(key: TimetableKey, bookings: I) -> Self
    where
        I: IntoIterator<Item = (Day, TimeSlot, SlotBooking)>,
    {
        let mut timetable = Self::empty(key);
        for (day, slot, booking) in bookings {
            timetable.set(day, slot, Some(booking));
        }
        timetable
    }

    pub fn days(&self) -> &BTreeMap<Day, DaySlots> {
        &self.days
    }

    pub fn get(&self, day: Day, time_slot: TimeSlot) -> Option<&SlotBooking> {
        self.days
            .get(&day)
            .and_then(|slots| slots.get(&time_slot))
            .and_then(Option::as_ref)
    }

    pub fn is_free(&self, day: Day, time_slot: TimeSlot) -> bool {
        self.get(day, time_slot).is_none()
    }

    pub(crate) fn set(&mut self, day: Day, time_slot: TimeSlot, booking: Option<SlotBooking>) {
        self.days.entry(day).or_default().insert(time_slot, booking);
    }

    pub(crate) fn clear(&mut self, day: Day, time_slot: TimeSlot) {
        self.set(day, time_slot, None);
    }

    /// Every non-empty slot in canonical order.
    pub fn bookings(&self) -> impl Iterator<Item = (Day, TimeSlot, &SlotBooking)> {
        self.days.iter().flat_map(|(day, slots)| {
            slots
                .iter()
                .filter_map(move |(slot, booking)| booking.as_ref().map(|b| (*day, *slot, b)))
        })
    }

    pub fn booked_count(&self) -> usize {
        self.bookings().count()
    }

    pub fn is_empty(&self) -> bool {
        self.booked_count() == 0
    }

    /// A copy of the grid keeping only the bookings `keep` accepts.
    pub fn filter<F>(&self, keep: F) -> Timetable
    where
        F: Fn(&SlotBooking) -> bool,
    {
        let days = self
            .days
            .iter()
            .map(|(day, slots)| {
                let slots = slots
                    .iter()
                    .map(|(slot, booking)| (*slot, booking.clone().filter(|b| keep(b))))
                    .collect();
                (*day, slots)
            })
            .collect();
        Timetable {
            key: self.key.clone(),
            days,
        }
    }

    pub fn filter_by_teacher(&self, teacher_id: &str) -> Timetable {
        self.filter(|b| b.uses(Resource::Teacher(teacher_id)))
    }

    pub fn filter_by_room(&self, room_id: &str) -> Timetable {
        self.filter(|b| b.uses(Resource::Room(room_id)))
    }

    pub fn filter_by_subject(&self, subject_id: &str) -> Timetable {
        self.filter(|b| b.subject_id == subject_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timetable::booking::SessionType;

    fn booking(subject: &str, teacher: &str, room: &str) -> SlotBooking {
        SlotBooking::new(subject, teacher, vec![room.to_string()], SessionType::Lecture)
    }

    #[test]
    fn test_empty_grid_has_every_pair() {
        let tt = Timetable::empty(TimetableKey::new("cs", 1, "a"));
        for day in Day::ALL {
            for slot in TimeSlot::ALL {
                assert!(tt.is_free(day, slot));
            }
        }
        assert!(tt.is_empty());

        let json = serde_json::to_value(&tt).unwrap();
        assert_eq!(json["days"].as_object().unwrap().len(), 6);
        assert_eq!(json["days"]["Monday"].as_object().unwrap().len(), 8);
    }

    #[test]
    fn test_bookings_iterate_in_canonical_order() {
        let tt = Timetable::from_bookings(
            TimetableKey::new("cs", 1, "a"),
            vec![
                (Day::Saturday, TimeSlot::H0930, booking("s3", "t1", "r1")),
                (Day::Monday, TimeSlot::H1230, booking("s2", "t1", "r1")),
                (Day::Monday, TimeSlot::H0930, booking("s1", "t1", "r1")),
            ],
        );

        let order: Vec<(Day, TimeSlot)> = tt.bookings().map(|(d, s, _)| (d, s)).collect();
        assert_eq!(
            order,
            vec![
                (Day::Monday, TimeSlot::H0930),
                (Day::Monday, TimeSlot::H1230),
                (Day::Saturday, TimeSlot::H0930),
            ]
        );
    }

    #[test]
    fn test_filter_views_clear_other_slots() {
        let tt = Timetable::from_bookings(
            TimetableKey::new("cs", 1, "a"),
            vec![
                (Day::Monday, TimeSlot::H0930, booking("math", "t1", "r1")),
                (Day::Monday, TimeSlot::H1030, booking("phys", "t2", "r2")),
                (Day::Friday, TimeSlot::H1430, booking("math", "t2", "r1")),
            ],
        );

        let by_teacher = tt.filter_by_teacher("t2");
        assert_eq!(by_teacher.booked_count(), 2);
        assert!(by_teacher.is_free(Day::Monday, TimeSlot::H0930));

        let by_room = tt.filter_by_room("r1");
        assert_eq!(by_room.booked_count(), 2);
        assert!(by_room.get(Day::Friday, TimeSlot::H1430).is_some());

        let by_subject = tt.filter_by_subject("phys");
        assert_eq!(by_subject.booked_count(), 1);
        assert_eq!(by_subject.key, tt.key);

        // Filtered copies keep the full shape of the grid.
        let json = serde_json::to_value(&by_subject).unwrap();
        assert_eq!(json["days"]["Saturday"].as_object().unwrap().len(), 8);
    }
}
