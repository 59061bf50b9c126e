use serde::{Deserialize, Serialize};

use crate::timetable::Timetable;

/// A timetable as held by the store, keyed by its composite name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredTimetable {
    pub name: String,
    pub timetable: Timetable,
    pub created_at: String,
    pub updated_at: String,
}
