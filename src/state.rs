use std::collections::HashMap;
use std::sync::Arc;

use sqlx::SqlitePool;
use tokio::sync::Mutex;

use crate::drafts::DraftStore;
use crate::timetable::{Timetable, TimetableKey};

/// A timetable open for editing. `dirty` is set by every change and cleared
/// once the draft store has the latest copy.
#[derive(Debug, Clone)]
pub struct EditorSession {
    pub timetable: Timetable,
    pub dirty: bool,
}

pub type EditorSessions = Arc<Mutex<HashMap<TimetableKey, EditorSession>>>;

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub drafts: Arc<dyn DraftStore>,
    pub sessions: EditorSessions,
    pub enforce_availability: bool,
}

impl AppState {
    pub fn new(db: SqlitePool, drafts: Arc<dyn DraftStore>, enforce_availability: bool) -> Self {
        Self {
            db,
            drafts,
            sessions: EditorSessions::default(),
            enforce_availability,
        }
    }
}
