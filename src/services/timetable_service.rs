use std::sync::Arc;

use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::{error, info, warn};

use crate::db::repository;
use crate::drafts::{DraftStore, DraftSummary};
use crate::error::AppError;
use crate::models::{Room, StoredTimetable, Teacher};
use crate::state::{AppState, EditorSession, EditorSessions};
use crate::timetable::availability::{busy_resources, excluding_slot};
use crate::timetable::{
    Day, SessionType, SlotRequest, TimeSlot, Timetable, TimetableKey, assign_slot,
    available_resources, remove_slot,
};

#[derive(Debug, Default, Deserialize)]
pub struct ViewFilter {
    pub teacher_id: Option<String>,
    pub room_id: Option<String>,
    pub subject_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AvailableChoices {
    pub teachers: Vec<Teacher>,
    pub rooms: Vec<Room>,
}

pub struct TimetableService {
    db: SqlitePool,
    drafts: Arc<dyn DraftStore>,
    sessions: EditorSessions,
    enforce_availability: bool,
}

impl TimetableService {
    pub fn new(
        db: SqlitePool,
        drafts: Arc<dyn DraftStore>,
        sessions: EditorSessions,
        enforce_availability: bool,
    ) -> Self {
        Self {
            db,
            drafts,
            sessions,
            enforce_availability,
        }
    }

    pub fn from_state(state: &AppState) -> Self {
        Self::new(
            state.db.clone(),
            state.drafts.clone(),
            state.sessions.clone(),
            state.enforce_availability,
        )
    }

    pub async fn list_timetables(&self) -> Result<Vec<StoredTimetable>, AppError> {
        Ok(repository::fetch_all_timetables(&self.db).await?)
    }

    pub async fn get_timetable(&self, key: &TimetableKey) -> Result<StoredTimetable, AppError> {
        repository::fetch_timetable_by_key(&self.db, key)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("timetable {}", key)))
    }

    /// The stored grid narrowed to one teacher, room and/or subject.
    pub async fn view(&self, key: &TimetableKey, filter: &ViewFilter) -> Result<Timetable, AppError> {
        let mut timetable = self.get_timetable(key).await?.timetable;
        if let Some(teacher_id) = &filter.teacher_id {
            timetable = timetable.filter_by_teacher(teacher_id);
        }
        if let Some(room_id) = &filter.room_id {
            timetable = timetable.filter_by_room(room_id);
        }
        if let Some(subject_id) = &filter.subject_id {
            timetable = timetable.filter_by_subject(subject_id);
        }
        Ok(timetable)
    }

    pub async fn delete_timetable(&self, key: &TimetableKey) -> Result<(), AppError> {
        if !repository::delete_timetable(&self.db, key).await? {
            return Err(AppError::NotFound(format!("timetable {}", key)));
        }
        info!("deleted timetable {}", key);
        Ok(())
    }

    pub async fn list_drafts(&self) -> Result<Vec<DraftSummary>, AppError> {
        Ok(self.drafts.list_drafts().await?)
    }

    /// Stream and division must exist and agree with the key.
    async fn validate_key(&self, key: &TimetableKey) -> Result<(), AppError> {
        let stream = repository::find_stream_by_id(&self.db, &key.stream_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("stream {}", key.stream_id)))?;
        let division = repository::find_division_by_id(&self.db, &key.division_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("division {}", key.division_id)))?;

        if division.stream_id != stream.id {
            return Err(AppError::BadRequest(format!(
                "division {} does not belong to stream {}",
                division.id, stream.id
            )));
        }
        if key.semester != division.semester {
            return Err(AppError::BadRequest(format!(
                "division {} is in semester {}, not {}",
                division.id, division.semester, key.semester
            )));
        }
        Ok(())
    }

    /// Starts (or resumes) editing `key`. The grid comes from the draft if
    /// one exists, else from the store, else it starts empty; a draft is
    /// written straight away.
    pub async fn open(&self, key: &TimetableKey) -> Result<Timetable, AppError> {
        if let Some(session) = self.sessions.lock().await.get(key) {
            return Ok(session.timetable.clone());
        }

        self.validate_key(key).await?;

        let timetable = if let Some(draft) = self.drafts.get_draft(key).await? {
            info!("resuming draft for {} saved at {}", key, draft.saved_at);
            draft.timetable
        } else if let Some(stored) = repository::fetch_timetable_by_key(&self.db, key).await? {
            stored.timetable
        } else {
            Timetable::empty(key.clone())
        };
        self.drafts.save_draft(key, &timetable).await?;

        let mut sessions = self.sessions.lock().await;
        let session = sessions.entry(key.clone()).or_insert(EditorSession {
            timetable,
            dirty: false,
        });
        Ok(session.timetable.clone())
    }

    /// Every persisted timetable except the one stored under `key`.
    async fn other_timetables(&self, key: &TimetableKey) -> Result<Vec<Timetable>, AppError> {
        Ok(repository::fetch_all_timetables(&self.db)
            .await?
            .into_iter()
            .map(|stored| stored.timetable)
            .filter(|tt| &tt.key != key)
            .collect())
    }

    pub async fn assign(
        &self,
        key: &TimetableKey,
        day: Day,
        start: TimeSlot,
        request: &SlotRequest,
    ) -> Result<Timetable, AppError> {
        self.open(key).await?;
        let catalog = repository::load_catalog(&self.db).await?;
        let others = self.other_timetables(key).await?;

        let mut sessions = self.sessions.lock().await;
        let session = sessions
            .get_mut(key)
            .ok_or_else(|| AppError::NotFound(format!("editor session {}", key)))?;

        let next = assign_slot(&session.timetable, &catalog, day, start, request)?;

        if self.enforce_availability {
            let booking = request.to_booking()?;
            let mut candidates: Vec<&Timetable> = others.iter().collect();
            candidates.push(&session.timetable);

            let busy = busy_resources(&booking, day, start, &candidates)?;
            if !busy.is_empty() {
                let names: Vec<String> = busy.iter().map(ToString::to_string).collect();
                warn!("rejected assignment in {} at {} {}: {} busy", key, day, start, names.join(", "));
                return Err(AppError::Conflict(format!(
                    "{} already booked at {} {}",
                    names.join(", "),
                    day,
                    start
                )));
            }
        }

        session.timetable = next.clone();
        session.dirty = true;
        Ok(next)
    }

    pub async fn remove(&self, key: &TimetableKey, day: Day, time_slot: TimeSlot) -> Result<Timetable, AppError> {
        self.open(key).await?;

        let mut sessions = self.sessions.lock().await;
        let session = sessions
            .get_mut(key)
            .ok_or_else(|| AppError::NotFound(format!("editor session {}", key)))?;

        let next = remove_slot(&session.timetable, day, time_slot);
        if next != session.timetable {
            session.timetable = next.clone();
            session.dirty = true;
        }
        Ok(next)
    }

    /// Teachers and rooms that could take `day`/`start` in the timetable
    /// being edited. Whatever currently sits in that slot is ignored so it
    /// can be re-assigned.
    pub async fn available(
        &self,
        key: &TimetableKey,
        day: Day,
        start: TimeSlot,
        session_type: SessionType,
        subject_id: Option<&str>,
    ) -> Result<AvailableChoices, AppError> {
        let current = self.open(key).await?;
        let catalog = repository::load_catalog(&self.db).await?;
        let others = self.other_timetables(key).await?;

        let editing = excluding_slot(&current, day, start);
        let mut candidates: Vec<&Timetable> = others.iter().collect();
        candidates.push(&editing);

        let free = available_resources(&catalog, subject_id, session_type, day, start, &candidates)?;
        Ok(AvailableChoices {
            teachers: free.teachers.into_iter().cloned().collect(),
            rooms: free.rooms.into_iter().cloned().collect(),
        })
    }

    /// Promotes the session to the store and discards its draft. If the store
    /// write fails the draft is refreshed instead so nothing is lost.
    pub async fn save(&self, key: &TimetableKey) -> Result<StoredTimetable, AppError> {
        let mut sessions = self.sessions.lock().await;
        let session = sessions
            .get(key)
            .ok_or_else(|| AppError::NotFound(format!("editor session {}", key)))?;

        let stored = match repository::upsert_timetable(&self.db, &session.timetable).await {
            Ok(stored) => stored,
            Err(e) => {
                error!("failed to save timetable {}: {}", key, e);
                if let Err(draft_err) = self.drafts.save_draft(key, &session.timetable).await {
                    error!("failed to keep draft for {}: {}", key, draft_err);
                }
                return Err(e.into());
            }
        };

        sessions.remove(key);
        if let Err(e) = self.drafts.remove_draft(key).await {
            warn!("saved {} but could not remove its draft: {}", key, e);
        }
        info!("saved timetable {} ({} booked slots)", key, stored.timetable.booked_count());
        Ok(stored)
    }

    /// Drops the session and its draft without touching the store.
    pub async fn discard(&self, key: &TimetableKey) -> Result<(), AppError> {
        self.sessions.lock().await.remove(key);
        self.drafts.remove_draft(key).await?;
        info!("discarded edits for {}", key);
        Ok(())
    }

    /// Writes every changed session to the draft store. Sessions that fail
    /// stay dirty for the next round; the first failure is returned.
    pub async fn flush_drafts(&self) -> Result<usize, AppError> {
        let mut sessions = self.sessions.lock().await;
        let mut saved = 0;
        let mut first_error = None;

        for (key, session) in sessions.iter_mut().filter(|(_, s)| s.dirty) {
            match self.drafts.save_draft(key, &session.timetable).await {
                Ok(()) => {
                    session.dirty = false;
                    saved += 1;
                }
                Err(e) => {
                    warn!("failed to save draft for {}: {}", key, e);
                    first_error.get_or_insert(e);
                }
            }
        }

        match first_error {
            Some(e) => Err(e.into()),
            None => Ok(saved),
        }
    }
}
