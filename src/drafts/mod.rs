use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::timetable::{Timetable, TimetableKey};

#[derive(Debug, Error)]
pub enum DraftError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed draft: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Draft key cannot be used as a file name: {0}")]
    InvalidKey(String),
}

/// An in-progress edit saved outside the main store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Draft {
    pub key: String,
    pub timetable: Timetable,
    pub saved_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DraftSummary {
    pub key: String,
    pub booked_slots: usize,
    pub saved_at: String,
}

impl From<&Draft> for DraftSummary {
    fn from(draft: &Draft) -> Self {
        Self {
            key: draft.key.clone(),
            booked_slots: draft.timetable.booked_count(),
            saved_at: draft.saved_at.clone(),
        }
    }
}

#[async_trait]
pub trait DraftStore: Send + Sync {
    async fn save_draft(&self, key: &TimetableKey, timetable: &Timetable) -> Result<(), DraftError>;
    async fn get_draft(&self, key: &TimetableKey) -> Result<Option<Draft>, DraftError>;
    async fn remove_draft(&self, key: &TimetableKey) -> Result<(), DraftError>;
    async fn list_drafts(&self) -> Result<Vec<DraftSummary>, DraftError>;
}

fn new_draft(key: &TimetableKey, timetable: &Timetable) -> Draft {
    Draft {
        key: key.to_string(),
        timetable: timetable.clone(),
        saved_at: Utc::now().to_rfc3339(),
    }
}

/// One JSON file per timetable key under a directory.
pub struct FileDraftStore {
    dir: PathBuf,
}

impl FileDraftStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &TimetableKey) -> Result<PathBuf, DraftError> {
        let name = key.to_string();
        let safe = name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !safe {
            return Err(DraftError::InvalidKey(name));
        }
        Ok(self.dir.join(format!("{}.json", name)))
    }
}

#[async_trait]
impl DraftStore for FileDraftStore {
    async fn save_draft(&self, key: &TimetableKey, timetable: &Timetable) -> Result<(), DraftError> {
        let path = self.path_for(key)?;
        tokio::fs::create_dir_all(&self.dir).await?;

        let body = serde_json::to_vec_pretty(&new_draft(key, timetable))?;
        // Write then rename so a crash never leaves half a draft behind.
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, body).await?;
        tokio::fs::rename(&tmp, &path).await?;

        debug!("draft saved to {}", path.display());
        Ok(())
    }

    async fn get_draft(&self, key: &TimetableKey) -> Result<Option<Draft>, DraftError> {
        let path = self.path_for(key)?;
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn remove_draft(&self, key: &TimetableKey) -> Result<(), DraftError> {
        let path = self.path_for(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    async fn list_drafts(&self) -> Result<Vec<DraftSummary>, DraftError> {
        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut drafts = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let bytes = tokio::fs::read(&path).await?;
            match serde_json::from_slice::<Draft>(&bytes) {
                Ok(draft) => drafts.push(DraftSummary::from(&draft)),
                Err(e) => warn!("Skipping unreadable draft {}: {}", path.display(), e),
            }
        }

        drafts.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(drafts)
    }
}

/// Keeps drafts in process memory. Used by tests and when no draft
/// directory is configured.
#[derive(Default)]
pub struct MemoryDraftStore {
    drafts: Mutex<BTreeMap<String, Draft>>,
}

impl MemoryDraftStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DraftStore for MemoryDraftStore {
    async fn save_draft(&self, key: &TimetableKey, timetable: &Timetable) -> Result<(), DraftError> {
        self.drafts
            .lock()
            .await
            .insert(key.to_string(), new_draft(key, timetable));
        Ok(())
    }

    async fn get_draft(&self, key: &TimetableKey) -> Result<Option<Draft>, DraftError> {
        Ok(self.drafts.lock().await.get(&key.to_string()).cloned())
    }

    async fn remove_draft(&self, key: &TimetableKey) -> Result<(), DraftError> {
        self.drafts.lock().await.remove(&key.to_string());
        Ok(())
    }

    async fn list_drafts(&self) -> Result<Vec<DraftSummary>, DraftError> {
        Ok(self.drafts.lock().await.values().map(DraftSummary::from).collect())
    }
}
