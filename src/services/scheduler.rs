use std::time::Duration;

use tracing::{debug, info, warn};

use crate::error::AppError;
use crate::services::timetable_service::TimetableService;

/// Autosave scheduler.
/// Periodically writes changed editor sessions to the draft store.
pub struct DraftScheduler {
    service: TimetableService,
    interval: Duration,
}

impl DraftScheduler {
    pub fn new(service: TimetableService, interval: Duration) -> Self {
        Self { service, interval }
    }

    /// Runs forever; spawn it and abort the task to stop.
    pub async fn start(self) {
        info!("Starting draft autosave (interval: {:?})", self.interval);

        loop {
            tokio::time::sleep(self.interval).await;

            match self.run_flush().await {
                Ok(0) => debug!("Autosave: nothing to save"),
                Ok(saved) => info!("Autosave completed - {} draft(s) written", saved),
                Err(e) => {
                    // Dirty sessions stay dirty and are retried next round.
                    warn!("Autosave failed: {:?}", e);
                }
            }
        }
    }

    pub async fn run_flush(&self) -> Result<usize, AppError> {
        self.service.flush_drafts().await
    }
}
