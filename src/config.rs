use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::AppError;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    /// `None` keeps drafts in memory only.
    pub draft_dir: Option<PathBuf>,
    pub autosave_interval: Duration,
    /// Reject commits whose teacher or rooms are booked elsewhere.
    pub enforce_availability: bool,
}

impl AppConfig {
    pub fn new_from_env() -> Result<Self, AppError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL")
            .unwrap_or_else(|| "sqlite://timetable.db".to_string());

        let bind_addr = lookup("BIND_ADDR")
            .unwrap_or_else(|| "127.0.0.1:3000".to_string())
            .parse::<SocketAddr>()
            .map_err(|e| AppError::Config(format!("BIND_ADDR: {}", e)))?;

        let draft_dir = match lookup("DRAFT_DIR") {
            Some(dir) if dir.trim().is_empty() => None,
            Some(dir) => Some(PathBuf::from(dir)),
            None => Some(PathBuf::from("drafts")),
        };

        let autosave_secs = match lookup("AUTOSAVE_INTERVAL_SECS") {
            Some(raw) => raw
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or_else(|| AppError::Config(format!("AUTOSAVE_INTERVAL_SECS: invalid value {:?}", raw)))?,
            None => 30,
        };

        let enforce_availability = match lookup("ENFORCE_AVAILABILITY").as_deref() {
            None => true,
            Some("1" | "true" | "yes" | "on") => true,
            Some("0" | "false" | "no" | "off") => false,
            Some(other) => {
                return Err(AppError::Config(format!(
                    "ENFORCE_AVAILABILITY: invalid value {:?}",
                    other
                )));
            }
        };

        Ok(Self {
            database_url,
            bind_addr,
            draft_dir,
            autosave_interval: Duration::from_secs(autosave_secs),
            enforce_availability,
        })
    }
}
