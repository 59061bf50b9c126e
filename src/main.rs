use std::sync::Arc;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use timetable::api::router;
use timetable::config::AppConfig;
use timetable::db;
use timetable::drafts::{DraftStore, FileDraftStore, MemoryDraftStore};
use timetable::services::{DraftScheduler, TimetableService};
use timetable::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "timetable=debug".to_string()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::new_from_env()?;

    let pool = db::connect(&config.database_url).await?;

    let drafts: Arc<dyn DraftStore> = match &config.draft_dir {
        Some(dir) => {
            info!("drafts stored under {}", dir.display());
            Arc::new(FileDraftStore::new(dir.clone()))
        }
        None => {
            info!("drafts kept in memory only");
            Arc::new(MemoryDraftStore::new())
        }
    };

    let state = AppState::new(pool, drafts, config.enforce_availability);

    let scheduler = DraftScheduler::new(TimetableService::from_state(&state), config.autosave_interval);
    tokio::spawn(scheduler.start());

    let app = router(state);

    info!("listening on http://{}", config.bind_addr);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
