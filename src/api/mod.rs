use axum::Json;
use axum::extract::{Path, Query};
use axum::routing::{delete, post};
use axum::{Router, extract::State, http::StatusCode, routing::get};
use serde::Deserialize;

use crate::drafts::DraftSummary;
use crate::error::AppError;
use crate::models::*;
use crate::services::{AvailableChoices, CatalogService, TimetableService, ViewFilter};
use crate::state::AppState;
use crate::timetable::slot::parse_slot_key;
use crate::timetable::{SessionType, SlotRequest, SubjectPalette, Timetable, TimetableKey};

#[derive(Deserialize)]
struct AssignBody {
    day: String,
    time_slot: String,
    #[serde(flatten)]
    slot: SlotRequest,
}

#[derive(Deserialize)]
struct SlotBody {
    day: String,
    time_slot: String,
}

#[derive(Deserialize)]
struct AvailableParams {
    day: String,
    time_slot: String,
    session_type: Option<String>,
    subject_id: Option<String>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/subjects", get(list_subjects).post(create_subject))
        .route("/subjects/colors", get(subject_colors))
        .route("/subjects/{id}", delete(delete_subject))
        .route("/teachers", get(list_teachers).post(create_teacher))
        .route("/teachers/{id}", delete(delete_teacher))
        .route("/rooms", get(list_rooms).post(create_room))
        .route("/rooms/{id}", delete(delete_room))
        .route("/streams", get(list_streams).post(create_stream))
        .route("/streams/{id}", delete(delete_stream))
        .route("/divisions", get(list_divisions).post(create_division))
        .route("/divisions/{id}", delete(delete_division))
        .route("/timetables", get(list_timetables))
        .route("/timetables/{key}", get(get_timetable).delete(delete_timetable))
        .route("/timetables/{key}/view", get(view_timetable))
        .route("/editor/{key}", post(open_editor).delete(discard_editor))
        .route("/editor/{key}/assign", post(assign_slot))
        .route("/editor/{key}/remove", post(remove_slot))
        .route("/editor/{key}/available", get(available))
        .route("/editor/{key}/save", post(save_editor))
        .route("/drafts", get(list_drafts))
        .with_state(state)
}

fn parse_key(raw: &str) -> Result<TimetableKey, AppError> {
    Ok(raw.parse::<TimetableKey>()?)
}

async fn health(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    sqlx::query("select 1").execute(&state.db).await?;
    Ok(StatusCode::OK)
}

// Catalog

async fn list_subjects(State(state): State<AppState>) -> Result<Json<Vec<Subject>>, AppError> {
    Ok(Json(CatalogService::new(state.db).list_subjects().await?))
}

async fn create_subject(
    State(state): State<AppState>,
    Json(req): Json<NewSubjectRequest>
) -> Result<Json<Subject>, AppError> {
    Ok(Json(CatalogService::new(state.db).create_subject(req).await?))
}

async fn delete_subject(
    State(state): State<AppState>,
    Path(id): Path<String>
) -> Result<StatusCode, AppError> {
    CatalogService::new(state.db).delete_subject(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn subject_colors(State(state): State<AppState>) -> Result<Json<SubjectPalette>, AppError> {
    Ok(Json(CatalogService::new(state.db).subject_palette().await?))
}

async fn list_teachers(State(state): State<AppState>) -> Result<Json<Vec<Teacher>>, AppError> {
    Ok(Json(CatalogService::new(state.db).list_teachers().await?))
}

async fn create_teacher(
    State(state): State<AppState>,
    Json(req): Json<NewTeacherRequest>
) -> Result<Json<Teacher>, AppError> {
    Ok(Json(CatalogService::new(state.db).create_teacher(req).await?))
}

async fn delete_teacher(
    State(state): State<AppState>,
    Path(id): Path<String>
) -> Result<StatusCode, AppError> {
    CatalogService::new(state.db).delete_teacher(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn list_rooms(State(state): State<AppState>) -> Result<Json<Vec<Room>>, AppError> {
    Ok(Json(CatalogService::new(state.db).list_rooms().await?))
}

async fn create_room(
    State(state): State<AppState>,
    Json(req): Json<NewRoomRequest>
) -> Result<Json<Room>, AppError> {
    Ok(Json(CatalogService::new(state.db).create_room(req).await?))
}

async fn delete_room(
    State(state): State<AppState>,
    Path(id): Path<String>
) -> Result<StatusCode, AppError> {
    CatalogService::new(state.db).delete_room(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn list_streams(State(state): State<AppState>) -> Result<Json<Vec<Stream>>, AppError> {
    Ok(Json(CatalogService::new(state.db).list_streams().await?))
}

async fn create_stream(
    State(state): State<AppState>,
    Json(req): Json<NewStreamRequest>
) -> Result<Json<Stream>, AppError> {
    Ok(Json(CatalogService::new(state.db).create_stream(req).await?))
}

async fn delete_stream(
    State(state): State<AppState>,
    Path(id): Path<String>
) -> Result<StatusCode, AppError> {
    CatalogService::new(state.db).delete_stream(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn list_divisions(State(state): State<AppState>) -> Result<Json<Vec<Division>>, AppError> {
    Ok(Json(CatalogService::new(state.db).list_divisions().await?))
}

async fn create_division(
    State(state): State<AppState>,
    Json(req): Json<NewDivisionRequest>
) -> Result<Json<Division>, AppError> {
    Ok(Json(CatalogService::new(state.db).create_division(req).await?))
}

async fn delete_division(
    State(state): State<AppState>,
    Path(id): Path<String>
) -> Result<StatusCode, AppError> {
    CatalogService::new(state.db).delete_division(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// Stored timetables

async fn list_timetables(State(state): State<AppState>) -> Result<Json<Vec<StoredTimetable>>, AppError> {
    Ok(Json(TimetableService::from_state(&state).list_timetables().await?))
}

async fn get_timetable(
    State(state): State<AppState>,
    Path(key): Path<String>
) -> Result<Json<StoredTimetable>, AppError> {
    let key = parse_key(&key)?;
    Ok(Json(TimetableService::from_state(&state).get_timetable(&key).await?))
}

async fn view_timetable(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Query(filter): Query<ViewFilter>
) -> Result<Json<Timetable>, AppError> {
    let key = parse_key(&key)?;
    Ok(Json(TimetableService::from_state(&state).view(&key, &filter).await?))
}

async fn delete_timetable(
    State(state): State<AppState>,
    Path(key): Path<String>
) -> Result<StatusCode, AppError> {
    let key = parse_key(&key)?;
    TimetableService::from_state(&state).delete_timetable(&key).await?;
    Ok(StatusCode::NO_CONTENT)
}

// Editor sessions

async fn open_editor(
    State(state): State<AppState>,
    Path(key): Path<String>
) -> Result<Json<Timetable>, AppError> {
    let key = parse_key(&key)?;
    Ok(Json(TimetableService::from_state(&state).open(&key).await?))
}

async fn discard_editor(
    State(state): State<AppState>,
    Path(key): Path<String>
) -> Result<StatusCode, AppError> {
    let key = parse_key(&key)?;
    TimetableService::from_state(&state).discard(&key).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn assign_slot(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(body): Json<AssignBody>
) -> Result<Json<Timetable>, AppError> {
    let key = parse_key(&key)?;
    let (day, time_slot) = parse_slot_key(&body.day, &body.time_slot)?;
    let timetable = TimetableService::from_state(&state)
        .assign(&key, day, time_slot, &body.slot)
        .await?;
    Ok(Json(timetable))
}

async fn remove_slot(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(body): Json<SlotBody>
) -> Result<Json<Timetable>, AppError> {
    let key = parse_key(&key)?;
    let (day, time_slot) = parse_slot_key(&body.day, &body.time_slot)?;
    let timetable = TimetableService::from_state(&state)
        .remove(&key, day, time_slot)
        .await?;
    Ok(Json(timetable))
}

async fn available(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Query(params): Query<AvailableParams>
) -> Result<Json<AvailableChoices>, AppError> {
    let key = parse_key(&key)?;
    let (day, time_slot) = parse_slot_key(&params.day, &params.time_slot)?;
    let session_type = match params.session_type.as_deref() {
        Some(raw) => raw.parse::<SessionType>()?,
        None => SessionType::Lecture,
    };
    let choices = TimetableService::from_state(&state)
        .available(&key, day, time_slot, session_type, params.subject_id.as_deref())
        .await?;
    Ok(Json(choices))
}

async fn save_editor(
    State(state): State<AppState>,
    Path(key): Path<String>
) -> Result<Json<StoredTimetable>, AppError> {
    let key = parse_key(&key)?;
    Ok(Json(TimetableService::from_state(&state).save(&key).await?))
}

async fn list_drafts(State(state): State<AppState>) -> Result<Json<Vec<DraftSummary>>, AppError> {
    Ok(Json(TimetableService::from_state(&state).list_drafts().await?))
}
