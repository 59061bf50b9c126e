use sqlx::SqlitePool;
use tracing::info;

use crate::db::repository;
use crate::error::AppError;
use crate::models::*;
use crate::timetable::{SubjectPalette, ValidationError};

/// Create/list/delete for the entity collections, with the checks the
/// database does not do on its own.
pub struct CatalogService {
    db: SqlitePool,
}

impl CatalogService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    pub async fn list_subjects(&self) -> Result<Vec<Subject>, AppError> {
        Ok(repository::fetch_subjects(&self.db).await?)
    }

    pub async fn create_subject(&self, req: NewSubjectRequest) -> Result<Subject, AppError> {
        require("name", &req.name)?;
        require("code", &req.code)?;
        let subject = repository::insert_subject(&self.db, req).await?;
        info!("created subject {} ({})", subject.code, subject.id);
        Ok(subject)
    }

    pub async fn delete_subject(&self, id: &str) -> Result<(), AppError> {
        found(repository::delete_subject(&self.db, id).await?, "subject", id)
    }

    /// Colours for every known subject, derived from the sorted ids.
    pub async fn subject_palette(&self) -> Result<SubjectPalette, AppError> {
        let subjects = repository::fetch_subjects(&self.db).await?;
        Ok(SubjectPalette::from_subject_ids(subjects.into_iter().map(|s| s.id)))
    }

    pub async fn list_teachers(&self) -> Result<Vec<Teacher>, AppError> {
        Ok(repository::fetch_teachers(&self.db).await?)
    }

    pub async fn create_teacher(&self, req: NewTeacherRequest) -> Result<Teacher, AppError> {
        require("name", &req.name)?;
        require("email", &req.email)?;
        let teacher = repository::insert_teacher(&self.db, req)
            .await
            .map_err(|e| AppError::from_unique(e, "teacher with this email"))?;
        info!("created teacher {} ({})", teacher.name, teacher.id);
        Ok(teacher)
    }

    pub async fn delete_teacher(&self, id: &str) -> Result<(), AppError> {
        found(repository::delete_teacher(&self.db, id).await?, "teacher", id)
    }

    pub async fn list_rooms(&self) -> Result<Vec<Room>, AppError> {
        Ok(repository::fetch_rooms(&self.db).await?)
    }

    pub async fn create_room(&self, req: NewRoomRequest) -> Result<Room, AppError> {
        require("room_number", &req.room_number)?;
        if req.capacity < 0 {
            return Err(AppError::BadRequest("capacity must not be negative".to_string()));
        }
        let room = repository::insert_room(&self.db, req)
            .await
            .map_err(|e| AppError::from_unique(e, "room with this number and type"))?;
        info!("created room {} ({})", room.room_number, room.id);
        Ok(room)
    }

    pub async fn delete_room(&self, id: &str) -> Result<(), AppError> {
        found(repository::delete_room(&self.db, id).await?, "room", id)
    }

    pub async fn list_streams(&self) -> Result<Vec<Stream>, AppError> {
        Ok(repository::fetch_streams(&self.db).await?)
    }

    pub async fn create_stream(&self, req: NewStreamRequest) -> Result<Stream, AppError> {
        require("code", &req.code)?;
        require("name", &req.name)?;
        if req.semesters < 1 {
            return Err(AppError::BadRequest("semesters must be at least 1".to_string()));
        }
        let stream = repository::insert_stream(&self.db, req)
            .await
            .map_err(|e| AppError::from_unique(e, "stream with this code"))?;
        info!("created stream {} ({})", stream.code, stream.id);
        Ok(stream)
    }

    /// Refused while any division still belongs to the stream.
    pub async fn delete_stream(&self, id: &str) -> Result<(), AppError> {
        let dependents = repository::count_divisions_for_stream(&self.db, id).await?;
        if dependents > 0 {
            return Err(AppError::ReferentialIntegrity(format!(
                "stream {} still has {} division(s)",
                id, dependents
            )));
        }
        found(repository::delete_stream(&self.db, id).await?, "stream", id)
    }

    pub async fn list_divisions(&self) -> Result<Vec<Division>, AppError> {
        Ok(repository::fetch_divisions(&self.db).await?)
    }

    pub async fn create_division(&self, req: NewDivisionRequest) -> Result<Division, AppError> {
        require("name", &req.name)?;
        let stream = repository::find_stream_by_id(&self.db, &req.stream_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("stream {}", req.stream_id)))?;
        if req.semester < 1 || req.semester > stream.semesters {
            return Err(ValidationError::SemesterOutOfRange {
                semester: req.semester,
                max: stream.semesters,
            }
            .into());
        }
        let division = repository::insert_division(&self.db, req).await?;
        info!("created division {} ({})", division.name, division.id);
        Ok(division)
    }

    pub async fn delete_division(&self, id: &str) -> Result<(), AppError> {
        found(repository::delete_division(&self.db, id).await?, "division", id)
    }
}

fn require(field: &'static str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(ValidationError::MissingField(field).into());
    }
    Ok(())
}

fn found(deleted: bool, kind: &str, id: &str) -> Result<(), AppError> {
    if deleted {
        Ok(())
    } else {
        Err(AppError::NotFound(format!("{} {}", kind, id)))
    }
}
