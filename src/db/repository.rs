use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::db::dto::{TeacherRow, TimetableRow, encode_grid};
use crate::models::{
    Division, NewDivisionRequest, NewRoomRequest, NewStreamRequest, NewSubjectRequest,
    NewTeacherRequest, Room, StoredTimetable, Stream, Subject, Teacher,
};
use crate::timetable::{Catalog, Timetable, TimetableKey};

fn encode_error(e: serde_json::Error) -> sqlx::Error {
    sqlx::Error::Encode(Box::new(e))
}

// Subjects

pub async fn fetch_subjects(db: &SqlitePool) -> Result<Vec<Subject>, sqlx::Error> {
    sqlx::query_as::<_, Subject>(
        "SELECT id, name, code, credits, stream_code, semester, lectures_per_week, tutorials_per_week, practicals_per_week, created_at, updated_at FROM subjects ORDER BY code"
    )
    .fetch_all(db)
    .await
}

pub async fn insert_subject(db: &SqlitePool, req: NewSubjectRequest) -> Result<Subject, sqlx::Error> {
    let id = Uuid::new_v4().to_string();
    let now = Utc::now().to_rfc3339();

    sqlx::query(
        r#"
        INSERT INTO subjects
            (id, name, code, credits, stream_code, semester,
            lectures_per_week, tutorials_per_week, practicals_per_week, created_at, updated_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?10)
        "#,
    )
    .bind(&id)
    .bind(&req.name)
    .bind(&req.code)
    .bind(req.credits)
    .bind(&req.stream_code)
    .bind(req.semester)
    .bind(req.lectures_per_week)
    .bind(req.tutorials_per_week)
    .bind(req.practicals_per_week)
    .bind(&now)
    .execute(db)
    .await?;

    Ok(Subject {
        id,
        name: req.name,
        code: req.code,
        credits: req.credits,
        stream_code: req.stream_code,
        semester: req.semester,
        lectures_per_week: req.lectures_per_week,
        tutorials_per_week: req.tutorials_per_week,
        practicals_per_week: req.practicals_per_week,
        created_at: now.clone(),
        updated_at: now,
    })
}

pub async fn delete_subject(db: &SqlitePool, id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM subjects WHERE id = ?")
        .bind(id)
        .execute(db)
        .await?
        .rows_affected();
    Ok(result > 0)
}

// Teachers

pub async fn fetch_teachers(db: &SqlitePool) -> Result<Vec<Teacher>, sqlx::Error> {
    sqlx::query_as::<_, TeacherRow>(
        "SELECT id, name, email, specialization, subject_ids, cabin, roles, max_lectures, max_labs, max_tutorials, is_teaching_assistant, created_at, updated_at FROM teachers ORDER BY name"
    )
    .fetch_all(db)
    .await?
    .into_iter()
    .map(Teacher::try_from)
    .collect()
}

pub async fn insert_teacher(db: &SqlitePool, req: NewTeacherRequest) -> Result<Teacher, sqlx::Error> {
    let id = Uuid::new_v4().to_string();
    let now = Utc::now().to_rfc3339();
    let subject_ids = serde_json::to_string(&req.subject_ids).map_err(encode_error)?;
    let roles = serde_json::to_string(&req.roles).map_err(encode_error)?;

    sqlx::query(
        r#"
        INSERT INTO teachers
            (id, name, email, specialization, subject_ids, cabin, roles,
            max_lectures, max_labs, max_tutorials, is_teaching_assistant, created_at, updated_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?12)
        "#,
    )
    .bind(&id)
    .bind(&req.name)
    .bind(&req.email)
    .bind(&req.specialization)
    .bind(&subject_ids)
    .bind(&req.cabin)
    .bind(&roles)
    .bind(req.limits.max_lectures)
    .bind(req.limits.max_labs)
    .bind(req.limits.max_tutorials)
    .bind(req.is_teaching_assistant)
    .bind(&now)
    .execute(db)
    .await?;

    Ok(Teacher {
        id,
        name: req.name,
        email: req.email,
        specialization: req.specialization,
        subject_ids: req.subject_ids,
        cabin: req.cabin,
        roles: req.roles,
        limits: req.limits,
        is_teaching_assistant: req.is_teaching_assistant,
        created_at: now.clone(),
        updated_at: now,
    })
}

pub async fn delete_teacher(db: &SqlitePool, id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM teachers WHERE id = ?")
        .bind(id)
        .execute(db)
        .await?
        .rows_affected();
    Ok(result > 0)
}

// Rooms

pub async fn fetch_rooms(db: &SqlitePool) -> Result<Vec<Room>, sqlx::Error> {
    sqlx::query_as::<_, Room>(
        "SELECT id, room_number, capacity, room_type, created_at, updated_at FROM rooms ORDER BY room_type, room_number"
    )
    .fetch_all(db)
    .await
}

pub async fn insert_room(db: &SqlitePool, req: NewRoomRequest) -> Result<Room, sqlx::Error> {
    let id = Uuid::new_v4().to_string();
    let now = Utc::now().to_rfc3339();

    sqlx::query(
        r#"
        INSERT INTO rooms (id, room_number, capacity, room_type, created_at, updated_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?5)
        "#,
    )
    .bind(&id)
    .bind(&req.room_number)
    .bind(req.capacity)
    .bind(req.room_type)
    .bind(&now)
    .execute(db)
    .await?;

    Ok(Room {
        id,
        room_number: req.room_number,
        capacity: req.capacity,
        room_type: req.room_type,
        created_at: now.clone(),
        updated_at: now,
    })
}

pub async fn delete_room(db: &SqlitePool, id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM rooms WHERE id = ?")
        .bind(id)
        .execute(db)
        .await?
        .rows_affected();
    Ok(result > 0)
}

// Streams

pub async fn fetch_streams(db: &SqlitePool) -> Result<Vec<Stream>, sqlx::Error> {
    sqlx::query_as::<_, Stream>(
        "SELECT id, code, name, semesters, created_at, updated_at FROM streams ORDER BY code"
    )
    .fetch_all(db)
    .await
}

pub async fn find_stream_by_id(db: &SqlitePool, id: &str) -> Result<Option<Stream>, sqlx::Error> {
    sqlx::query_as::<_, Stream>(
        "SELECT id, code, name, semesters, created_at, updated_at FROM streams WHERE id = ?"
    )
    .bind(id)
    .fetch_optional(db)
    .await
}

pub async fn insert_stream(db: &SqlitePool, req: NewStreamRequest) -> Result<Stream, sqlx::Error> {
    let id = Uuid::new_v4().to_string();
    let now = Utc::now().to_rfc3339();

    sqlx::query(
        r#"
        INSERT INTO streams (id, code, name, semesters, created_at, updated_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?5)
        "#,
    )
    .bind(&id)
    .bind(&req.code)
    .bind(&req.name)
    .bind(req.semesters)
    .bind(&now)
    .execute(db)
    .await?;

    Ok(Stream {
        id,
        code: req.code,
        name: req.name,
        semesters: req.semesters,
        created_at: now.clone(),
        updated_at: now,
    })
}

pub async fn delete_stream(db: &SqlitePool, id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM streams WHERE id = ?")
        .bind(id)
        .execute(db)
        .await?
        .rows_affected();
    Ok(result > 0)
}

// Divisions

pub async fn fetch_divisions(db: &SqlitePool) -> Result<Vec<Division>, sqlx::Error> {
    sqlx::query_as::<_, Division>(
        "SELECT id, name, stream_id, semester, strength, created_at, updated_at FROM divisions ORDER BY stream_id, semester, name"
    )
    .fetch_all(db)
    .await
}

pub async fn find_division_by_id(db: &SqlitePool, id: &str) -> Result<Option<Division>, sqlx::Error> {
    sqlx::query_as::<_, Division>(
        "SELECT id, name, stream_id, semester, strength, created_at, updated_at FROM divisions WHERE id = ?"
    )
    .bind(id)
    .fetch_optional(db)
    .await
}

pub async fn count_divisions_for_stream(db: &SqlitePool, stream_id: &str) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM divisions WHERE stream_id = ?")
        .bind(stream_id)
        .fetch_one(db)
        .await
}

pub async fn insert_division(db: &SqlitePool, req: NewDivisionRequest) -> Result<Division, sqlx::Error> {
    let id = Uuid::new_v4().to_string();
    let now = Utc::now().to_rfc3339();

    sqlx::query(
        r#"
        INSERT INTO divisions (id, name, stream_id, semester, strength, created_at, updated_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)
        "#,
    )
    .bind(&id)
    .bind(&req.name)
    .bind(&req.stream_id)
    .bind(req.semester)
    .bind(req.strength)
    .bind(&now)
    .execute(db)
    .await?;

    Ok(Division {
        id,
        name: req.name,
        stream_id: req.stream_id,
        semester: req.semester,
        strength: req.strength,
        created_at: now.clone(),
        updated_at: now,
    })
}

pub async fn delete_division(db: &SqlitePool, id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM divisions WHERE id = ?")
        .bind(id)
        .execute(db)
        .await?
        .rows_affected();
    Ok(result > 0)
}

/// Loads what `assign_slot` and availability listings resolve ids against.
pub async fn load_catalog(db: &SqlitePool) -> Result<Catalog, sqlx::Error> {
    Ok(Catalog {
        subjects: fetch_subjects(db).await?,
        teachers: fetch_teachers(db).await?,
        rooms: fetch_rooms(db).await?,
    })
}

// Timetables

pub async fn fetch_all_timetables(db: &SqlitePool) -> Result<Vec<StoredTimetable>, sqlx::Error> {
    sqlx::query_as::<_, TimetableRow>(
        "SELECT name, stream_id, semester, division_id, data, created_at, updated_at FROM timetables ORDER BY name"
    )
    .fetch_all(db)
    .await?
    .into_iter()
    .map(StoredTimetable::try_from)
    .collect()
}

pub async fn fetch_timetable_by_key(
    db: &SqlitePool,
    key: &TimetableKey,
) -> Result<Option<StoredTimetable>, sqlx::Error> {
    sqlx::query_as::<_, TimetableRow>(
        "SELECT name, stream_id, semester, division_id, data, created_at, updated_at FROM timetables WHERE name = ?"
    )
    .bind(key.to_string())
    .fetch_optional(db)
    .await?
    .map(StoredTimetable::try_from)
    .transpose()
}

pub async fn create_timetable(db: &SqlitePool, timetable: &Timetable) -> Result<StoredTimetable, sqlx::Error> {
    let name = timetable.key.to_string();
    let now = Utc::now().to_rfc3339();
    let data = encode_grid(timetable).map_err(encode_error)?;

    sqlx::query(
        r#"
        INSERT INTO timetables (name, stream_id, semester, division_id, data, created_at, updated_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)
        "#,
    )
    .bind(&name)
    .bind(&timetable.key.stream_id)
    .bind(timetable.key.semester)
    .bind(&timetable.key.division_id)
    .bind(&data)
    .bind(&now)
    .execute(db)
    .await?;

    Ok(StoredTimetable {
        name,
        timetable: timetable.clone(),
        created_at: now.clone(),
        updated_at: now,
    })
}

/// Replaces the grid stored under `key`. Returns false when nothing is stored
/// there yet.
pub async fn update_timetable(
    db: &SqlitePool,
    key: &TimetableKey,
    timetable: &Timetable,
) -> Result<bool, sqlx::Error> {
    let now = Utc::now().to_rfc3339();
    let data = encode_grid(timetable).map_err(encode_error)?;

    let result = sqlx::query("UPDATE timetables SET data = ?1, updated_at = ?2 WHERE name = ?3")
        .bind(&data)
        .bind(&now)
        .bind(key.to_string())
        .execute(db)
        .await?
        .rows_affected();

    Ok(result > 0)
}

pub async fn delete_timetable(db: &SqlitePool, key: &TimetableKey) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM timetables WHERE name = ?")
        .bind(key.to_string())
        .execute(db)
        .await?
        .rows_affected();
    Ok(result > 0)
}

/// Creates or updates the stored copy of `timetable`.
pub async fn upsert_timetable(db: &SqlitePool, timetable: &Timetable) -> Result<StoredTimetable, sqlx::Error> {
    if !update_timetable(db, &timetable.key, timetable).await? {
        return create_timetable(db, timetable).await;
    }

    fetch_timetable_by_key(db, &timetable.key)
        .await?
        .ok_or_else(|| sqlx::Error::RowNotFound)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::connect_in_memory;
    use crate::models::{RoomType, WeeklyLimits};
    use crate::timetable::{Day, SessionType, SlotBooking, TimeSlot};

    #[tokio::test]
    async fn test_insert_and_fetch_catalog() {
        let pool = connect_in_memory().await.expect("Failed to create test db");

        let stream = insert_stream(&pool, NewStreamRequest {
            code: "CS".to_string(),
            name: "Computer Science".to_string(),
            semesters: 8,
        })
        .await
        .expect("Failed to insert stream");

        insert_division(&pool, NewDivisionRequest {
            name: "Division A".to_string(),
            stream_id: stream.id.clone(),
            semester: 3,
            strength: 60,
        })
        .await
        .expect("Failed to insert division");

        let subject = insert_subject(&pool, NewSubjectRequest {
            name: "Operating Systems".to_string(),
            code: "OS".to_string(),
            credits: 4,
            stream_code: "CS".to_string(),
            semester: 3,
            lectures_per_week: 3,
            tutorials_per_week: 1,
            practicals_per_week: 1,
        })
        .await
        .expect("Failed to insert subject");

        insert_teacher(&pool, NewTeacherRequest {
            name: "Ada".to_string(),
            email: "ada@example.edu".to_string(),
            specialization: "Systems".to_string(),
            subject_ids: vec![subject.id.clone()],
            cabin: Some("B-201".to_string()),
            roles: vec!["HOD".to_string()],
            limits: WeeklyLimits {
                max_lectures: Some(12),
                max_labs: None,
                max_tutorials: Some(4),
            },
            is_teaching_assistant: false,
        })
        .await
        .expect("Failed to insert teacher");

        insert_room(&pool, NewRoomRequest {
            room_number: "L-1".to_string(),
            capacity: 30,
            room_type: RoomType::Lab,
        })
        .await
        .expect("Failed to insert room");

        let catalog = load_catalog(&pool).await.expect("Failed to load catalog");
        assert_eq!(catalog.subjects.len(), 1);
        assert_eq!(fetch_divisions(&pool).await.unwrap()[0].stream_id, stream.id);
        assert_eq!(catalog.rooms[0].room_type, RoomType::Lab);

        let teacher = &catalog.teachers[0];
        assert!(teacher.can_teach(&subject.id));
        assert_eq!(teacher.roles, vec!["HOD".to_string()]);
        assert_eq!(teacher.limits.max_tutorials, Some(4));
        assert_eq!(count_divisions_for_stream(&pool, &stream.id).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_unique_columns_are_enforced() {
        let pool = connect_in_memory().await.expect("Failed to create test db");
        let room = || NewRoomRequest {
            room_number: "101".to_string(),
            capacity: 60,
            room_type: RoomType::Classroom,
        };

        insert_room(&pool, room()).await.expect("Failed to insert room");
        let err = insert_room(&pool, room()).await.unwrap_err();
        assert!(matches!(&err, sqlx::Error::Database(db) if db.is_unique_violation()));

        // Same number is fine for a different room type.
        insert_room(&pool, NewRoomRequest { room_type: RoomType::Lab, ..room() })
            .await
            .expect("Failed to insert lab");
    }

    #[tokio::test]
    async fn test_timetable_lifecycle() {
        let pool = connect_in_memory().await.expect("Failed to create test db");
        let key = TimetableKey::new("cs", 3, "a");
        let mut tt = Timetable::empty(key.clone());

        assert!(fetch_timetable_by_key(&pool, &key).await.unwrap().is_none());
        assert!(!update_timetable(&pool, &key, &tt).await.unwrap());

        let stored = create_timetable(&pool, &tt).await.expect("Failed to create timetable");
        assert_eq!(stored.name, "cs_3_a");

        tt = Timetable::from_bookings(
            key.clone(),
            vec![(
                Day::Monday,
                TimeSlot::H0930,
                SlotBooking::new("s1", "t1", vec!["r1".to_string()], SessionType::Lecture),
            )],
        );
        let stored = upsert_timetable(&pool, &tt).await.expect("Failed to upsert timetable");
        assert_eq!(stored.timetable, tt);

        let all = fetch_all_timetables(&pool).await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].timetable.booked_count(), 1);

        assert!(delete_timetable(&pool, &key).await.unwrap());
        assert!(!delete_timetable(&pool, &key).await.unwrap());
    }

    #[tokio::test]
    async fn test_bad_cells_do_not_break_listing() {
        let pool = connect_in_memory().await.expect("Failed to create test db");
        let good = Timetable::from_bookings(
            TimetableKey::new("cs", 3, "a"),
            vec![(
                Day::Tuesday,
                TimeSlot::H1030,
                SlotBooking::new("s1", "t1", vec!["r1".to_string()], SessionType::Lecture),
            )],
        );
        create_timetable(&pool, &good).await.expect("Failed to create timetable");

        sqlx::query(
            "INSERT INTO timetables (name, stream_id, semester, division_id, data, created_at, updated_at) VALUES ('x_1_y', 'x', 1, 'y', ?1, '', '')"
        )
        .bind(r#"{"Monday":{"9:30 - 10:30":{"subject":42},"10:30 - 11:30":{"subject":"s2","teacher":"t2","room":"r2"}}}"#)
        .execute(&pool)
        .await
        .expect("Failed to insert raw row");

        let all = fetch_all_timetables(&pool).await.expect("listing should skip bad cells");
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].timetable, good);

        let legacy = &all[1].timetable;
        assert_eq!(legacy.key, TimetableKey::new("x", 1, "y"));
        assert!(legacy.is_free(Day::Monday, TimeSlot::H0930));
        assert_eq!(legacy.get(Day::Monday, TimeSlot::H1030).unwrap().teacher_id, "t2");
    }
}
