#![allow(dead_code)]

use std::sync::Arc;

use timetable::db::connect_in_memory;
use timetable::drafts::MemoryDraftStore;
use timetable::models::*;
use timetable::services::CatalogService;
use timetable::state::AppState;
use timetable::timetable::TimetableKey;

/// A seeded catalog: stream CS (8 semesters) with divisions A and B in
/// semester 3, one subject, two teachers, two classrooms and a lab.
pub struct Fixture {
    pub state: AppState,
    pub drafts: Arc<MemoryDraftStore>,
    pub stream: Stream,
    pub key_a: TimetableKey,
    pub key_b: TimetableKey,
    pub subject: String,
    pub teacher1: String,
    pub teacher2: String,
    pub room1: String,
    pub room2: String,
    pub lab: String,
}

pub async fn setup(enforce_availability: bool) -> Fixture {
    let pool = connect_in_memory().await.expect("Failed to create test db");
    let catalog = CatalogService::new(pool.clone());

    let stream = catalog
        .create_stream(NewStreamRequest {
            code: "CS".to_string(),
            name: "Computer Science".to_string(),
            semesters: 8,
        })
        .await
        .expect("Failed to create stream");

    let mut divisions = Vec::new();
    for name in ["A", "B"] {
        let division = catalog
            .create_division(NewDivisionRequest {
                name: format!("Division {}", name),
                stream_id: stream.id.clone(),
                semester: 3,
                strength: 60,
            })
            .await
            .expect("Failed to create division");
        divisions.push(division);
    }

    let subject = catalog
        .create_subject(NewSubjectRequest {
            name: "Databases".to_string(),
            code: "DB".to_string(),
            credits: 4,
            stream_code: "CS".to_string(),
            semester: 3,
            lectures_per_week: 3,
            tutorials_per_week: 1,
            practicals_per_week: 1,
        })
        .await
        .expect("Failed to create subject");

    let mut teachers = Vec::new();
    for name in ["Ada", "Grace"] {
        let teacher = catalog
            .create_teacher(NewTeacherRequest {
                name: name.to_string(),
                email: format!("{}@example.edu", name.to_lowercase()),
                specialization: "Data".to_string(),
                subject_ids: vec![subject.id.clone()],
                cabin: None,
                roles: Vec::new(),
                limits: WeeklyLimits::default(),
                is_teaching_assistant: false,
            })
            .await
            .expect("Failed to create teacher");
        teachers.push(teacher);
    }

    let mut rooms = Vec::new();
    for (number, room_type) in [("101", RoomType::Classroom), ("102", RoomType::Classroom), ("L1", RoomType::Lab)] {
        let room = catalog
            .create_room(NewRoomRequest {
                room_number: number.to_string(),
                capacity: 60,
                room_type,
            })
            .await
            .expect("Failed to create room");
        rooms.push(room);
    }

    let drafts = Arc::new(MemoryDraftStore::new());
    let state = AppState::new(pool, drafts.clone(), enforce_availability);

    Fixture {
        state,
        drafts,
        key_a: TimetableKey::new(stream.id.clone(), 3, divisions[0].id.clone()),
        key_b: TimetableKey::new(stream.id.clone(), 3, divisions[1].id.clone()),
        stream,
        subject: subject.id,
        teacher1: teachers[0].id.clone(),
        teacher2: teachers[1].id.clone(),
        room1: rooms[0].id.clone(),
        room2: rooms[1].id.clone(),
        lab: rooms[2].id.clone(),
    }
}
