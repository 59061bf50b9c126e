mod common;

use std::time::Duration;

use timetable::drafts::DraftStore;
use timetable::services::{DraftScheduler, TimetableService};
use timetable::timetable::{Day, SessionType, SlotRequest, TimeSlot};

use common::setup;

#[tokio::test]
async fn test_run_flush_writes_only_dirty_sessions() {
    let f = setup(true).await;
    let service = TimetableService::from_state(&f.state);
    let request = SlotRequest::new(f.subject.clone(), f.teacher1.clone(), f.room1.clone(), SessionType::Lecture);

    service.open(&f.key_b).await.unwrap();
    service.assign(&f.key_a, Day::Monday, TimeSlot::H0930, &request).await.unwrap();

    // `open` wrote the empty grid; the assignment is not in the draft yet.
    let before = f.drafts.get_draft(&f.key_a).await.unwrap().unwrap();
    assert!(before.timetable.is_empty());

    let scheduler = DraftScheduler::new(TimetableService::from_state(&f.state), Duration::from_secs(60));
    assert_eq!(scheduler.run_flush().await.unwrap(), 1);
    assert_eq!(scheduler.run_flush().await.unwrap(), 0);

    let after = f.drafts.get_draft(&f.key_a).await.unwrap().unwrap();
    assert_eq!(after.timetable.booked_count(), 1);
}

#[tokio::test]
async fn test_scheduler_short_interval() {
    let f = setup(true).await;
    let service = TimetableService::from_state(&f.state);
    let request = SlotRequest::new(f.subject.clone(), f.teacher1.clone(), f.room1.clone(), SessionType::Lecture);
    service.assign(&f.key_a, Day::Monday, TimeSlot::H0930, &request).await.unwrap();

    let scheduler = DraftScheduler::new(TimetableService::from_state(&f.state), Duration::from_secs(1));
    let scheduler_task = tokio::spawn(async move {
        scheduler.start().await;
    });

    tokio::time::sleep(Duration::from_millis(1500)).await;
    scheduler_task.abort();

    let draft = f.drafts.get_draft(&f.key_a).await.unwrap().unwrap();
    assert_eq!(draft.timetable.booked_count(), 1);
    assert_eq!(f.drafts.list_drafts().await.unwrap().len(), 1);
}
