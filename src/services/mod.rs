pub mod catalog_service;
pub mod scheduler;
pub mod timetable_service;

pub use catalog_service::CatalogService;
pub use scheduler::DraftScheduler;
pub use timetable_service::{AvailableChoices, TimetableService, ViewFilter};
