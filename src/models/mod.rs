pub mod division;
pub mod room;
pub mod stored;
pub mod stream;
pub mod subject;
pub mod teacher;

pub use division::{Division, NewDivisionRequest};
pub use room::{NewRoomRequest, Room, RoomType};
pub use stored::StoredTimetable;
pub use stream::{NewStreamRequest, Stream};
pub use subject::{NewSubjectRequest, Subject};
pub use teacher::{NewTeacherRequest, Teacher, WeeklyLimits};
