pub mod entities;
pub mod requests;

pub use entities::{Course, CourseStatus};
pub use requests::CoursePayload;
