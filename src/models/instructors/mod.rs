pub mod entities;
pub mod requests;

pub use entities::{Instructor, InstructorTitle, Principal};
pub use requests::InstructorPayload;
