pub mod entities;
pub mod requests;

pub use entities::Student;
pub use requests::StudentPayload;
