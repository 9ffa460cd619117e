pub mod dates;
pub mod serde_ext;
pub mod validate;

pub use dates::{format_wire_date, parse_input_date, parse_wire_date};
pub use validate::{has_password_classes, validate_email};
