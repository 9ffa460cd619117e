pub mod pagination;
pub mod response;

pub use pagination::{DEFAULT_PAGE, DEFAULT_PAGE_SIZE, ListQuery, ListResponse, Page};
pub use response::{ApiResponse, server_message};
