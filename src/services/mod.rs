//! 后端 REST 接口访问
//!
//! 所有远程调用都经过 [`ApiClient`]，资源的增删改查由 [`ResourceClient`] 统一实现，
//! 各资源特有的查询接口分别放在 students / courses / instructors 中。

pub mod api;
pub mod auth;
pub mod courses;
pub mod instructors;
pub mod resource;
pub mod students;

pub use api::ApiClient;
pub use auth::AuthService;
pub use resource::{ResourceClient, ResourceGateway};
