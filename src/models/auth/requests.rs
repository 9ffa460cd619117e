use serde::Serialize;

use crate::models::instructors::InstructorTitle;

// 讲师登录请求
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

// 讲师注册请求，注册成功后需要另行登录
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RegisterRequest {
    pub title: Option<InstructorTitle>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub department: String,
    pub phone: Option<String>,
}
