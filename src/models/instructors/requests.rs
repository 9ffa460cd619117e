use chrono::NaiveDate;
use serde::Serialize;

use crate::utils::dates;

use super::entities::InstructorTitle;

// 讲师更新请求（管理员/本人编辑资料）
//
// 编辑时不回填密码，未填写则不发送该字段。
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct InstructorPayload {
    pub title: Option<InstructorTitle>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    pub phone: Option<String>,
    pub department: String,
    pub bio: Option<String>,
    #[serde(with = "dates::wire_opt")]
    pub hire_date: Option<NaiveDate>,
}
