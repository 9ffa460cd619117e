use chrono::NaiveDate;
use serde::Serialize;

use crate::utils::dates;

// 课程创建/更新请求
//
// 不包含 instructor_id：创建时由服务端按登录讲师设置，之后不可修改。
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CoursePayload {
    pub course_name: String,
    pub course_code: String,
    pub description: Option<String>,
    pub credits: i64,
    pub max_capacity: i64,
    #[serde(with = "dates::wire")]
    pub start_date: NaiveDate,
    #[serde(with = "dates::wire")]
    pub end_date: NaiveDate,
}
