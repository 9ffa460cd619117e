use chrono::NaiveDate;
use serde::Serialize;

use crate::utils::dates;

// 学生创建/更新请求
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StudentPayload {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(with = "dates::wire")]
    pub date_of_birth: NaiveDate,
    pub phone: Option<String>,
    pub address: Option<String>,
}
