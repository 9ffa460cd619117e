use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::Entity;
use crate::utils::dates;

use super::requests::StudentPayload;

// 学生实体
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Student {
    pub student_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(with = "dates::wire_opt")]
    pub date_of_birth: Option<NaiveDate>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub created_at: Option<String>,
}

impl Student {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// 按给定日期计算周岁
    pub fn age_on(&self, today: NaiveDate) -> Option<u32> {
        self.date_of_birth.and_then(|dob| today.years_since(dob))
    }
}

impl Entity for Student {
    type Payload = StudentPayload;

    const RESOURCE: &'static str = "students";
    const SINGULAR: &'static str = "Student";
    const TOTAL_KEY: &'static str = "totalStudents";

    fn id(&self) -> i64 {
        self.student_id
    }
}
