use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{CreatePolicy, Entity, Ownership};
use crate::utils::dates;
use crate::utils::serde_ext::{i64_lenient, opt_i64_lenient};

use super::requests::CoursePayload;

// 课程实体
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Course {
    pub course_id: i64,
    pub course_name: String,
    pub course_code: String,
    pub description: Option<String>,
    #[serde(deserialize_with = "i64_lenient")]
    pub credits: i64,
    #[serde(deserialize_with = "i64_lenient")]
    pub max_capacity: i64,
    #[serde(with = "dates::wire_opt")]
    pub start_date: Option<NaiveDate>,
    #[serde(with = "dates::wire_opt")]
    pub end_date: Option<NaiveDate>,
    // 由服务端根据登录讲师设置，客户端只读
    #[serde(deserialize_with = "opt_i64_lenient")]
    pub instructor_id: Option<i64>,
    // 服务端统计的已选人数
    #[serde(deserialize_with = "opt_i64_lenient")]
    pub enrolled_count: Option<i64>,
    // 列表联表带出的讲师信息，仅用于展示
    pub instructor_title: Option<String>,
    pub instructor_first_name: Option<String>,
    pub instructor_last_name: Option<String>,
    pub instructor_department: Option<String>,
}

/// 课程状态，由当前日期与起止日期推导，不持久化
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CourseStatus {
    Upcoming,
    Active,
    Completed,
}

impl std::fmt::Display for CourseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CourseStatus::Upcoming => write!(f, "Upcoming"),
            CourseStatus::Active => write!(f, "Active"),
            CourseStatus::Completed => write!(f, "Completed"),
        }
    }
}

impl Course {
    pub fn status_on(&self, today: NaiveDate) -> CourseStatus {
        match (self.start_date, self.end_date) {
            (Some(start), _) if today < start => CourseStatus::Upcoming,
            (_, Some(end)) if today > end => CourseStatus::Completed,
            _ => CourseStatus::Active,
        }
    }

    pub fn enrolled(&self) -> i64 {
        self.enrolled_count.unwrap_or(0)
    }

    /// 讲师展示名，例如 `Dr. Alan Turing`
    pub fn instructor_display(&self) -> String {
        let parts = [
            self.instructor_title.as_deref(),
            self.instructor_first_name.as_deref(),
            self.instructor_last_name.as_deref(),
        ];
        parts
            .iter()
            .flatten()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Entity for Course {
    type Payload = CoursePayload;

    const RESOURCE: &'static str = "courses";
    const SINGULAR: &'static str = "Course";
    const TOTAL_KEY: &'static str = "totalCourses";
    const OWNERSHIP: Ownership = Ownership::ByInstructor;
    const CREATE_POLICY: CreatePolicy =
        CreatePolicy::RequiresAuth("Please login as an instructor to create courses");

    fn id(&self) -> i64 {
        self.course_id
    }

    fn owner_id(&self) -> Option<i64> {
        self.instructor_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn course(start: &str, end: &str) -> Course {
        serde_json::from_value(json!({
            "course_id": 1,
            "course_name": "Intro to CS",
            "course_code": "CS101",
            "credits": "3",
            "max_capacity": 30,
            "start_date": start,
            "end_date": end,
            "instructor_id": 5,
            "enrolled_count": "12",
            "instructor_title": "Dr.",
            "instructor_first_name": "Alan",
            "instructor_last_name": "Turing"
        }))
        .unwrap()
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_course_status() {
        let c = course("2025-09-01", "2025-12-20");
        assert_eq!(c.status_on(day(2025, 8, 31)), CourseStatus::Upcoming);
        assert_eq!(c.status_on(day(2025, 9, 1)), CourseStatus::Active);
        assert_eq!(c.status_on(day(2025, 12, 20)), CourseStatus::Active);
        assert_eq!(c.status_on(day(2025, 12, 21)), CourseStatus::Completed);
    }

    #[test]
    fn test_course_lenient_fields() {
        let c = course("2025-09-01T00:00:00.000Z", "2025-12-20");
        assert_eq!(c.credits, 3);
        assert_eq!(c.enrolled(), 12);
        assert_eq!(c.owner_id(), Some(5));
        assert_eq!(c.start_date, Some(day(2025, 9, 1)));
        assert_eq!(c.instructor_display(), "Dr. Alan Turing");
    }
}
