use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use crate::models::{CreatePolicy, Entity, Ownership};
use crate::utils::dates;
use crate::utils::serde_ext::{bool_lenient, opt_i64_lenient};

use super::requests::InstructorPayload;

// 讲师称谓
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub enum InstructorTitle {
    #[serde(rename = "Dr.")]
    Dr,
    #[serde(rename = "Prof.")]
    Prof,
    #[serde(rename = "Mr.")]
    #[default]
    Mr,
    #[serde(rename = "Ms.")]
    Ms,
    #[serde(rename = "Mrs.")]
    Mrs,
}

impl InstructorTitle {
    pub const ALL: &'static [&'static str] = &["Dr.", "Prof.", "Mr.", "Ms.", "Mrs."];

    pub fn as_str(&self) -> &'static str {
        match self {
            InstructorTitle::Dr => "Dr.",
            InstructorTitle::Prof => "Prof.",
            InstructorTitle::Mr => "Mr.",
            InstructorTitle::Ms => "Ms.",
            InstructorTitle::Mrs => "Mrs.",
        }
    }
}

impl std::fmt::Display for InstructorTitle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for InstructorTitle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().trim_end_matches('.') {
            "Dr" => Ok(InstructorTitle::Dr),
            "Prof" => Ok(InstructorTitle::Prof),
            "Mr" => Ok(InstructorTitle::Mr),
            "Ms" => Ok(InstructorTitle::Ms),
            "Mrs" => Ok(InstructorTitle::Mrs),
            _ => Err(format!("Invalid instructor title: {s}")),
        }
    }
}

impl<'de> Deserialize<'de> for InstructorTitle {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(|_| {
            serde::de::Error::custom(format!(
                "Invalid instructor title: '{s}'. Supported titles: Dr., Prof., Mr., Ms., Mrs."
            ))
        })
    }
}

/// 称谓可能为 null 或空字符串
fn optional_title<'de, D>(deserializer: D) -> Result<Option<InstructorTitle>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(s) if !s.trim().is_empty() => s.parse().map(Some).map_err(serde::de::Error::custom),
        _ => Ok(None),
    }
}

fn default_active() -> bool {
    true
}

// 讲师实体（不含密码，密码只写不读）
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Instructor {
    pub instructor_id: i64,
    #[serde(deserialize_with = "optional_title")]
    pub title: Option<InstructorTitle>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub department: Option<String>,
    pub bio: Option<String>,
    #[serde(with = "dates::wire_opt")]
    pub hire_date: Option<NaiveDate>,
    #[serde(
        default = "default_active",
        deserialize_with = "bool_lenient"
    )]
    pub is_active: bool,
    #[serde(deserialize_with = "opt_i64_lenient")]
    pub course_count: Option<i64>,
}

impl Instructor {
    pub fn display_name(&self) -> String {
        display_name(self.title, &self.first_name, &self.last_name)
    }
}

impl Entity for Instructor {
    type Payload = InstructorPayload;

    const RESOURCE: &'static str = "instructors";
    const SINGULAR: &'static str = "Instructor";
    const TOTAL_KEY: &'static str = "totalInstructors";
    const OWNERSHIP: Ownership = Ownership::ByInstructor;
    const CREATE_POLICY: CreatePolicy =
        CreatePolicy::Disallowed("Please use the Register option to create new instructors");

    fn id(&self) -> i64 {
        self.instructor_id
    }

    // 讲师记录归属于自己
    fn owner_id(&self) -> Option<i64> {
        Some(self.instructor_id)
    }
}

// 当前登录讲师的快照
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Principal {
    pub instructor_id: i64,
    #[serde(deserialize_with = "optional_title")]
    pub title: Option<InstructorTitle>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub department: Option<String>,
    pub phone: Option<String>,
}

impl Principal {
    pub fn display_name(&self) -> String {
        display_name(self.title, &self.first_name, &self.last_name)
    }
}

impl From<&Instructor> for Principal {
    fn from(instructor: &Instructor) -> Self {
        Self {
            instructor_id: instructor.instructor_id,
            title: instructor.title,
            first_name: instructor.first_name.clone(),
            last_name: instructor.last_name.clone(),
            email: instructor.email.clone(),
            department: instructor.department.clone(),
            phone: instructor.phone.clone(),
        }
    }
}

fn display_name(title: Option<InstructorTitle>, first_name: &str, last_name: &str) -> String {
    match title {
        Some(title) => format!("{title} {first_name} {last_name}"),
        None => format!("{first_name} {last_name}"),
    }
}
