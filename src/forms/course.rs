use super::{Check, FieldKind, FieldSpec, FormMode, FormSchema, FormValues};
use crate::errors::Result;
use crate::models::courses::{Course, CoursePayload};
use crate::utils::format_wire_date;
use crate::utils::validate::COURSE_CODE_RE;

impl FormSchema for Course {
    fn fields(mode: FormMode) -> Vec<FieldSpec> {
        let mut start_date = FieldSpec::new("start_date", "Start Date", FieldKind::Date)
            .required("Please select start date");
        // 编辑已开课的课程时不再限制开始日期
        if mode == FormMode::Create {
            start_date = start_date.rule(Check::NotBeforeToday, "Start date cannot be in the past");
        }

        vec![
            FieldSpec::new("course_name", "Course Name", FieldKind::Text)
                .required("Please enter course name")
                .rule(
                    Check::Length { min: 3, max: 100 },
                    "Course name must be between 3 and 100 characters",
                ),
            FieldSpec::new("course_code", "Course Code", FieldKind::UpperText)
                .required("Please enter course code")
                .rule(
                    Check::Length { min: 3, max: 20 },
                    "Course code must be between 3 and 20 characters",
                )
                .rule(
                    Check::Matches(&COURSE_CODE_RE),
                    "Course code must contain only uppercase letters and numbers",
                ),
            FieldSpec::new("description", "Description", FieldKind::Text)
                .rule(Check::MaxLength(1000), "Description cannot exceed 1000 characters"),
            FieldSpec::new("credits", "Credits", FieldKind::Integer)
                .required("Please enter credits")
                .rule(
                    Check::IntRange { min: 1, max: 10 },
                    "Credits must be between 1 and 10",
                ),
            FieldSpec::new("max_capacity", "Maximum Capacity", FieldKind::Integer)
                .required("Please enter maximum capacity")
                .rule(
                    Check::IntRange { min: 1, max: 500 },
                    "Maximum capacity must be between 1 and 500",
                ),
            start_date,
            FieldSpec::new("end_date", "End Date", FieldKind::Date)
                .required("Please select end date")
                .rule(Check::After("start_date"), "End date must be after start date"),
        ]
    }

    fn defaults() -> FormValues {
        FormValues::new()
            .with("credits", "3")
            .with("max_capacity", "30")
    }

    fn prefill(record: &Self) -> FormValues {
        FormValues::new()
            .with("course_name", record.course_name.as_str())
            .with("course_code", record.course_code.as_str())
            .with("description", record.description.clone().unwrap_or_default())
            .with("credits", record.credits.to_string())
            .with("max_capacity", record.max_capacity.to_string())
            .with(
                "start_date",
                record.start_date.map(format_wire_date).unwrap_or_default(),
            )
            .with(
                "end_date",
                record.end_date.map(format_wire_date).unwrap_or_default(),
            )
    }

    fn build_payload(values: &FormValues, _mode: FormMode) -> Result<CoursePayload> {
        Ok(CoursePayload {
            course_name: values.text("course_name"),
            course_code: values.text("course_code"),
            description: values.optional("description"),
            credits: values.required_int("credits")?,
            max_capacity: values.required_int("max_capacity")?,
            start_date: values.required_date("start_date")?,
            end_date: values.required_date("end_date")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::forms::{EntityForm, ValidationContext};
    use crate::models::courses::Course;
    use chrono::NaiveDate;
    use rstest::rstest;

    fn ctx() -> ValidationContext {
        ValidationContext::new(NaiveDate::from_ymd_opt(2025, 6, 15).unwrap())
    }

    fn filled(start: &str, end: &str) -> EntityForm<Course> {
        let mut form = EntityForm::<Course>::create();
        form.set("course_name", "Data Structures").unwrap();
        form.set("course_code", "cs201").unwrap();
        form.set("start_date", start).unwrap();
        form.set("end_date", end).unwrap();
        form
    }

    #[test]
    fn test_create_defaults() {
        let form = EntityForm::<Course>::create();
        assert_eq!(form.title(), "Add New Course");
        assert_eq!(form.value("credits"), "3");
        assert_eq!(form.value("max_capacity"), "30");
    }

    #[rstest]
    #[case("2025-09-01", "2025-09-01")]
    #[case("2025-09-01", "2025-08-31")]
    fn test_end_must_follow_start(#[case] start: &str, #[case] end: &str) {
        let mut form = filled(start, end);
        let err = form.submit(&ctx()).unwrap_err();
        assert_eq!(
            err.field_errors().unwrap().get("end_date"),
            Some("End date must be after start date")
        );
    }

    #[rstest]
    #[case("2025-06-15", "2025-06-16")]
    #[case("2025-09-01", "2025-12-20")]
    fn test_valid_schedule(#[case] start: &str, #[case] end: &str) {
        let mut form = filled(start, end);
        let payload = form.submit(&ctx()).unwrap();
        assert_eq!(payload.course_code, "CS201");
        assert_eq!(payload.credits, 3);
        assert!(payload.end_date > payload.start_date);

        let json = serde_json::to_value(&payload).unwrap();
        assert!(json.get("instructor_id").is_none());
        assert_eq!(json["start_date"], start);
    }

    #[test]
    fn test_start_in_past_only_blocks_create() {
        let mut form = filled("2025-01-10", "2025-12-20");
        let err = form.submit(&ctx()).unwrap_err();
        assert_eq!(
            err.field_errors().unwrap().get("start_date"),
            Some("Start date cannot be in the past")
        );

        let course = Course {
            course_id: 4,
            course_name: "Data Structures".to_string(),
            course_code: "CS201".to_string(),
            credits: 4,
            max_capacity: 40,
            start_date: NaiveDate::from_ymd_opt(2025, 1, 10),
            end_date: NaiveDate::from_ymd_opt(2025, 12, 20),
            instructor_id: Some(5),
            ..Default::default()
        };
        let mut form = EntityForm::edit(&course);
        assert_eq!(form.value("credits"), "4");
        assert!(form.submit(&ctx()).is_ok());
    }

    #[test]
    fn test_credit_bounds() {
        let mut form = filled("2025-09-01", "2025-12-20");
        form.set("credits", "0").unwrap();
        form.set("max_capacity", "501").unwrap();
        let err = form.submit(&ctx()).unwrap_err();
        let errors = err.field_errors().unwrap();
        assert_eq!(errors.get("credits"), Some("Credits must be between 1 and 10"));
        assert_eq!(
            errors.get("max_capacity"),
            Some("Maximum capacity must be between 1 and 500")
        );
    }
}
