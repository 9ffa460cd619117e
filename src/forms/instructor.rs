use super::{Check, FieldKind, FieldSpec, FormMode, FormSchema, FormValues};
use crate::errors::{ConsoleError, Result};
use crate::models::instructors::{Instructor, InstructorPayload, InstructorTitle};
use crate::utils::format_wire_date;
use crate::utils::validate::{PASSWORD_MIN_LENGTH, PHONE_RE, has_password_classes};

pub(crate) fn title_field() -> FieldSpec {
    FieldSpec::new("title", "Title", FieldKind::Choice(InstructorTitle::ALL))
}

pub(crate) fn name_fields() -> [FieldSpec; 2] {
    [
        FieldSpec::new("first_name", "First Name", FieldKind::Text)
            .required("Please enter first name")
            .rule(
                Check::Length { min: 2, max: 50 },
                "First name must be between 2 and 50 characters",
            ),
        FieldSpec::new("last_name", "Last Name", FieldKind::Text)
            .required("Please enter last name")
            .rule(
                Check::Length { min: 2, max: 50 },
                "Last name must be between 2 and 50 characters",
            ),
    ]
}

pub(crate) fn email_field() -> FieldSpec {
    FieldSpec::new("email", "Email", FieldKind::Text)
        .required("Please enter email")
        .rule(Check::Email, "Please enter a valid email")
}

pub(crate) fn password_field() -> FieldSpec {
    FieldSpec::new("password", "Password", FieldKind::Secret)
        .required("Please enter password")
        .rule(
            Check::MinLength(PASSWORD_MIN_LENGTH),
            "Password must be at least 6 characters long",
        )
        .rule(
            Check::Satisfies(has_password_classes),
            "Password must contain at least one lowercase letter, one uppercase letter, and one number",
        )
}

pub(crate) fn phone_field(label: &'static str) -> FieldSpec {
    FieldSpec::new("phone", label, FieldKind::Text)
        .rule(Check::Matches(&PHONE_RE), "Please enter a valid phone number")
}

pub(crate) fn department_field() -> FieldSpec {
    FieldSpec::new("department", "Department", FieldKind::Text)
        .required("Please enter department")
        .rule(
            Check::Length { min: 2, max: 100 },
            "Department must be between 2 and 100 characters",
        )
}

pub(crate) fn parse_title(values: &FormValues) -> Result<Option<InstructorTitle>> {
    values
        .optional("title")
        .map(|t| t.parse::<InstructorTitle>())
        .transpose()
        .map_err(ConsoleError::validation)
}

impl FormSchema for Instructor {
    fn fields(mode: FormMode) -> Vec<FieldSpec> {
        let [first_name, last_name] = name_fields();
        let mut fields = vec![title_field(), first_name, last_name, email_field()];
        // 密码只在新建时出现，编辑时不回填也不提交
        if mode == FormMode::Create {
            fields.push(password_field());
        }
        fields.extend([
            phone_field("Phone Number"),
            department_field(),
            FieldSpec::new("bio", "Bio", FieldKind::Text)
                .rule(Check::MaxLength(1000), "Bio cannot exceed 1000 characters"),
            FieldSpec::new("hire_date", "Hire Date", FieldKind::Date)
                .rule(Check::NotAfterToday, "Hire date cannot be in the future"),
        ]);
        fields
    }

    fn defaults() -> FormValues {
        FormValues::new().with("title", InstructorTitle::default().as_str())
    }

    fn prefill(record: &Self) -> FormValues {
        FormValues::new()
            .with(
                "title",
                record.title.map(|t| t.as_str()).unwrap_or_default(),
            )
            .with("first_name", record.first_name.as_str())
            .with("last_name", record.last_name.as_str())
            .with("email", record.email.as_str())
            .with("phone", record.phone.clone().unwrap_or_default())
            .with("department", record.department.clone().unwrap_or_default())
            .with("bio", record.bio.clone().unwrap_or_default())
            .with(
                "hire_date",
                record.hire_date.map(format_wire_date).unwrap_or_default(),
            )
    }

    fn build_payload(values: &FormValues, mode: FormMode) -> Result<InstructorPayload> {
        let password = match mode {
            FormMode::Create => Some(values.get("password").to_string()),
            FormMode::Edit { .. } => None,
        };
        Ok(InstructorPayload {
            title: parse_title(values)?,
            first_name: values.text("first_name"),
            last_name: values.text("last_name"),
            email: values.text("email"),
            password,
            phone: values.optional("phone"),
            department: values.text("department"),
            bio: values.optional("bio"),
            hire_date: values.optional_date("hire_date")?,
        })
    }
}
