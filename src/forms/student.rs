use super::{Check, FieldKind, FieldSpec, FormMode, FormSchema, FormValues};
use crate::errors::Result;
use crate::models::students::{Student, StudentPayload};
use crate::utils::format_wire_date;
use crate::utils::validate::PHONE_RE;

impl FormSchema for Student {
    fn fields(_mode: FormMode) -> Vec<FieldSpec> {
        vec![
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
            FieldSpec::new("email", "Email", FieldKind::Text)
                .required("Please enter email")
                .rule(Check::Email, "Please enter a valid email"),
            FieldSpec::new("date_of_birth", "Date of Birth", FieldKind::Date)
                .required("Please select date of birth")
                .rule(
                    Check::AgeBetween { min: 16, max: 120 },
                    "Student must be between 16 and 120 years old",
                ),
            FieldSpec::new("phone", "Phone Number", FieldKind::Text)
                .rule(Check::Matches(&PHONE_RE), "Please enter a valid phone number"),
            FieldSpec::new("address", "Address", FieldKind::Text)
                .rule(Check::MaxLength(255), "Address cannot exceed 255 characters"),
        ]
    }

    fn prefill(record: &Self) -> FormValues {
        FormValues::new()
            .with("first_name", record.first_name.as_str())
            .with("last_name", record.last_name.as_str())
            .with("email", record.email.as_str())
            .with(
                "date_of_birth",
                record.date_of_birth.map(format_wire_date).unwrap_or_default(),
            )
            .with("phone", record.phone.clone().unwrap_or_default())
            .with("address", record.address.clone().unwrap_or_default())
    }

    fn build_payload(values: &FormValues, _mode: FormMode) -> Result<StudentPayload> {
        Ok(StudentPayload {
            first_name: values.text("first_name"),
            last_name: values.text("last_name"),
            email: values.text("email"),
            date_of_birth: values.required_date("date_of_birth")?,
            phone: values.optional("phone"),
            address: values.optional("address"),
        })
    }
}
