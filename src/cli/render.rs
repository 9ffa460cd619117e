//! 终端表格输出

use chrono::NaiveDate;

use crate::forms::FieldErrors;
use crate::models::courses::Course;
use crate::models::instructors::Instructor;
use crate::models::students::Student;
use crate::utils::format_wire_date;
use crate::views::{Notification, NotificationLevel, PaginationState};

/// 可以显示为表格一行的记录
pub trait TableRow {
    fn headers() -> &'static [&'static str];
    fn cells(&self, today: NaiveDate) -> Vec<String>;
}

fn date_cell(date: Option<NaiveDate>) -> String {
    date.map(format_wire_date).unwrap_or_else(|| "-".to_string())
}

fn text_cell(value: Option<&str>) -> String {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or("-")
        .to_string()
}

impl TableRow for Student {
    fn headers() -> &'static [&'static str] {
        &["ID", "Name", "Email", "Age", "Phone", "Address"]
    }

    fn cells(&self, today: NaiveDate) -> Vec<String> {
        vec![
            self.student_id.to_string(),
            self.full_name(),
            self.email.clone(),
            self.age_on(today)
                .map(|age| age.to_string())
                .unwrap_or_else(|| "-".to_string()),
            text_cell(self.phone.as_deref()),
            text_cell(self.address.as_deref()),
        ]
    }
}

impl TableRow for Course {
    fn headers() -> &'static [&'static str] {
        &[
            "ID",
            "Code",
            "Name",
            "Instructor",
            "Credits",
            "Enrolled",
            "Start",
            "End",
            "Status",
        ]
    }

    fn cells(&self, today: NaiveDate) -> Vec<String> {
        let instructor = self.instructor_display();
        vec![
            self.course_id.to_string(),
            self.course_code.clone(),
            self.course_name.clone(),
            text_cell(Some(instructor.as_str())),
            self.credits.to_string(),
            format!("{}/{}", self.enrolled(), self.max_capacity),
            date_cell(self.start_date),
            date_cell(self.end_date),
            self.status_on(today).to_string(),
        ]
    }
}

impl TableRow for Instructor {
    fn headers() -> &'static [&'static str] {
        &["ID", "Name", "Email", "Department", "Courses", "Hired", "Status"]
    }

    fn cells(&self, _today: NaiveDate) -> Vec<String> {
        vec![
            self.instructor_id.to_string(),
            self.display_name(),
            self.email.clone(),
            text_cell(self.department.as_deref()),
            self.course_count.unwrap_or(0).to_string(),
            date_cell(self.hire_date),
            if self.is_active { "Active" } else { "Inactive" }.to_string(),
        ]
    }
}

/// 渲染表格，最后一列为可用操作
pub fn render_table<R: TableRow>(
    rows: &[R],
    today: NaiveDate,
    actions: impl Fn(&R) -> bool,
) -> String {
    let mut headers: Vec<String> = R::headers().iter().map(|h| h.to_string()).collect();
    headers.push("Actions".to_string());

    let body: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            let mut cells = row.cells(today);
            cells.push(if actions(row) { "Edit / Delete" } else { "View Only" }.to_string());
            cells
        })
        .collect();

    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for cells in &body {
        for (i, cell) in cells.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let line = |cells: &[String]| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, &width)| format!("{cell:<width$}"))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut out = vec![line(&headers)];
    out.push(
        widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("  "),
    );
    out.extend(body.iter().map(|cells| line(cells)));
    out.join("\n")
}

pub fn render_pagination(plural: &str, pagination: PaginationState) -> String {
    let pages = pagination.total.div_ceil(u64::from(pagination.page_size.max(1)));
    format!(
        "Page {} of {} ({} {} total, {} per page)",
        pagination.current_page,
        pages.max(1),
        pagination.total,
        plural,
        pagination.page_size
    )
}

pub fn render_notification(notification: &Notification) -> String {
    let tag = match notification.level {
        NotificationLevel::Success => "ok",
        NotificationLevel::Info => "info",
        NotificationLevel::Warning => "warning",
        NotificationLevel::Error => "error",
    };
    format!("[{tag}] {}", notification.message)
}

pub fn render_field_errors(errors: &FieldErrors) -> String {
    errors
        .iter()
        .map(|(field, message)| format!("  {field}: {message}"))
        .collect::<Vec<_>>()
        .join("\n")
}
