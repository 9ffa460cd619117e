//! 命令行入口
//!
//! 每次调用执行一个操作：视图加载、表单填写、提交都在同一次调用中完成，
//! 提示信息在命令结束前打印。

mod commands;
pub mod render;

use clap::{Args, Parser, Subcommand};

pub use commands::run;

#[derive(Parser, Debug)]
#[command(name = "enrollment-console")]
#[command(about = "Administrative console for the student enrollment system")]
#[command(version)]
pub struct Cli {
    /// API base URL (overrides config and API_BASE_URL)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Sign in as an instructor
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Register a new instructor account (does not sign in)
    Register {
        /// Field values, e.g. --set first_name=Grace
        #[arg(long = "set", value_name = "FIELD=VALUE", value_parser = parse_field)]
        fields: Vec<(String, String)>,
    },
    /// Sign out and forget the stored session
    Logout,
    /// Show the signed-in instructor
    Whoami,
    /// Manage students
    Students {
        #[command(subcommand)]
        action: StudentAction,
    },
    /// Manage courses
    Courses {
        #[command(subcommand)]
        action: CourseAction,
    },
    /// Manage instructors
    Instructors {
        #[command(subcommand)]
        action: InstructorAction,
    },
}

#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    #[arg(long, default_value_t = 1)]
    pub page: u32,
    /// Rows per page (defaults to console.page_size)
    #[arg(long)]
    pub limit: Option<u32>,
    #[arg(long, default_value = "")]
    pub search: String,
}

#[derive(Subcommand, Debug, Clone)]
pub enum CrudAction {
    /// List one page of records
    List(ListArgs),
    /// Show a single record
    Show { id: i64 },
    /// Create a record from --set field=value pairs
    Create {
        #[arg(long = "set", value_name = "FIELD=VALUE", value_parser = parse_field)]
        fields: Vec<(String, String)>,
    },
    /// Update a record; unspecified fields keep their current values
    Update {
        id: i64,
        #[arg(long = "set", value_name = "FIELD=VALUE", value_parser = parse_field)]
        fields: Vec<(String, String)>,
    },
    /// Delete a record after confirmation
    Delete {
        id: i64,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum StudentAction {
    #[command(flatten)]
    Crud(CrudAction),
    /// Courses the student is enrolled in
    Enrollments { id: i64 },
}

#[derive(Subcommand, Debug)]
pub enum CourseAction {
    #[command(flatten)]
    Crud(CrudAction),
    /// Students enrolled in the course
    Enrollments { id: i64 },
    /// Remaining seats in the course
    Spots { id: i64 },
}

#[derive(Subcommand, Debug)]
pub enum InstructorAction {
    #[command(flatten)]
    Crud(CrudAction),
    /// Courses taught by the instructor
    Courses { id: i64 },
    /// Students taught by the instructor
    Students { id: i64 },
    /// Edit the signed-in instructor's profile
    Profile {
        #[arg(long = "set", value_name = "FIELD=VALUE", value_parser = parse_field)]
        fields: Vec<(String, String)>,
    },
    /// Courses owned by the signed-in instructor
    MyCourses,
    /// Teaching analytics for the signed-in instructor
    Analytics,
}

fn parse_field(raw: &str) -> Result<(String, String), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected FIELD=VALUE, got '{raw}'"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing field name in '{raw}'"));
    }
    Ok((name.to_string(), value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_field() {
        assert_eq!(
            parse_field("course_code=CS101").unwrap(),
            ("course_code".to_string(), "CS101".to_string())
        );
        assert_eq!(
            parse_field("bio=a=b").unwrap(),
            ("bio".to_string(), "a=b".to_string())
        );
        assert!(parse_field("nothing").is_err());
        assert!(parse_field("=x").is_err());
    }

    #[test]
    fn test_cli_parses_resource_commands() {
        let cli = Cli::parse_from([
            "enrollment-console",
            "courses",
            "list",
            "--search",
            "CS101",
            "--limit",
            "5",
        ]);
        match cli.command {
            Command::Courses {
                action: CourseAction::Crud(CrudAction::List(args)),
            } => {
                assert_eq!(args.search, "CS101");
                assert_eq!(args.page, 1);
                assert_eq!(args.limit, Some(5));
            }
            other => panic!("unexpected command: {other:?}"),
        }

        let cli = Cli::parse_from([
            "enrollment-console",
            "--api-url",
            "http://api.test",
            "students",
            "update",
            "3",
            "--set",
            "phone=+15551234567",
        ]);
        assert_eq!(cli.api_url.as_deref(), Some("http://api.test"));
        assert!(matches!(
            cli.command,
            Command::Students {
                action: StudentAction::Crud(CrudAction::Update { id: 3, .. })
            }
        ));

        let cli = Cli::parse_from(["enrollment-console", "instructors", "my-courses"]);
        assert!(matches!(
            cli.command,
            Command::Instructors {
                action: InstructorAction::MyCourses
            }
        ));
    }
}
