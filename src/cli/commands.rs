use chrono::Local;
use serde::Serialize;
use std::io::{self, BufRead, Write};
use std::sync::Arc;

use super::render::{
    TableRow, render_field_errors, render_notification, render_pagination, render_table,
};
use super::{Cli, Command, CourseAction, CrudAction, InstructorAction, StudentAction};
use crate::config::AppConfig;
use crate::errors::Result;
use crate::forms::{AuthForm, AuthMode, FormSchema, SubmitError, ValidationContext};
use crate::models::courses::Course;
use crate::models::instructors::Instructor;
use crate::models::students::Student;
use crate::models::ListQuery;
use crate::runtime::lifetime::startup::{StartupContext, prepare_console_startup};
use crate::services::{ResourceClient, ResourceGateway};
use crate::session::SessionStore;
use crate::views::{ListView, NotificationLevel, SubmitOutcome, ViewState};

/// 执行一条命令，返回是否成功
pub async fn run(cli: Cli, config: &AppConfig) -> Result<bool> {
    let ctx = prepare_console_startup(config, cli.api_url.as_deref())?;
    let page_size = config.console.page_size;

    match cli.command {
        Command::Login { email, password } => {
            let mut form = AuthForm::new(AuthMode::Login);
            form.set("email", &email)?;
            form.set("password", &password)?;
            submit_auth(&mut form, &ctx.session).await
        }
        Command::Register { fields } => {
            let mut form = AuthForm::new(AuthMode::Register);
            for (name, value) in &fields {
                form.set(name, value)?;
            }
            submit_auth(&mut form, &ctx.session).await
        }
        Command::Logout => {
            ctx.session.logout();
            println!("Logged out successfully");
            Ok(true)
        }
        Command::Whoami => {
            whoami(&ctx.session);
            Ok(true)
        }
        Command::Students { action } => {
            let client = ResourceClient::<Student>::new(ctx.api().clone());
            match action {
                StudentAction::Crud(action) => run_crud(&ctx, client, action, page_size).await,
                StudentAction::Enrollments { id } => print_json(&client.enrollments(id).await?),
            }
        }
        Command::Courses { action } => {
            let client = ResourceClient::<Course>::new(ctx.api().clone());
            match action {
                CourseAction::Crud(action) => run_crud(&ctx, client, action, page_size).await,
                CourseAction::Enrollments { id } => print_json(&client.enrollments(id).await?),
                CourseAction::Spots { id } => print_json(&client.available_spots(id).await?),
            }
        }
        Command::Instructors { action } => {
            let client = ResourceClient::<Instructor>::new(ctx.api().clone());
            match action {
                InstructorAction::Crud(action) => run_crud(&ctx, client, action, page_size).await,
                InstructorAction::Courses { id } => print_json(&client.courses(id).await?),
                InstructorAction::Students { id } => print_json(&client.students(id).await?),
                InstructorAction::MyCourses => print_json(&client.my_courses().await?),
                InstructorAction::Analytics => print_json(&client.analytics().await?),
                InstructorAction::Profile { fields } => {
                    let mut view = ListView::new(Arc::new(client), ctx.session.clone(), page_size);
                    if !view.open_profile_edit().await {
                        flush(&mut view);
                        return Ok(false);
                    }
                    fill_and_submit(&mut view, &fields).await
                }
            }
        }
    }
}

async fn run_crud<E>(
    ctx: &StartupContext,
    client: ResourceClient<E>,
    action: CrudAction,
    page_size: u32,
) -> Result<bool>
where
    E: FormSchema + TableRow,
{
    let client = Arc::new(client);
    let mut view = ListView::new(client.clone(), ctx.session.clone(), page_size);

    match action {
        CrudAction::List(args) => {
            let limit = args.limit.unwrap_or(page_size);
            view.load(ListQuery::new(args.page, limit, args.search)).await;
            flush(&mut view);
            if view.state() != ViewState::Loaded {
                return Ok(false);
            }
            if view.rows().is_empty() {
                println!("No {} found", E::plural());
            } else {
                let today = Local::now().date_naive();
                println!(
                    "{}",
                    render_table(view.rows(), today, |row| view.can_manage(row))
                );
            }
            println!("{}", render_pagination(E::plural(), view.pagination()));
            Ok(true)
        }
        CrudAction::Show { id } => print_json(&client.get_by_id(id).await?),
        CrudAction::Create { fields } => {
            if !view.open_create() {
                flush(&mut view);
                return Ok(false);
            }
            fill_and_submit(&mut view, &fields).await
        }
        CrudAction::Update { id, fields } => {
            if !view.open_edit(id).await {
                flush(&mut view);
                return Ok(false);
            }
            fill_and_submit(&mut view, &fields).await
        }
        CrudAction::Delete { id, yes } => {
            if !view.request_delete(id).await {
                flush(&mut view);
                return Ok(false);
            }
            if !yes && !confirm(&format!("Delete {} #{id}?", E::SINGULAR.to_lowercase()))? {
                view.cancel_delete();
                println!("Cancelled");
                return Ok(false);
            }
            let deleted = view.confirm_delete().await;
            flush(&mut view);
            Ok(deleted)
        }
    }
}

/// 把 --set 的值写入已打开的表单并提交
async fn fill_and_submit<E: FormSchema>(
    view: &mut ListView<E>,
    fields: &[(String, String)],
) -> Result<bool> {
    if let Some(form) = view.form_mut() {
        for (name, value) in fields {
            if let Err(e) = form.set(name, value) {
                view.close_form();
                eprintln!("{}", e.message());
                return Ok(false);
            }
        }
    }

    let outcome = view.submit_form(&ValidationContext::now()).await;
    flush(view);
    match outcome {
        SubmitOutcome::Saved(Some(record)) => print_json(&record),
        SubmitOutcome::Saved(None) => Ok(true),
        SubmitOutcome::Invalid(errors) => {
            eprintln!("{}", render_field_errors(&errors));
            Ok(false)
        }
        SubmitOutcome::Rejected(_) | SubmitOutcome::NoFormOpen => Ok(false),
    }
}

async fn submit_auth(form: &mut AuthForm, session: &SessionStore) -> Result<bool> {
    let fallback = match form.mode() {
        AuthMode::Login => "Login failed",
        AuthMode::Register => "Registration failed",
    };
    match form.submit(session, &ValidationContext::now()).await {
        Ok(outcome) => {
            println!("{}", outcome.message());
            if let Some(principal) = session.current_principal() {
                println!("Welcome, {}", principal.display_name());
            }
            Ok(true)
        }
        Err(SubmitError::Invalid(errors)) => {
            eprintln!("Please check all required fields");
            eprintln!("{}", render_field_errors(&errors));
            Ok(false)
        }
        Err(SubmitError::Rejected(e)) => {
            eprintln!("{}", e.user_message(fallback));
            Ok(false)
        }
    }
}

fn whoami(session: &SessionStore) {
    match (session.is_authenticated(), session.current_principal()) {
        (true, Some(principal)) => {
            println!("{} <{}>", principal.display_name(), principal.email);
            println!("Instructor ID: {}", principal.instructor_id);
            if let Some(department) = principal.department.as_deref() {
                println!("Department: {department}");
            }
        }
        (true, None) => println!("Signed in (instructor details unavailable)"),
        (false, _) => println!("Not signed in"),
    }
}

fn flush<E: FormSchema>(view: &mut ListView<E>) {
    for notification in view.take_notifications() {
        match notification.level {
            NotificationLevel::Success | NotificationLevel::Info => {
                println!("{}", render_notification(&notification))
            }
            NotificationLevel::Warning | NotificationLevel::Error => {
                eprintln!("{}", render_notification(&notification))
            }
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<bool> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(true)
}

fn confirm(prompt: &str) -> Result<bool> {
    eprint!("{prompt} [y/N] ");
    io::stderr().flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}
