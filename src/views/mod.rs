//! 列表视图
//!
//! 每类资源一个视图：分页列表 + 搜索 + 新建/编辑表单 + 删除确认。
//! 视图通过 `&mut self` 驱动，同一时刻最多只有一个请求在进行。
//! 所有提示信息进入队列，由调用方通过 [`ListView::take_notifications`] 取走。

pub mod instructors;
pub mod ownership;

pub use ownership::can_manage;

use std::sync::Arc;
use tracing::{debug, warn};

use crate::errors::ConsoleError;
use crate::forms::{EntityForm, FieldErrors, FormMode, FormSchema, SubmitError, ValidationContext};
use crate::models::{CreatePolicy, ListQuery};
use crate::services::ResourceGateway;
use crate::session::SessionStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState {
    Idle,
    Loading,
    Loaded,
    LoadError,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

/// 列表上方的分页状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationState {
    pub current_page: u32,
    pub page_size: u32,
    pub total: u64,
}

/// 列表之上的弹层
pub enum Overlay<E: FormSchema> {
    None,
    Form(EntityForm<E>),
    DeleteConfirm(E),
}

/// 表单提交结果
#[derive(Debug)]
pub enum SubmitOutcome<E> {
    /// 保存成功；服务端未返回记录时为 `None`
    Saved(Option<E>),
    /// 本地校验未通过，表单保持打开
    Invalid(FieldErrors),
    /// 后端拒绝，表单保持打开
    Rejected(ConsoleError),
    NoFormOpen,
}

pub struct ListView<E: FormSchema> {
    gateway: Arc<dyn ResourceGateway<E>>,
    session: Arc<SessionStore>,
    state: ViewState,
    rows: Vec<E>,
    pagination: PaginationState,
    default_page_size: u32,
    search_text: String,
    overlay: Overlay<E>,
    notifications: Vec<Notification>,
}

impl<E: FormSchema> ListView<E> {
    pub fn new(
        gateway: Arc<dyn ResourceGateway<E>>,
        session: Arc<SessionStore>,
        page_size: u32,
    ) -> Self {
        let page_size = page_size.max(1);
        Self {
            gateway,
            session,
            state: ViewState::Idle,
            rows: Vec::new(),
            pagination: PaginationState {
                current_page: 1,
                page_size,
                total: 0,
            },
            default_page_size: page_size,
            search_text: String::new(),
            overlay: Overlay::None,
            notifications: Vec::new(),
        }
    }

    pub fn state(&self) -> ViewState {
        self.state
    }

    pub fn rows(&self) -> &[E] {
        &self.rows
    }

    pub fn pagination(&self) -> PaginationState {
        self.pagination
    }

    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    pub fn overlay(&self) -> &Overlay<E> {
        &self.overlay
    }

    pub fn form(&self) -> Option<&EntityForm<E>> {
        match &self.overlay {
            Overlay::Form(form) => Some(form),
            _ => None,
        }
    }

    pub fn form_mut(&mut self) -> Option<&mut EntityForm<E>> {
        match &mut self.overlay {
            Overlay::Form(form) => Some(form),
            _ => None,
        }
    }

    pub fn pending_delete(&self) -> Option<&E> {
        match &self.overlay {
            Overlay::DeleteConfirm(record) => Some(record),
            _ => None,
        }
    }

    /// 取走并清空提示队列
    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    pub(crate) fn notify(&mut self, level: NotificationLevel, message: impl Into<String>) {
        self.notifications.push(Notification {
            level,
            message: message.into(),
        });
    }

    /// 当前登录讲师能否管理该记录
    pub fn can_manage(&self, record: &E) -> bool {
        can_manage(self.session.current_principal().as_ref(), record)
    }

    async fn fetch(&mut self, query: ListQuery) {
        self.state = ViewState::Loading;
        debug!(
            "Loading {} page {} (size {}, search '{}')",
            E::plural(),
            query.page,
            query.page_size,
            query.search
        );

        match self.gateway.list(&query).await {
            Ok(page) => {
                self.rows = page.data;
                self.pagination = PaginationState {
                    current_page: page.current_page,
                    page_size: query.page_size,
                    total: page.total,
                };
                self.state = ViewState::Loaded;
            }
            Err(e) => {
                warn!("Failed to fetch {}: {}", E::plural(), e);
                self.state = ViewState::LoadError;
                self.notify(
                    NotificationLevel::Error,
                    format!("Failed to fetch {}", E::plural()),
                );
            }
        }
    }

    /// 首次进入：第 1 页，无搜索条件
    pub async fn mount(&mut self) {
        self.search_text.clear();
        self.fetch(ListQuery::new(1, self.pagination.page_size, "")).await;
    }

    /// 按指定页码、条数和搜索条件加载
    pub async fn load(&mut self, query: ListQuery) {
        self.search_text = query.search.trim().to_string();
        let query = ListQuery::new(query.page, query.page_size, self.search_text.clone());
        self.fetch(query).await;
    }

    /// 新的搜索条件从第 1 页开始
    pub async fn search(&mut self, text: &str) {
        self.search_text = text.trim().to_string();
        let query = ListQuery::new(1, self.pagination.page_size, self.search_text.clone());
        self.fetch(query).await;
    }

    /// 翻页或修改每页条数，保留搜索条件
    pub async fn change_page(&mut self, page: u32, page_size: Option<u32>) {
        let page_size = page_size.unwrap_or(self.pagination.page_size);
        let query = ListQuery::new(page, page_size, self.search_text.clone());
        self.fetch(query).await;
    }

    /// 按当前页、当前条件重新加载
    pub async fn refresh(&mut self) {
        let query = ListQuery::new(
            self.pagination.current_page,
            self.pagination.page_size,
            self.search_text.clone(),
        );
        self.fetch(query).await;
    }

    /// 回到第 1 页、默认条数并清空搜索
    pub async fn reload(&mut self) {
        self.search_text.clear();
        self.fetch(ListQuery::new(1, self.default_page_size, "")).await;
    }

    /// 打开新建表单
    pub fn open_create(&mut self) -> bool {
        match E::CREATE_POLICY {
            CreatePolicy::Open => {}
            CreatePolicy::RequiresAuth(message) if !self.session.is_authenticated() => {
                self.notify(NotificationLevel::Warning, message);
                return false;
            }
            CreatePolicy::RequiresAuth(_) => {}
            CreatePolicy::Disallowed(message) => {
                self.notify(NotificationLevel::Info, message);
                return false;
            }
        }
        self.overlay = Overlay::Form(EntityForm::create());
        true
    }

    async fn find_record(&mut self, id: i64) -> Option<E> {
        if let Some(record) = self.rows.iter().find(|r| r.id() == id) {
            return Some(record.clone());
        }
        match self.gateway.get_by_id(id).await {
            Ok(record) => Some(record),
            Err(e) => {
                let fallback = format!("Failed to load {}", E::SINGULAR.to_lowercase());
                self.notify(NotificationLevel::Error, e.user_message(&fallback));
                None
            }
        }
    }

    /// 打开编辑表单，只有有权限的记录可以编辑
    pub async fn open_edit(&mut self, id: i64) -> bool {
        let Some(record) = self.find_record(id).await else {
            return false;
        };
        if !self.can_manage(&record) {
            self.notify(
                NotificationLevel::Warning,
                format!("You can only modify your own {}", E::plural()),
            );
            return false;
        }
        self.overlay = Overlay::Form(EntityForm::edit(&record));
        true
    }

    /// 关闭表单，丢弃未提交的修改
    pub fn close_form(&mut self) {
        if matches!(self.overlay, Overlay::Form(_)) {
            self.overlay = Overlay::None;
        }
    }

    /// 校验并提交表单
    ///
    /// 成功后关闭表单并按当前条件刷新；失败时表单保持打开。
    pub async fn submit_form(&mut self, ctx: &ValidationContext) -> SubmitOutcome<E> {
        let Overlay::Form(form) = &mut self.overlay else {
            return SubmitOutcome::NoFormOpen;
        };
        let mode = form.mode();
        let payload = match form.submit(ctx) {
            Ok(payload) => payload,
            Err(SubmitError::Invalid(errors)) => {
                self.notify(NotificationLevel::Error, "Please check all required fields");
                return SubmitOutcome::Invalid(errors);
            }
            Err(SubmitError::Rejected(e)) => {
                self.notify(NotificationLevel::Error, e.user_message("Operation failed"));
                return SubmitOutcome::Rejected(e);
            }
        };

        let (result, verb) = match mode {
            FormMode::Create => (self.gateway.create(&payload).await, "created"),
            FormMode::Edit { id } => (self.gateway.update(id, &payload).await, "updated"),
        };

        match result {
            Ok(record) => {
                self.overlay = Overlay::None;
                self.notify(
                    NotificationLevel::Success,
                    format!("{} {} successfully", E::SINGULAR, verb),
                );
                self.refresh().await;
                SubmitOutcome::Saved(record)
            }
            Err(e) => {
                self.notify(NotificationLevel::Error, e.user_message("Operation failed"));
                SubmitOutcome::Rejected(e)
            }
        }
    }

    /// 请求删除，先进入确认步骤
    pub async fn request_delete(&mut self, id: i64) -> bool {
        let Some(record) = self.find_record(id).await else {
            return false;
        };
        if !self.can_manage(&record) {
            self.notify(
                NotificationLevel::Warning,
                format!("You can only modify your own {}", E::plural()),
            );
            return false;
        }
        self.overlay = Overlay::DeleteConfirm(record);
        true
    }

    pub fn cancel_delete(&mut self) {
        if matches!(self.overlay, Overlay::DeleteConfirm(_)) {
            self.overlay = Overlay::None;
        }
    }

    /// 确认删除
    ///
    /// 成功后刷新当前页（即使当前页已空也不回退）；失败只给出提示。
    pub async fn confirm_delete(&mut self) -> bool {
        let Overlay::DeleteConfirm(record) = std::mem::replace(&mut self.overlay, Overlay::None)
        else {
            return false;
        };

        match self.gateway.delete_by_id(record.id()).await {
            Ok(()) => {
                self.notify(
                    NotificationLevel::Success,
                    format!("{} deleted successfully", E::SINGULAR),
                );
                self.refresh().await;
                true
            }
            Err(e) => {
                let fallback = format!("Failed to delete {}", E::SINGULAR.to_lowercase());
                self.notify(NotificationLevel::Error, e.user_message(&fallback));
                false
            }
        }
    }
}


#[cfg(test)]
mod tests {
    use super::testing::FakeGateway;
    use super::*;
    use crate::models::courses::{Course, CoursePayload};
    use crate::models::students::{Student, StudentPayload};
    use crate::services::ApiClient;
    use crate::session::{INSTRUCTOR_KEY, SessionState, TOKEN_KEY};
    use crate::storage::{DurableStore, MemoryStore};
    use chrono::NaiveDate;

    fn ctx() -> ValidationContext {
        ValidationContext::new(NaiveDate::from_ymd_opt(2025, 6, 15).unwrap())
    }

    fn session(signed_in_as: Option<i64>) -> Arc<SessionStore> {
        let store: Arc<dyn DurableStore> = Arc::new(MemoryStore::new());
        if let Some(id) = signed_in_as {
            let principal = format!(r#"{{"instructor_id":{id},"first_name":"Grace"}}"#);
            store
                .set_many(&[(TOKEN_KEY, "t1"), (INSTRUCTOR_KEY, principal.as_str())])
                .unwrap();
        }
        let api = ApiClient::new("http://127.0.0.1:1", Arc::new(SessionState::default())).unwrap();
        Arc::new(SessionStore::hydrate(store, api))
    }

    fn student(id: i64, first: &str, last: &str) -> Student {
        Student {
            student_id: id,
            first_name: first.to_string(),
            last_name: last.to_string(),
            email: format!("{}@uni.edu", first.to_lowercase()),
            date_of_birth: NaiveDate::from_ymd_opt(2004, 1, 1),
            ..Default::default()
        }
    }

    fn make_student(id: i64, p: &StudentPayload) -> Student {
        Student {
            student_id: id,
            first_name: p.first_name.clone(),
            last_name: p.last_name.clone(),
            email: p.email.clone(),
            date_of_birth: Some(p.date_of_birth),
            phone: p.phone.clone(),
            address: p.address.clone(),
            created_at: None,
        }
    }

    fn course(id: i64, code: &str, owner: i64) -> Course {
        Course {
            course_id: id,
            course_name: format!("Course {code}"),
            course_code: code.to_string(),
            credits: 3,
            max_capacity: 30,
            start_date: NaiveDate::from_ymd_opt(2025, 9, 1),
            end_date: NaiveDate::from_ymd_opt(2025, 12, 20),
            instructor_id: Some(owner),
            ..Default::default()
        }
    }

    fn make_course(id: i64, p: &CoursePayload) -> Course {
        Course {
            course_id: id,
            course_name: p.course_name.clone(),
            course_code: p.course_code.clone(),
            description: p.description.clone(),
            credits: p.credits,
            max_capacity: p.max_capacity,
            start_date: Some(p.start_date),
            end_date: Some(p.end_date),
            ..Default::default()
        }
    }

    fn student_view(
        rows: Vec<Student>,
    ) -> (ListView<Student>, Arc<FakeGateway<Student>>) {
        let gateway = Arc::new(FakeGateway::new(rows, make_student));
        let view = ListView::new(gateway.clone(), session(None), 10);
        (view, gateway)
    }

    #[tokio::test]
    async fn test_mount_loads_first_page() {
        let rows = (1..=12).map(|i| student(i, "Ada", "Lovelace")).collect();
        let (mut view, gateway) = student_view(rows);
        assert_eq!(view.state(), ViewState::Idle);

        view.mount().await;
        assert_eq!(view.state(), ViewState::Loaded);
        assert_eq!(view.rows().len(), 10);
        assert_eq!(view.pagination().total, 12);
        assert_eq!(gateway.last_query(), Some(ListQuery::new(1, 10, "")));

        view.change_page(2, None).await;
        assert_eq!(view.rows().len(), 2);
        assert_eq!(view.pagination().current_page, 2);
    }

    #[tokio::test]
    async fn test_created_student_appears_on_first_page() {
        let (mut view, _gateway) = student_view(vec![student(1, "Ada", "Lovelace")]);
        view.mount().await;

        assert!(view.open_create());
        let form = view.form_mut().unwrap();
        form.set("first_name", "Alan").unwrap();
        form.set("last_name", "Turing").unwrap();
        form.set("email", "alan@uni.edu").unwrap();
        form.set("date_of_birth", "2003-06-23").unwrap();

        let outcome = view.submit_form(&ctx()).await;
        assert!(matches!(outcome, SubmitOutcome::Saved(Some(ref s)) if s.student_id == 2));
        assert!(view.form().is_none());
        assert!(view.rows().iter().any(|s| s.email == "alan@uni.edu"));
        assert_eq!(view.pagination().total, 2);

        let notes = view.take_notifications();
        assert_eq!(
            notes,
            vec![Notification {
                level: NotificationLevel::Success,
                message: "Student created successfully".to_string()
            }]
        );
        assert!(view.take_notifications().is_empty());
    }

    #[tokio::test]
    async fn test_create_without_returned_record_still_succeeds() {
        let (mut view, gateway) = student_view(vec![student(1, "Ada", "Lovelace")]);
        *gateway.omit_records.lock().unwrap() = true;
        view.mount().await;

        assert!(view.open_create());
        let form = view.form_mut().unwrap();
        form.set("first_name", "Alan").unwrap();
        form.set("last_name", "Turing").unwrap();
        form.set("email", "alan@uni.edu").unwrap();
        form.set("date_of_birth", "2003-06-23").unwrap();

        let outcome = view.submit_form(&ctx()).await;
        assert!(matches!(outcome, SubmitOutcome::Saved(None)));
        assert!(view.form().is_none());
        // 以刷新后的列表为准
        assert!(view.rows().iter().any(|s| s.email == "alan@uni.edu"));
        assert_eq!(gateway.queries.lock().unwrap().len(), 2);
        assert_eq!(
            view.take_notifications(),
            vec![Notification {
                level: NotificationLevel::Success,
                message: "Student created successfully".to_string()
            }]
        );
    }

    #[tokio::test]
    async fn test_cancelled_delete_changes_nothing() {
        let (mut view, gateway) =
            student_view(vec![student(1, "Ada", "Lovelace"), student(2, "Alan", "Turing")]);
        view.mount().await;
        let calls = gateway.queries.lock().unwrap().len();

        assert!(view.request_delete(2).await);
        assert_eq!(view.pending_delete().map(|s| s.student_id), Some(2));
        view.cancel_delete();

        assert!(view.pending_delete().is_none());
        assert_eq!(view.rows().len(), 2);
        assert_eq!(view.pagination().total, 2);
        assert_eq!(gateway.rows.lock().unwrap().len(), 2);
        assert_eq!(gateway.queries.lock().unwrap().len(), calls);
    }

    #[tokio::test]
    async fn test_confirmed_delete_refetches_current_page() {
        let rows = (1..=11).map(|i| student(i, "Ada", "Lovelace")).collect();
        let (mut view, _gateway) = student_view(rows);
        view.mount().await;
        view.change_page(2, None).await;
        assert_eq!(view.rows().len(), 1);

        assert!(view.request_delete(11).await);
        assert!(view.confirm_delete().await);

        // 最后一页删空后仍停留在该页
        assert_eq!(view.pagination().current_page, 2);
        assert!(view.rows().is_empty());
        assert_eq!(view.pagination().total, 10);
    }

    #[tokio::test]
    async fn test_delete_conflict_only_notifies() {
        let (mut view, gateway) = student_view(vec![student(1, "Ada", "Lovelace")]);
        view.mount().await;
        view.take_notifications();

        assert!(view.request_delete(1).await);
        gateway.fail_next(ConsoleError::conflict("Student has active enrollments"));
        assert!(!view.confirm_delete().await);

        assert_eq!(view.rows().len(), 1);
        assert_eq!(
            view.take_notifications()[0].message,
            "Student has active enrollments"
        );
    }

    #[tokio::test]
    async fn test_search_replaces_rows_and_resets_page() {
        let rows = vec![
            course(1, "CS101", 5),
            course(2, "MA201", 5),
            course(3, "CS102", 6),
        ];
        let gateway = Arc::new(FakeGateway::new(rows, make_course));
        let mut view = ListView::new(gateway.clone(), session(None), 2);
        view.mount().await;
        view.change_page(2, None).await;

        view.search("CS101").await;
        assert_eq!(gateway.last_query(), Some(ListQuery::new(1, 2, "CS101")));
        assert_eq!(view.rows().len(), 1);
        assert_eq!(view.rows()[0].course_code, "CS101");
        assert_eq!(view.search_text(), "CS101");

        // 翻页保留搜索条件
        view.change_page(1, Some(5)).await;
        assert_eq!(gateway.last_query(), Some(ListQuery::new(1, 5, "CS101")));

        view.reload().await;
        assert_eq!(gateway.last_query(), Some(ListQuery::new(1, 2, "")));
        assert_eq!(view.search_text(), "");
    }

    #[tokio::test]
    async fn test_course_create_requires_login() {
        let gateway = Arc::new(FakeGateway::new(Vec::new(), make_course));
        let mut view = ListView::new(gateway.clone(), session(None), 10);

        assert!(!view.open_create());
        assert!(view.form().is_none());
        assert_eq!(
            view.take_notifications(),
            vec![Notification {
                level: NotificationLevel::Warning,
                message: "Please login as an instructor to create courses".to_string()
            }]
        );

        let mut view = ListView::new(gateway, session(Some(5)), 10);
        assert!(view.open_create());
        assert_eq!(view.form().unwrap().title(), "Add New Course");
    }

    #[tokio::test]
    async fn test_edit_refused_for_other_instructors_course() {
        let gateway = Arc::new(FakeGateway::new(
            vec![course(1, "CS101", 5), course(2, "CS102", 6)],
            make_course,
        ));
        let mut view = ListView::new(gateway, session(Some(5)), 10);
        view.mount().await;

        assert!(!view.open_edit(2).await);
        assert!(view.form().is_none());
        assert_eq!(
            view.take_notifications()[0].level,
            NotificationLevel::Warning
        );
        assert!(!view.request_delete(2).await);

        assert!(view.open_edit(1).await);
        assert_eq!(view.form().unwrap().value("course_code"), "CS101");
    }

    #[tokio::test]
    async fn test_submit_failure_keeps_form_open() {
        let gateway = Arc::new(FakeGateway::new(vec![course(1, "CS101", 5)], make_course));
        let mut view = ListView::new(gateway.clone(), session(Some(5)), 10);
        view.mount().await;
        view.take_notifications();

        assert!(view.open_edit(1).await);
        gateway.fail_next(ConsoleError::validation("Course code already exists"));
        let outcome = view.submit_form(&ctx()).await;

        assert!(matches!(outcome, SubmitOutcome::Rejected(_)));
        assert!(view.form().is_some());
        assert_eq!(
            view.take_notifications(),
            vec![Notification {
                level: NotificationLevel::Error,
                message: "Course code already exists".to_string()
            }]
        );

        // 本地校验失败不发请求
        view.form_mut().unwrap().set("course_code", "").unwrap();
        let outcome = view.submit_form(&ctx()).await;
        assert!(matches!(outcome, SubmitOutcome::Invalid(ref e) if e.get("course_code").is_some()));

        view.close_form();
        assert!(view.form().is_none());
    }

    #[tokio::test]
    async fn test_load_failure_notifies() {
        let (mut view, gateway) = student_view(vec![student(1, "Ada", "Lovelace")]);
        view.mount().await;

        gateway.fail_next(ConsoleError::network("connection refused"));
        view.refresh().await;

        assert_eq!(view.state(), ViewState::LoadError);
        assert_eq!(view.rows().len(), 1);
        assert_eq!(
            view.take_notifications(),
            vec![Notification {
                level: NotificationLevel::Error,
                message: "Failed to fetch students".to_string()
            }]
        );
    }
}
