//! 讲师列表的额外操作：登录、注册、退出与编辑个人资料
//!
//! 登录、注册、退出之后都回到第 1 页并清空搜索。

use super::{ListView, NotificationLevel};
use crate::forms::{AuthForm, AuthMode, AuthOutcome, SubmitError, ValidationContext};
use crate::models::instructors::Instructor;

impl ListView<Instructor> {
    /// 编辑当前登录讲师的资料
    pub async fn open_profile_edit(&mut self) -> bool {
        match self.session().current_principal() {
            Some(principal) => self.open_edit(principal.instructor_id).await,
            None => {
                self.notify(
                    NotificationLevel::Warning,
                    "Please login to edit your profile",
                );
                false
            }
        }
    }

    /// 提交登录/注册表单
    pub async fn submit_auth(
        &mut self,
        form: &mut AuthForm,
        ctx: &ValidationContext,
    ) -> Result<AuthOutcome, SubmitError> {
        let fallback = match form.mode() {
            AuthMode::Login => "Login failed",
            AuthMode::Register => "Registration failed",
        };
        let session = self.session().clone();

        match form.submit(&session, ctx).await {
            Ok(outcome) => {
                self.notify(NotificationLevel::Success, outcome.message());
                self.reload().await;
                Ok(outcome)
            }
            Err(SubmitError::Invalid(errors)) => {
                self.notify(NotificationLevel::Error, "Please check all required fields");
                Err(SubmitError::Invalid(errors))
            }
            Err(SubmitError::Rejected(e)) => {
                self.notify(NotificationLevel::Error, e.user_message(fallback));
                Err(SubmitError::Rejected(e))
            }
        }
    }

    pub async fn logout(&mut self) {
        self.session().logout();
        self.close_form();
        self.notify(NotificationLevel::Success, "Logged out successfully");
        self.reload().await;
    }
}
