//! 登录 / 注册表单
//!
//! 两个模式各自保存输入，切换模式不会丢失另一边已填写的内容。

use super::instructor::{
    department_field, email_field, name_fields, parse_title, password_field, phone_field,
    title_field,
};
use super::{Check, FieldErrors, FieldKind, FieldSpec, FormValues, SubmitError, ValidationContext};
use crate::errors::{ConsoleError, Result};
use crate::models::auth::{RegisterRequest, Session};
use crate::models::instructors::InstructorTitle;
use crate::session::SessionStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthMode {
    #[default]
    Login,
    Register,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AuthOutcome {
    LoggedIn(Session),
    /// 注册成功，需要再登录
    Registered,
}

impl AuthOutcome {
    pub fn message(&self) -> &'static str {
        match self {
            AuthOutcome::LoggedIn(_) => "Login successful",
            AuthOutcome::Registered => "Registration successful! Please login.",
        }
    }
}

pub fn login_fields() -> Vec<FieldSpec> {
    vec![
        FieldSpec::new("email", "Email", FieldKind::Text)
            .required("Please enter your email")
            .rule(Check::Email, "Please enter a valid email"),
        FieldSpec::new("password", "Password", FieldKind::Secret)
            .required("Please enter your password"),
    ]
}

pub fn register_fields() -> Vec<FieldSpec> {
    let [first_name, last_name] = name_fields();
    vec![
        title_field(),
        first_name,
        last_name,
        email_field(),
        password_field(),
        department_field(),
        phone_field("Phone"),
    ]
}

fn register_defaults() -> FormValues {
    FormValues::new().with("title", InstructorTitle::default().as_str())
}

pub struct AuthForm {
    mode: AuthMode,
    login: FormValues,
    register: FormValues,
    errors: FieldErrors,
}

impl Default for AuthForm {
    fn default() -> Self {
        Self::new(AuthMode::Login)
    }
}

impl AuthForm {
    pub fn new(mode: AuthMode) -> Self {
        Self {
            mode,
            login: FormValues::new(),
            register: register_defaults(),
            errors: FieldErrors::default(),
        }
    }

    pub fn mode(&self) -> AuthMode {
        self.mode
    }

    pub fn switch_mode(&mut self, mode: AuthMode) {
        self.mode = mode;
        self.errors = FieldErrors::default();
    }

    pub fn fields(&self) -> Vec<FieldSpec> {
        match self.mode {
            AuthMode::Login => login_fields(),
            AuthMode::Register => register_fields(),
        }
    }

    fn values_mut(&mut self) -> &mut FormValues {
        match self.mode {
            AuthMode::Login => &mut self.login,
            AuthMode::Register => &mut self.register,
        }
    }

    pub fn values(&self) -> &FormValues {
        match self.mode {
            AuthMode::Login => &self.login,
            AuthMode::Register => &self.register,
        }
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn set(&mut self, name: &str, raw: &str) -> Result<()> {
        let field = self
            .fields()
            .into_iter()
            .find(|f| f.name == name)
            .ok_or_else(|| ConsoleError::validation(format!("Unknown field '{name}'")))?;
        let value = field.normalize(raw);
        self.values_mut().insert(name, value);
        Ok(())
    }

    pub fn validate(&mut self, ctx: &ValidationContext) -> std::result::Result<(), FieldErrors> {
        let result = super::validate(&self.fields(), self.values(), ctx);
        self.errors = result.clone().err().unwrap_or_default();
        result
    }

    fn register_request(&self) -> Result<RegisterRequest> {
        let values = &self.register;
        Ok(RegisterRequest {
            title: parse_title(values)?,
            first_name: values.text("first_name"),
            last_name: values.text("last_name"),
            email: values.text("email"),
            password: values.get("password").to_string(),
            department: values.text("department"),
            phone: values.optional("phone"),
        })
    }

    /// 提交当前模式
    ///
    /// 登录成功后清空登录输入；注册成功后清空注册输入并切回登录。
    /// 失败时保留输入，错误信息原样返回。
    pub async fn submit(
        &mut self,
        session: &SessionStore,
        ctx: &ValidationContext,
    ) -> std::result::Result<AuthOutcome, SubmitError> {
        self.validate(ctx).map_err(SubmitError::Invalid)?;

        match self.mode {
            AuthMode::Login => {
                let logged_in = session
                    .login(self.login.get("email"), self.login.get("password"))
                    .await?;
                self.login = FormValues::new();
                Ok(AuthOutcome::LoggedIn(logged_in))
            }
            AuthMode::Register => {
                let request = self.register_request()?;
                session.register(&request).await?;
                self.register = register_defaults();
                self.switch_mode(AuthMode::Login);
                Ok(AuthOutcome::Registered)
            }
        }
    }
}
