//! 实体表单
//!
//! 表单只负责收集、校验输入并生成提交数据，不直接调用后端。
//! 关闭表单即丢弃所有未提交的修改。

pub mod auth;
pub mod course;
pub mod instructor;
pub mod rules;
pub mod student;

pub use auth::{AuthForm, AuthMode, AuthOutcome};
pub use rules::{
    Check, FieldErrors, FieldKind, FieldSpec, FormValues, Rule, ValidationContext, validate,
};

use std::fmt;
use std::marker::PhantomData;

use crate::errors::{ConsoleError, Result};
use crate::models::Entity;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit { id: i64 },
}

/// 实体的表单定义
pub trait FormSchema: Entity {
    fn fields(mode: FormMode) -> Vec<FieldSpec>;

    /// 新建时的默认值
    fn defaults() -> FormValues {
        FormValues::new()
    }

    /// 编辑时由已有记录回填，只写字段（如密码）不回填
    fn prefill(record: &Self) -> FormValues;

    /// 由已通过校验的输入生成提交数据
    fn build_payload(values: &FormValues, mode: FormMode) -> Result<Self::Payload>;
}

/// 表单提交失败
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitError {
    /// 本地校验未通过，逐字段提示
    Invalid(FieldErrors),
    /// 后端拒绝或请求失败
    Rejected(ConsoleError),
}

impl SubmitError {
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            SubmitError::Invalid(errors) => Some(errors),
            SubmitError::Rejected(_) => None,
        }
    }
}

impl fmt::Display for SubmitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmitError::Invalid(_) => write!(f, "Please check all required fields"),
            SubmitError::Rejected(err) => write!(f, "{}", err.message()),
        }
    }
}

impl std::error::Error for SubmitError {}

impl From<ConsoleError> for SubmitError {
    fn from(err: ConsoleError) -> Self {
        SubmitError::Rejected(err)
    }
}

pub struct EntityForm<E: FormSchema> {
    mode: FormMode,
    fields: Vec<FieldSpec>,
    values: FormValues,
    errors: FieldErrors,
    _entity: PhantomData<fn() -> E>,
}

impl<E: FormSchema> EntityForm<E> {
    pub fn create() -> Self {
        Self::with_values(FormMode::Create, E::defaults())
    }

    pub fn edit(record: &E) -> Self {
        Self::with_values(FormMode::Edit { id: record.id() }, E::prefill(record))
    }

    fn with_values(mode: FormMode, mut values: FormValues) -> Self {
        let fields = E::fields(mode);
        values.retain_fields(&fields);
        Self {
            mode,
            fields,
            values,
            errors: FieldErrors::default(),
            _entity: PhantomData,
        }
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn title(&self) -> String {
        match self.mode {
            FormMode::Create => format!("Add New {}", E::SINGULAR),
            FormMode::Edit { .. } => format!("Edit {}", E::SINGULAR),
        }
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn values(&self) -> &FormValues {
        &self.values
    }

    pub fn value(&self, name: &str) -> &str {
        self.values.get(name)
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// 写入字段值，按字段类型规范化
    pub fn set(&mut self, name: &str, raw: &str) -> Result<()> {
        let field = self
            .fields
            .iter()
            .find(|f| f.name == name)
            .ok_or_else(|| {
                ConsoleError::validation(format!(
                    "Unknown field '{name}' for {}",
                    E::SINGULAR.to_lowercase()
                ))
            })?;
        let value = field.normalize(raw);
        self.values.insert(name, value);
        Ok(())
    }

    pub fn validate(&mut self, ctx: &ValidationContext) -> std::result::Result<(), FieldErrors> {
        let result = validate(&self.fields, &self.values, ctx);
        self.errors = result.clone().err().unwrap_or_default();
        result
    }

    /// 校验并生成提交数据
    pub fn submit(
        &mut self,
        ctx: &ValidationContext,
    ) -> std::result::Result<E::Payload, SubmitError> {
        self.validate(ctx).map_err(SubmitError::Invalid)?;
        E::build_payload(&self.values, self.mode).map_err(SubmitError::Rejected)
    }
}
