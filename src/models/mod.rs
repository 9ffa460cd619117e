//! 数据模型定义
//!
//! 所有实体都只是与后端交换的普通记录，本地不保存权威状态。

pub mod auth;
pub mod common;
pub mod courses;
pub mod instructors;
pub mod students;

pub use common::*;

use serde::Serialize;
use serde::de::DeserializeOwned;

/// 记录的归属方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ownership {
    /// 无归属概念，任何人可管理
    Unowned,
    /// 归属于某位讲师，只有该讲师可管理
    ByInstructor,
}

/// 新建记录的入口策略
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreatePolicy {
    Open,
    /// 未登录时拒绝，并给出警告
    RequiresAuth(&'static str),
    /// 总是拒绝，并给出提示
    Disallowed(&'static str),
}

/// 一类 REST 资源
pub trait Entity: Clone + Send + Sync + DeserializeOwned + Serialize + 'static {
    /// 创建/更新时提交的数据，不包含服务端分配的字段
    type Payload: Serialize + Send + Sync + 'static;

    /// 资源路径，例如 `students`
    const RESOURCE: &'static str;
    /// 单数名称，例如 `Course`
    const SINGULAR: &'static str;
    /// 分页信息里的总数字段，例如 `totalCourses`
    const TOTAL_KEY: &'static str;
    const OWNERSHIP: Ownership = Ownership::Unowned;
    const CREATE_POLICY: CreatePolicy = CreatePolicy::Open;

    fn id(&self) -> i64;

    /// 所属讲师 ID
    fn owner_id(&self) -> Option<i64> {
        None
    }

    /// 复数小写名称，例如 `courses`
    fn plural() -> &'static str {
        Self::RESOURCE
    }
}
