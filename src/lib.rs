//! Enrollment Console - 学生选课系统管理控制台
//!
//! 通过 REST API 管理学生、课程与讲师记录的命令行客户端。
//!
//! # 架构
//! - `cli`: 命令行解析与输出
//! - `config`: 配置管理
//! - `errors`: 统一错误处理
//! - `forms`: 表单字段、校验规则与提交
//! - `models`: 数据模型定义
//! - `runtime`: 运行时生命周期管理
//! - `services`: API 客户端与资源服务
//! - `session`: 登录会话（持久化令牌与讲师信息）
//! - `storage`: 会话持久化后端
//! - `utils`: 工具函数
//! - `views`: 列表视图状态（分页、搜索、弹窗、提示）

pub mod cli;
pub mod config;
pub mod errors;
pub mod forms;
pub mod models;
pub mod runtime;
pub mod services;
pub mod session;
pub mod storage;
pub mod utils;
pub mod views;
