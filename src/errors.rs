//! 统一错误处理模块
//!
//! 使用宏自动生成错误类型，支持错误代码和类型名称。
//! 服务端返回的错误信息原样保存在 message 中，供界面直接展示。

use std::fmt;

/// 定义错误类型的宏
///
/// 自动生成：
/// - enum 定义
/// - code() 方法 - 返回错误代码
/// - error_type() 方法 - 返回错误类型名称
/// - message() 方法 - 返回错误详情
/// - 便捷构造函数
macro_rules! define_console_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal)
    ),* $(,)?) => {
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub enum ConsoleError {
            $($variant(String),)*
        }

        impl ConsoleError {
            /// 获取错误代码
            pub fn code(&self) -> &'static str {
                match self {
                    $(ConsoleError::$variant(_) => $code,)*
                }
            }

            /// 获取错误类型名称
            pub fn error_type(&self) -> &'static str {
                match self {
                    $(ConsoleError::$variant(_) => $type_name,)*
                }
            }

            /// 获取错误详情
            pub fn message(&self) -> &str {
                match self {
                    $(ConsoleError::$variant(msg) => msg,)*
                }
            }
        }

        // 生成便捷构造函数
        paste::paste! {
            impl ConsoleError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        ConsoleError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_console_errors! {
    Validation("E001", "Validation Error"),
    ServerRejection("E002", "Server Rejection"),
    NotFound("E003", "Resource Not Found"),
    Conflict("E004", "Conflict"),
    Network("E005", "Network Error"),
    AuthRequired("E006", "Authentication Required"),
    Authentication("E007", "Authentication Error"),
    Storage("E008", "Storage Error"),
    Serialization("E009", "Serialization Error"),
    Config("E010", "Configuration Error"),
    DateParse("E011", "Date Parse Error"),
}

impl ConsoleError {
    /// 展示给用户的信息：有服务端信息时原样返回，否则使用兜底文案
    pub fn user_message<'a>(&'a self, fallback: &'a str) -> &'a str {
        let msg = self.message().trim();
        if msg.is_empty() { fallback } else { msg }
    }

    /// 是否需要重新登录
    pub fn is_auth_required(&self) -> bool {
        matches!(self, ConsoleError::AuthRequired(_))
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for ConsoleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for ConsoleError {}

// 为常见的错误类型实现 From trait
impl From<reqwest::Error> for ConsoleError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ConsoleError::Serialization(err.to_string())
        } else {
            ConsoleError::Network(err.to_string())
        }
    }
}

impl From<std::io::Error> for ConsoleError {
    fn from(err: std::io::Error) -> Self {
        ConsoleError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for ConsoleError {
    fn from(err: serde_json::Error) -> Self {
        ConsoleError::Serialization(err.to_string())
    }
}

impl From<chrono::ParseError> for ConsoleError {
    fn from(err: chrono::ParseError) -> Self {
        ConsoleError::DateParse(err.to_string())
    }
}

impl From<config::ConfigError> for ConsoleError {
    fn from(err: config::ConfigError) -> Self {
        ConsoleError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ConsoleError>;
