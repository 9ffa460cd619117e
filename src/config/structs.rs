use serde::{Deserialize, Serialize};

/// 应用配置结构体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub app: AppSettings,
    pub api: ApiConfig,
    pub storage: StorageConfig,
    pub console: ConsoleConfig,
}

/// 应用设置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    pub system_name: String,
    pub environment: String,
    pub log_level: String,
}

/// 后端 API 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: String, // 例如 http://localhost:3000/api
}

/// 会话持久化配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub backend: String, // file / memory
    pub path: String,    // file 后端使用的 JSON 文件路径
}

/// 控制台显示配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsoleConfig {
    pub page_size: u32,
}
