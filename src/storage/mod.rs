//! 本地持久化存储
//!
//! 保存会话的键值存储，进程重启后仍然有效。后端按名称注册，
//! 由配置选择；配置的后端无法创建时回退到内存存储。

use std::sync::Arc;
use tracing::{debug, warn};

use crate::config::StorageConfig;
use crate::errors::{ConsoleError, Result};

pub mod file;
pub mod memory;
pub mod register;

pub use file::FileStore;
pub use memory::MemoryStore;

/// 键值存储
///
/// 成组写入/删除必须整体生效，会话的 token 与讲师信息总是一起变化。
pub trait DurableStore: Send + Sync {
    // 后端名称
    fn name(&self) -> &'static str;
    // 读取单个键
    fn get(&self, key: &str) -> Result<Option<String>>;
    /// 一次写入 `set` 并删除 `remove`，整体生效
    fn replace_many(&self, set: &[(&str, &str)], remove: &[&str]) -> Result<()>;

    fn set_many(&self, entries: &[(&str, &str)]) -> Result<()> {
        self.replace_many(entries, &[])
    }

    fn remove_many(&self, keys: &[&str]) -> Result<()> {
        self.replace_many(&[], keys)
    }
}

/// 根据配置创建存储实例
pub fn create_store(config: &StorageConfig) -> Result<Arc<dyn DurableStore>> {
    let backend = config.backend.as_str();

    debug!("Attempting to create {} session store", backend);

    if let Some(constructor) = register::get_store_backend(backend) {
        match constructor(config) {
            Ok(store) => return Ok(Arc::from(store)),
            Err(e) => warn!("Failed to create {} session store: {}", backend, e),
        }
    } else {
        warn!("Session store backend '{}' not found in registry", backend);
    }

    // 回退到内存存储：会话不会跨进程保留
    if backend != "memory" {
        warn!("Falling back to in-memory session store");
        if let Some(fallback) = register::get_store_backend("memory") {
            return fallback(config).map(Arc::from);
        }
    }

    Err(ConsoleError::storage(format!(
        "No session store backend available (tried: {backend})"
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(backend: &str, path: &str) -> StorageConfig {
        StorageConfig {
            backend: backend.to_string(),
            path: path.to_string(),
        }
    }

    #[test]
    fn test_create_store_by_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        let store = create_store(&config("file", path.to_str().unwrap())).unwrap();
        assert_eq!(store.name(), "file");

        let store = create_store(&config("memory", "")).unwrap();
        assert_eq!(store.name(), "memory");
    }

    #[test]
    fn test_unknown_backend_falls_back_to_memory() {
        let store = create_store(&config("browser", "")).unwrap();
        assert_eq!(store.name(), "memory");
    }
}
