use dashmap::DashMap;

use crate::errors::Result;
use crate::storage::DurableStore;

/// 进程内存储，进程退出后丢失
#[derive(Default)]
pub struct MemoryStore {
    inner: DashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DurableStore for MemoryStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.inner.get(key).map(|v| v.value().clone()))
    }

    fn replace_many(&self, set: &[(&str, &str)], remove: &[&str]) -> Result<()> {
        for (key, value) in set {
            self.inner.insert((*key).to_string(), (*value).to_string());
        }
        for key in remove {
            self.inner.remove(*key);
        }
        Ok(())
    }
}
