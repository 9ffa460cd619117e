use crate::config::StorageConfig;
use crate::errors::Result;
use crate::storage::{DurableStore, FileStore, MemoryStore};
use once_cell::sync::Lazy;
use std::{
    collections::HashMap,
    sync::{Arc, RwLock},
};

pub type StoreConstructor =
    Arc<dyn Fn(&StorageConfig) -> Result<Box<dyn DurableStore>> + Send + Sync>;

static STORE_REGISTRY: Lazy<RwLock<HashMap<String, StoreConstructor>>> = Lazy::new(|| {
    let mut registry: HashMap<String, StoreConstructor> = HashMap::new();
    registry.insert(
        "file".to_string(),
        Arc::new(|config: &StorageConfig| {
            FileStore::new(&config.path).map(|s| Box::new(s) as Box<dyn DurableStore>)
        }),
    );
    registry.insert(
        "memory".to_string(),
        Arc::new(|_: &StorageConfig| Ok(Box::new(MemoryStore::new()) as Box<dyn DurableStore>)),
    );
    RwLock::new(registry)
});

pub fn register_store_backend<S: Into<String>>(name: S, constructor: StoreConstructor) {
    let name = name.into();
    let mut registry = STORE_REGISTRY
        .write()
        .expect("Store registry lock poisoned");
    registry.insert(name, constructor);
}

pub fn get_store_backend(name: &str) -> Option<StoreConstructor> {
    STORE_REGISTRY
        .read()
        .expect("Store registry lock poisoned")
        .get(name)
        .cloned()
}

pub fn debug_store_registry() {
    let registry = STORE_REGISTRY
        .read()
        .expect("Store registry lock poisoned");
    if registry.is_empty() {
        tracing::debug!("No session store backends registered.");
    } else {
        tracing::debug!("Registered session store backends:");
        for key in registry.keys() {
            tracing::debug!(" - {}", key);
        }
    }
}
