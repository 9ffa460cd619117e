use std::sync::Arc;
use tracing::{debug, info};

use crate::config::AppConfig;
use crate::errors::Result;
use crate::services::ApiClient;
use crate::session::{SessionState, SessionStore};
use crate::storage::{self, DurableStore};

pub struct StartupContext {
    pub store: Arc<dyn DurableStore>,
    pub session: Arc<SessionStore>,
}

impl StartupContext {
    pub fn api(&self) -> &ApiClient {
        self.session.api()
    }
}

/// 准备控制台运行所需的上下文
/// 包括会话存储、API 客户端和恢复的登录状态
pub fn prepare_console_startup(
    config: &AppConfig,
    api_url_override: Option<&str>,
) -> Result<StartupContext> {
    if cfg!(debug_assertions) {
        storage::register::debug_store_registry();
        debug!("Debug mode: Session store registry is enabled");
    }

    let store = storage::create_store(&config.storage)?;
    info!("Session store '{}' initialized", store.name());

    let base_url = api_url_override
        .map(|url| url.trim_end_matches('/'))
        .filter(|url| !url.is_empty())
        .unwrap_or_else(|| config.api_base_url());
    debug!("Using API at {}", base_url);

    let api = ApiClient::new(base_url, Arc::new(SessionState::default()))?;
    let session = Arc::new(SessionStore::hydrate(store.clone(), api));

    Ok(StartupContext { store, session })
}
