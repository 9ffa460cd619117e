//! 会话管理
//!
//! 会话由 token 与当前讲师快照组成，保存在持久化存储的 `token` / `instructor` 两个键中。
//! 进程启动时从存储恢复；登录成功后先写入存储再更新内存，
//! 因此存储写入失败时内存状态保持不变。

mod state;

pub use state::SessionState;

use std::sync::Arc;
use tracing::{info, warn};

use crate::errors::Result;
use crate::models::auth::{LoginRequest, RegisterRequest, Session};
use crate::models::instructors::Principal;
use crate::services::{ApiClient, AuthService};
use crate::storage::DurableStore;

pub const TOKEN_KEY: &str = "token";
pub const INSTRUCTOR_KEY: &str = "instructor";

pub struct SessionStore {
    store: Arc<dyn DurableStore>,
    auth: AuthService,
    state: Arc<SessionState>,
}

impl SessionStore {
    /// 从持久化存储恢复会话
    ///
    /// 读取失败时按未登录处理。
    pub fn hydrate(store: Arc<dyn DurableStore>, api: ApiClient) -> Self {
        let state = api.session_state().clone();
        let restored = match read_session(store.as_ref()) {
            Ok(session) => session,
            Err(e) => {
                warn!("Failed to restore session from {} store: {}", store.name(), e);
                None
            }
        };
        if let Some(session) = &restored {
            info!(
                "Restored session for {}",
                session
                    .principal
                    .as_ref()
                    .map(|p| p.email.as_str())
                    .unwrap_or("unknown instructor")
            );
        }
        state.replace(restored);

        Self {
            store,
            auth: AuthService::new(api),
            state,
        }
    }

    pub fn api(&self) -> &ApiClient {
        self.auth.api()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.current().is_some()
    }

    pub fn current(&self) -> Option<Arc<Session>> {
        self.state.current()
    }

    pub fn current_principal(&self) -> Option<Principal> {
        self.state.current().and_then(|s| s.principal.clone())
    }

    /// 登录并持久化会话
    pub async fn login(&self, email: &str, password: &str) -> Result<Session> {
        let request = LoginRequest {
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        let session = self.auth.login(&request).await?;

        let principal_json = match &session.principal {
            Some(principal) => serde_json::to_string(principal)?,
            None => String::new(),
        };
        // 没有讲师信息时，同一次写入里清掉旧的快照
        if principal_json.is_empty() {
            self.store
                .replace_many(&[(TOKEN_KEY, session.token.as_str())], &[INSTRUCTOR_KEY])?;
        } else {
            self.store.set_many(&[
                (TOKEN_KEY, session.token.as_str()),
                (INSTRUCTOR_KEY, principal_json.as_str()),
            ])?;
        }

        self.state.replace(Some(session.clone()));
        Ok(session)
    }

    /// 注册新讲师，不改变当前会话
    pub async fn register(&self, request: &RegisterRequest) -> Result<()> {
        self.auth.register(request).await
    }

    /// 退出登录，清除内存与持久化的会话
    pub fn logout(&self) {
        if let Err(e) = self.store.remove_many(&[TOKEN_KEY, INSTRUCTOR_KEY]) {
            warn!("Failed to clear persisted session: {}", e);
        }
        self.state.replace(None);
        info!("Logged out");
    }
}

fn read_session(store: &dyn DurableStore) -> Result<Option<Session>> {
    let Some(token) = store.get(TOKEN_KEY)?.filter(|t| !t.trim().is_empty()) else {
        return Ok(None);
    };
    let principal = match store.get(INSTRUCTOR_KEY)? {
        Some(raw) if !raw.trim().is_empty() => match serde_json::from_str::<Principal>(&raw) {
            Ok(principal) => Some(principal),
            Err(e) => {
                warn!("Ignoring unreadable instructor snapshot: {}", e);
                None
            }
        },
        _ => None,
    };
    Ok(Some(Session { token, principal }))
}
