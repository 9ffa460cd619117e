use std::sync::{Arc, RwLock};

use crate::models::auth::Session;

/// 进程内的会话副本
///
/// token 与讲师快照作为一个整体读取和替换。
#[derive(Debug, Default)]
pub struct SessionState {
    inner: RwLock<Option<Arc<Session>>>,
}

impl SessionState {
    pub fn new(session: Option<Session>) -> Self {
        Self {
            inner: RwLock::new(session.map(Arc::new)),
        }
    }

    pub fn current(&self) -> Option<Arc<Session>> {
        self.inner
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn replace(&self, session: Option<Session>) {
        *self.inner.write().unwrap_or_else(|e| e.into_inner()) = session.map(Arc::new);
    }

    pub fn token(&self) -> Option<String> {
        self.current().map(|s| s.token.clone())
    }
}
