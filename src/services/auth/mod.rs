pub mod login;
pub mod register;

use super::ApiClient;
use crate::errors::Result;
use crate::models::auth::{LoginRequest, RegisterRequest, Session};

/// 讲师认证接口
#[derive(Clone)]
pub struct AuthService {
    api: ApiClient,
}

impl AuthService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    // 登录，成功时返回令牌和讲师信息
    pub async fn login(&self, request: &LoginRequest) -> Result<Session> {
        login::handle_login(self, request).await
    }

    // 注册，不会自动登录
    pub async fn register(&self, request: &RegisterRequest) -> Result<()> {
        register::handle_register(self, request).await
    }
}
