use reqwest::Method;

use super::AuthService;
use crate::errors::{ConsoleError, Result};
use crate::models::auth::{LoginRequest, LoginResponse, Session};

pub async fn handle_login(service: &AuthService, request: &LoginRequest) -> Result<Session> {
    let body = service
        .api()
        .request_json(Method::POST, "/instructors/login", &[], Some(request))
        .await
        .map_err(|e| match e {
            // 登录接口的 401 是凭据错误，不是会话过期
            ConsoleError::AuthRequired(msg) => ConsoleError::Authentication(msg),
            other => other,
        })?;

    let response: LoginResponse = serde_json::from_value(body)?;
    if !response.success {
        return Err(ConsoleError::authentication(
            response.reason().unwrap_or("Login failed"),
        ));
    }

    match response.token.filter(|t| !t.trim().is_empty()) {
        Some(token) => {
            tracing::info!("Instructor {} logged in", request.email);
            Ok(Session {
                token,
                principal: response.data,
            })
        }
        None => Err(ConsoleError::authentication(
            "Login response did not include a token",
        )),
    }
}
