//! HTTP 传输层
//!
//! 负责拼接地址、附带 Bearer 令牌、把 HTTP 状态码映射为统一错误。
//! 不做重试，也不设置超时。

use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

use crate::errors::{ConsoleError, Result};
use crate::models::{ApiResponse, server_message};
use crate::session::SessionState;

#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: Arc<SessionState>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, session: Arc<SessionState>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            session,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session_state(&self) -> &Arc<SessionState> {
        &self.session
    }

    fn build_url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// 发送请求并返回原始 JSON
    pub async fn request_json<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&B>,
    ) -> Result<Value> {
        let url = self.build_url(path);
        debug!("{} {}", method, url);

        let mut req = self.http.request(method.clone(), &url);
        if !query.is_empty() {
            req = req.query(query);
        }
        if let Some(token) = self.session.token() {
            req = req.bearer_auth(token);
        }
        if let Some(body) = body {
            req = req.json(body);
        }

        let response = req.send().await?;

        let status = response.status();
        let text = response.text().await?;

        debug!("{} {} -> {}", method, url, status);

        let body: Value = if text.trim().is_empty() {
            Value::Null
        } else {
            match serde_json::from_str(&text) {
                Ok(value) => value,
                Err(e) if status.is_success() => {
                    return Err(ConsoleError::serialization(format!(
                        "Failed to parse response: {e}"
                    )));
                }
                // 非 JSON 的错误页，直接把文本当作说明
                Err(_) => Value::String(text),
            }
        };

        if !status.is_success() {
            return Err(map_status_error(status, &body));
        }
        Ok(body)
    }

    /// 发送请求并解析响应中的 data 字段
    pub async fn request_data<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&B>,
    ) -> Result<T> {
        let value = self.request_json(method, path, query, body).await?;
        decode_data(value)
    }

    /// 与 [`request_data`](Self::request_data) 相同，但允许成功响应不带 data
    pub async fn request_optional_data<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&B>,
    ) -> Result<Option<T>> {
        let value = self.request_json(method, path, query, body).await?;
        decode_optional_data(value)
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.request_data::<T, ()>(Method::GET, path, &[], None).await
    }

    pub async fn delete(&self, path: &str) -> Result<()> {
        let value = self
            .request_json::<()>(Method::DELETE, path, &[], None)
            .await?;
        let envelope: ApiResponse<Value> =
            serde_json::from_value(value).unwrap_or(ApiResponse {
                success: None,
                data: None,
                error: None,
                message: None,
            });
        if envelope.is_failure() {
            return Err(ConsoleError::conflict(
                envelope.reason().unwrap_or("Delete was rejected by the server"),
            ));
        }
        Ok(())
    }
}

/// 解析 `{ success, data }` 响应
pub(crate) fn decode_data<T: DeserializeOwned>(value: Value) -> Result<T> {
    decode_optional_data(value)?
        .ok_or_else(|| ConsoleError::serialization("Response did not include a data field"))
}

/// 解析 `{ success, data? }` 响应，空响应体视为没有 data
pub(crate) fn decode_optional_data<T: DeserializeOwned>(value: Value) -> Result<Option<T>> {
    if value.is_null() {
        return Ok(None);
    }
    let envelope: ApiResponse<Value> = serde_json::from_value(value)?;
    if envelope.is_failure() {
        return Err(ConsoleError::server_rejection(
            envelope.reason().unwrap_or("Operation failed"),
        ));
    }
    match envelope.data {
        Some(data) => Ok(Some(serde_json::from_value(data)?)),
        None => Ok(None),
    }
}

/// HTTP 状态码到错误类型的映射
pub(crate) fn map_status_error(status: StatusCode, body: &Value) -> ConsoleError {
    let message = match body {
        Value::String(text) if !text.trim().is_empty() && text.len() <= 200 => {
            Some(text.trim().to_string())
        }
        _ => server_message(body),
    };
    let or = |fallback: &str| message.clone().unwrap_or_else(|| fallback.to_string());

    match status {
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
            ConsoleError::validation(or("Validation failed"))
        }
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            ConsoleError::auth_required(or("Authentication required"))
        }
        StatusCode::NOT_FOUND => ConsoleError::not_found(or("Resource not found")),
        StatusCode::CONFLICT => ConsoleError::conflict(or("Resource is in use")),
        _ => ConsoleError::server_rejection(or(&format!("Request failed with status {status}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_map_status_error() {
        let body = json!({"success": false, "error": "Email already exists"});
        assert_eq!(
            map_status_error(StatusCode::BAD_REQUEST, &body),
            ConsoleError::validation("Email already exists")
        );
        assert_eq!(
            map_status_error(StatusCode::UNAUTHORIZED, &Value::Null),
            ConsoleError::auth_required("Authentication required")
        );
        assert_eq!(
            map_status_error(StatusCode::NOT_FOUND, &json!({"message": "Course not found"})),
            ConsoleError::not_found("Course not found")
        );
        assert_eq!(
            map_status_error(
                StatusCode::CONFLICT,
                &json!({"error": "Cannot delete course with enrollments"})
            ),
            ConsoleError::conflict("Cannot delete course with enrollments")
        );
        assert!(matches!(
            map_status_error(StatusCode::INTERNAL_SERVER_ERROR, &Value::Null),
            ConsoleError::ServerRejection(_)
        ));
    }

    #[test]
    fn test_decode_data() {
        let value = json!({"success": true, "data": {"n": 1}});
        let data: Value = decode_data(value).unwrap();
        assert_eq!(data, json!({"n": 1}));

        let value = json!({"success": false, "error": "Course is full"});
        assert_eq!(
            decode_data::<Value>(value).unwrap_err(),
            ConsoleError::server_rejection("Course is full")
        );

        assert!(matches!(
            decode_data::<Value>(json!({"success": true})),
            Err(ConsoleError::Serialization(_))
        ));
    }

    #[test]
    fn test_decode_optional_data() {
        let accepted = json!({"success": true, "message": "Student created successfully"});
        assert_eq!(decode_optional_data::<Value>(accepted).unwrap(), None);
        assert_eq!(decode_optional_data::<Value>(Value::Null).unwrap(), None);
        assert_eq!(
            decode_optional_data::<Value>(json!({"data": {"n": 1}})).unwrap(),
            Some(json!({"n": 1}))
        );
        assert_eq!(
            decode_optional_data::<Value>(json!({"success": false, "error": "Duplicate email"}))
                .unwrap_err(),
            ConsoleError::server_rejection("Duplicate email")
        );
    }

    #[tokio::test]
    async fn test_bearer_token_attached_when_signed_in() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/instructors/my-courses")
            .match_header("authorization", "Bearer t1")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"success":true,"data":[]}"#)
            .expect(1)
            .create_async()
            .await;

        let state = Arc::new(SessionState::new(Some(crate::models::auth::Session {
            token: "t1".to_string(),
            principal: None,
        })));
        let api = ApiClient::new(server.url(), state).unwrap();
        let data: Vec<Value> = api.get("/instructors/my-courses").await.unwrap();
        assert!(data.is_empty());
    }

    #[tokio::test]
    async fn test_network_error() {
        let api = ApiClient::new("http://127.0.0.1:1", Arc::new(SessionState::default())).unwrap();
        let err = api.get::<Value>("/students").await.unwrap_err();
        assert!(matches!(err, ConsoleError::Network(_)));
    }
}
