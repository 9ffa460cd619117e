use serde::Deserialize;
use serde_json::Value;

// 统一的API响应结构：{ success, data, error, message }
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse<T> {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default = "Option::default")]
    pub data: Option<T>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    /// 服务端明确返回 success: false
    pub fn is_failure(&self) -> bool {
        self.success == Some(false)
    }

    /// 服务端给出的说明，优先 error，其次 message
    pub fn reason(&self) -> Option<&str> {
        self.error
            .as_deref()
            .or(self.message.as_deref())
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// 从任意响应体中提取服务端错误信息
pub fn server_message(body: &Value) -> Option<String> {
    ["error", "message"]
        .iter()
        .filter_map(|key| body.get(*key))
        .find_map(|value| match value {
            Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            // 字段级错误数组：[{ msg: "..." }] 或 ["..."]
            Value::Array(items) => {
                let messages: Vec<String> = items
                    .iter()
                    .filter_map(|item| match item {
                        Value::String(s) => Some(s.clone()),
                        Value::Object(obj) => obj
                            .get("msg")
                            .or_else(|| obj.get("message"))
                            .and_then(Value::as_str)
                            .map(str::to_string),
                        _ => None,
                    })
                    .collect();
                (!messages.is_empty()).then(|| messages.join("; "))
            }
            _ => None,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_server_message_prefers_error() {
        let body = json!({"success": false, "error": "Email already exists", "message": "Bad"});
        assert_eq!(server_message(&body).as_deref(), Some("Email already exists"));
    }

    #[test]
    fn test_server_message_field_errors() {
        let body = json!({"error": [{"msg": "Invalid email"}, {"msg": "Name too short"}]});
        assert_eq!(
            server_message(&body).as_deref(),
            Some("Invalid email; Name too short")
        );
        assert_eq!(server_message(&json!({"ok": true})), None);
    }

    #[test]
    fn test_api_response_reason() {
        let response: ApiResponse<Value> =
            serde_json::from_value(json!({"success": false, "message": "Registration closed"}))
                .unwrap();
        assert!(response.is_failure());
        assert_eq!(response.reason(), Some("Registration closed"));
    }
}
