use reqwest::Method;

use super::AuthService;
use crate::errors::{ConsoleError, Result};
use crate::models::ApiResponse;
use crate::models::auth::RegisterRequest;

pub async fn handle_register(service: &AuthService, request: &RegisterRequest) -> Result<()> {
    let body = service
        .api()
        .request_json(Method::POST, "/instructors/register", &[], Some(request))
        .await?;

    if let Ok(response) = serde_json::from_value::<ApiResponse<serde_json::Value>>(body)
        && response.is_failure()
    {
        return Err(ConsoleError::server_rejection(
            response.reason().unwrap_or("Registration failed"),
        ));
    }

    tracing::info!("Instructor {} registered", request.email);
    Ok(())
}
