use axum::http::StatusCode;
use serde::Serialize;

use super::ApiSuccess;

/// Tokens carry no server-side state, so logging out only tells the client to drop its token.
pub async fn logout() -> ApiSuccess<MessageData> {
    tracing::debug!("Logout requested");

    ApiSuccess::new(
        StatusCode::OK,
        MessageData {
            message: "logout successful".to_string(),
        },
    )
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageData {
    pub message: String,
}
