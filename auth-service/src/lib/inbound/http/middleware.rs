use std::sync::Arc;

use auth::Authenticator;
use axum::extract::Request;
use axum::extract::State;
use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;

use super::handlers::ApiError;
use crate::account::models::UserId;

pub const AUTHENTICATION_REQUIRED: &str = "authentication required";

/// Identity established by a valid token, available to protected handlers as an extension
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
    pub username: String,
}

/// Gate in front of protected routes: requires a valid bearer token.
///
/// Only validates identity; no authorization decisions are made here.
pub async fn require_token(
    State(authenticator): State<Arc<Authenticator>>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer_token(req.headers())?;
    let user = identify(&authenticator, token)?;

    req.extensions_mut().insert(user);

    Ok(next.run(req).await)
}

fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, ApiError> {
    let auth_header = headers
        .get(AUTHORIZATION)
        .ok_or_else(|| ApiError::Unauthorized(AUTHENTICATION_REQUIRED.to_string()))?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| ApiError::Unauthorized("Invalid Authorization header".to_string()))?;

    match auth_str.strip_prefix("Bearer ").map(str::trim) {
        Some(token) if !token.is_empty() => Ok(token),
        Some(_) => Err(ApiError::Unauthorized(AUTHENTICATION_REQUIRED.to_string())),
        None => Err(ApiError::Unauthorized(
            "Invalid Authorization header format. Expected: Bearer <token>".to_string(),
        )),
    }
}

fn identify(authenticator: &Authenticator, token: &str) -> Result<AuthenticatedUser, ApiError> {
    let claims = authenticator.validate_token(token).map_err(|e| {
        tracing::warn!(reason = %e, "Token rejected");
        ApiError::Unauthorized(format!("unauthorized: {}", e))
    })?;

    let user_id = UserId::from_string(&claims.sub).map_err(|e| {
        tracing::warn!(error = %e, "Token subject is not a user id");
        ApiError::Unauthorized("unauthorized: token is invalid".to_string())
    })?;

    Ok(AuthenticatedUser {
        user_id,
        username: claims.username,
    })
}
