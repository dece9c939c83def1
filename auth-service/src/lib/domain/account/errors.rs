use std::time::Duration;

use auth::PasswordError;
use thiserror::Error;

pub const USER_ALREADY_EXISTS: &str = "user already exists";
pub const USER_NOT_EXIST: &str = "user is not exist";
pub const PASSWORD_INCORRECT: &str = "password is incorrect";

/// Error for UserId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UserIdError {
    #[error("Invalid user id: {0}")]
    InvalidFormat(String),
}

/// Error for Username validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UsernameError {
    #[error("Username must not be empty")]
    Empty,
}

/// Error for EmailAddress validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EmailError {
    #[error("Invalid email format: {0}")]
    InvalidFormat(String),
}

/// Failures of the user store, including the service-side deadline on it
#[derive(Debug, Clone, Error)]
pub enum UserStoreError {
    #[error("Email already exists: {0}")]
    EmailAlreadyExists(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("User store did not answer within {0:?}")]
    Timeout(Duration),
}

/// Outcome taxonomy of every signup and login failure.
///
/// `BadRequest` carries a reason safe to show the client. `InternalError`
/// carries the underlying cause for logs only.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("{0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl AuthError {
    pub fn bad_request(reason: &str) -> Self {
        AuthError::BadRequest(reason.to_string())
    }
}

impl From<UserStoreError> for AuthError {
    fn from(err: UserStoreError) -> Self {
        match err {
            // The store's uniqueness constraint lost a signup race
            UserStoreError::EmailAlreadyExists(_) => AuthError::bad_request(USER_ALREADY_EXISTS),
            UserStoreError::DatabaseError(_) | UserStoreError::Timeout(_) => {
                AuthError::InternalError(err.to_string())
            }
        }
    }
}

impl From<PasswordError> for AuthError {
    fn from(err: PasswordError) -> Self {
        AuthError::InternalError(err.to_string())
    }
}
