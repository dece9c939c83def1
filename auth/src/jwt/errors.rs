use thiserror::Error;

/// Error type for token operations.
///
/// `InvalidSignature`, `Expired` and `Invalid` are the validation sub-kinds.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("Signing secret must not be empty")]
    EmptySecret,

    #[error("Failed to sign token: {0}")]
    SigningFailed(String),

    #[error("signature validation failed")]
    InvalidSignature,

    #[error("token is expired")]
    Expired,

    #[error("token is invalid: {0}")]
    Invalid(String),
}
