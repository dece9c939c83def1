use crate::jwt::Claims;
use crate::jwt::TokenCodec;
use crate::jwt::TokenError;
use crate::password::PasswordError;
use crate::password::PasswordHasher;

/// Authentication coordinator combining password verification and token handling.
///
/// Both collaborators are immutable once built, so a single instance is shared
/// across requests behind an `Arc`.
pub struct Authenticator {
    password_hasher: PasswordHasher,
    token_codec: TokenCodec,
}

/// Result of successful authentication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticationResult {
    /// Signed access token
    pub access_token: String,
}

/// Authentication operation errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Password error: {0}")]
    PasswordError(#[from] PasswordError),

    #[error("Token error: {0}")]
    TokenError(#[from] TokenError),
}

impl Authenticator {
    /// Create a new authenticator.
    ///
    /// # Arguments
    /// * `token_secret` - Secret key for token signing, read once at startup
    ///
    /// # Errors
    /// * `EmptySecret` - The secret is empty
    pub fn new(token_secret: &[u8]) -> Result<Self, TokenError> {
        Ok(Self {
            password_hasher: PasswordHasher::new(),
            token_codec: TokenCodec::new(token_secret)?,
        })
    }

    /// Hash a password for storage.
    ///
    /// # Errors
    /// * `HashingFailed` - Hashing operation failed
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Burn one verification's worth of work for an unknown account.
    pub fn reject_unknown_account(&self, password: &str) {
        self.password_hasher.verify_decoy(password);
    }

    /// Verify credentials and issue a token for the user.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `stored_hash` - Stored password hash
    /// * `user_id` - Identifier placed in `id`, `sub` and `iss`
    /// * `username` - Username placed in the token
    ///
    /// # Errors
    /// * `InvalidCredentials` - Password does not match
    /// * `PasswordError` - Password verification failed
    /// * `TokenError` - Token signing failed
    pub fn authenticate(
        &self,
        password: &str,
        stored_hash: &str,
        user_id: impl ToString,
        username: &str,
    ) -> Result<AuthenticationResult, AuthenticationError> {
        if !self.password_hasher.verify(password, stored_hash)? {
            return Err(AuthenticationError::InvalidCredentials);
        }

        let access_token = self.token_codec.issue(user_id, username)?;

        Ok(AuthenticationResult { access_token })
    }

    /// Validate a presented token and return its claims.
    ///
    /// # Errors
    /// * `InvalidSignature`, `Expired`, `Invalid` - Token rejected
    pub fn validate_token(&self, token: &str) -> Result<Claims, TokenError> {
        self.token_codec.validate(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"test_secret_key_at_least_32_bytes!";

    #[test]
    fn test_authenticate_success() {
        let authenticator = Authenticator::new(SECRET).unwrap();

        let hash = authenticator
            .hash_password("pw1")
            .expect("Failed to hash password");

        let result = authenticator
            .authenticate("pw1", &hash, 3_i64, "bob")
            .expect("Authentication failed");
        assert!(!result.access_token.is_empty());

        let claims = authenticator
            .validate_token(&result.access_token)
            .expect("Token validation failed");
        assert_eq!(claims.sub, "3");
        assert_eq!(claims.username, "bob");
    }

    #[test]
    fn test_authenticate_invalid_password() {
        let authenticator = Authenticator::new(SECRET).unwrap();
        let hash = authenticator.hash_password("pw1").unwrap();

        let result = authenticator.authenticate("wrong", &hash, 3_i64, "bob");
        assert!(matches!(
            result,
            Err(AuthenticationError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_authenticate_corrupt_hash() {
        let authenticator = Authenticator::new(SECRET).unwrap();

        let result = authenticator.authenticate("pw1", "not-a-phc-string", 3_i64, "bob");
        assert!(matches!(
            result,
            Err(AuthenticationError::PasswordError(
                PasswordError::VerificationFailed(_)
            ))
        ));
    }

    #[test]
    fn test_empty_secret() {
        assert!(matches!(
            Authenticator::new(b""),
            Err(TokenError::EmptySecret)
        ));
    }

    #[test]
    fn test_validate_invalid_token() {
        let authenticator = Authenticator::new(SECRET).unwrap();

        let result = authenticator.validate_token("invalid.token.here");
        assert!(matches!(result, Err(TokenError::Invalid(_))));
    }
}
