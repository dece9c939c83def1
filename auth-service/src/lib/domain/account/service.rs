use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use auth::AuthenticationError;
use auth::Authenticator;
use tokio::time::Instant;

use crate::account::errors::AuthError;
use crate::account::errors::UserStoreError;
use crate::account::errors::PASSWORD_INCORRECT;
use crate::account::errors::USER_ALREADY_EXISTS;
use crate::account::errors::USER_NOT_EXIST;
use crate::account::models::LoginCommand;
use crate::account::models::LoginOutcome;
use crate::account::models::NewUser;
use crate::account::models::SignupCommand;
use crate::account::models::User;
use crate::account::ports::AuthServicePort;
use crate::account::ports::UserRepository;

/// Deadline on the store interaction of a single signup or login.
pub const STORE_TIMEOUT: Duration = Duration::from_secs(2);

/// Signup and login over a user store.
///
/// Holds no per-request state; one instance serves every request.
pub struct AuthService<UR>
where
    UR: UserRepository,
{
    repository: Arc<UR>,
    authenticator: Arc<Authenticator>,
    store_timeout: Duration,
}

impl<UR> AuthService<UR>
where
    UR: UserRepository,
{
    /// Create a new auth service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - User persistence implementation
    /// * `authenticator` - Password hashing and token issuance, shared with the auth gate
    pub fn new(repository: Arc<UR>, authenticator: Arc<Authenticator>) -> Self {
        Self {
            repository,
            authenticator,
            store_timeout: STORE_TIMEOUT,
        }
    }

    /// Bound every store call made before `deadline`.
    async fn within_deadline<T>(
        &self,
        deadline: Instant,
        operation: impl Future<Output = Result<T, UserStoreError>>,
    ) -> Result<T, UserStoreError> {
        tokio::time::timeout_at(deadline, operation)
            .await
            .map_err(|_| UserStoreError::Timeout(self.store_timeout))?
    }
}

#[async_trait]
impl<UR> AuthServicePort for AuthService<UR>
where
    UR: UserRepository,
{
    async fn signup(&self, command: SignupCommand) -> Result<User, AuthError> {
        let deadline = Instant::now() + self.store_timeout;

        let existing = self
            .within_deadline(deadline, self.repository.find_by_email(command.email.as_str()))
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "User lookup failed during signup");
                AuthError::from(e)
            })?;

        if existing.is_some() {
            tracing::info!(email = %command.email, "Signup rejected, email already registered");
            return Err(AuthError::bad_request(USER_ALREADY_EXISTS));
        }

        let password_hash = self
            .authenticator
            .hash_password(&command.password)
            .map_err(|e| {
                tracing::error!(error = %e, "Password hashing failed during signup");
                AuthError::from(e)
            })?;

        let new_user = NewUser {
            username: command.username,
            email: command.email,
            password_hash,
        };

        let user = self
            .within_deadline(deadline, self.repository.create(new_user))
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "User creation failed during signup");
                AuthError::from(e)
            })?;

        tracing::info!(user_id = %user.id, username = %user.username, "User signed up");

        Ok(user)
    }

    async fn login(&self, command: LoginCommand) -> Result<LoginOutcome, AuthError> {
        let deadline = Instant::now() + self.store_timeout;

        let lookup = self
            .within_deadline(deadline, self.repository.find_by_email(&command.email))
            .await;

        // Both causes answer alike so that the response does not enumerate accounts
        let user = match lookup {
            Ok(Some(user)) => user,
            Ok(None) => {
                tracing::info!(email = %command.email, "Login for unknown email");
                self.authenticator.reject_unknown_account(&command.password);
                return Err(AuthError::bad_request(USER_NOT_EXIST));
            }
            Err(e) => {
                tracing::error!(error = %e, "User lookup failed during login");
                self.authenticator.reject_unknown_account(&command.password);
                return Err(AuthError::bad_request(USER_NOT_EXIST));
            }
        };

        let result = self
            .authenticator
            .authenticate(
                &command.password,
                &user.password_hash,
                user.id,
                user.username.as_str(),
            )
            .map_err(|e| match e {
                AuthenticationError::InvalidCredentials => {
                    tracing::info!(user_id = %user.id, "Login with incorrect password");
                    AuthError::bad_request(PASSWORD_INCORRECT)
                }
                AuthenticationError::PasswordError(err) => {
                    tracing::error!(user_id = %user.id, error = %err, "Stored password hash unusable");
                    AuthError::from(err)
                }
                AuthenticationError::TokenError(err) => {
                    tracing::error!(user_id = %user.id, error = %err, "Token issuance failed");
                    AuthError::InternalError(err.to_string())
                }
            })?;

        tracing::info!(user_id = %user.id, "User logged in");

        Ok(LoginOutcome {
            token: result.access_token,
            user,
        })
    }
}
