use async_trait::async_trait;

use crate::account::errors::AuthError;
use crate::account::errors::UserStoreError;
use crate::account::models::LoginCommand;
use crate::account::models::LoginOutcome;
use crate::account::models::NewUser;
use crate::account::models::SignupCommand;
use crate::account::models::User;

/// Port for signup and login.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Register a new account.
    ///
    /// # Returns
    /// Persisted user with its store-assigned id
    ///
    /// # Errors
    /// * `BadRequest("user already exists")` - Email is already registered
    /// * `InternalError` - Store, deadline or hashing failure
    async fn signup(&self, command: SignupCommand) -> Result<User, AuthError>;

    /// Verify credentials and issue an access token.
    ///
    /// # Errors
    /// * `BadRequest("user is not exist")` - No account for the email, or the lookup failed
    /// * `BadRequest("password is incorrect")` - Password does not match
    /// * `InternalError` - Stored hash unusable or token signing failed
    async fn login(&self, command: LoginCommand) -> Result<LoginOutcome, AuthError>;
}

/// Persistence operations for accounts, keyed by email.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Retrieve user by email address.
    ///
    /// # Returns
    /// `None` if no account uses the email
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserStoreError>;

    /// Persist a new account.
    ///
    /// # Returns
    /// Created user with id and creation time assigned by the store
    ///
    /// # Errors
    /// * `EmailAlreadyExists` - Email uniqueness constraint violated
    /// * `DatabaseError` - Database operation failed
    async fn create(&self, user: NewUser) -> Result<User, UserStoreError>;
}
