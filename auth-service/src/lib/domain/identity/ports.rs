use async_trait::async_trait;
use auth::TokenPair;

use crate::domain::identity::errors::AuthError;
use crate::domain::identity::errors::DirectoryError;
use crate::domain::identity::errors::StoreError;
use crate::domain::identity::models::NewUser;
use crate::domain::identity::models::Principal;
use crate::domain::identity::models::User;
use crate::domain::identity::models::UserId;
use crate::domain::identity::models::Username;

/// Port for the authentication flows exposed to the request-handling layer.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Provision a new user identity. No token is issued.
    ///
    /// # Arguments
    /// * `username` - Requested username
    /// * `password` - Plaintext password (hashed before storage)
    ///
    /// # Returns
    /// Identifier assigned by the user directory
    ///
    /// # Errors
    /// * `InvalidUsername` - Username fails validation
    /// * `HashingFailure` - Password could not be hashed
    /// * `DuplicateUsername` - Username is already taken
    /// * `PersistenceFailure` - Directory write failed
    async fn register(&self, username: &str, password: &str) -> Result<UserId, AuthError>;

    /// Verify credentials and issue a fresh token pair.
    ///
    /// The refresh token replaces any previously stored one for the user.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown username or wrong password
    /// * `HashingFailure` - Stored digest is malformed
    /// * `PersistenceFailure` - Directory lookup or refresh token write failed
    async fn login(&self, username: &str, password: &str) -> Result<TokenPair, AuthError>;

    /// Exchange the currently active refresh token for a new access token.
    ///
    /// # Errors
    /// * `InvalidToken` - Token is expired, forged or malformed
    /// * `TokenMismatch` - Token is not the user's active refresh token
    /// * `PersistenceFailure` - Refresh token lookup failed
    async fn refresh_access_token(&self, refresh_token: &str) -> Result<String, AuthError>;

    /// Revoke the user's refresh token. Succeeds when nothing is stored.
    ///
    /// # Errors
    /// * `InvalidToken` - Token is expired, forged or malformed
    /// * `PersistenceFailure` - Refresh token delete failed
    async fn logout(&self, refresh_token: &str) -> Result<(), AuthError>;

    /// Identify the caller from an access token without touching storage.
    ///
    /// # Errors
    /// * `InvalidToken` - Token is expired, forged or malformed
    async fn authenticate(&self, access_token: &str) -> Result<Principal, AuthError>;
}

/// Persistence port for user identities.
#[async_trait]
pub trait UserDirectory: Send + Sync + 'static {
    /// Persist a new user. The directory enforces username uniqueness.
    ///
    /// # Errors
    /// * `DuplicateUsername` - Username is already taken
    /// * `Failure` - Storage operation failed
    async fn create_user(&self, user: NewUser) -> Result<UserId, DirectoryError>;

    /// Find user by exact username.
    ///
    /// # Errors
    /// * `Failure` - Storage operation failed
    async fn find_by_username(&self, username: &Username) -> Result<Option<User>, DirectoryError>;
}

/// Persistence port holding at most one refresh token per user.
#[async_trait]
pub trait RefreshTokenStore: Send + Sync + 'static {
    /// Insert or overwrite the user's refresh token in a single write.
    async fn upsert(&self, user_id: UserId, token: &str) -> Result<(), StoreError>;

    /// Currently stored refresh token, if any.
    async fn get(&self, user_id: UserId) -> Result<Option<String>, StoreError>;

    /// Remove the user's refresh token. Deleting an absent record succeeds.
    async fn delete(&self, user_id: UserId) -> Result<(), StoreError>;
}
