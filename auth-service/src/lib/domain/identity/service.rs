use std::sync::Arc;

use async_trait::async_trait;
use auth::Claims;
use auth::PasswordHasher;
use auth::TokenCodec;
use auth::TokenError;
use auth::TokenPair;
use chrono::Utc;

use crate::domain::identity::errors::AuthError;
use crate::domain::identity::models::NewUser;
use crate::domain::identity::models::Principal;
use crate::domain::identity::models::UserId;
use crate::domain::identity::models::Username;
use crate::domain::identity::ports::AuthServicePort;
use crate::domain::identity::ports::RefreshTokenStore;
use crate::domain::identity::ports::UserDirectory;

/// Domain service implementing the authentication flows.
///
/// Holds no mutable state of its own: users live in the directory, the
/// active refresh token per user lives in the token store. Each flow performs
/// at most one write, and that write is unconditional.
pub struct AuthService<UD, RS>
where
    UD: UserDirectory,
    RS: RefreshTokenStore,
{
    directory: Arc<UD>,
    token_store: Arc<RS>,
    password_hasher: PasswordHasher,
    token_codec: TokenCodec,
}

impl<UD, RS> AuthService<UD, RS>
where
    UD: UserDirectory,
    RS: RefreshTokenStore,
{
    /// Create a new auth service with injected dependencies.
    ///
    /// # Arguments
    /// * `directory` - User persistence implementation
    /// * `token_store` - Refresh token persistence implementation
    /// * `password_hasher` - Hasher configured with the deployment's cost
    /// * `token_codec` - Codec holding the signing secret
    pub fn new(
        directory: Arc<UD>,
        token_store: Arc<RS>,
        password_hasher: PasswordHasher,
        token_codec: TokenCodec,
    ) -> Self {
        Self {
            directory,
            token_store,
            password_hasher,
            token_codec,
        }
    }

    fn verify_token(&self, token: &str) -> Result<Claims, AuthError> {
        self.token_codec.parse_and_verify(token).map_err(|e| {
            tracing::warn!(reason = %e, "Token rejected");
            AuthError::InvalidToken(e)
        })
    }

    /// Argon2 work runs on the blocking pool.
    async fn hash_password(&self, password: &str) -> Result<String, AuthError> {
        let hasher = self.password_hasher.clone();
        let password = password.to_string();

        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Password hashing task failed");
                AuthError::HashingFailure(e.to_string())
            })?
            .map_err(|e| {
                tracing::error!(error = %e, "Password hashing failed");
                AuthError::HashingFailure(e.to_string())
            })
    }

    async fn verify_password(
        &self,
        user_id: UserId,
        password: &str,
        digest: &str,
    ) -> Result<bool, AuthError> {
        let hasher = self.password_hasher.clone();
        let password = password.to_string();
        let digest = digest.to_string();

        tokio::task::spawn_blocking(move || hasher.verify(&password, &digest))
            .await
            .map_err(|e| {
                tracing::error!(
                    user_id = %user_id,
                    error = %e,
                    "Password verification task failed"
                );
                AuthError::HashingFailure(e.to_string())
            })?
            .map_err(|e| {
                tracing::error!(user_id = %user_id, error = %e, "Stored password digest unusable");
                AuthError::HashingFailure(e.to_string())
            })
    }

    fn issue_tokens(&self, user_id: UserId) -> Result<TokenPair, AuthError> {
        self.token_codec.issue(user_id.0).map_err(|e| {
            tracing::error!(user_id = %user_id, error = %e, "Token issuance failed");
            AuthError::TokenIssuance(e.to_string())
        })
    }
}

#[async_trait]
impl<UD, RS> AuthServicePort for AuthService<UD, RS>
where
    UD: UserDirectory,
    RS: RefreshTokenStore,
{
    async fn register(&self, username: &str, password: &str) -> Result<UserId, AuthError> {
        let username = Username::new(username.to_string())?;

        let password_hash = self.hash_password(password).await?;

        let user = NewUser {
            username: username.clone(),
            password_hash,
            created_at: Utc::now(),
        };

        let user_id = self.directory.create_user(user).await.map_err(|e| {
            tracing::warn!(username = %username, error = %e, "Registration rejected");
            AuthError::from(e)
        })?;

        tracing::info!(user_id = %user_id, username = %username, "User registered");
        Ok(user_id)
    }

    async fn login(&self, username: &str, password: &str) -> Result<TokenPair, AuthError> {
        // A username that cannot exist is reported like any unknown user
        let Ok(username) = Username::new(username.to_string()) else {
            tracing::warn!("Login rejected: malformed username");
            return Err(AuthError::InvalidCredentials);
        };

        let user = self
            .directory
            .find_by_username(&username)
            .await?
            .ok_or_else(|| {
                tracing::warn!(username = %username, "Login rejected: unknown username");
                AuthError::InvalidCredentials
            })?;

        let is_valid = self
            .verify_password(user.id, password, &user.password_hash)
            .await?;

        if !is_valid {
            tracing::warn!(user_id = %user.id, "Login rejected: wrong password");
            return Err(AuthError::InvalidCredentials);
        }

        let tokens = self.issue_tokens(user.id)?;

        // The pair is only handed out once its refresh token is tracked
        self.token_store
            .upsert(user.id, &tokens.refresh_token)
            .await
            .map_err(|e| {
                tracing::error!(user_id = %user.id, error = %e, "Failed to store refresh token");
                AuthError::from(e)
            })?;

        tracing::info!(user_id = %user.id, "User logged in");
        Ok(tokens)
    }

    async fn refresh_access_token(&self, refresh_token: &str) -> Result<String, AuthError> {
        let claims = self.verify_token(refresh_token)?;
        let user_id = UserId(claims.user_id);

        let stored = self.token_store.get(user_id).await.map_err(|e| {
            tracing::error!(user_id = %user_id, error = %e, "Failed to load refresh token");
            AuthError::from(e)
        })?;

        if stored.as_deref() != Some(refresh_token) {
            tracing::warn!(
                user_id = %user_id,
                stored = stored.is_some(),
                "Refresh rejected: token is not the active one"
            );
            return Err(AuthError::TokenMismatch);
        }

        // Only the access token is handed out; the stored refresh token stays active
        let tokens = self.issue_tokens(user_id)?;

        tracing::info!(user_id = %user_id, "Access token refreshed");
        Ok(tokens.access_token)
    }

    async fn logout(&self, refresh_token: &str) -> Result<(), AuthError> {
        let claims = self.verify_token(refresh_token)?;
        let user_id = UserId(claims.user_id);

        self.token_store.delete(user_id).await.map_err(|e| {
            tracing::error!(user_id = %user_id, error = %e, "Failed to delete refresh token");
            AuthError::from(e)
        })?;

        tracing::info!(user_id = %user_id, "User logged out");
        Ok(())
    }

    async fn authenticate(&self, access_token: &str) -> Result<Principal, AuthError> {
        let claims = self.verify_token(access_token)?;

        let expires_at = claims.expires_at().ok_or_else(|| {
            AuthError::InvalidToken(TokenError::Malformed("expiry out of range".to_string()))
        })?;

        Ok(Principal {
            user_id: UserId(claims.user_id),
            expires_at,
        })
    }
}
