use auth::TokenError;
use thiserror::Error;

/// Error for Username validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UsernameError {
    #[error("Username too short: minimum {min} characters, got {actual}")]
    TooShort { min: usize, actual: usize },

    #[error("Username too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },

    #[error(
        "Username contains invalid characters (only alphanumeric, underscore, and hyphen allowed)"
    )]
    InvalidCharacters,
}

/// Error returned by a user directory implementation
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DirectoryError {
    #[error("Username already exists: {0}")]
    DuplicateUsername(String),

    #[error("User directory failure: {0}")]
    Failure(String),
}

/// Error returned by a refresh token store implementation
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Refresh token store failure: {0}")]
    Failure(String),
}

/// Top-level error for the register, login, refresh and logout flows
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    /// Unknown username or wrong password; deliberately indistinguishable
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid username: {0}")]
    InvalidUsername(#[from] UsernameError),

    #[error("Username already exists: {0}")]
    DuplicateUsername(String),

    #[error("Password hashing failed: {0}")]
    HashingFailure(String),

    #[error("Invalid token: {0}")]
    InvalidToken(TokenError),

    /// Token verifies but is not the user's currently active refresh token
    #[error("Refresh token mismatch")]
    TokenMismatch,

    #[error("Persistence failure: {0}")]
    PersistenceFailure(String),

    #[error("Token issuance failed: {0}")]
    TokenIssuance(String),
}

impl From<DirectoryError> for AuthError {
    fn from(err: DirectoryError) -> Self {
        match err {
            DirectoryError::DuplicateUsername(username) => AuthError::DuplicateUsername(username),
            DirectoryError::Failure(msg) => AuthError::PersistenceFailure(msg),
        }
    }
}

impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Failure(msg) => AuthError::PersistenceFailure(msg),
        }
    }
}
