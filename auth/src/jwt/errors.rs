use thiserror::Error;

/// Error type for token operations.
///
/// Callers reject on any variant; the variants stay distinct so rejections can
/// be told apart in logs and tests.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("Token signature does not match")]
    SignatureMismatch,

    #[error("Token is expired")]
    Expired,

    #[error("Token is malformed: {0}")]
    Malformed(String),

    #[error("Failed to encode token: {0}")]
    Encoding(String),

    #[error("Signing secret must not be empty")]
    EmptySecret,
}
