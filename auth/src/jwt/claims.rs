use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

/// Payload carried by access and refresh tokens.
///
/// Only `user_id` and `exp` are structurally required; a payload without a
/// numeric `user_id` fails to decode.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Numeric user identifier
    pub user_id: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Issued at (Unix timestamp)
    #[serde(default)]
    pub iat: i64,

    /// Unique token identifier
    #[serde(default)]
    pub jti: String,
}

impl Claims {
    /// Create claims for a user expiring `lifetime` after `issued_at`.
    ///
    /// Every call gets a fresh `jti`, so two tokens for the same user and
    /// the same second still differ.
    pub fn for_user(user_id: i64, issued_at: DateTime<Utc>, lifetime: Duration) -> Self {
        Self {
            user_id,
            exp: (issued_at + lifetime).timestamp(),
            iat: issued_at.timestamp(),
            jti: Uuid::new_v4().to_string(),
        }
    }

    /// Expiry as a UTC instant.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }

    /// A token is only valid strictly before its expiry second.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        self.exp <= current_timestamp
    }
}
