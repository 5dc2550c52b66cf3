use chrono::Duration;
use chrono::Utc;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;

use super::claims::Claims;
use super::errors::TokenError;

/// Access and refresh token issued together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Signs and verifies bearer tokens with a shared HS256 secret.
///
/// The secret is fixed at construction and never changes for the lifetime
/// of the codec.
#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenCodec {
    /// Create a codec with the default lifetimes (1 hour access, 7 days refresh).
    ///
    /// # Errors
    /// * `EmptySecret` - `secret` is empty
    pub fn new(secret: &[u8]) -> Result<Self, TokenError> {
        Self::with_lifetimes(secret, Duration::hours(1), Duration::days(7))
    }

    /// Create a codec with explicit token lifetimes.
    ///
    /// # Arguments
    /// * `secret` - Shared HMAC secret (at least 32 bytes recommended)
    /// * `access_ttl` - Lifetime of access tokens
    /// * `refresh_ttl` - Lifetime of refresh tokens
    ///
    /// # Errors
    /// * `EmptySecret` - `secret` is empty
    pub fn with_lifetimes(
        secret: &[u8],
        access_ttl: Duration,
        refresh_ttl: Duration,
    ) -> Result<Self, TokenError> {
        if secret.is_empty() {
            return Err(TokenError::EmptySecret);
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            access_ttl,
            refresh_ttl,
        })
    }

    /// Issue an access/refresh token pair for a user.
    ///
    /// # Errors
    /// * `Encoding` - Signing failed
    pub fn issue(&self, user_id: i64) -> Result<TokenPair, TokenError> {
        let now = Utc::now();

        let access_token = self.sign(&Claims::for_user(user_id, now, self.access_ttl))?;
        let refresh_token = self.sign(&Claims::for_user(user_id, now, self.refresh_ttl))?;

        Ok(TokenPair {
            access_token,
            refresh_token,
        })
    }

    /// Decode a token, verify its signature and check it has not expired.
    ///
    /// # Errors
    /// * `SignatureMismatch` - Token was not signed with this codec's secret
    /// * `Expired` - Signature is valid but the expiry has passed
    /// * `Malformed` - Token is not a JWT or its payload lacks a numeric user id
    pub fn parse_and_verify(&self, token: &str) -> Result<Claims, TokenError> {
        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature => TokenError::SignatureMismatch,
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Malformed(e.to_string()),
            })?;

        // jsonwebtoken still accepts exp == now
        if claims.is_expired(Utc::now().timestamp()) {
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }

    fn sign(&self, claims: &Claims) -> Result<String, TokenError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| TokenError::Encoding(e.to_string()))
    }
}
