//! Credential and token primitives
//!
//! Provides the two leaf components of the authentication service:
//! - Password hashing (Argon2id, salted PHC digests)
//! - Signed bearer tokens (HS256 JWTs carrying a numeric user id and expiry)
//!
//! Neither component holds mutable state; both can be shared freely across tasks.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash).unwrap());
//! assert!(!hasher.verify("not_my_password", &hash).unwrap());
//! ```
//!
//! ## Tokens
//! ```
//! use auth::TokenCodec;
//!
//! let codec = TokenCodec::new(b"secret_key_at_least_32_bytes_long!").unwrap();
//! let pair = codec.issue(42).unwrap();
//! let claims = codec.parse_and_verify(&pair.refresh_token).unwrap();
//! assert_eq!(claims.user_id, 42);
//! ```

pub mod jwt;
pub mod password;

pub use jwt::Claims;
pub use jwt::TokenCodec;
pub use jwt::TokenError;
pub use jwt::TokenPair;
pub use password::HashCost;
pub use password::PasswordError;
pub use password::PasswordHasher;
