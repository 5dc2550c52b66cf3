use axum::http::StatusCode;
use axum::Extension;
use chrono::DateTime;
use chrono::Utc;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::identity::models::Principal;

/// Echo the caller identified by the bearer access token.
pub async fn session(
    Extension(principal): Extension<Principal>,
) -> Result<ApiSuccess<SessionResponseData>, ApiError> {
    Ok(ApiSuccess::new(
        StatusCode::OK,
        SessionResponseData {
            user_id: principal.user_id.0,
            expires_at: principal.expires_at,
        },
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionResponseData {
    pub user_id: i64,
    pub expires_at: DateTime<Utc>,
}
