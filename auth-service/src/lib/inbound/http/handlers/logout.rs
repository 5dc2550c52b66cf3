use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use super::refresh::RefreshTokenRequestBody;
use super::ApiError;
use super::ApiSuccess;
use crate::domain::identity::ports::AuthServicePort;
use crate::inbound::http::router::AppState;

pub async fn logout(
    State(state): State<AppState>,
    Json(body): Json<RefreshTokenRequestBody>,
) -> Result<ApiSuccess<LogoutResponseData>, ApiError> {
    state.auth_service.logout(&body.refresh_token).await?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        LogoutResponseData { logged_out: true },
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogoutResponseData {
    pub logged_out: bool,
}
