use axum::{
    Extension,
    extract::{Json, State},
};
use chrono::{Duration, Utc};

use super::model::{LoginRequest, LoginResponse, LogoutResponse};
use crate::{
    AppState,
    access::authenticate,
    error::AppError,
    middleware::ActiveSession,
    routes::dashboard::DashboardView,
    utils::{ApiJson, ApiResponse, generate_token, success_to_api_response},
};

#[axum::debug_handler]
pub async fn login(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, AppError> {
    let now = Utc::now();
    let session = authenticate(state.credentials.as_ref(), &req.username, &req.password, now)
        .inspect_err(|e| tracing::warn!("Login refused for {:?}: {}", req.username, e))?;

    let dashboard = DashboardView::build(&session, now)?;
    let lifetime = Duration::seconds(state.config.jwt_expiration_secs as i64);
    let id = state.sessions.insert(session, now + lifetime).await;

    let (token, expires_at) = match generate_token(&id.to_string(), &state.config) {
        Ok(issued) => issued,
        Err(e) => {
            state.sessions.remove(id).await;
            return Err(AppError::Internal(format!("Failed to issue token: {e}")));
        }
    };

    Ok(success_to_api_response(LoginResponse {
        token,
        expires_at,
        dashboard,
    }))
}

#[axum::debug_handler]
pub async fn logout(
    State(state): State<AppState>,
    Extension(active): Extension<ActiveSession>,
) -> Json<ApiResponse<LogoutResponse>> {
    state.sessions.remove(active.id).await;
    let username = active
        .session
        .user()
        .map(|u| u.username.clone())
        .unwrap_or_default();
    let session = active.session.logout();

    tracing::info!(username = %username, "Operator signed out");
    success_to_api_response(LogoutResponse {
        authenticated: session.is_authenticated(),
    })
}
