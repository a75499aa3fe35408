use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::headers::{Authorization, HeaderMapExt, authorization::Bearer};
use chrono::Utc;
use uuid::Uuid;

use crate::{AppState, error::AppError, error::SessionError, session::Session, utils::verify_token};

/// The caller's session as of the start of the request.
#[derive(Debug, Clone)]
pub struct ActiveSession {
    pub id: Uuid,
    pub session: Session,
}

pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let bearer = req
        .headers()
        .typed_get::<Authorization<Bearer>>()
        .ok_or(SessionError::NotAuthenticated)?;

    let claims = verify_token(bearer.token(), &state.config).map_err(|e| {
        tracing::debug!("Rejected token: {}", e);
        SessionError::NotAuthenticated
    })?;

    let id = Uuid::parse_str(&claims.sub).map_err(|_| SessionError::NotAuthenticated)?;
    let session = state.sessions.resolve(id, Utc::now()).await?;

    req.extensions_mut().insert(ActiveSession { id, session });
    Ok(next.run(req).await)
}
