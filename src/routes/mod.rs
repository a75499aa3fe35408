pub mod analytics;
pub mod auth;
pub mod chats;
pub mod content;
pub mod dashboard;

use crate::{
    AppState,
    error::AppError,
    providers::{Fan, or_empty},
    session::Session,
};

pub async fn health() -> &'static str {
    "OK"
}

/// Fans of the session's current account; no account means no fans.
pub(crate) async fn account_fans(state: &AppState, session: &Session) -> Result<Vec<Fan>, AppError> {
    let Some(account) = session.current_account() else {
        return Ok(Vec::new());
    };
    Ok(or_empty(state.providers.fans.list_fans(account).await)?)
}
