//! Credential checks and plan-based feature gating.

mod credentials;
mod model;

use chrono::{DateTime, Utc};

pub use credentials::{AuthBackend, CredentialStore};
pub use model::{AccountId, Feature, Page, Plan, UpgradeNotice, UpgradeOption, UserAccount};

use crate::error::{AppError, AuthError};
use crate::session::Session;

/// Validates a login attempt and opens a fresh session on success.
///
/// Unknown usernames and wrong passwords both yield
/// [`AuthError::InvalidCredentials`]. A valid password on a lapsed plan yields
/// [`AuthError::SubscriptionExpired`].
pub fn authenticate(
    backend: &dyn AuthBackend,
    username: &str,
    password: &str,
    now: DateTime<Utc>,
) -> Result<Session, AuthError> {
    if username.is_empty() || password.is_empty() {
        return Err(AuthError::MissingCredentials);
    }

    let user = backend
        .verify_credentials(username, password)
        .ok_or(AuthError::InvalidCredentials)?;

    if user.is_expired_at(now) {
        return Err(AuthError::SubscriptionExpired);
    }

    tracing::info!(username = %user.username, plan = ?user.plan, "Operator signed in");
    Ok(Session::logged_in(user))
}

pub fn check_feature_access(session: &Session, feature: Feature) -> bool {
    session.user().is_ok_and(|user| user.has_feature(feature))
}

pub fn require_feature(session: &Session, feature: Feature) -> Result<(), AppError> {
    if check_feature_access(session, feature) {
        Ok(())
    } else {
        Err(AppError::FeatureLocked(feature))
    }
}
