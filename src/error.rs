use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::access::Feature;
use crate::providers::FanId;
use crate::utils::{error_codes, error_to_api_response};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Please fill in both username and password")]
    MissingCredentials,

    /// Covers both an unknown username and a wrong password.
    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Your subscription has expired")]
    SubscriptionExpired,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("Your subscription has expired, please sign in again")]
    Expired,

    #[error("Not signed in")]
    NotAuthenticated,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("Fan {0} is not in the current list")]
    NotInFilteredSet(FanId),

    #[error("Variant {index} does not exist, {len} variants were generated")]
    InvalidVariantIndex { index: i64, len: usize },

    #[error("Account {0} is not available to you")]
    AccountNotOwned(String),

    #[error("Nothing has been generated yet")]
    NoGeneratedContent,

    #[error("Select at least one variant first")]
    EmptyVariantSelection,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataError {
    #[error("Data provider unavailable: {0}")]
    ProviderUnavailable(String),

    #[error("No data to display")]
    EmptyDataset,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Selection(#[from] SelectionError),

    #[error(transparent)]
    Data(#[from] DataError),

    #[error("{0}")]
    Validation(String),

    #[error("\"{}\" is not available on your plan. Upgrade to Basic or Premium to unlock it.", .0.label())]
    FeatureLocked(Feature),

    #[error("Too many requests, retry in {0} seconds")]
    RateLimited(u64),

    #[error("Internal server error")]
    Internal(String),
}

impl AppError {
    pub fn code(&self) -> i32 {
        match self {
            AppError::Auth(AuthError::MissingCredentials) => error_codes::VALIDATION_ERROR,
            AppError::Auth(AuthError::InvalidCredentials) => error_codes::AUTH_FAILED,
            AppError::Auth(AuthError::SubscriptionExpired) => error_codes::SUBSCRIPTION_EXPIRED,
            AppError::Session(SessionError::Expired) => error_codes::SESSION_EXPIRED,
            AppError::Session(SessionError::NotAuthenticated) => error_codes::UNAUTHORIZED,
            AppError::Selection(_) => error_codes::SELECTION_ERROR,
            AppError::Data(DataError::EmptyDataset) => error_codes::NOT_FOUND,
            AppError::Data(DataError::ProviderUnavailable(_)) => error_codes::PROVIDER_UNAVAILABLE,
            AppError::Validation(_) => error_codes::VALIDATION_ERROR,
            AppError::FeatureLocked(_) => error_codes::PERMISSION_DENIED,
            AppError::RateLimited(_) => error_codes::RATE_LIMIT,
            AppError::Internal(_) => error_codes::INTERNAL_ERROR,
        }
    }

    /// Business errors travel inline with a 200 and a non-zero code.
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Session(_) => StatusCode::UNAUTHORIZED,
            AppError::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
            AppError::Data(DataError::ProviderUnavailable(_)) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::OK,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let AppError::Internal(detail) = &self {
            tracing::error!("Internal error: {}", detail);
        }

        (
            self.status(),
            error_to_api_response::<()>(self.code(), self.to_string()),
        )
            .into_response()
    }
}
