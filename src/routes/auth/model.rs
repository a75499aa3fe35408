use serde::{Deserialize, Serialize};

use crate::routes::dashboard::DashboardView;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub expires_at: i64,
    pub dashboard: DashboardView,
}

#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    pub authenticated: bool,
}
