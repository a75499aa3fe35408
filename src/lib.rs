use std::sync::Arc;

use access::AuthBackend;
use config::Config;
use providers::Providers;
use session::SessionStore;

pub mod access;
pub mod analytics;
pub mod config;
pub mod content;
pub mod error;
pub mod middleware;
pub mod providers;
pub mod router;
pub mod routes;
pub mod session;
pub mod utils;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub credentials: Arc<dyn AuthBackend>,
    pub sessions: SessionStore,
    pub providers: Providers,
}

impl AppState {
    pub fn new(config: Config, credentials: Arc<dyn AuthBackend>, providers: Providers) -> Self {
        Self {
            config,
            credentials,
            sessions: SessionStore::default(),
            providers,
        }
    }
}
