use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::{
    AppState,
    middleware::{RateLimiter, auth_middleware, log_errors, rate_limit},
    routes,
};

// 公开路由
fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(routes::health))
        .route("/auth/login", post(routes::auth::login))
}

// 控制台路由，需要有效会话
fn console_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/auth/logout", post(routes::auth::logout))
        .route("/dashboard", get(routes::dashboard::get_dashboard))
        .route("/accounts/select", post(routes::dashboard::select_account))
        .route("/navigate", post(routes::dashboard::navigate))
        .route("/page", get(routes::dashboard::current_page))
        // 聊天
        .route("/chats", get(routes::chats::get_chats))
        .route("/chats/filter", post(routes::chats::apply_filter))
        .route("/chats/select", post(routes::chats::select_fan))
        .route("/chats/suggest", post(routes::chats::suggest))
        .route("/chats/send", post(routes::chats::send_message))
        .route("/chats/draft/clear", post(routes::chats::clear_draft))
        // 内容
        .route("/content", get(routes::content::get_content))
        .route("/content/generate", post(routes::content::generate))
        .route("/content/regenerate", post(routes::content::regenerate))
        .route(
            "/content/variants/{index}/toggle",
            post(routes::content::toggle_variant),
        )
        .route("/content/clear", post(routes::content::clear))
        .route("/content/selection/save", post(routes::content::save_selection))
        .route("/content/selection/send", post(routes::content::send_selection))
        .route("/content/quote", post(routes::content::quote))
        // 分析
        .route("/analytics", get(routes::analytics::get_analytics))
        .route("/analytics/goals", put(routes::analytics::set_goals))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
}

// 创建主路由
pub fn create_router(state: AppState) -> Router {
    let rate_limiter = Arc::new(RateLimiter::new(state.config.clone()));

    let api = Router::new()
        .merge(public_routes())
        .merge(console_routes(&state));

    let base = state.config.api_base_uri.trim_end_matches('/');
    let router = if base.is_empty() {
        api
    } else {
        Router::new().nest(base, api)
    };

    let router = router.layer(axum::middleware::from_fn(log_errors)).layer(
        axum::middleware::from_fn_with_state(rate_limiter, rate_limit),
    );

    #[cfg(debug_assertions)]
    let router = {
        tracing::debug!("Adding CORS layer for development mode");
        router.layer(tower_http::cors::CorsLayer::permissive())
    };

    router.with_state(state)
}
