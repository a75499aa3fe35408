use axum::{
    Extension,
    extract::{Json, State},
};
use chrono::Utc;

use super::model::{DashboardView, NavigateRequest, PageView, SelectAccountRequest};
use crate::{
    AppState,
    access::{Page, UpgradeNotice, check_feature_access},
    error::AppError,
    middleware::ActiveSession,
    routes::{analytics::AnalyticsView, chats::ChatsView, content::ContentView},
    session::NavigationOutcome,
    utils::{ApiJson, ApiResponse, success_to_api_response},
};

#[axum::debug_handler]
pub async fn get_dashboard(
    Extension(active): Extension<ActiveSession>,
) -> Result<Json<ApiResponse<DashboardView>>, AppError> {
    let view = DashboardView::build(&active.session, Utc::now())?;
    Ok(success_to_api_response(view))
}

#[axum::debug_handler]
pub async fn select_account(
    State(state): State<AppState>,
    Extension(active): Extension<ActiveSession>,
    ApiJson(req): ApiJson<SelectAccountRequest>,
) -> Result<Json<ApiResponse<DashboardView>>, AppError> {
    let ActiveSession { id, mut session } = active;

    session.select_account(&req.account)?;
    let view = DashboardView::build(&session, Utc::now())?;
    state.sessions.save(id, session).await;

    Ok(success_to_api_response(view))
}

#[axum::debug_handler]
pub async fn navigate(
    State(state): State<AppState>,
    Extension(active): Extension<ActiveSession>,
    ApiJson(req): ApiJson<NavigateRequest>,
) -> Json<ApiResponse<NavigationOutcome>> {
    let ActiveSession { id, mut session } = active;

    let outcome = session.navigate(req.page);
    if let NavigationOutcome::Navigated { page } = &outcome {
        tracing::info!(?page, "Navigated");
        state.sessions.save(id, session).await;
    }

    success_to_api_response(outcome)
}

#[axum::debug_handler]
pub async fn current_page(
    State(state): State<AppState>,
    Extension(active): Extension<ActiveSession>,
) -> Result<Json<ApiResponse<PageView>>, AppError> {
    let ActiveSession { id, mut session } = active;
    let page = session.current_page();
    let feature = page.required_feature();

    let view = if !check_feature_access(&session, feature) {
        PageView::UpgradeRequired(UpgradeNotice::for_feature(feature))
    } else {
        match page {
            Page::Chats => PageView::Chats(ChatsView::build(&state, &mut session).await?),
            Page::Content => PageView::Content(ContentView::build(&session)?),
            Page::Analytics => PageView::Analytics(AnalyticsView::build(&state, &session).await?),
        }
    };
    state.sessions.save(id, session).await;

    Ok(success_to_api_response(view))
}
