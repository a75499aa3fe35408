use axum::{
    Extension,
    extract::{Json, State},
};

use super::model::{ContentView, SelectionAction, SelectionReceipt};
use crate::{
    AppState,
    access::{Feature, require_feature},
    content::{GenerationParams, Quote, QuoteRequest},
    error::AppError,
    middleware::ActiveSession,
    utils::{ApiJson, ApiPath, ApiResponse, success_to_api_response},
};

#[axum::debug_handler]
pub async fn get_content(
    Extension(active): Extension<ActiveSession>,
) -> Result<Json<ApiResponse<ContentView>>, AppError> {
    require_feature(&active.session, Feature::Content)?;
    Ok(success_to_api_response(ContentView::build(&active.session)?))
}

#[axum::debug_handler]
pub async fn generate(
    State(state): State<AppState>,
    Extension(active): Extension<ActiveSession>,
    ApiJson(params): ApiJson<GenerationParams>,
) -> Result<Json<ApiResponse<ContentView>>, AppError> {
    let ActiveSession { id, mut session } = active;
    require_feature(&session, Feature::Content)?;

    session
        .start_generation(params, state.providers.generation.as_ref())
        .await?;
    let view = ContentView::build(&session)?;
    state.sessions.save(id, session).await;

    Ok(success_to_api_response(view))
}

#[axum::debug_handler]
pub async fn regenerate(
    State(state): State<AppState>,
    Extension(active): Extension<ActiveSession>,
) -> Result<Json<ApiResponse<ContentView>>, AppError> {
    let ActiveSession { id, mut session } = active;
    require_feature(&session, Feature::Content)?;

    session
        .regenerate(state.providers.generation.as_ref())
        .await?;
    let view = ContentView::build(&session)?;
    state.sessions.save(id, session).await;

    Ok(success_to_api_response(view))
}

#[axum::debug_handler]
pub async fn toggle_variant(
    State(state): State<AppState>,
    Extension(active): Extension<ActiveSession>,
    ApiPath(index): ApiPath<i64>,
) -> Result<Json<ApiResponse<ContentView>>, AppError> {
    let ActiveSession { id, mut session } = active;
    require_feature(&session, Feature::Content)?;

    let selected = session.toggle_variant(index)?;
    tracing::debug!(index, selected, "Variant toggled");
    let view = ContentView::build(&session)?;
    state.sessions.save(id, session).await;

    Ok(success_to_api_response(view))
}

#[axum::debug_handler]
pub async fn clear(
    State(state): State<AppState>,
    Extension(active): Extension<ActiveSession>,
) -> Result<Json<ApiResponse<ContentView>>, AppError> {
    let ActiveSession { id, mut session } = active;
    require_feature(&session, Feature::Content)?;

    session.clear_generation();
    let view = ContentView::build(&session)?;
    state.sessions.save(id, session).await;

    Ok(success_to_api_response(view))
}

#[axum::debug_handler]
pub async fn save_selection(
    Extension(active): Extension<ActiveSession>,
) -> Result<Json<ApiResponse<SelectionReceipt>>, AppError> {
    selection_receipt(&active, SelectionAction::Saved)
}

#[axum::debug_handler]
pub async fn send_selection(
    Extension(active): Extension<ActiveSession>,
) -> Result<Json<ApiResponse<SelectionReceipt>>, AppError> {
    selection_receipt(&active, SelectionAction::Sent)
}

fn selection_receipt(
    active: &ActiveSession,
    action: SelectionAction,
) -> Result<Json<ApiResponse<SelectionReceipt>>, AppError> {
    require_feature(&active.session, Feature::Content)?;

    let urls = active.session.selected_variants()?;
    let receipt = SelectionReceipt::new(action, urls);
    tracing::info!(count = receipt.count, ?action, "Variant selection handled");

    Ok(success_to_api_response(receipt))
}

#[axum::debug_handler]
pub async fn quote(
    Extension(active): Extension<ActiveSession>,
    ApiJson(req): ApiJson<QuoteRequest>,
) -> Result<Json<ApiResponse<Quote>>, AppError> {
    require_feature(&active.session, Feature::Content)?;
    Ok(success_to_api_response(req.quote()?))
}
