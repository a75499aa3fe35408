use axum::{
    Extension,
    extract::{Json, State},
};

use super::model::{
    ChatsView, FilterRequest, SelectFanRequest, SendMessageRequest, SendReceipt, selected_fan,
};
use crate::{
    AppState,
    access::{Feature, require_feature},
    error::{AppError, DataError},
    middleware::ActiveSession,
    providers::or_empty,
    routes::account_fans,
    utils::{ApiJson, ApiResponse, success_to_api_response},
};

#[axum::debug_handler]
pub async fn get_chats(
    State(state): State<AppState>,
    Extension(active): Extension<ActiveSession>,
) -> Result<Json<ApiResponse<ChatsView>>, AppError> {
    let ActiveSession { id, mut session } = active;
    require_feature(&session, Feature::Chats)?;

    let view = ChatsView::build(&state, &mut session).await?;
    state.sessions.save(id, session).await;

    Ok(success_to_api_response(view))
}

#[axum::debug_handler]
pub async fn apply_filter(
    State(state): State<AppState>,
    Extension(active): Extension<ActiveSession>,
    ApiJson(req): ApiJson<FilterRequest>,
) -> Result<Json<ApiResponse<ChatsView>>, AppError> {
    let ActiveSession { id, mut session } = active;
    require_feature(&session, Feature::Chats)?;

    let fans = account_fans(&state, &session).await?;
    let visible = session.apply_segment_filter(&fans, req.segments.into_iter().collect());
    tracing::debug!(visible = visible.len(), "Segment filter applied");

    let view = ChatsView::build(&state, &mut session).await?;
    state.sessions.save(id, session).await;

    Ok(success_to_api_response(view))
}

#[axum::debug_handler]
pub async fn select_fan(
    State(state): State<AppState>,
    Extension(active): Extension<ActiveSession>,
    ApiJson(req): ApiJson<SelectFanRequest>,
) -> Result<Json<ApiResponse<ChatsView>>, AppError> {
    let ActiveSession { id, mut session } = active;
    require_feature(&session, Feature::Chats)?;

    let fans = account_fans(&state, &session).await?;
    session.select_fan(&fans, req.fan_id)?;

    let view = ChatsView::build(&state, &mut session).await?;
    state.sessions.save(id, session).await;

    Ok(success_to_api_response(view))
}

#[axum::debug_handler]
pub async fn suggest(
    State(state): State<AppState>,
    Extension(active): Extension<ActiveSession>,
) -> Result<Json<ApiResponse<ChatsView>>, AppError> {
    let ActiveSession { id, mut session } = active;
    require_feature(&session, Feature::Chats)?;
    require_feature(&session, Feature::AiSuggestions)?;

    let fans = account_fans(&state, &session).await?;
    session.reconcile_fan_selection(&fans);
    let fan = selected_fan(&session, &fans)
        .ok_or_else(|| AppError::Validation("Select a fan first".into()))?;

    let history = or_empty(state.providers.messaging.get_history(fan.id).await)?;
    let suggestion = state
        .providers
        .suggestions
        .suggest_warmup(&history, &fan.name)
        .await?;
    session.set_suggestion(suggestion);

    let view = ChatsView::build(&state, &mut session).await?;
    state.sessions.save(id, session).await;

    Ok(success_to_api_response(view))
}

#[axum::debug_handler]
pub async fn send_message(
    State(state): State<AppState>,
    Extension(active): Extension<ActiveSession>,
    ApiJson(req): ApiJson<SendMessageRequest>,
) -> Result<Json<ApiResponse<SendReceipt>>, AppError> {
    let ActiveSession { id, mut session } = active;
    require_feature(&session, Feature::Chats)?;

    if req.text.trim().is_empty() {
        return Err(AppError::Validation("Write a message first".into()));
    }

    let fans = account_fans(&state, &session).await?;
    session.reconcile_fan_selection(&fans);
    let fan_id = selected_fan(&session, &fans)
        .map(|fan| fan.id)
        .ok_or_else(|| AppError::Validation("Select a fan first".into()))?;

    tokio::time::timeout(
        state.config.send_timeout(),
        state.providers.messaging.send_message(fan_id, &req.text),
    )
    .await
    .map_err(|_| DataError::ProviderUnavailable("messaging backend timed out".into()))??;

    tracing::info!(fan_id, "Message sent");
    session.clear_draft();

    let view = ChatsView::build(&state, &mut session).await?;
    state.sessions.save(id, session).await;

    Ok(success_to_api_response(SendReceipt {
        fan_id,
        text: req.text,
        view,
    }))
}

#[axum::debug_handler]
pub async fn clear_draft(
    State(state): State<AppState>,
    Extension(active): Extension<ActiveSession>,
) -> Result<Json<ApiResponse<ChatsView>>, AppError> {
    let ActiveSession { id, mut session } = active;
    require_feature(&session, Feature::Chats)?;

    session.clear_draft();
    let view = ChatsView::build(&state, &mut session).await?;
    state.sessions.save(id, session).await;

    Ok(success_to_api_response(view))
}
