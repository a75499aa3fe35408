use axum::{
    Extension,
    extract::{Json, State},
};

use super::model::AnalyticsView;
use crate::{
    AppState,
    access::{Feature, require_feature},
    error::AppError,
    middleware::ActiveSession,
    session::GoalTargets,
    utils::{ApiJson, ApiResponse, success_to_api_response},
};

#[axum::debug_handler]
pub async fn get_analytics(
    State(state): State<AppState>,
    Extension(active): Extension<ActiveSession>,
) -> Result<Json<ApiResponse<AnalyticsView>>, AppError> {
    require_feature(&active.session, Feature::Analytics)?;
    let view = AnalyticsView::build(&state, &active.session).await?;
    Ok(success_to_api_response(view))
}

#[axum::debug_handler]
pub async fn set_goals(
    State(state): State<AppState>,
    Extension(active): Extension<ActiveSession>,
    ApiJson(goals): ApiJson<GoalTargets>,
) -> Result<Json<ApiResponse<AnalyticsView>>, AppError> {
    let ActiveSession { id, mut session } = active;
    require_feature(&session, Feature::Analytics)?;

    session.set_goals(goals);
    tracing::debug!(?goals, "Goals updated");
    let view = AnalyticsView::build(&state, &session).await?;
    state.sessions.save(id, session).await;

    Ok(success_to_api_response(view))
}
