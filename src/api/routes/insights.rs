//! Insight Routes
//!
//! - POST /api/v1/insights/generate - Run the analysis pipeline
//! - GET  /api/v1/insights - List active insights
//! - POST /api/v1/insights/:id/feedback - Record helpful/not-helpful

use axum::{
    extract::{Path, Query, State},
    Json,
};
use std::sync::Arc;

use crate::api::dto::{
    FeedbackRequest, FeedbackResponse, GenerateInsightsResponse, InsightsResponse, UserQuery,
};
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::store::types::InsightStatus;

/// POST /api/v1/insights/generate?user_id=...
///
/// Run the full analysis pipeline over the user's journal history and
/// persist the synthesized insights. Responds 422 while the user has
/// fewer entries than the analysis minimum.
pub async fn generate_insights(
    State(state): State<Arc<AppState>>,
    Query(query): Query<UserQuery>,
) -> ApiResult<Json<GenerateInsightsResponse>> {
    if query.user_id.trim().is_empty() {
        return Err(ApiError::Validation("user_id is required".to_string()));
    }

    let report = state.engine.generate_insights(&query.user_id).await?;

    Ok(Json(GenerateInsightsResponse {
        insights: report.insights,
        meta: report.meta,
    }))
}

/// GET /api/v1/insights?user_id=...
///
/// List the user's active insights, highest confidence first.
pub async fn list_insights(
    State(state): State<Arc<AppState>>,
    Query(query): Query<UserQuery>,
) -> ApiResult<Json<InsightsResponse>> {
    if query.user_id.trim().is_empty() {
        return Err(ApiError::Validation("user_id is required".to_string()));
    }

    let insights = state.store.active_insights(&query.user_id).await?;
    Ok(Json(InsightsResponse { insights }))
}

/// POST /api/v1/insights/:id/feedback
///
/// Record whether the user found an insight helpful. Unhelpful insights
/// are dismissed and drop out of the active list; helpful feedback is
/// acknowledged and leaves the insight's status untouched (no transition
/// to `confirmed` is wired). Both paths 404 on an unknown id.
pub async fn insight_feedback(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<FeedbackRequest>,
) -> ApiResult<Json<FeedbackResponse>> {
    let insight = state.store.insight_by_id(&id).await?;

    let status = if req.helpful {
        insight.status
    } else {
        state
            .store
            .update_insight_status(&id, InsightStatus::Dismissed)
            .await?;
        tracing::debug!(insight_id = %id, "Insight dismissed on negative feedback");
        InsightStatus::Dismissed
    };

    Ok(Json(FeedbackResponse {
        success: true,
        status,
    }))
}
