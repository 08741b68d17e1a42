//! Analytics endpoints.

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use chrono::Utc;
use pulse_common::AppResult;
use pulse_core::{AnalyticsService, EngagementOverview, TimeRange, VotingSummary};
use serde::Deserialize;

use crate::{extractors::AuthAdmin, middleware::AppState, response::ApiResponse};

/// Time-ranged request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeRequest {
    pub time_range: String,
}

/// Voting summary dashboard payload (admin).
async fn summary(
    AuthAdmin(_admin): AuthAdmin,
    State(state): State<AppState>,
    Json(req): Json<RangeRequest>,
) -> AppResult<ApiResponse<VotingSummary>> {
    let range = TimeRange::parse(&req.time_range)?;
    // Never fails past this point; a store outage yields the fallback
    // payload with `fallback: true`.
    Ok(ApiResponse::ok(state.analytics_service.summary(range).await))
}

/// Engagement overview payload (admin).
async fn engagement(
    AuthAdmin(_admin): AuthAdmin,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<EngagementOverview>> {
    Ok(ApiResponse::ok(
        state.analytics_service.engagement_overview().await,
    ))
}

/// CSV export of the range's responses (admin).
async fn export(
    AuthAdmin(_admin): AuthAdmin,
    State(state): State<AppState>,
    Json(req): Json<RangeRequest>,
) -> AppResult<Response> {
    let range = TimeRange::parse(&req.time_range)?;
    let csv = state.analytics_service.export_csv(range).await?;
    let filename = AnalyticsService::export_filename(range, Utc::now().date_naive());

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        csv,
    )
        .into_response())
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/summary", post(summary))
        .route("/engagement", post(engagement))
        .route("/export", post(export))
}
