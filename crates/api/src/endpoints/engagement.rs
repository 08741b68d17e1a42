//! Engagement endpoints.

use axum::{extract::State, routing::post, Json, Router};
use pulse_common::{AppError, AppResult};
use pulse_core::Identity;
use serde::{Deserialize, Serialize};

use crate::{extractors::MaybeAuthUser, middleware::AppState, response::ApiResponse};

/// Stats request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsRequest {
    /// Voter token for anonymous respondents; ignored when authenticated.
    #[serde(default)]
    pub voter_token: Option<String>,
}

/// Stats response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub total_votes: i32,
    pub total_xp: i32,
    pub current_streak: i32,
    pub longest_streak: i32,
}

/// Engagement counters for the caller's identity.
async fn stats(
    MaybeAuthUser(maybe_user): MaybeAuthUser,
    State(state): State<AppState>,
    Json(req): Json<StatsRequest>,
) -> AppResult<ApiResponse<StatsResponse>> {
    let identity = match maybe_user {
        Some(user) => Identity::User(user.id),
        None => {
            let raw = req.voter_token.as_deref().ok_or(AppError::Unauthorized)?;
            let token = state.voter_service.require(raw).await?;
            Identity::Voter(token.id)
        }
    };

    let snapshot = state.engagement_service.stats(&identity).await?;
    Ok(ApiResponse::ok(StatsResponse {
        total_votes: snapshot.total_votes,
        total_xp: snapshot.total_xp,
        current_streak: snapshot.current_streak,
        longest_streak: snapshot.longest_streak,
    }))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/stats", post(stats))
}
