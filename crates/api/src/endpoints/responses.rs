//! Response submission endpoints.

use axum::{extract::State, routing::post, Json, Router};
use pulse_common::AppResult;
use pulse_core::{Identity, RateLimitAction};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use tracing::warn;

use crate::{
    extractors::{ClientIp, MaybeAuthUser},
    middleware::AppState,
    response::ApiResponse,
};

/// Submit request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRequest {
    pub question_id: String,
    pub response_data: JsonValue,
    /// Previously issued voter token, for anonymous respondents.
    #[serde(default)]
    pub voter_token: Option<String>,
}

/// Engagement counters on the wire.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EngagementView {
    pub total_votes: i32,
    pub total_xp: i32,
    pub current_streak: i32,
    pub longest_streak: i32,
}

/// Submit response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponse {
    pub response_id: String,
    pub question_id: String,
    pub created_at: String,
    /// Present only when a fresh voter token was minted for this request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voter_token: Option<String>,
    pub xp_awarded: i32,
    pub engagement: EngagementView,
}

/// Submit a response to a question.
///
/// An authenticated user wins over a presented voter token; anonymous
/// requests are attached to a voter identity, minting one if needed.
async fn submit(
    MaybeAuthUser(maybe_user): MaybeAuthUser,
    ClientIp(ip): ClientIp,
    State(state): State<AppState>,
    Json(req): Json<SubmitRequest>,
) -> AppResult<ApiResponse<SubmitResponse>> {
    state
        .rate_limit_service
        .enforce(&ip, RateLimitAction::Vote)
        .await?;

    let (identity, issued) = match maybe_user {
        Some(user) => (Identity::User(user.id), None),
        None => {
            let resolved = state
                .voter_service
                .resolve(req.voter_token.as_deref(), &ip)
                .await?;
            (Identity::Voter(resolved.token.id), resolved.issued)
        }
    };

    let outcome = state
        .response_service
        .submit(&req.question_id, identity, &req.response_data, &ip)
        .await?;

    // The response is recorded; a failed counter bump must not undo that.
    if let Err(e) = state
        .rate_limit_service
        .increment(&ip, RateLimitAction::Vote)
        .await
    {
        warn!(error = %e, "Failed to count vote against rate limit");
    }

    Ok(ApiResponse::ok(SubmitResponse {
        response_id: outcome.response.id,
        question_id: outcome.response.question_id,
        created_at: outcome.response.created_at.to_rfc3339(),
        voter_token: issued,
        xp_awarded: outcome.engagement.xp_awarded,
        engagement: EngagementView {
            total_votes: outcome.engagement.stats.total_votes,
            total_xp: outcome.engagement.stats.total_xp,
            current_streak: outcome.engagement.stats.current_streak,
            longest_streak: outcome.engagement.stats.longest_streak,
        },
    }))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/submit", post(submit))
}
