//! Voter token endpoints.

use axum::{extract::State, routing::post, Json, Router};
use pulse_common::AppResult;
use pulse_core::RateLimitAction;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{extractors::ClientIp, middleware::AppState, response::ApiResponse};

/// Token request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenRequest {
    /// Previously issued token to revalidate, if any.
    #[serde(default)]
    pub voter_token: Option<String>,
}

/// Token response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    /// A freshly minted token, or absent when the presented one is still
    /// valid and should be kept.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voter_token: Option<String>,
    pub vote_count: i32,
}

/// Mint or revalidate a voter token.
async fn token(
    ClientIp(ip): ClientIp,
    State(state): State<AppState>,
    Json(req): Json<TokenRequest>,
) -> AppResult<ApiResponse<TokenResponse>> {
    state
        .rate_limit_service
        .enforce(&ip, RateLimitAction::TokenRequest)
        .await?;

    let resolved = state
        .voter_service
        .resolve(req.voter_token.as_deref(), &ip)
        .await?;

    if let Err(e) = state
        .rate_limit_service
        .increment(&ip, RateLimitAction::TokenRequest)
        .await
    {
        warn!(error = %e, "Failed to count token request");
    }

    Ok(ApiResponse::ok(TokenResponse {
        voter_token: resolved.issued,
        vote_count: resolved.token.vote_count,
    }))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/token", post(token))
}
