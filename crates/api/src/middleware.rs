//! API middleware.

#![allow(missing_docs)]

use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};
use pulse_core::{
    AnalyticsService, EngagementService, JourneyService, QuestionService, QuestionnaireService,
    RateLimitService, ResponseService, UserService, VoterService,
};

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub user_service: UserService,
    pub question_service: QuestionService,
    pub questionnaire_service: QuestionnaireService,
    pub response_service: ResponseService,
    pub voter_service: VoterService,
    pub rate_limit_service: RateLimitService,
    pub engagement_service: EngagementService,
    pub analytics_service: AnalyticsService,
    pub journey_service: JourneyService,
}

/// Authentication middleware.
///
/// Resolves `Authorization: Bearer` tokens into a user extension.
/// Anonymous requests pass through untouched; endpoints decide whether
/// they need an identity.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    if let Some(auth_header) = req.headers().get("Authorization") {
        if let Ok(auth_str) = auth_header.to_str() {
            if let Some(token) = auth_str.strip_prefix("Bearer ") {
                if let Ok(user) = state.user_service.authenticate_by_token(token).await {
                    req.extensions_mut().insert(user);
                }
            }
        }
    }

    next.run(req).await
}
