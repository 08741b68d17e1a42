//! API integration tests.
//!
//! These tests drive the router end-to-end over mock database connections.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use axum::{
    body::Body,
    http::{Request, StatusCode},
    middleware, Router,
};
use chrono::Utc;
use pulse_api::{middleware::AppState, router as api_router};
use pulse_common::config::LimitsConfig;
use pulse_common::token_digest;
use pulse_core::{
    AnalyticsService, EngagementService, JourneyService, QuestionService, QuestionnaireService,
    RateLimitService, ResponseService, UserService, VoterService,
};
use pulse_db::entities::question::QuestionType;
use pulse_db::entities::{
    engagement_stats, question, question_response, questionnaire_question, rate_limit, user,
    voter_token,
};
use pulse_db::repositories::{
    EngagementStatsRepository, JourneyPostRepository, QuestionRepository,
    QuestionResponseRepository, QuestionnaireQuestionRepository, QuestionnaireRepository,
    RateLimitRepository, UserRepository, VoterTokenRepository,
};
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, MockExecResult};
use serde_json::{json, Value as JsonValue};
use std::sync::Arc;
use tower::ServiceExt;

/// An empty mock connection for repositories a test never touches.
fn empty_db() -> DatabaseConnection {
    MockDatabase::new(DatabaseBackend::Postgres).into_connection()
}

/// Per-test mock connections, one per repository.
struct StateBuilder {
    user_db: DatabaseConnection,
    question_db: DatabaseConnection,
    response_db: DatabaseConnection,
    voter_db: DatabaseConnection,
    rate_limit_db: DatabaseConnection,
    engagement_db: DatabaseConnection,
    questionnaire_db: DatabaseConnection,
    link_db: DatabaseConnection,
    journey_db: DatabaseConnection,
}

impl Default for StateBuilder {
    fn default() -> Self {
        Self {
            user_db: empty_db(),
            question_db: empty_db(),
            response_db: empty_db(),
            voter_db: empty_db(),
            rate_limit_db: empty_db(),
            engagement_db: empty_db(),
            questionnaire_db: empty_db(),
            link_db: empty_db(),
            journey_db: empty_db(),
        }
    }
}

impl StateBuilder {
    fn build(self) -> AppState {
        let user_repo = UserRepository::new(Arc::new(self.user_db));
        let question_repo = QuestionRepository::new(Arc::new(self.question_db));
        let response_repo = QuestionResponseRepository::new(Arc::new(self.response_db));
        let voter_repo = VoterTokenRepository::new(Arc::new(self.voter_db));
        let rate_limit_repo = RateLimitRepository::new(Arc::new(self.rate_limit_db));
        let engagement_repo = EngagementStatsRepository::new(Arc::new(self.engagement_db));
        let questionnaire_repo = QuestionnaireRepository::new(Arc::new(self.questionnaire_db));
        let link_repo = QuestionnaireQuestionRepository::new(Arc::new(self.link_db));
        let journey_repo = JourneyPostRepository::new(Arc::new(self.journey_db));

        let engagement_service = EngagementService::new(engagement_repo.clone());
        AppState {
            user_service: UserService::new(user_repo),
            question_service: QuestionService::new(question_repo.clone()),
            questionnaire_service: QuestionnaireService::new(
                questionnaire_repo.clone(),
                link_repo.clone(),
                question_repo.clone(),
            ),
            response_service: ResponseService::new(
                question_repo.clone(),
                response_repo.clone(),
                questionnaire_repo,
                link_repo,
                voter_repo.clone(),
                engagement_service.clone(),
            ),
            voter_service: VoterService::new(voter_repo),
            rate_limit_service: RateLimitService::new(rate_limit_repo, LimitsConfig::default()),
            engagement_service,
            analytics_service: AnalyticsService::new(response_repo, question_repo, engagement_repo),
            journey_service: JourneyService::new(journey_repo),
        }
    }

    /// Build the app the way the server does: API router plus auth layer.
    fn into_app(self) -> Router {
        let state = self.build();
        Router::new()
            .nest("/api", api_router())
            .layer(middleware::from_fn_with_state(
                state.clone(),
                pulse_api::middleware::auth_middleware,
            ))
            .with_state(state)
    }
}

fn rating_question(id: &str) -> question::Model {
    question::Model {
        id: id.to_string(),
        title: "Rate the release".to_string(),
        description: None,
        question_type: QuestionType::RatingScale,
        question_data: json!({"min": 1, "max": 5}),
        category: None,
        display_order: 0,
        is_active: true,
        created_at: Utc::now().into(),
        updated_at: None,
    }
}

fn admin_user(token: &str) -> user::Model {
    user::Model {
        id: "u1".to_string(),
        username: "admin".to_string(),
        display_name: None,
        api_token_hash: Some(token_digest(token)),
        is_admin: true,
        created_at: Utc::now().into(),
    }
}

fn post_json(uri: &str, body: JsonValue) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .method("POST")
        .header("Content-Type", "application/json")
        .header("X-Forwarded-For", "203.0.113.7")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> JsonValue {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_list_questions() {
    let app = StateBuilder {
        question_db: MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[rating_question("q1")]])
            .into_connection(),
        ..StateBuilder::default()
    }
    .into_app();

    let response = app
        .oneshot(post_json("/api/questions/list", json!({})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"][0]["id"], "q1");
    assert_eq!(body["data"][0]["questionType"], "rating-scale");
}

#[tokio::test]
async fn test_submit_anonymous_vote_mints_token() {
    let now = Utc::now();
    let minted_voter = voter_token::Model {
        id: "v1".to_string(),
        token_hash: "digest".to_string(),
        ip_address: "203.0.113.7".to_string(),
        vote_count: 0,
        created_at: now.into(),
        last_seen_at: now.into(),
    };
    let stored_response = question_response::Model {
        id: "r1".to_string(),
        question_id: "q1".to_string(),
        user_id: None,
        voter_token_id: Some("v1".to_string()),
        response_data: json!({"rating": 3}),
        ip_address: "203.0.113.7".to_string(),
        created_at: now.into(),
    };
    let stats = engagement_stats::Model {
        id: "s1".to_string(),
        user_id: None,
        voter_token_id: Some("v1".to_string()),
        current_streak: 1,
        longest_streak: 1,
        total_votes: 1,
        total_xp: 5,
        last_activity: now.into(),
    };
    let voter_bumped = voter_token::Model {
        vote_count: 1,
        ..minted_voter.clone()
    };

    let app = StateBuilder {
        question_db: MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[rating_question("q1")]])
            .into_connection(),
        // Rate limiter: no prior window, then one counted request.
        rate_limit_db: MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<rate_limit::Model>::new()])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection(),
        // Voter: mint, then reload and bump for the accepted vote.
        voter_db: MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[minted_voter.clone()]])
            .append_query_results([[minted_voter]])
            .append_query_results([[voter_bumped]])
            .into_connection(),
        response_db: MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[stored_response]])
            .into_connection(),
        link_db: MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<questionnaire_question::Model>::new()])
            .into_connection(),
        engagement_db: MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<engagement_stats::Model>::new()])
            .append_query_results([[stats]])
            .into_connection(),
        ..StateBuilder::default()
    }
    .into_app();

    let response = app
        .oneshot(post_json(
            "/api/responses/submit",
            json!({"questionId": "q1", "responseData": {"rating": 3}}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["responseId"], "r1");
    assert_eq!(body["data"]["xpAwarded"], 5);
    assert_eq!(body["data"]["engagement"]["totalVotes"], 1);
    // A fresh voter token is issued exactly once.
    assert!(body["data"]["voterToken"].is_string());
}

#[tokio::test]
async fn test_submit_rejected_when_rate_limited() {
    let now = Utc::now();
    let exhausted = rate_limit::Model {
        ip_address: "203.0.113.7".to_string(),
        action_type: "vote".to_string(),
        request_count: 30,
        window_start: now.into(),
        expires_at: (now + chrono::Duration::seconds(30)).into(),
    };

    let app = StateBuilder {
        rate_limit_db: MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[exhausted]])
            .into_connection(),
        ..StateBuilder::default()
    }
    .into_app();

    let response = app
        .oneshot(post_json(
            "/api/responses/submit",
            json!({"questionId": "q1", "responseData": {"rating": 3}}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    assert!(response.headers().contains_key("Retry-After"));
}

#[tokio::test]
async fn test_submit_invalid_payload_is_bad_request() {
    let app = StateBuilder {
        question_db: MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[rating_question("q1")]])
            .into_connection(),
        rate_limit_db: MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<rate_limit::Model>::new()])
            .into_connection(),
        voter_db: MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[voter_token::Model {
                id: "v1".to_string(),
                token_hash: "digest".to_string(),
                ip_address: "203.0.113.7".to_string(),
                vote_count: 0,
                created_at: Utc::now().into(),
                last_seen_at: Utc::now().into(),
            }]])
            .into_connection(),
        ..StateBuilder::default()
    }
    .into_app();

    let response = app
        .oneshot(post_json(
            "/api/responses/submit",
            json!({"questionId": "q1", "responseData": {"rating": 99}}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_analytics_summary_requires_auth() {
    let app = StateBuilder::default().into_app();

    let response = app
        .oneshot(post_json("/api/analytics/summary", json!({"timeRange": "7d"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_analytics_summary_serves_fallback_when_store_fails() {
    let token = "admin-token";
    let app = StateBuilder {
        user_db: MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[admin_user(token)]])
            .into_connection(),
        response_db: MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_errors([sea_orm::DbErr::Conn(sea_orm::RuntimeErr::Internal(
                "down".to_string(),
            ))])
            .into_connection(),
        ..StateBuilder::default()
    }
    .into_app();

    let mut request = post_json("/api/analytics/summary", json!({"timeRange": "7d"}));
    request.headers_mut().insert(
        "Authorization",
        format!("Bearer {token}").parse().unwrap(),
    );
    let response = app.oneshot(request).await.unwrap();

    // The aggregator never surfaces a store failure.
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["fallback"], true);
    assert!(body["data"]["chartData"]["labels"].is_array());
}

#[tokio::test]
async fn test_analytics_export_sets_csv_headers() {
    let token = "admin-token";
    let app = StateBuilder {
        user_db: MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[admin_user(token)]])
            .into_connection(),
        response_db: MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<question_response::Model>::new()])
            .into_connection(),
        ..StateBuilder::default()
    }
    .into_app();

    let mut request = post_json("/api/analytics/export", json!({"timeRange": "30d"}));
    request.headers_mut().insert(
        "Authorization",
        format!("Bearer {token}").parse().unwrap(),
    );
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers().get("content-type").unwrap();
    assert!(content_type.to_str().unwrap().starts_with("text/csv"));
    let disposition = response.headers().get("content-disposition").unwrap();
    assert!(disposition
        .to_str()
        .unwrap()
        .contains("voting-data-30d-"));

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(
        String::from_utf8(bytes.to_vec()).unwrap(),
        "No data available for the selected time range"
    );
}

#[tokio::test]
async fn test_question_create_rejects_non_admin() {
    let app = StateBuilder::default().into_app();

    let response = app
        .oneshot(post_json(
            "/api/questions/create",
            json!({
                "title": "Tabs or spaces?",
                "questionType": "binary",
                "questionData": {"optionA": "Tabs", "optionB": "Spaces"},
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_voter_token_issuance() {
    let now = Utc::now();
    let minted = voter_token::Model {
        id: "v1".to_string(),
        token_hash: "digest".to_string(),
        ip_address: "203.0.113.7".to_string(),
        vote_count: 0,
        created_at: now.into(),
        last_seen_at: now.into(),
    };

    let app = StateBuilder {
        rate_limit_db: MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<rate_limit::Model>::new()])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection(),
        voter_db: MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[minted]])
            .into_connection(),
        ..StateBuilder::default()
    }
    .into_app();

    let response = app
        .oneshot(post_json("/api/voter/token", json!({})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert!(body["data"]["voterToken"].is_string());
    assert_eq!(body["data"]["voteCount"], 0);
}
