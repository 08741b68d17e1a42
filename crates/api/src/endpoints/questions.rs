//! Question endpoints.

use axum::{extract::State, routing::post, Json, Router};
use pulse_common::AppResult;
use pulse_core::{CreateQuestionInput, RateLimitAction, UpdateQuestionInput};
use pulse_db::entities::question::{self, QuestionType};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use tracing::warn;

use crate::{
    extractors::{AuthAdmin, ClientIp},
    middleware::AppState,
    response::ApiResponse,
};

/// Question representation on the wire.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionView {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub question_type: QuestionType,
    pub question_data: JsonValue,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub display_order: i32,
    pub is_active: bool,
    pub created_at: String,
}

impl From<question::Model> for QuestionView {
    fn from(model: question::Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            description: model.description,
            question_type: model.question_type,
            question_data: model.question_data,
            category: model.category,
            display_order: model.display_order,
            is_active: model.is_active,
            created_at: model.created_at.to_rfc3339(),
        }
    }
}

/// List active questions.
async fn list(State(state): State<AppState>) -> AppResult<ApiResponse<Vec<QuestionView>>> {
    let questions = state.question_service.list_active().await?;
    Ok(ApiResponse::ok(
        questions.into_iter().map(QuestionView::from).collect(),
    ))
}

/// Create question request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateQuestionRequest {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub question_type: QuestionType,
    pub question_data: JsonValue,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub display_order: i32,
}

/// Create a question (admin).
async fn create(
    AuthAdmin(_admin): AuthAdmin,
    ClientIp(ip): ClientIp,
    State(state): State<AppState>,
    Json(req): Json<CreateQuestionRequest>,
) -> AppResult<ApiResponse<QuestionView>> {
    state
        .rate_limit_service
        .enforce(&ip, RateLimitAction::SubmitContent)
        .await?;

    let question = state
        .question_service
        .create(CreateQuestionInput {
            title: req.title,
            description: req.description,
            question_type: req.question_type,
            question_data: req.question_data,
            category: req.category,
            display_order: req.display_order,
        })
        .await?;

    if let Err(e) = state
        .rate_limit_service
        .increment(&ip, RateLimitAction::SubmitContent)
        .await
    {
        warn!(error = %e, "Failed to count content mutation");
    }

    Ok(ApiResponse::ok(question.into()))
}

/// Update question request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateQuestionRequest {
    pub question_id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub question_data: Option<JsonValue>,
    #[serde(default)]
    pub display_order: Option<i32>,
}

/// Update a question (admin).
async fn update(
    AuthAdmin(_admin): AuthAdmin,
    State(state): State<AppState>,
    Json(req): Json<UpdateQuestionRequest>,
) -> AppResult<ApiResponse<QuestionView>> {
    let question = state
        .question_service
        .update(
            &req.question_id,
            UpdateQuestionInput {
                title: req.title,
                description: req.description.map(Some),
                question_data: req.question_data,
                category: None,
                display_order: req.display_order,
            },
        )
        .await?;
    Ok(ApiResponse::ok(question.into()))
}

/// Toggle request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleQuestionRequest {
    pub question_id: String,
    pub is_active: bool,
}

/// Activate or deactivate a question (admin).
async fn toggle(
    AuthAdmin(_admin): AuthAdmin,
    State(state): State<AppState>,
    Json(req): Json<ToggleQuestionRequest>,
) -> AppResult<ApiResponse<QuestionView>> {
    let question = state
        .question_service
        .set_active(&req.question_id, req.is_active)
        .await?;
    Ok(ApiResponse::ok(question.into()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/list", post(list))
        .route("/create", post(create))
        .route("/update", post(update))
        .route("/toggle", post(toggle))
}
