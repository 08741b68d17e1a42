//! Questionnaire endpoints.

use axum::{extract::State, routing::post, Json, Router};
use pulse_common::AppResult;
use pulse_core::{AttachQuestionInput, CreateQuestionnaireInput, RateLimitAction};
use pulse_db::entities::questionnaire;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{
    endpoints::questions::QuestionView,
    extractors::{AuthAdmin, ClientIp},
    middleware::AppState,
    response::ApiResponse,
};

/// Questionnaire representation on the wire.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionnaireView {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub slug: String,
    pub is_active: bool,
    pub allow_repeat_responses: bool,
    pub created_at: String,
}

impl From<questionnaire::Model> for QuestionnaireView {
    fn from(model: questionnaire::Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            description: model.description,
            slug: model.slug,
            is_active: model.is_active,
            allow_repeat_responses: model.allow_repeat_responses,
            created_at: model.created_at.to_rfc3339(),
        }
    }
}

/// A question inside a questionnaire, with its per-link role.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionnaireEntryView {
    pub question: QuestionView,
    pub display_order: i32,
    pub is_required: bool,
}

/// Show response: a questionnaire with its ordered questions.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionnaireDetailView {
    #[serde(flatten)]
    pub questionnaire: QuestionnaireView,
    pub questions: Vec<QuestionnaireEntryView>,
}

/// List active questionnaires.
async fn list(State(state): State<AppState>) -> AppResult<ApiResponse<Vec<QuestionnaireView>>> {
    let questionnaires = state.questionnaire_service.list_active().await?;
    Ok(ApiResponse::ok(
        questionnaires
            .into_iter()
            .map(QuestionnaireView::from)
            .collect(),
    ))
}

/// Show request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShowRequest {
    pub slug: String,
}

/// Show a questionnaire with its questions.
async fn show(
    State(state): State<AppState>,
    Json(req): Json<ShowRequest>,
) -> AppResult<ApiResponse<QuestionnaireDetailView>> {
    let detail = state.questionnaire_service.show(&req.slug).await?;
    Ok(ApiResponse::ok(QuestionnaireDetailView {
        questionnaire: detail.questionnaire.into(),
        questions: detail
            .entries
            .into_iter()
            .map(|entry| QuestionnaireEntryView {
                question: entry.question.into(),
                display_order: entry.display_order,
                is_required: entry.is_required,
            })
            .collect(),
    }))
}

/// Create request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateQuestionnaireRequest {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub slug: String,
    #[serde(default)]
    pub allow_repeat_responses: bool,
}

/// Create a questionnaire (admin).
async fn create(
    AuthAdmin(_admin): AuthAdmin,
    ClientIp(ip): ClientIp,
    State(state): State<AppState>,
    Json(req): Json<CreateQuestionnaireRequest>,
) -> AppResult<ApiResponse<QuestionnaireView>> {
    state
        .rate_limit_service
        .enforce(&ip, RateLimitAction::SubmitContent)
        .await?;

    let questionnaire = state
        .questionnaire_service
        .create(CreateQuestionnaireInput {
            title: req.title,
            description: req.description,
            slug: req.slug,
            allow_repeat_responses: req.allow_repeat_responses,
        })
        .await?;

    if let Err(e) = state
        .rate_limit_service
        .increment(&ip, RateLimitAction::SubmitContent)
        .await
    {
        warn!(error = %e, "Failed to count content mutation");
    }

    Ok(ApiResponse::ok(questionnaire.into()))
}

/// Attach request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachQuestionRequest {
    pub questionnaire_id: String,
    pub question_id: String,
    #[serde(default)]
    pub display_order: i32,
    #[serde(default)]
    pub is_required: bool,
}

/// Attach a question to a questionnaire (admin).
async fn attach(
    AuthAdmin(_admin): AuthAdmin,
    State(state): State<AppState>,
    Json(req): Json<AttachQuestionRequest>,
) -> AppResult<ApiResponse<()>> {
    state
        .questionnaire_service
        .attach_question(AttachQuestionInput {
            questionnaire_id: req.questionnaire_id,
            question_id: req.question_id,
            display_order: req.display_order,
            is_required: req.is_required,
        })
        .await?;
    Ok(ApiResponse::ok(()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/list", post(list))
        .route("/show", post(show))
        .route("/create", post(create))
        .route("/attach", post(attach))
}
