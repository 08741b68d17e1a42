//! Journey post endpoints.

use axum::{extract::State, routing::post, Json, Router};
use pulse_common::AppResult;
use pulse_core::{CreateJourneyPostInput, RateLimitAction, UpdateJourneyPostInput};
use pulse_db::entities::journey_post;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use tracing::warn;

use crate::{
    extractors::{AuthAdmin, ClientIp, MaybeAuthUser},
    middleware::AppState,
    response::ApiResponse,
};

/// Journey post representation on the wire.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JourneyPostView {
    pub id: String,
    pub author_id: String,
    pub title: String,
    pub slug: String,
    pub body: String,
    pub tags: JsonValue,
    pub is_published: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_at: Option<String>,
    pub created_at: String,
}

impl From<journey_post::Model> for JourneyPostView {
    fn from(model: journey_post::Model) -> Self {
        Self {
            id: model.id,
            author_id: model.author_id,
            title: model.title,
            slug: model.slug,
            body: model.body,
            tags: model.tags,
            is_published: model.is_published,
            published_at: model.published_at.map(|t| t.to_rfc3339()),
            created_at: model.created_at.to_rfc3339(),
        }
    }
}

/// List published posts.
async fn list(State(state): State<AppState>) -> AppResult<ApiResponse<Vec<JourneyPostView>>> {
    let posts = state.journey_service.list_published().await?;
    Ok(ApiResponse::ok(
        posts.into_iter().map(JourneyPostView::from).collect(),
    ))
}

/// Show request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShowPostRequest {
    pub slug: String,
}

/// Fetch a post by slug. Admins also see drafts.
async fn show(
    MaybeAuthUser(maybe_user): MaybeAuthUser,
    State(state): State<AppState>,
    Json(req): Json<ShowPostRequest>,
) -> AppResult<ApiResponse<JourneyPostView>> {
    let include_drafts = maybe_user.is_some_and(|u| u.is_admin);
    let post = state
        .journey_service
        .get_by_slug(&req.slug, include_drafts)
        .await?;
    Ok(ApiResponse::ok(post.into()))
}

/// Create request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
    pub title: String,
    pub slug: String,
    pub body: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Create a draft post (admin).
async fn create(
    AuthAdmin(admin): AuthAdmin,
    ClientIp(ip): ClientIp,
    State(state): State<AppState>,
    Json(req): Json<CreatePostRequest>,
) -> AppResult<ApiResponse<JourneyPostView>> {
    state
        .rate_limit_service
        .enforce(&ip, RateLimitAction::SubmitContent)
        .await?;

    let post = state
        .journey_service
        .create(CreateJourneyPostInput {
            author_id: admin.id,
            title: req.title,
            slug: req.slug,
            body: req.body,
            tags: req.tags,
        })
        .await?;

    if let Err(e) = state
        .rate_limit_service
        .increment(&ip, RateLimitAction::SubmitContent)
        .await
    {
        warn!(error = %e, "Failed to count content mutation");
    }

    Ok(ApiResponse::ok(post.into()))
}

/// Update request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePostRequest {
    pub post_id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

/// Update a post (admin).
async fn update(
    AuthAdmin(_admin): AuthAdmin,
    State(state): State<AppState>,
    Json(req): Json<UpdatePostRequest>,
) -> AppResult<ApiResponse<JourneyPostView>> {
    let post = state
        .journey_service
        .update(
            &req.post_id,
            UpdateJourneyPostInput {
                title: req.title,
                body: req.body,
                tags: req.tags,
            },
        )
        .await?;
    Ok(ApiResponse::ok(post.into()))
}

/// Publish request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishPostRequest {
    pub post_id: String,
}

/// Publish a draft (admin).
async fn publish(
    AuthAdmin(_admin): AuthAdmin,
    State(state): State<AppState>,
    Json(req): Json<PublishPostRequest>,
) -> AppResult<ApiResponse<JourneyPostView>> {
    let post = state.journey_service.publish(&req.post_id).await?;
    Ok(ApiResponse::ok(post.into()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/list", post(list))
        .route("/show", post(show))
        .route("/create", post(create))
        .route("/update", post(update))
        .route("/publish", post(publish))
}
