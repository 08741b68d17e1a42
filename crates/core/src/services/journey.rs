//! Journey post service.
//!
//! The blog half of the platform: drafts, publishing, and the public feed.

use chrono::Utc;
use pulse_common::{AppError, AppResult, IdGenerator};
use pulse_db::{entities::journey_post, repositories::JourneyPostRepository};
use sea_orm::Set;
use serde_json::json;

/// Input for creating a journey post draft.
pub struct CreateJourneyPostInput {
    pub author_id: String,
    pub title: String,
    pub slug: String,
    pub body: String,
    pub tags: Vec<String>,
}

/// Input for updating a journey post. `None` fields are left untouched.
#[derive(Default)]
pub struct UpdateJourneyPostInput {
    pub title: Option<String>,
    pub body: Option<String>,
    pub tags: Option<Vec<String>>,
}

/// Journey post service for business logic.
#[derive(Clone)]
pub struct JourneyService {
    post_repo: JourneyPostRepository,
    id_gen: IdGenerator,
}

impl JourneyService {
    /// Create a new journey service.
    #[must_use]
    pub const fn new(post_repo: JourneyPostRepository) -> Self {
        Self {
            post_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Create a draft post.
    pub async fn create(&self, input: CreateJourneyPostInput) -> AppResult<journey_post::Model> {
        if input.title.trim().is_empty() {
            return Err(AppError::Validation("title must not be empty".to_string()));
        }
        let slug = input.slug.trim().to_lowercase();
        if slug.is_empty() {
            return Err(AppError::Validation("slug must not be empty".to_string()));
        }
        if self.post_repo.find_by_slug(&slug).await?.is_some() {
            return Err(AppError::Conflict(format!("post slug already in use: {slug}")));
        }

        let model = journey_post::ActiveModel {
            id: Set(self.id_gen.generate()),
            author_id: Set(input.author_id),
            title: Set(input.title),
            slug: Set(slug),
            body: Set(input.body),
            tags: Set(json!(input.tags)),
            is_published: Set(false),
            published_at: Set(None),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
        };
        self.post_repo.create(model).await
    }

    /// Update a post's content.
    pub async fn update(
        &self,
        id: &str,
        input: UpdateJourneyPostInput,
    ) -> AppResult<journey_post::Model> {
        let existing = self
            .post_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Post not found: {id}")))?;

        let mut active: journey_post::ActiveModel = existing.into();
        if let Some(title) = input.title {
            if title.trim().is_empty() {
                return Err(AppError::Validation("title must not be empty".to_string()));
            }
            active.title = Set(title);
        }
        if let Some(body) = input.body {
            active.body = Set(body);
        }
        if let Some(tags) = input.tags {
            active.tags = Set(json!(tags));
        }
        active.updated_at = Set(Some(Utc::now().into()));
        self.post_repo.update(active).await
    }

    /// Publish a draft. Publishing twice is a no-op on the timestamp.
    pub async fn publish(&self, id: &str) -> AppResult<journey_post::Model> {
        let existing = self
            .post_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Post not found: {id}")))?;

        if existing.is_published {
            return Ok(existing);
        }

        let mut active: journey_post::ActiveModel = existing.into();
        active.is_published = Set(true);
        active.published_at = Set(Some(Utc::now().into()));
        self.post_repo.update(active).await
    }

    /// Published posts, newest first.
    pub async fn list_published(&self) -> AppResult<Vec<journey_post::Model>> {
        self.post_repo.find_published().await
    }

    /// Fetch a post by slug. Drafts are only visible when
    /// `include_drafts` is set (admin callers).
    pub async fn get_by_slug(
        &self,
        slug: &str,
        include_drafts: bool,
    ) -> AppResult<journey_post::Model> {
        let post = self
            .post_repo
            .find_by_slug(slug)
            .await?
            .filter(|p| p.is_published || include_drafts)
            .ok_or_else(|| AppError::NotFound(format!("Post not found: {slug}")))?;
        Ok(post)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn post_row(id: &str, slug: &str, published: bool) -> journey_post::Model {
        journey_post::Model {
            id: id.to_string(),
            author_id: "u1".to_string(),
            title: "Shipping the survey engine".to_string(),
            slug: slug.to_string(),
            body: "We shipped.".to_string(),
            tags: json!(["engineering"]),
            is_published: published,
            published_at: published.then(|| Utc::now().into()),
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_create_duplicate_slug_conflicts() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[post_row("p1", "launch", true)]])
            .into_connection();
        let service = JourneyService::new(JourneyPostRepository::new(Arc::new(db)));

        let err = service
            .create(CreateJourneyPostInput {
                author_id: "u1".to_string(),
                title: "Launch".to_string(),
                slug: "Launch".to_string(),
                body: String::new(),
                tags: vec![],
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_draft_hidden_from_public_lookup() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[post_row("p1", "draft-post", false)]])
            .append_query_results([[post_row("p1", "draft-post", false)]])
            .into_connection();
        let service = JourneyService::new(JourneyPostRepository::new(Arc::new(db)));

        let err = service.get_by_slug("draft-post", false).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        let post = service.get_by_slug("draft-post", true).await.unwrap();
        assert_eq!(post.id, "p1");
    }
}
