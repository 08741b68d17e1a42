//! Journey post repository.

use std::sync::Arc;

use crate::entities::{journey_post, JourneyPost};
use pulse_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};

/// Journey post repository for database operations.
#[derive(Clone)]
pub struct JourneyPostRepository {
    db: Arc<DatabaseConnection>,
}

impl JourneyPostRepository {
    /// Create a new journey post repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a post by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<journey_post::Model>> {
        JourneyPost::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a post by slug.
    pub async fn find_by_slug(&self, slug: &str) -> AppResult<Option<journey_post::Model>> {
        JourneyPost::find()
            .filter(journey_post::Column::Slug.eq(slug))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List published posts, newest first.
    pub async fn find_published(&self) -> AppResult<Vec<journey_post::Model>> {
        JourneyPost::find()
            .filter(journey_post::Column::IsPublished.eq(true))
            .order_by_desc(journey_post::Column::PublishedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new post.
    pub async fn create(&self, model: journey_post::ActiveModel) -> AppResult<journey_post::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a post.
    pub async fn update(&self, model: journey_post::ActiveModel) -> AppResult<journey_post::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
