//! Engagement stats repository.

use std::sync::Arc;

use crate::entities::{engagement_stats, EngagementStats};
use pulse_common::{AppError, AppResult};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

/// Engagement stats repository for database operations.
#[derive(Clone)]
pub struct EngagementStatsRepository {
    db: Arc<DatabaseConnection>,
}

impl EngagementStatsRepository {
    /// Create a new engagement stats repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find the stats row for a user.
    pub async fn find_by_user(&self, user_id: &str) -> AppResult<Option<engagement_stats::Model>> {
        EngagementStats::find()
            .filter(engagement_stats::Column::UserId.eq(user_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find the stats row for a voter token.
    pub async fn find_by_voter(
        &self,
        voter_token_id: &str,
    ) -> AppResult<Option<engagement_stats::Model>> {
        EngagementStats::find()
            .filter(engagement_stats::Column::VoterTokenId.eq(voter_token_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// All stats rows (analytics overview).
    pub async fn find_all(&self) -> AppResult<Vec<engagement_stats::Model>> {
        EngagementStats::find()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new stats row.
    pub async fn create(
        &self,
        model: engagement_stats::ActiveModel,
    ) -> AppResult<engagement_stats::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update an existing stats row.
    pub async fn update(
        &self,
        model: engagement_stats::ActiveModel,
    ) -> AppResult<engagement_stats::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
