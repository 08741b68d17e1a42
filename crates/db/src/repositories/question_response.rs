//! Question response repository.

use std::sync::Arc;

use crate::entities::{question_response, QuestionResponse};
use chrono::{DateTime, Utc};
use pulse_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder,
};

/// Question response repository for database operations.
#[derive(Clone)]
pub struct QuestionResponseRepository {
    db: Arc<DatabaseConnection>,
}

impl QuestionResponseRepository {
    /// Create a new question response repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Persist a response.
    pub async fn create(
        &self,
        model: question_response::ActiveModel,
    ) -> AppResult<question_response::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Check whether a user has answered a question.
    pub async fn has_user_answered(&self, question_id: &str, user_id: &str) -> AppResult<bool> {
        let count = QuestionResponse::find()
            .filter(question_response::Column::QuestionId.eq(question_id))
            .filter(question_response::Column::UserId.eq(user_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(count > 0)
    }

    /// Check whether a voter token has answered a question.
    pub async fn has_voter_answered(
        &self,
        question_id: &str,
        voter_token_id: &str,
    ) -> AppResult<bool> {
        let count = QuestionResponse::find()
            .filter(question_response::Column::QuestionId.eq(question_id))
            .filter(question_response::Column::VoterTokenId.eq(voter_token_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(count > 0)
    }

    /// Responses created within a time range, oldest first.
    pub async fn find_in_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> AppResult<Vec<question_response::Model>> {
        QuestionResponse::find()
            .filter(question_response::Column::CreatedAt.gte(start))
            .filter(question_response::Column::CreatedAt.lt(end))
            .order_by_asc(question_response::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count responses created within a time range.
    pub async fn count_in_range(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> AppResult<u64> {
        QuestionResponse::find()
            .filter(question_response::Column::CreatedAt.gte(start))
            .filter(question_response::Column::CreatedAt.lt(end))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
