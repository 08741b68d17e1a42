//! Voter token repository.

use std::sync::Arc;

use crate::entities::{voter_token, VoterToken};
use chrono::Utc;
use pulse_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
};

/// Voter token repository for database operations.
#[derive(Clone)]
pub struct VoterTokenRepository {
    db: Arc<DatabaseConnection>,
}

impl VoterTokenRepository {
    /// Create a new voter token repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a voter token by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<voter_token::Model>> {
        VoterToken::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a voter token by its digest.
    pub async fn find_by_hash(&self, token_hash: &str) -> AppResult<Option<voter_token::Model>> {
        VoterToken::find()
            .filter(voter_token::Column::TokenHash.eq(token_hash))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new voter token.
    pub async fn create(&self, model: voter_token::ActiveModel) -> AppResult<voter_token::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Stamp a token as seen without counting a vote.
    pub async fn touch(&self, token: voter_token::Model) -> AppResult<voter_token::Model> {
        let mut active: voter_token::ActiveModel = token.into();
        active.last_seen_at = Set(Utc::now().into());
        active
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count an accepted vote against a token.
    pub async fn record_vote(&self, token: voter_token::Model) -> AppResult<voter_token::Model> {
        let next_count = token.vote_count + 1;
        let mut active: voter_token::ActiveModel = token.into();
        active.vote_count = Set(next_count);
        active.last_seen_at = Set(Utc::now().into());
        active
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
