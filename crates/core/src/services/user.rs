//! User service.

use chrono::Utc;
use pulse_common::{token_digest, AppError, AppResult, IdGenerator};
use pulse_db::{entities::user, repositories::UserRepository};
use sea_orm::Set;

/// User service for business logic.
#[derive(Clone)]
pub struct UserService {
    user_repo: UserRepository,
    id_gen: IdGenerator,
}

impl UserService {
    /// Create a new user service.
    #[must_use]
    pub const fn new(user_repo: UserRepository) -> Self {
        Self {
            user_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Authenticate a bearer token against stored digests.
    pub async fn authenticate_by_token(&self, raw: &str) -> AppResult<user::Model> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(AppError::Unauthorized);
        }
        self.user_repo
            .find_by_api_token_hash(&token_digest(raw))
            .await?
            .ok_or(AppError::Unauthorized)
    }

    /// Create an admin account and return it with its one-time raw token.
    pub async fn create_admin(
        &self,
        username: &str,
        display_name: Option<String>,
    ) -> AppResult<(user::Model, String)> {
        if username.trim().is_empty() {
            return Err(AppError::Validation("username must not be empty".to_string()));
        }
        if self.user_repo.find_by_username(username).await?.is_some() {
            return Err(AppError::Conflict(format!(
                "username already in use: {username}"
            )));
        }

        let raw_token = self.id_gen.generate_token();
        let model = user::ActiveModel {
            id: Set(self.id_gen.generate()),
            username: Set(username.to_string()),
            display_name: Set(display_name),
            api_token_hash: Set(Some(token_digest(&raw_token))),
            is_admin: Set(true),
            created_at: Set(Utc::now().into()),
        };
        let created = self.user_repo.create(model).await?;
        Ok((created, raw_token))
    }

    /// Fetch a user by ID.
    pub async fn get(&self, id: &str) -> AppResult<user::Model> {
        self.user_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User not found: {id}")))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_authenticate_unknown_token() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<user::Model>::new()])
            .into_connection();
        let service = UserService::new(UserRepository::new(Arc::new(db)));

        let err = service.authenticate_by_token("nope").await.unwrap_err();
        assert!(matches!(err, AppError::Unauthorized));
    }

    #[tokio::test]
    async fn test_authenticate_empty_token_short_circuits() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let service = UserService::new(UserRepository::new(Arc::new(db)));

        let err = service.authenticate_by_token("  ").await.unwrap_err();
        assert!(matches!(err, AppError::Unauthorized));
    }
}
