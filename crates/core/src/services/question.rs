//! Question service.

use chrono::Utc;
use pulse_common::{AppError, AppResult, IdGenerator};
use pulse_db::{
    entities::question::{self, QuestionType},
    repositories::QuestionRepository,
};
use sea_orm::Set;
use serde_json::Value as JsonValue;

use crate::question_types::QuestionConfig;

/// Input for creating a question.
pub struct CreateQuestionInput {
    pub title: String,
    pub description: Option<String>,
    pub question_type: QuestionType,
    pub question_data: JsonValue,
    pub category: Option<String>,
    pub display_order: i32,
}

/// Input for updating a question. `None` fields are left untouched.
#[derive(Default)]
pub struct UpdateQuestionInput {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub question_data: Option<JsonValue>,
    pub category: Option<Option<String>>,
    pub display_order: Option<i32>,
}

/// Question service for business logic.
#[derive(Clone)]
pub struct QuestionService {
    question_repo: QuestionRepository,
    id_gen: IdGenerator,
}

impl QuestionService {
    /// Create a new question service.
    #[must_use]
    pub const fn new(question_repo: QuestionRepository) -> Self {
        Self {
            question_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Create a question. The configuration is validated against its type
    /// and stored in canonical form.
    pub async fn create(&self, input: CreateQuestionInput) -> AppResult<question::Model> {
        if input.title.trim().is_empty() {
            return Err(AppError::Validation("title must not be empty".to_string()));
        }
        let config = QuestionConfig::from_parts(input.question_type, &input.question_data)?;

        let model = question::ActiveModel {
            id: Set(self.id_gen.generate()),
            title: Set(input.title),
            description: Set(input.description),
            question_type: Set(input.question_type),
            question_data: Set(config.to_json()?),
            category: Set(input.category),
            display_order: Set(input.display_order),
            is_active: Set(true),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
        };
        self.question_repo.create(model).await
    }

    /// Fetch a question by ID, active or not.
    pub async fn get(&self, id: &str) -> AppResult<question::Model> {
        self.question_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::QuestionNotFound(id.to_string()))
    }

    /// List active questions in display order.
    pub async fn list_active(&self) -> AppResult<Vec<question::Model>> {
        self.question_repo.find_active().await
    }

    /// Update a question's content. The question type is immutable; only
    /// the configuration within that type may change.
    pub async fn update(&self, id: &str, input: UpdateQuestionInput) -> AppResult<question::Model> {
        let existing = self.get(id).await?;
        let question_type = existing.question_type;

        let mut active: question::ActiveModel = existing.into();
        if let Some(title) = input.title {
            if title.trim().is_empty() {
                return Err(AppError::Validation("title must not be empty".to_string()));
            }
            active.title = Set(title);
        }
        if let Some(description) = input.description {
            active.description = Set(description);
        }
        if let Some(data) = input.question_data {
            let config = QuestionConfig::from_parts(question_type, &data)?;
            active.question_data = Set(config.to_json()?);
        }
        if let Some(category) = input.category {
            active.category = Set(category);
        }
        if let Some(order) = input.display_order {
            active.display_order = Set(order);
        }
        active.updated_at = Set(Some(Utc::now().into()));

        self.question_repo.update(active).await
    }

    /// Toggle whether a question accepts responses. Questions are never
    /// physically deleted.
    pub async fn set_active(&self, id: &str, is_active: bool) -> AppResult<question::Model> {
        let existing = self.get(id).await?;
        let mut active: question::ActiveModel = existing.into();
        active.is_active = Set(is_active);
        active.updated_at = Set(Some(Utc::now().into()));
        self.question_repo.update(active).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use serde_json::json;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_create_rejects_invalid_config() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let service = QuestionService::new(QuestionRepository::new(Arc::new(db)));

        let err = service
            .create(CreateQuestionInput {
                title: "Scale".to_string(),
                description: None,
                question_type: QuestionType::RatingScale,
                question_data: json!({"min": 5, "max": 1}),
                category: None,
                display_order: 0,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_create_rejects_empty_title() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let service = QuestionService::new(QuestionRepository::new(Arc::new(db)));

        let err = service
            .create(CreateQuestionInput {
                title: "   ".to_string(),
                description: None,
                question_type: QuestionType::Binary,
                question_data: json!({"optionA": "a", "optionB": "b"}),
                category: None,
                display_order: 0,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_get_unknown_question() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<question::Model>::new()])
            .into_connection();
        let service = QuestionService::new(QuestionRepository::new(Arc::new(db)));

        let err = service.get("missing").await.unwrap_err();
        assert!(matches!(err, AppError::QuestionNotFound(_)));
    }
}
