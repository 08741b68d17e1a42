//! Questionnaire repositories.

use std::sync::Arc;

use crate::entities::{
    questionnaire, questionnaire_question, Questionnaire, QuestionnaireQuestion,
};
use pulse_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};

/// Questionnaire repository for database operations.
#[derive(Clone)]
pub struct QuestionnaireRepository {
    db: Arc<DatabaseConnection>,
}

impl QuestionnaireRepository {
    /// Create a new questionnaire repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a questionnaire by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<questionnaire::Model>> {
        Questionnaire::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a questionnaire by slug.
    pub async fn find_by_slug(&self, slug: &str) -> AppResult<Option<questionnaire::Model>> {
        Questionnaire::find()
            .filter(questionnaire::Column::Slug.eq(slug))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List active questionnaires, newest first.
    pub async fn find_active(&self) -> AppResult<Vec<questionnaire::Model>> {
        Questionnaire::find()
            .filter(questionnaire::Column::IsActive.eq(true))
            .order_by_desc(questionnaire::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new questionnaire.
    pub async fn create(
        &self,
        model: questionnaire::ActiveModel,
    ) -> AppResult<questionnaire::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a questionnaire.
    pub async fn update(
        &self,
        model: questionnaire::ActiveModel,
    ) -> AppResult<questionnaire::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

/// Questionnaire-question link repository for database operations.
#[derive(Clone)]
pub struct QuestionnaireQuestionRepository {
    db: Arc<DatabaseConnection>,
}

impl QuestionnaireQuestionRepository {
    /// Create a new link repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Links for a questionnaire, in display order.
    pub async fn find_by_questionnaire(
        &self,
        questionnaire_id: &str,
    ) -> AppResult<Vec<questionnaire_question::Model>> {
        QuestionnaireQuestion::find()
            .filter(questionnaire_question::Column::QuestionnaireId.eq(questionnaire_id))
            .order_by_asc(questionnaire_question::Column::DisplayOrder)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Links that reference a question (reverse lookup for duplicate policy).
    pub async fn find_by_question(
        &self,
        question_id: &str,
    ) -> AppResult<Vec<questionnaire_question::Model>> {
        QuestionnaireQuestion::find()
            .filter(questionnaire_question::Column::QuestionId.eq(question_id))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a specific questionnaire-question pair.
    pub async fn find_pair(
        &self,
        questionnaire_id: &str,
        question_id: &str,
    ) -> AppResult<Option<questionnaire_question::Model>> {
        QuestionnaireQuestion::find()
            .filter(questionnaire_question::Column::QuestionnaireId.eq(questionnaire_id))
            .filter(questionnaire_question::Column::QuestionId.eq(question_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new link.
    pub async fn create(
        &self,
        model: questionnaire_question::ActiveModel,
    ) -> AppResult<questionnaire_question::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
