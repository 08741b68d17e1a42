//! Questionnaire service.

use chrono::Utc;
use pulse_common::{AppError, AppResult, IdGenerator};
use pulse_db::{
    entities::{question, questionnaire, questionnaire_question},
    repositories::{
        QuestionRepository, QuestionnaireQuestionRepository, QuestionnaireRepository,
    },
};
use sea_orm::Set;

/// Input for creating a questionnaire.
pub struct CreateQuestionnaireInput {
    pub title: String,
    pub description: Option<String>,
    pub slug: String,
    /// Duplicate-vote policy for all contained questions.
    pub allow_repeat_responses: bool,
}

/// Input for attaching a question to a questionnaire.
pub struct AttachQuestionInput {
    pub questionnaire_id: String,
    pub question_id: String,
    pub display_order: i32,
    pub is_required: bool,
}

/// A question with its role inside one questionnaire.
pub struct QuestionnaireEntry {
    pub question: question::Model,
    pub display_order: i32,
    pub is_required: bool,
}

/// A questionnaire with its ordered questions.
pub struct QuestionnaireWithQuestions {
    pub questionnaire: questionnaire::Model,
    pub entries: Vec<QuestionnaireEntry>,
}

/// Questionnaire service for business logic.
#[derive(Clone)]
pub struct QuestionnaireService {
    questionnaire_repo: QuestionnaireRepository,
    link_repo: QuestionnaireQuestionRepository,
    question_repo: QuestionRepository,
    id_gen: IdGenerator,
}

impl QuestionnaireService {
    /// Create a new questionnaire service.
    #[must_use]
    pub const fn new(
        questionnaire_repo: QuestionnaireRepository,
        link_repo: QuestionnaireQuestionRepository,
        question_repo: QuestionRepository,
    ) -> Self {
        Self {
            questionnaire_repo,
            link_repo,
            question_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Create a questionnaire.
    pub async fn create(
        &self,
        input: CreateQuestionnaireInput,
    ) -> AppResult<questionnaire::Model> {
        if input.title.trim().is_empty() {
            return Err(AppError::Validation("title must not be empty".to_string()));
        }
        let slug = input.slug.trim().to_lowercase();
        if slug.is_empty() {
            return Err(AppError::Validation("slug must not be empty".to_string()));
        }
        if self.questionnaire_repo.find_by_slug(&slug).await?.is_some() {
            return Err(AppError::Conflict(format!(
                "questionnaire slug already in use: {slug}"
            )));
        }

        let model = questionnaire::ActiveModel {
            id: Set(self.id_gen.generate()),
            title: Set(input.title),
            description: Set(input.description),
            slug: Set(slug),
            is_active: Set(true),
            allow_repeat_responses: Set(input.allow_repeat_responses),
            created_at: Set(Utc::now().into()),
        };
        self.questionnaire_repo.create(model).await
    }

    /// List active questionnaires.
    pub async fn list_active(&self) -> AppResult<Vec<questionnaire::Model>> {
        self.questionnaire_repo.find_active().await
    }

    /// A questionnaire with its questions in display order.
    pub async fn show(&self, slug: &str) -> AppResult<QuestionnaireWithQuestions> {
        let questionnaire = self
            .questionnaire_repo
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Questionnaire not found: {slug}")))?;

        let links = self
            .link_repo
            .find_by_questionnaire(&questionnaire.id)
            .await?;
        let question_ids: Vec<String> = links.iter().map(|l| l.question_id.clone()).collect();
        let questions = self.question_repo.find_by_ids(&question_ids).await?;

        let mut entries = Vec::with_capacity(links.len());
        for link in links {
            if let Some(question) = questions.iter().find(|q| q.id == link.question_id) {
                entries.push(QuestionnaireEntry {
                    question: question.clone(),
                    display_order: link.display_order,
                    is_required: link.is_required,
                });
            }
        }

        Ok(QuestionnaireWithQuestions {
            questionnaire,
            entries,
        })
    }

    /// Attach a question to a questionnaire.
    pub async fn attach_question(
        &self,
        input: AttachQuestionInput,
    ) -> AppResult<questionnaire_question::Model> {
        self.questionnaire_repo
            .find_by_id(&input.questionnaire_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "Questionnaire not found: {}",
                    input.questionnaire_id
                ))
            })?;
        self.question_repo
            .find_by_id(&input.question_id)
            .await?
            .ok_or_else(|| AppError::QuestionNotFound(input.question_id.clone()))?;

        if self
            .link_repo
            .find_pair(&input.questionnaire_id, &input.question_id)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(
                "question is already part of this questionnaire".to_string(),
            ));
        }

        let model = questionnaire_question::ActiveModel {
            id: Set(self.id_gen.generate()),
            questionnaire_id: Set(input.questionnaire_id),
            question_id: Set(input.question_id),
            display_order: Set(input.display_order),
            is_required: Set(input.is_required),
        };
        self.link_repo.create(model).await
    }

    /// Flip the duplicate-vote policy for a questionnaire.
    pub async fn set_repeat_policy(
        &self,
        id: &str,
        allow_repeat_responses: bool,
    ) -> AppResult<questionnaire::Model> {
        let existing = self
            .questionnaire_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Questionnaire not found: {id}")))?;
        let mut active: questionnaire::ActiveModel = existing.into();
        active.allow_repeat_responses = Set(allow_repeat_responses);
        self.questionnaire_repo.update(active).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn questionnaire_row(id: &str, slug: &str) -> questionnaire::Model {
        questionnaire::Model {
            id: id.to_string(),
            title: "Weekly pulse".to_string(),
            description: None,
            slug: slug.to_string(),
            is_active: true,
            allow_repeat_responses: false,
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_create_duplicate_slug_conflicts() {
        let questionnaire_db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[questionnaire_row("qn1", "weekly")]])
            .into_connection();
        let empty = || MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let service = QuestionnaireService::new(
            QuestionnaireRepository::new(Arc::new(questionnaire_db)),
            QuestionnaireQuestionRepository::new(Arc::new(empty())),
            QuestionRepository::new(Arc::new(empty())),
        );

        let err = service
            .create(CreateQuestionnaireInput {
                title: "Weekly pulse".to_string(),
                description: None,
                slug: "Weekly".to_string(),
                allow_repeat_responses: false,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_show_unknown_slug() {
        let questionnaire_db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<questionnaire::Model>::new()])
            .into_connection();
        let empty = || MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let service = QuestionnaireService::new(
            QuestionnaireRepository::new(Arc::new(questionnaire_db)),
            QuestionnaireQuestionRepository::new(Arc::new(empty())),
            QuestionRepository::new(Arc::new(empty())),
        );

        let err = service.show("missing").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
