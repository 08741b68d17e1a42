//! Response recording service.
//!
//! The submission pipeline: resolve the question, validate the payload
//! against its type, apply the duplicate-vote policy, persist, then run
//! best-effort engagement side effects.

use chrono::Utc;
use pulse_common::{AppError, AppResult, IdGenerator};
use pulse_db::{
    entities::question_response,
    repositories::{
        QuestionRepository, QuestionResponseRepository, QuestionnaireQuestionRepository,
        QuestionnaireRepository, VoterTokenRepository,
    },
};
use sea_orm::Set;
use serde_json::Value as JsonValue;
use tracing::warn;

use crate::identity::Identity;
use crate::question_types::{QuestionConfig, ResponsePayload};
use crate::services::engagement::{ActivityOutcome, EngagementService};
use crate::services::rate_limit::normalize_ip;

/// Result of a successful submission.
#[derive(Debug, Clone)]
pub struct SubmitOutcome {
    /// The persisted response row.
    pub response: question_response::Model,
    /// Engagement counters after the best-effort update; zeros when the
    /// side effect failed.
    pub engagement: ActivityOutcome,
}

/// Response recording service.
#[derive(Clone)]
pub struct ResponseService {
    question_repo: QuestionRepository,
    response_repo: QuestionResponseRepository,
    questionnaire_repo: QuestionnaireRepository,
    link_repo: QuestionnaireQuestionRepository,
    voter_repo: VoterTokenRepository,
    engagement: EngagementService,
    id_gen: IdGenerator,
}

impl ResponseService {
    /// Create a new response service.
    #[must_use]
    pub const fn new(
        question_repo: QuestionRepository,
        response_repo: QuestionResponseRepository,
        questionnaire_repo: QuestionnaireRepository,
        link_repo: QuestionnaireQuestionRepository,
        voter_repo: VoterTokenRepository,
        engagement: EngagementService,
    ) -> Self {
        Self {
            question_repo,
            response_repo,
            questionnaire_repo,
            link_repo,
            voter_repo,
            engagement,
            id_gen: IdGenerator::new(),
        }
    }

    /// Submit a response to a question.
    pub async fn submit(
        &self,
        question_id: &str,
        identity: Identity,
        response_data: &JsonValue,
        ip: &str,
    ) -> AppResult<SubmitOutcome> {
        let question = self
            .question_repo
            .find_by_id(question_id)
            .await?
            .filter(|q| q.is_active)
            .ok_or_else(|| AppError::QuestionNotFound(question_id.to_string()))?;

        // A corrupt stored config is our bug, not the caller's.
        let config = QuestionConfig::from_parts(question.question_type, &question.question_data)
            .map_err(|e| {
                AppError::Internal(format!("stored config for question {question_id}: {e}"))
            })?;

        let payload = ResponsePayload::from_parts(question.question_type, response_data)?;
        config.validate_response(&payload)?;

        if self.single_answer_enforced(question_id).await? {
            let answered = match &identity {
                Identity::User(id) => {
                    self.response_repo.has_user_answered(question_id, id).await?
                }
                Identity::Voter(id) => {
                    self.response_repo
                        .has_voter_answered(question_id, id)
                        .await?
                }
            };
            if answered {
                return Err(AppError::Conflict(
                    "This question has already been answered".to_string(),
                ));
            }
        }

        let (user_id, voter_token_id) = identity.clone().into_columns();
        let model = question_response::ActiveModel {
            id: Set(self.id_gen.generate()),
            question_id: Set(question_id.to_string()),
            user_id: Set(user_id),
            voter_token_id: Set(voter_token_id),
            response_data: Set(payload.to_json()?),
            ip_address: Set(normalize_ip(ip)),
            created_at: Set(Utc::now().into()),
        };
        let response = self.response_repo.create(model).await?;

        let engagement = self.apply_side_effects(&identity).await;

        Ok(SubmitOutcome {
            response,
            engagement,
        })
    }

    /// Whether any containing questionnaire forbids repeat responses.
    ///
    /// A question attached to no questionnaire accepts repeats; the policy
    /// is per-questionnaire configuration, not a global rule.
    async fn single_answer_enforced(&self, question_id: &str) -> AppResult<bool> {
        let links = self.link_repo.find_by_question(question_id).await?;
        for link in links {
            if let Some(questionnaire) = self
                .questionnaire_repo
                .find_by_id(&link.questionnaire_id)
                .await?
            {
                if !questionnaire.allow_repeat_responses {
                    return Ok(true);
                }
            }
        }
        Ok(false)
    }

    /// Engagement and voter counters, decoupled from the submit: a failure
    /// here must not fail an already-persisted response.
    async fn apply_side_effects(&self, identity: &Identity) -> ActivityOutcome {
        if let Identity::Voter(token_id) = identity {
            match self.voter_repo.find_by_id(token_id).await {
                Ok(Some(token)) => {
                    if let Err(e) = self.voter_repo.record_vote(token).await {
                        warn!(error = %e, token_id, "Failed to bump voter vote count");
                    }
                }
                Ok(None) => warn!(token_id, "Voter token vanished before count update"),
                Err(e) => warn!(error = %e, token_id, "Failed to load voter token"),
            }
        }

        match self.engagement.record_activity(identity, Utc::now()).await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(error = %e, "Failed to update engagement stats");
                ActivityOutcome::default()
            }
        }
    }
}
