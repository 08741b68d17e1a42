//! Question entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// The closed set of question kinds.
///
/// The string values double as the wire-level type tags; the shape of
/// `question_data` and of response payloads is keyed off this tag in the
/// core crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "kebab-case")]
pub enum QuestionType {
    #[sea_orm(string_value = "binary")]
    Binary,
    #[sea_orm(string_value = "multi-choice")]
    MultiChoice,
    #[sea_orm(string_value = "rating-scale")]
    RatingScale,
    #[sea_orm(string_value = "text-response")]
    TextResponse,
    #[sea_orm(string_value = "ranking")]
    Ranking,
    #[sea_orm(string_value = "ab-test")]
    AbTest,
}

impl QuestionType {
    /// The wire-level tag for this question type.
    #[must_use]
    pub const fn as_tag(&self) -> &'static str {
        match self {
            Self::Binary => "binary",
            Self::MultiChoice => "multi-choice",
            Self::RatingScale => "rating-scale",
            Self::TextResponse => "text-response",
            Self::Ranking => "ranking",
            Self::AbTest => "ab-test",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "question")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub title: String,

    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,

    /// Type tag for `question_data` and response payloads
    pub question_type: QuestionType,

    /// Type-specific configuration (options, scale bounds, ranking items)
    #[sea_orm(column_type = "JsonBinary")]
    pub question_data: Json,

    #[sea_orm(nullable)]
    pub category: Option<String>,

    /// Position within listings
    #[sea_orm(default_value = 0)]
    pub display_order: i32,

    /// Inactive questions reject new responses but are never deleted
    pub is_active: bool,

    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::question_response::Entity")]
    QuestionResponse,

    #[sea_orm(has_many = "super::questionnaire_question::Entity")]
    QuestionnaireQuestion,
}

impl Related<super::question_response::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::QuestionResponse.def()
    }
}

impl Related<super::questionnaire_question::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::QuestionnaireQuestion.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
