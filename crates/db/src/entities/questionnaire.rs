//! Questionnaire entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "questionnaire")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub title: String,

    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,

    #[sea_orm(unique, indexed)]
    pub slug: String,

    pub is_active: bool,

    /// Duplicate-vote policy: when false (the default), one response per
    /// identity per contained question
    pub allow_repeat_responses: bool,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::questionnaire_question::Entity")]
    QuestionnaireQuestion,
}

impl Related<super::questionnaire_question::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::QuestionnaireQuestion.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
