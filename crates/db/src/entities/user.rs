//! User entity.
//!
//! Pulse users are admins and content authors. Anonymous respondents are
//! modeled separately as voter tokens.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    #[sea_orm(unique, indexed)]
    pub username: String,

    #[sea_orm(nullable)]
    pub display_name: Option<String>,

    /// SHA-256 digest of the bearer API token; null means login disabled
    #[sea_orm(nullable, indexed)]
    pub api_token_hash: Option<String>,

    pub is_admin: bool,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::question_response::Entity")]
    QuestionResponse,

    #[sea_orm(has_many = "super::journey_post::Entity")]
    JourneyPost,
}

impl Related<super::question_response::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::QuestionResponse.def()
    }
}

impl Related<super::journey_post::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::JourneyPost.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
