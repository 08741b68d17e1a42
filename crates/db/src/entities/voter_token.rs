//! Voter token entity for anonymous respondent identity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "voter_token")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// SHA-256 digest of the raw token; the raw value is never stored
    #[sea_orm(unique, indexed)]
    pub token_hash: String,

    /// IP the token was first minted for
    pub ip_address: String,

    /// Cumulative accepted responses
    #[sea_orm(default_value = 0)]
    pub vote_count: i32,

    pub created_at: DateTimeWithTimeZone,

    pub last_seen_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::question_response::Entity")]
    QuestionResponse,
}

impl Related<super::question_response::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::QuestionResponse.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
