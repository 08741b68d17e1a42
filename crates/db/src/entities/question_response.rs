//! Question response entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "question_response")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    #[sea_orm(indexed)]
    pub question_id: String,

    /// Authenticated responder. Exactly one of `user_id` / `voter_token_id`
    /// is set; the `Identity` enum in the core crate enforces this at the
    /// type level and the table carries a check constraint.
    #[sea_orm(nullable, indexed)]
    pub user_id: Option<String>,

    /// Anonymous responder
    #[sea_orm(nullable, indexed)]
    pub voter_token_id: Option<String>,

    /// Type-shaped answer payload, validated against the question's config
    #[sea_orm(column_type = "JsonBinary")]
    pub response_data: Json,

    pub ip_address: String,

    #[sea_orm(indexed)]
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::question::Entity",
        from = "Column::QuestionId",
        to = "super::question::Column::Id",
        on_delete = "Cascade"
    )]
    Question,

    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,

    #[sea_orm(
        belongs_to = "super::voter_token::Entity",
        from = "Column::VoterTokenId",
        to = "super::voter_token::Column::Id",
        on_delete = "Cascade"
    )]
    VoterToken,
}

impl Related<super::question::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Question.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::voter_token::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::VoterToken.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
