//! Engagement stats entity.
//!
//! One row per identity (user or voter token), mutated additively after
//! each accepted response.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "engagement_stats")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Exactly one of `user_id` / `voter_token_id` is set
    #[sea_orm(nullable, unique, indexed)]
    pub user_id: Option<String>,

    #[sea_orm(nullable, unique, indexed)]
    pub voter_token_id: Option<String>,

    #[sea_orm(default_value = 0)]
    pub current_streak: i32,

    #[sea_orm(default_value = 0)]
    pub longest_streak: i32,

    #[sea_orm(default_value = 0)]
    pub total_votes: i32,

    #[sea_orm(default_value = 0)]
    pub total_xp: i32,

    pub last_activity: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
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
