//! Rate limit window entity.
//!
//! One row per `(ip_address, action_type)` key. Rows are upserted with a
//! single atomic statement on every gated action and purged by a periodic
//! sweep once expired.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "rate_limit")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub ip_address: String,

    #[sea_orm(primary_key, auto_increment = false)]
    pub action_type: String,

    /// Requests counted within the current window
    pub request_count: i32,

    pub window_start: DateTimeWithTimeZone,

    /// End of the current window; rows past this are dead and swept
    #[sea_orm(indexed)]
    pub expires_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
