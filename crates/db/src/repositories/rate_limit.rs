//! Rate limit repository.
//!
//! The increment path is a single `INSERT .. ON CONFLICT DO UPDATE`
//! statement. Concurrent requests from the same IP race only inside the
//! store, so counts are never lost to a check-then-write interleaving.

use std::sync::Arc;

use crate::entities::{rate_limit, RateLimit};
use chrono::{DateTime, Duration, Utc};
use pulse_common::{AppError, AppResult};
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};

/// Rate limit repository for database operations.
#[derive(Clone)]
pub struct RateLimitRepository {
    db: Arc<DatabaseConnection>,
}

impl RateLimitRepository {
    /// Create a new rate limit repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find the window row for a key.
    pub async fn find(
        &self,
        ip_address: &str,
        action_type: &str,
    ) -> AppResult<Option<rate_limit::Model>> {
        RateLimit::find_by_id((ip_address.to_string(), action_type.to_string()))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Atomically count a request against a key.
    ///
    /// Inserts a fresh window with `request_count = 1`, or, on conflict,
    /// either increments the live window or resets an expired one — all in
    /// one statement.
    pub async fn upsert_increment(
        &self,
        ip_address: &str,
        action_type: &str,
        window_secs: i64,
        now: DateTime<Utc>,
    ) -> AppResult<()> {
        let expires_at = now + Duration::seconds(window_secs);
        let model = rate_limit::ActiveModel {
            ip_address: Set(ip_address.to_string()),
            action_type: Set(action_type.to_string()),
            request_count: Set(1),
            window_start: Set(now.into()),
            expires_at: Set(expires_at.into()),
        };

        let expired = Expr::col((rate_limit::Entity, rate_limit::Column::ExpiresAt)).lte(now);

        RateLimit::insert(model)
            .on_conflict(
                OnConflict::columns([
                    rate_limit::Column::IpAddress,
                    rate_limit::Column::ActionType,
                ])
                .value(
                    rate_limit::Column::RequestCount,
                    Expr::case(expired.clone(), 1).finally(
                        Expr::col((rate_limit::Entity, rate_limit::Column::RequestCount)).add(1),
                    ),
                )
                .value(
                    rate_limit::Column::WindowStart,
                    Expr::case(expired.clone(), now).finally(Expr::col((
                        rate_limit::Entity,
                        rate_limit::Column::WindowStart,
                    ))),
                )
                .value(
                    rate_limit::Column::ExpiresAt,
                    Expr::case(expired, expires_at).finally(Expr::col((
                        rate_limit::Entity,
                        rate_limit::Column::ExpiresAt,
                    ))),
                )
                .to_owned(),
            )
            .exec_without_returning(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Delete expired window rows, returning how many were removed.
    pub async fn delete_expired(&self, now: DateTime<Utc>) -> AppResult<u64> {
        let result = RateLimit::delete_many()
            .filter(rate_limit::Column::ExpiresAt.lte(now))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(result.rows_affected)
    }
}
