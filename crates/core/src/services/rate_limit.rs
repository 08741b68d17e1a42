//! Rate limit service.
//!
//! Per-IP, per-action window counters backed by the `rate_limit` table.
//! Checking is read-only; counting is a single atomic upsert so concurrent
//! requests from one IP never lose updates. Expired rows are purged by a
//! periodic sweep, not inline.

use chrono::{DateTime, Duration, Utc};
use pulse_common::config::{LimitRule, LimitsConfig};
use pulse_common::{AppError, AppResult};
use pulse_db::repositories::RateLimitRepository;
use tracing::warn;

/// Longest IP string accepted as a counter key. Anything longer is
/// truncated; the column is 64 bytes wide.
const MAX_IP_KEY_LEN: usize = 64;

/// The closed set of rate-limited action types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitAction {
    /// Response submission.
    Vote,
    /// Voter token issuance.
    TokenRequest,
    /// Content mutations (questions, questionnaires, posts).
    SubmitContent,
}

impl RateLimitAction {
    /// Storage key for this action type.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Vote => "vote",
            Self::TokenRequest => "token-request",
            Self::SubmitContent => "submit-content",
        }
    }
}

/// Result of a limit check.
#[derive(Debug, Clone, Copy)]
pub struct LimitStatus {
    /// Requests left in the current window.
    pub remaining: u32,
    /// When the current window resets.
    pub reset_at: DateTime<Utc>,
    /// Whether the request should be denied.
    pub limited: bool,
}

/// Normalize an IP string into a well-formed counter key.
///
/// Malformed, empty, and pathologically long inputs all map to usable keys
/// rather than errors; IPv6 literals pass through verbatim.
#[must_use]
pub fn normalize_ip(ip: &str) -> String {
    let trimmed = ip.trim();
    if trimmed.is_empty() {
        return "unknown".to_string();
    }
    let mut key = trimmed.to_string();
    if key.len() > MAX_IP_KEY_LEN {
        let mut cut = MAX_IP_KEY_LEN;
        while !key.is_char_boundary(cut) {
            cut -= 1;
        }
        key.truncate(cut);
    }
    key
}

/// Rate limit service for business logic.
#[derive(Clone)]
pub struct RateLimitService {
    repo: RateLimitRepository,
    limits: LimitsConfig,
}

impl RateLimitService {
    /// Create a new rate limit service.
    #[must_use]
    pub const fn new(repo: RateLimitRepository, limits: LimitsConfig) -> Self {
        Self { repo, limits }
    }

    /// The configured rule for an action type.
    #[must_use]
    pub const fn rule(&self, action: RateLimitAction) -> LimitRule {
        match action {
            RateLimitAction::Vote => self.limits.vote,
            RateLimitAction::TokenRequest => self.limits.token_request,
            RateLimitAction::SubmitContent => self.limits.submit_content,
        }
    }

    /// Check the current window for a key without counting a request.
    ///
    /// Never returns an error: a store failure is treated as quota
    /// exhausted (fail closed) so an outage cannot open the gate.
    pub async fn check_limit(&self, ip: &str, action: RateLimitAction) -> LimitStatus {
        let key = normalize_ip(ip);
        let rule = self.rule(action);
        let now = Utc::now();
        let fresh_reset = now + Duration::seconds(rule.window_secs as i64);

        match self.repo.find(&key, action.key()).await {
            Ok(Some(row)) => {
                let expires_at = row.expires_at.with_timezone(&Utc);
                if expires_at <= now {
                    // Window over; the row is dead weight until the sweep.
                    return LimitStatus {
                        remaining: rule.max_requests,
                        reset_at: fresh_reset,
                        limited: false,
                    };
                }
                let used = u32::try_from(row.request_count).unwrap_or(u32::MAX);
                let remaining = rule.max_requests.saturating_sub(used);
                LimitStatus {
                    remaining,
                    reset_at: expires_at,
                    limited: remaining == 0,
                }
            }
            Ok(None) => LimitStatus {
                remaining: rule.max_requests,
                reset_at: fresh_reset,
                limited: false,
            },
            Err(e) => {
                warn!(error = %e, action = action.key(), "Rate limit check failed, denying");
                LimitStatus {
                    remaining: 0,
                    reset_at: fresh_reset,
                    limited: true,
                }
            }
        }
    }

    /// Check the window and return a typed error when exhausted.
    pub async fn enforce(&self, ip: &str, action: RateLimitAction) -> AppResult<LimitStatus> {
        let status = self.check_limit(ip, action).await;
        if status.limited {
            let retry_after = (status.reset_at - Utc::now()).num_seconds().max(0);
            #[allow(clippy::cast_sign_loss)]
            return Err(AppError::RateLimited {
                retry_after: retry_after as u64,
            });
        }
        Ok(status)
    }

    /// Count a request against a key.
    pub async fn increment(&self, ip: &str, action: RateLimitAction) -> AppResult<()> {
        let key = normalize_ip(ip);
        let rule = self.rule(action);
        self.repo
            .upsert_increment(&key, action.key(), rule.window_secs as i64, Utc::now())
            .await
    }

    /// Purge expired window rows. Best-effort; callers log and move on.
    pub async fn cleanup_expired(&self) -> AppResult<u64> {
        self.repo.delete_expired(Utc::now()).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pulse_db::entities::rate_limit;
    use sea_orm::{DatabaseBackend, DbErr, MockDatabase, RuntimeErr};
    use std::sync::Arc;

    fn service_with(db: sea_orm::DatabaseConnection) -> RateLimitService {
        RateLimitService::new(RateLimitRepository::new(Arc::new(db)), LimitsConfig::default())
    }

    #[test]
    fn test_normalize_ip_empty() {
        assert_eq!(normalize_ip(""), "unknown");
        assert_eq!(normalize_ip("   "), "unknown");
    }

    #[test]
    fn test_normalize_ip_passthrough() {
        assert_eq!(normalize_ip("203.0.113.7"), "203.0.113.7");
        assert_eq!(normalize_ip("2001:db8::2:1"), "2001:db8::2:1");
    }

    #[test]
    fn test_normalize_ip_truncates_pathological_input() {
        let long = "x".repeat(500);
        let key = normalize_ip(&long);
        assert_eq!(key.len(), 64);
    }

    #[tokio::test]
    async fn test_check_limit_fresh_key_has_full_quota() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<rate_limit::Model>::new()])
            .into_connection();
        let service = service_with(db);

        let status = service.check_limit("203.0.113.7", RateLimitAction::Vote).await;
        assert!(!status.limited);
        assert_eq!(status.remaining, 30);
        assert!(status.reset_at > Utc::now());
    }

    #[tokio::test]
    async fn test_check_limit_live_window_counts_down() {
        let now = Utc::now();
        let row = rate_limit::Model {
            ip_address: "203.0.113.7".to_string(),
            action_type: "vote".to_string(),
            request_count: 28,
            window_start: now.into(),
            expires_at: (now + Duration::seconds(30)).into(),
        };
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[row]])
            .into_connection();
        let service = service_with(db);

        let status = service.check_limit("203.0.113.7", RateLimitAction::Vote).await;
        assert!(!status.limited);
        assert_eq!(status.remaining, 2);
    }

    #[tokio::test]
    async fn test_check_limit_exhausted_window() {
        let now = Utc::now();
        let row = rate_limit::Model {
            ip_address: "203.0.113.7".to_string(),
            action_type: "vote".to_string(),
            request_count: 30,
            window_start: now.into(),
            expires_at: (now + Duration::seconds(30)).into(),
        };
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[row]])
            .into_connection();
        let service = service_with(db);

        let status = service.check_limit("203.0.113.7", RateLimitAction::Vote).await;
        assert!(status.limited);
        assert_eq!(status.remaining, 0);
    }

    #[tokio::test]
    async fn test_check_limit_expired_window_is_fresh() {
        let now = Utc::now();
        let row = rate_limit::Model {
            ip_address: "203.0.113.7".to_string(),
            action_type: "vote".to_string(),
            request_count: 30,
            window_start: (now - Duration::seconds(120)).into(),
            expires_at: (now - Duration::seconds(60)).into(),
        };
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[row]])
            .into_connection();
        let service = service_with(db);

        let status = service.check_limit("203.0.113.7", RateLimitAction::Vote).await;
        assert!(!status.limited);
        assert_eq!(status.remaining, 30);
    }

    #[tokio::test]
    async fn test_check_limit_fails_closed_on_store_outage() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_errors([DbErr::Conn(RuntimeErr::Internal(
                "connection refused".to_string(),
            ))])
            .into_connection();
        let service = service_with(db);

        // Must not propagate the error; must deny.
        let status = service.check_limit("203.0.113.7", RateLimitAction::Vote).await;
        assert!(status.limited);
        assert_eq!(status.remaining, 0);
    }

    #[tokio::test]
    async fn test_enforce_maps_to_rate_limited_error() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_errors([DbErr::Conn(RuntimeErr::Internal("down".to_string()))])
            .into_connection();
        let service = service_with(db);

        let err = service
            .enforce("203.0.113.7", RateLimitAction::Vote)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::RateLimited { .. }));
    }
}
