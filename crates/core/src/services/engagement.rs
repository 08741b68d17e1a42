//! Engagement service.
//!
//! Derives gamification counters (streaks, XP tiers) from accumulated
//! response counts. Updates are additive per accepted response and are a
//! best-effort side effect of submission, never part of its transaction.

use chrono::{DateTime, Utc};
use pulse_common::{AppResult, IdGenerator};
use pulse_db::{entities::engagement_stats, repositories::EngagementStatsRepository};
use sea_orm::Set;

use crate::identity::Identity;

/// A read-only view of an identity's engagement counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EngagementSnapshot {
    pub total_votes: i32,
    pub total_xp: i32,
    pub current_streak: i32,
    pub longest_streak: i32,
}

/// Result of recording one accepted response.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActivityOutcome {
    /// XP awarded for this response.
    pub xp_awarded: i32,
    /// Counters after the update.
    pub stats: EngagementSnapshot,
}

/// Engagement service for business logic.
#[derive(Clone)]
pub struct EngagementService {
    stats_repo: EngagementStatsRepository,
    id_gen: IdGenerator,
}

impl EngagementService {
    /// Create a new engagement service.
    #[must_use]
    pub const fn new(stats_repo: EngagementStatsRepository) -> Self {
        Self {
            stats_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// XP awarded for a vote, tiered by the cumulative count including it.
    #[must_use]
    pub const fn xp_for_vote(total_votes_after: i32) -> i32 {
        match total_votes_after {
            i32::MIN..=5 => 5,
            6..=10 => 10,
            11..=25 => 15,
            26..=50 => 20,
            51..=100 => 25,
            101..=250 => 50,
            _ => 100,
        }
    }

    /// Streak value after activity at `now`, given the previous activity.
    ///
    /// Same UTC calendar day leaves the streak unchanged, the previous day
    /// extends it, anything older resets to 1.
    #[must_use]
    pub fn streak_after(
        last_activity: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
        current: i32,
    ) -> i32 {
        let today = now.date_naive();
        match last_activity {
            None => 1,
            Some(last) => {
                let last_day = last.date_naive();
                if last_day == today {
                    current.max(1)
                } else if today.pred_opt() == Some(last_day) {
                    current + 1
                } else {
                    1
                }
            }
        }
    }

    /// Record one accepted response for an identity.
    pub async fn record_activity(
        &self,
        identity: &Identity,
        now: DateTime<Utc>,
    ) -> AppResult<ActivityOutcome> {
        let existing = match identity {
            Identity::User(id) => self.stats_repo.find_by_user(id).await?,
            Identity::Voter(id) => self.stats_repo.find_by_voter(id).await?,
        };

        let updated = if let Some(row) = existing {
            let total_votes = row.total_votes + 1;
            let xp_awarded = Self::xp_for_vote(total_votes);
            let current_streak = Self::streak_after(
                Some(row.last_activity.with_timezone(&Utc)),
                now,
                row.current_streak,
            );
            let longest_streak = row.longest_streak.max(current_streak);
            let total_xp = row.total_xp + xp_awarded;

            let mut active: engagement_stats::ActiveModel = row.into();
            active.total_votes = Set(total_votes);
            active.total_xp = Set(total_xp);
            active.current_streak = Set(current_streak);
            active.longest_streak = Set(longest_streak);
            active.last_activity = Set(now.into());
            (self.stats_repo.update(active).await?, xp_awarded)
        } else {
            let xp_awarded = Self::xp_for_vote(1);
            let (user_id, voter_token_id) = identity.clone().into_columns();
            let model = engagement_stats::ActiveModel {
                id: Set(self.id_gen.generate()),
                user_id: Set(user_id),
                voter_token_id: Set(voter_token_id),
                current_streak: Set(1),
                longest_streak: Set(1),
                total_votes: Set(1),
                total_xp: Set(xp_awarded),
                last_activity: Set(now.into()),
            };
            (self.stats_repo.create(model).await?, xp_awarded)
        };

        let (row, xp_awarded) = updated;
        Ok(ActivityOutcome {
            xp_awarded,
            stats: EngagementSnapshot {
                total_votes: row.total_votes,
                total_xp: row.total_xp,
                current_streak: row.current_streak,
                longest_streak: row.longest_streak,
            },
        })
    }

    /// Current counters for an identity; absent rows read as zeros.
    pub async fn stats(&self, identity: &Identity) -> AppResult<EngagementSnapshot> {
        let existing = match identity {
            Identity::User(id) => self.stats_repo.find_by_user(id).await?,
            Identity::Voter(id) => self.stats_repo.find_by_voter(id).await?,
        };
        Ok(existing.map_or_else(EngagementSnapshot::default, |row| EngagementSnapshot {
            total_votes: row.total_votes,
            total_xp: row.total_xp,
            current_streak: row.current_streak,
            longest_streak: row.longest_streak,
        }))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    #[test]
    fn test_xp_tiers() {
        assert_eq!(EngagementService::xp_for_vote(1), 5);
        assert_eq!(EngagementService::xp_for_vote(5), 5);
        assert_eq!(EngagementService::xp_for_vote(6), 10);
        assert_eq!(EngagementService::xp_for_vote(10), 10);
        assert_eq!(EngagementService::xp_for_vote(11), 15);
        assert_eq!(EngagementService::xp_for_vote(25), 15);
        assert_eq!(EngagementService::xp_for_vote(26), 20);
        assert_eq!(EngagementService::xp_for_vote(50), 20);
        assert_eq!(EngagementService::xp_for_vote(51), 25);
        assert_eq!(EngagementService::xp_for_vote(100), 25);
        assert_eq!(EngagementService::xp_for_vote(101), 50);
        assert_eq!(EngagementService::xp_for_vote(250), 50);
        assert_eq!(EngagementService::xp_for_vote(251), 100);
        assert_eq!(EngagementService::xp_for_vote(10_000), 100);
    }

    #[test]
    fn test_first_ten_votes_total_75_xp() {
        let total: i32 = (1..=10).map(EngagementService::xp_for_vote).sum();
        assert_eq!(total, 5 * 5 + 5 * 10);
    }

    #[test]
    fn test_streak_first_activity() {
        let now = Utc::now();
        assert_eq!(EngagementService::streak_after(None, now, 0), 1);
    }

    #[test]
    fn test_streak_same_day_unchanged() {
        let now = Utc.with_ymd_and_hms(2025, 6, 10, 18, 0, 0).unwrap();
        let earlier = Utc.with_ymd_and_hms(2025, 6, 10, 9, 0, 0).unwrap();
        assert_eq!(EngagementService::streak_after(Some(earlier), now, 3), 3);
    }

    #[test]
    fn test_streak_consecutive_day_increments() {
        let now = Utc.with_ymd_and_hms(2025, 6, 11, 0, 30, 0).unwrap();
        let yesterday = Utc.with_ymd_and_hms(2025, 6, 10, 23, 45, 0).unwrap();
        assert_eq!(EngagementService::streak_after(Some(yesterday), now, 3), 4);
    }

    #[test]
    fn test_streak_gap_resets() {
        let now = Utc.with_ymd_and_hms(2025, 6, 14, 12, 0, 0).unwrap();
        let stale = now - Duration::days(3);
        assert_eq!(EngagementService::streak_after(Some(stale), now, 9), 1);
    }

    #[tokio::test]
    async fn test_record_activity_creates_row_on_first_vote() {
        let now = Utc::now();
        let created = engagement_stats::Model {
            id: "s1".to_string(),
            user_id: None,
            voter_token_id: Some("v1".to_string()),
            current_streak: 1,
            longest_streak: 1,
            total_votes: 1,
            total_xp: 5,
            last_activity: now.into(),
        };
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<engagement_stats::Model>::new()])
            .append_query_results([[created]])
            .into_connection();
        let service = EngagementService::new(EngagementStatsRepository::new(Arc::new(db)));

        let outcome = service
            .record_activity(&Identity::Voter("v1".to_string()), now)
            .await
            .unwrap();
        assert_eq!(outcome.xp_awarded, 5);
        assert_eq!(outcome.stats.total_votes, 1);
        assert_eq!(outcome.stats.total_xp, 5);
    }

    #[tokio::test]
    async fn test_stats_absent_row_reads_as_zeros() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<engagement_stats::Model>::new()])
            .into_connection();
        let service = EngagementService::new(EngagementStatsRepository::new(Arc::new(db)));

        let stats = service
            .stats(&Identity::User("u1".to_string()))
            .await
            .unwrap();
        assert_eq!(stats, EngagementSnapshot::default());
    }
}
