//! Analytics aggregation service.
//!
//! Read-only batch queries over recorded responses and engagement stats,
//! bucketed into UTC days for dashboard charts, plus CSV export.
//!
//! The summary endpoints never surface an error: on any underlying query
//! failure they substitute a hard-coded plausible dataset so dashboards
//! keep rendering. That availability trade-off is deliberate and kept for
//! dashboard compatibility; payloads carry a `fallback` marker so callers
//! can tell placeholder data from real data.

use std::collections::{HashMap, HashSet};

use chrono::{Duration, NaiveDate, Utc};
use pulse_common::{AppError, AppResult};
use pulse_db::entities::question::QuestionType;
use pulse_db::repositories::{
    EngagementStatsRepository, QuestionRepository, QuestionResponseRepository,
};
use sea_orm::Iterable;
use serde::Serialize;
use tracing::warn;

/// Literal body returned for an empty CSV export.
const EMPTY_EXPORT_SENTINEL: &str = "No data available for the selected time range";

/// Vote counts used when the store is unreachable. Plausible, non-zero,
/// and obviously periodic on inspection.
const FALLBACK_DAILY_VOTES: [u64; 7] = [12, 19, 9, 14, 22, 17, 11];

/// Requested aggregation window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeRange {
    Last24h,
    Last7d,
    Last30d,
    Last90d,
}

impl TimeRange {
    /// Parse the wire form (`24h`, `7d`, `30d`, `90d`).
    pub fn parse(s: &str) -> AppResult<Self> {
        match s {
            "24h" => Ok(Self::Last24h),
            "7d" => Ok(Self::Last7d),
            "30d" => Ok(Self::Last30d),
            "90d" => Ok(Self::Last90d),
            other => Err(AppError::BadRequest(format!(
                "unknown time range {other:?}, expected one of 24h, 7d, 30d, 90d"
            ))),
        }
    }

    /// The wire form of this range.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Last24h => "24h",
            Self::Last7d => "7d",
            Self::Last30d => "30d",
            Self::Last90d => "90d",
        }
    }

    /// Window length in days.
    #[must_use]
    pub const fn days(self) -> i64 {
        match self {
            Self::Last24h => 1,
            Self::Last7d => 7,
            Self::Last30d => 30,
            Self::Last90d => 90,
        }
    }
}

/// One chart series.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    pub label: String,
    pub data: Vec<u64>,
}

/// Chart-ready day buckets.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ChartData {
    /// `YYYY-MM-DD` labels covering the whole range, zero-filled.
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

/// Headline totals.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SummaryTotals {
    pub total_votes: u64,
    pub unique_voters: u64,
}

/// Votes per question type.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TypeCount {
    pub question_type: String,
    pub count: u64,
}

/// The full dashboard payload.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct VotingSummary {
    pub time_range: String,
    pub summary: SummaryTotals,
    pub chart_data: ChartData,
    pub question_type_breakdown: Vec<TypeCount>,
    /// True when the store was unreachable and this is placeholder data.
    pub fallback: bool,
}

/// Platform-wide engagement totals.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EngagementOverview {
    pub active_identities: u64,
    pub total_votes: u64,
    pub total_xp: u64,
    pub longest_streak: i32,
    pub fallback: bool,
}

/// Analytics aggregation service.
#[derive(Clone)]
pub struct AnalyticsService {
    response_repo: QuestionResponseRepository,
    question_repo: QuestionRepository,
    stats_repo: EngagementStatsRepository,
}

impl AnalyticsService {
    /// Create a new analytics service.
    #[must_use]
    pub const fn new(
        response_repo: QuestionResponseRepository,
        question_repo: QuestionRepository,
        stats_repo: EngagementStatsRepository,
    ) -> Self {
        Self {
            response_repo,
            question_repo,
            stats_repo,
        }
    }

    /// Voting summary for a time range. Never errors; see the module docs.
    pub async fn summary(&self, range: TimeRange) -> VotingSummary {
        match self.summary_inner(range).await {
            Ok(summary) => summary,
            Err(e) => {
                warn!(error = %e, range = range.as_str(), "Analytics query failed, serving fallback");
                Self::fallback_summary(range)
            }
        }
    }

    async fn summary_inner(&self, range: TimeRange) -> AppResult<VotingSummary> {
        let now = Utc::now();
        let start = now - Duration::days(range.days());
        let responses = self.response_repo.find_in_range(start, now).await?;

        let labels = day_labels(start.date_naive(), now.date_naive());
        let mut votes_per_day = vec![0u64; labels.len()];
        let mut identities: HashSet<String> = HashSet::new();
        let mut per_question: HashMap<String, u64> = HashMap::new();

        let start_day = start.date_naive();
        for response in &responses {
            let day = response.created_at.with_timezone(&Utc).date_naive();
            let offset = (day - start_day).num_days();
            if offset >= 0 {
                if let Some(slot) = votes_per_day.get_mut(offset as usize) {
                    *slot += 1;
                }
            }

            let identity = response.user_id.as_ref().map_or_else(
                || {
                    response
                        .voter_token_id
                        .as_ref()
                        .map_or_else(String::new, |id| format!("voter:{id}"))
                },
                |id| format!("user:{id}"),
            );
            if !identity.is_empty() {
                identities.insert(identity);
            }

            *per_question.entry(response.question_id.clone()).or_default() += 1;
        }

        let question_ids: Vec<String> = per_question.keys().cloned().collect();
        let questions = self.question_repo.find_by_ids(&question_ids).await?;
        let mut per_type: HashMap<QuestionType, u64> = HashMap::new();
        for question in questions {
            if let Some(count) = per_question.get(&question.id) {
                *per_type.entry(question.question_type).or_default() += count;
            }
        }

        // Every type appears in the breakdown, observed or not, so the
        // dashboard shape is stable.
        let question_type_breakdown = QuestionType::iter()
            .map(|ty| TypeCount {
                question_type: ty.as_tag().to_string(),
                count: per_type.get(&ty).copied().unwrap_or(0),
            })
            .collect();

        Ok(VotingSummary {
            time_range: range.as_str().to_string(),
            summary: SummaryTotals {
                total_votes: responses.len() as u64,
                unique_voters: identities.len() as u64,
            },
            chart_data: ChartData {
                labels,
                datasets: vec![Dataset {
                    label: "Votes".to_string(),
                    data: votes_per_day,
                }],
            },
            question_type_breakdown,
            fallback: false,
        })
    }

    /// The hard-coded placeholder payload served on store failure.
    #[must_use]
    pub fn fallback_summary(range: TimeRange) -> VotingSummary {
        let now = Utc::now();
        let start = now - Duration::days(range.days());
        let labels = day_labels(start.date_naive(), now.date_naive());
        let data: Vec<u64> = (0..labels.len())
            .map(|i| FALLBACK_DAILY_VOTES[i % FALLBACK_DAILY_VOTES.len()])
            .collect();
        let total_votes: u64 = data.iter().sum();
        let unique_voters = total_votes * 3 / 5;

        let question_type_breakdown = QuestionType::iter()
            .zip([32u64, 24, 18, 9, 11, 6])
            .map(|(ty, count)| TypeCount {
                question_type: ty.as_tag().to_string(),
                count,
            })
            .collect();

        VotingSummary {
            time_range: range.as_str().to_string(),
            summary: SummaryTotals {
                total_votes,
                unique_voters,
            },
            chart_data: ChartData {
                labels,
                datasets: vec![Dataset {
                    label: "Votes".to_string(),
                    data,
                }],
            },
            question_type_breakdown,
            fallback: true,
        }
    }

    /// Engagement totals across all identities. Same fallback contract as
    /// [`Self::summary`].
    pub async fn engagement_overview(&self) -> EngagementOverview {
        match self.stats_repo.find_all().await {
            Ok(rows) => {
                let total_votes: u64 = rows.iter().map(|r| r.total_votes.max(0) as u64).sum();
                let total_xp: u64 = rows.iter().map(|r| r.total_xp.max(0) as u64).sum();
                let longest_streak = rows.iter().map(|r| r.longest_streak).max().unwrap_or(0);
                EngagementOverview {
                    active_identities: rows.len() as u64,
                    total_votes,
                    total_xp,
                    longest_streak,
                    fallback: false,
                }
            }
            Err(e) => {
                warn!(error = %e, "Engagement overview query failed, serving fallback");
                EngagementOverview {
                    active_identities: 42,
                    total_votes: 317,
                    total_xp: 2145,
                    longest_streak: 9,
                    fallback: true,
                }
            }
        }
    }

    /// Serialize the range's responses to CSV.
    ///
    /// Empty result sets serialize to a literal sentinel string, not an
    /// empty body.
    pub async fn export_csv(&self, range: TimeRange) -> AppResult<String> {
        let now = Utc::now();
        let start = now - Duration::days(range.days());
        let responses = self.response_repo.find_in_range(start, now).await?;

        if responses.is_empty() {
            return Ok(EMPTY_EXPORT_SENTINEL.to_string());
        }

        let question_ids: Vec<String> = responses
            .iter()
            .map(|r| r.question_id.clone())
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        let questions: HashMap<String, (String, QuestionType)> = self
            .question_repo
            .find_by_ids(&question_ids)
            .await?
            .into_iter()
            .map(|q| (q.id.clone(), (q.title, q.question_type)))
            .collect();

        let mut out = String::from(
            "voteId,questionId,questionTitle,questionType,voterKind,ipAddress,createdAt\n",
        );
        for response in responses {
            let (title, question_type) = questions
                .get(&response.question_id)
                .map_or(("", "unknown"), |(title, ty)| (title.as_str(), ty.as_tag()));
            let voter_kind = if response.user_id.is_some() {
                "user"
            } else {
                "voter"
            };
            out.push_str(&format!(
                "{},{},{},{},{},{},{}\n",
                csv_field(&response.id),
                csv_field(&response.question_id),
                csv_field(title),
                question_type,
                voter_kind,
                csv_field(&response.ip_address),
                response.created_at.with_timezone(&Utc).to_rfc3339(),
            ));
        }
        Ok(out)
    }

    /// Download filename for an export.
    #[must_use]
    pub fn export_filename(range: TimeRange, today: NaiveDate) -> String {
        format!("voting-data-{}-{}.csv", range.as_str(), today.format("%Y-%m-%d"))
    }
}

/// Inclusive day labels from `start` to `end`.
fn day_labels(start: NaiveDate, end: NaiveDate) -> Vec<String> {
    let mut labels = Vec::new();
    let mut day = start;
    loop {
        labels.push(day.format("%Y-%m-%d").to_string());
        if day >= end {
            break;
        }
        let Some(next) = day.succ_opt() else { break };
        day = next;
    }
    labels
}

/// Quote a CSV field when it contains a delimiter, quote, or newline.
fn csv_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
