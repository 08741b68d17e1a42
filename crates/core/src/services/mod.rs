//! Business logic services.

#![allow(missing_docs)]

pub mod analytics;
pub mod engagement;
pub mod journey;
pub mod question;
pub mod questionnaire;
pub mod rate_limit;
pub mod response;
pub mod user;
pub mod voter;

pub use analytics::{
    AnalyticsService, ChartData, Dataset, EngagementOverview, TimeRange, VotingSummary,
};
pub use engagement::{ActivityOutcome, EngagementService, EngagementSnapshot};
pub use journey::{CreateJourneyPostInput, JourneyService, UpdateJourneyPostInput};
pub use question::{CreateQuestionInput, QuestionService, UpdateQuestionInput};
pub use questionnaire::{
    AttachQuestionInput, CreateQuestionnaireInput, QuestionnaireEntry, QuestionnaireService,
    QuestionnaireWithQuestions,
};
pub use rate_limit::{normalize_ip, LimitStatus, RateLimitAction, RateLimitService};
pub use response::{ResponseService, SubmitOutcome};
pub use user::UserService;
pub use voter::{ResolvedVoter, VoterService};
