//! Database repositories.

pub mod engagement;
pub mod journey_post;
pub mod question;
pub mod question_response;
pub mod questionnaire;
pub mod rate_limit;
pub mod user;
pub mod voter_token;

pub use engagement::EngagementStatsRepository;
pub use journey_post::JourneyPostRepository;
pub use question::QuestionRepository;
pub use question_response::QuestionResponseRepository;
pub use questionnaire::{QuestionnaireQuestionRepository, QuestionnaireRepository};
pub use rate_limit::RateLimitRepository;
pub use user::UserRepository;
pub use voter_token::VoterTokenRepository;
