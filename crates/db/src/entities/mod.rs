//! Database entities.

pub mod engagement_stats;
pub mod journey_post;
pub mod question;
pub mod question_response;
pub mod questionnaire;
pub mod questionnaire_question;
pub mod rate_limit;
pub mod user;
pub mod voter_token;

pub use engagement_stats::Entity as EngagementStats;
pub use journey_post::Entity as JourneyPost;
pub use question::Entity as Question;
pub use question_response::Entity as QuestionResponse;
pub use questionnaire::Entity as Questionnaire;
pub use questionnaire_question::Entity as QuestionnaireQuestion;
pub use rate_limit::Entity as RateLimit;
pub use user::Entity as User;
pub use voter_token::Entity as VoterToken;
