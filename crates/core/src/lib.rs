//! Core business logic for pulse.

pub mod identity;
pub mod question_types;
pub mod services;

pub use identity::Identity;
pub use question_types::{QuestionConfig, ResponsePayload};
pub use services::*;
