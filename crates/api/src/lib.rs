//! HTTP API layer for pulse.
//!
//! This crate provides the JSON API:
//!
//! - **Endpoints**: questions, responses, questionnaires, analytics,
//!   engagement, voter tokens, journey posts
//! - **Extractors**: authentication, client IP
//! - **Middleware**: bearer-token auth
//!
//! Built on Axum 0.8 with Tower middleware stack.

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod response;

pub use endpoints::router;
