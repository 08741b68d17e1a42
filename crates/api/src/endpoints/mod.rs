//! API endpoints.

mod analytics;
mod engagement;
mod journey;
mod questionnaires;
mod questions;
mod responses;
mod voter;

use axum::Router;

use crate::middleware::AppState;

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .nest("/questions", questions::router())
        .nest("/responses", responses::router())
        .nest("/voter", voter::router())
        .nest("/engagement", engagement::router())
        .nest("/analytics", analytics::router())
        .nest("/questionnaires", questionnaires::router())
        .nest("/journey", journey::router())
}
