//! Pulse server entry point.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{middleware, Router};
use pulse_api::{middleware::AppState, router as api_router};
use pulse_common::Config;
use pulse_core::{
    AnalyticsService, EngagementService, JourneyService, QuestionService, QuestionnaireService,
    RateLimitService, ResponseService, UserService, VoterService,
};
use pulse_db::repositories::{
    EngagementStatsRepository, JourneyPostRepository, QuestionRepository,
    QuestionResponseRepository, QuestionnaireQuestionRepository, QuestionnaireRepository,
    RateLimitRepository, UserRepository, VoterTokenRepository,
};
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Waits for a shutdown signal (SIGINT or SIGTERM).
///
/// On Unix systems, this listens for both SIGINT (Ctrl+C) and SIGTERM.
/// On Windows, this only listens for Ctrl+C.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received SIGINT, initiating graceful shutdown...");
        },
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pulse=debug,tower_http=debug".into()),
        )
        .init();

    info!("Starting pulse server...");

    // Load configuration
    let config = Config::load()?;

    // Connect to database
    let db = pulse_db::init(&config).await?;
    info!("Connected to database");

    // Run migrations
    info!("Running database migrations...");
    pulse_db::migrate(&db).await?;
    info!("Migrations completed");

    // Initialize repositories
    let db = Arc::new(db);
    let user_repo = UserRepository::new(Arc::clone(&db));
    let question_repo = QuestionRepository::new(Arc::clone(&db));
    let response_repo = QuestionResponseRepository::new(Arc::clone(&db));
    let voter_repo = VoterTokenRepository::new(Arc::clone(&db));
    let rate_limit_repo = RateLimitRepository::new(Arc::clone(&db));
    let engagement_repo = EngagementStatsRepository::new(Arc::clone(&db));
    let questionnaire_repo = QuestionnaireRepository::new(Arc::clone(&db));
    let link_repo = QuestionnaireQuestionRepository::new(Arc::clone(&db));
    let journey_repo = JourneyPostRepository::new(Arc::clone(&db));

    // Initialize services
    let user_service = UserService::new(user_repo);
    let question_service = QuestionService::new(question_repo.clone());
    let voter_service = VoterService::new(voter_repo.clone());
    let rate_limit_service = RateLimitService::new(rate_limit_repo, config.limits.clone());
    let engagement_service = EngagementService::new(engagement_repo.clone());
    let response_service = ResponseService::new(
        question_repo.clone(),
        response_repo.clone(),
        questionnaire_repo.clone(),
        link_repo.clone(),
        voter_repo,
        engagement_service.clone(),
    );
    let questionnaire_service =
        QuestionnaireService::new(questionnaire_repo, link_repo, question_repo.clone());
    let analytics_service =
        AnalyticsService::new(response_repo, question_repo, engagement_repo);
    let journey_service = JourneyService::new(journey_repo);

    // Background sweep for expired rate limit windows
    let sweep_service = rate_limit_service.clone();
    let sweep_interval = Duration::from_secs(config.limits.cleanup_interval_secs.max(1));
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(sweep_interval);
        loop {
            ticker.tick().await;
            match sweep_service.cleanup_expired().await {
                Ok(removed) if removed > 0 => {
                    info!(removed, "Purged expired rate limit windows");
                }
                Ok(_) => {}
                Err(e) => warn!(error = %e, "Rate limit cleanup sweep failed"),
            }
        }
    });

    // Create app state
    let state = AppState {
        user_service,
        question_service,
        questionnaire_service,
        response_service,
        voter_service,
        rate_limit_service,
        engagement_service,
        analytics_service,
        journey_service,
    };

    // Build router
    let app = Router::new()
        .nest("/api", api_router())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            pulse_api::middleware::auth_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    // Start server with graceful shutdown
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}
