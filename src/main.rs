//! Idea Spark Backend
//!
//! REST backend for collecting, voting on and generating business ideas, with SQLite
//! persistence and an OpenAI-compatible text generation provider.

mod api;
mod assist;
mod config;
mod db;
mod errors;
mod llm;
mod models;

use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use assist::Assistant;
use config::Config;
use db::Repository;
use llm::{DisabledBackend, LlmBackend, OpenAiBackend};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<Repository>,
    pub assistant: Arc<Assistant>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return Err(e.into());
        }
    };

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Idea Spark Backend");
    tracing::info!("Database path: {:?}", config.db_path);
    tracing::info!("Bind address: {}", config.bind_addr);

    // Initialize database
    let pool = db::init_database(&config.db_path, &config.pool).await?;
    let repo = Arc::new(Repository::new(pool.clone()));

    // Text generation backend
    let backend: Arc<dyn LlmBackend> = if config.llm.api_key.is_some() {
        Arc::new(OpenAiBackend::new(&config.llm)?)
    } else {
        tracing::warn!("No OPENAI_API_KEY configured. Text generation endpoints are disabled!");
        Arc::new(DisabledBackend)
    };
    let assistant = Arc::new(Assistant::new(backend));
    tracing::info!("Text generation backend: {}", assistant.backend_id());

    let state = AppState { repo, assistant };

    // Build router
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shutting down, closing database pool");
    db::close_database(&pool).await;

    Ok(())
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // API routes
    let api_routes = Router::new()
        // Ideas
        .route("/ideas", get(api::list_ideas).post(api::create_idea))
        .route("/ideas/{id}", get(api::get_idea))
        .route("/vote", post(api::vote))
        .route("/leaderboard", get(api::leaderboard))
        // Admin
        .route(
            "/admin/themes",
            get(api::list_themes).post(api::create_theme),
        )
        .route(
            "/admin/themes/{id}",
            put(api::update_theme).delete(api::delete_theme),
        )
        .route(
            "/admin/technologies",
            get(api::list_technologies).post(api::create_technology),
        )
        .route(
            "/admin/technologies/{id}",
            put(api::update_technology).delete(api::delete_technology),
        )
        .route(
            "/admin/settings",
            get(api::get_settings).post(api::update_settings),
        )
        .route("/admin/stats", get(api::get_stats))
        // Text generation
        .route("/generate-idea-content", post(api::generate_idea_content))
        .route("/generate-ideas", post(api::generate_ideas))
        .route("/get-recommendations", post(api::get_recommendations))
        .route("/generate-tech-idea", post(api::generate_tech_idea))
        .route("/recommend-themes", post(api::recommend_themes))
        .route("/recommend-technologies", post(api::recommend_technologies))
        .route("/analyze-lean-canvas", post(api::analyze_lean_canvas))
        .route("/generate-elevator-pitch", post(api::generate_elevator_pitch))
        .route(
            "/generate-followup-questions",
            post(api::generate_followup_questions),
        )
        .route("/brainstorm", post(api::brainstorm))
        .route("/ai-brainstorming", post(api::ai_brainstorming));

    let health_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api", api_routes)
        .merge(health_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
