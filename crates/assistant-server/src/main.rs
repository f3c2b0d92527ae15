//! Assistant HTTP Server
//!
//! Axum server in front of the tool-augmented Gemini assistant. One user
//! message in, one assistant reply out; conversations live in memory.

mod config;
mod handlers;
mod state;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    routing::{delete, get, post},
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use agent_core::{AgentBuilder, LlmProvider};
use agent_runtime::{GeminiConfig, GeminiProvider};
use assistant_tools::{ASSISTANT_PROMPT, Credentials, SmtpSettings, default_tools};

use crate::config::ServerSettings;
use crate::handlers::{
    chat_handler, delete_session, get_transcript, health_check, list_tools, reset_session,
};
use crate::state::AppState;

/// Routes and middleware over the given state
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_check))
        .route("/api/tools", get(list_tools))
        .route("/api/chat", post(chat_handler))
        .route("/api/sessions/{id}/transcript", get(get_transcript))
        .route("/api/sessions/{id}/reset", post(reset_session))
        .route("/api/sessions/{id}", delete(delete_session))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenvy::dotenv().ok();

    // Refuse to start without every credential
    let credentials = Credentials::from_env()?;
    let smtp = SmtpSettings::from_env()?;
    let settings = ServerSettings::from_env()?;

    let provider = Arc::new(GeminiProvider::from_config(GeminiConfig::from_env()?));

    match provider.health_check().await {
        Ok(true) => {
            tracing::info!(model = %settings.model, "Connected to Gemini");
            if let Ok(models) = provider.list_models().await {
                for model in models {
                    tracing::debug!(id = %model.id, context = ?model.context_length, "  Model: {}", model.name);
                }
            }
        }
        Ok(false) | Err(_) => {
            tracing::warn!("Gemini not reachable - replies will report the failure");
        }
    }

    let mut builder = AgentBuilder::new()
        .provider(provider)
        .system_prompt(ASSISTANT_PROMPT)
        .model(settings.model.clone())
        .max_iterations(settings.max_iterations);
    for tool in default_tools(&credentials, &smtp)? {
        builder = builder.shared_tool(tool);
    }
    let agent = Arc::new(builder.build()?);

    tracing::info!("Registered {} tools:", agent.tools().len());
    for name in agent.tools().names() {
        tracing::info!("  • {}", name);
    }

    let state = AppState::new(agent);

    let sessions = Arc::clone(&state.sessions);
    let idle = settings.session_idle;
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(idle.min(Duration::from_secs(60)));
        loop {
            ticker.tick().await;
            sessions.evict_idle(idle).await;
        }
    });

    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&settings.bind_addr).await?;

    tracing::info!("Assistant server running on http://{}", settings.bind_addr);
    tracing::info!("  GET  /health                        - Health check");
    tracing::info!("  GET  /api/tools                     - Declared tools");
    tracing::info!("  POST /api/chat                      - Send message");
    tracing::info!("  GET  /api/sessions/{{id}}/transcript - Conversation so far");
    tracing::info!("  POST /api/sessions/{{id}}/reset      - Start over");
    tracing::info!("  DELETE /api/sessions/{{id}}          - End session");

    axum::serve(listener, app).await?;

    Ok(())
}
