use std::net::SocketAddr;
use std::sync::Arc;
use dotenv::dotenv;
use tokio::net::TcpListener;
use tower_http::cors::{CorsLayer, Any};
use tower_http::trace::{self, TraceLayer};
use tracing::{Level, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use clinic_assistant_api::create_router;
use patient_cell::{build_session_store, spawn_session_sweeper};
use shared_config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting clinic assistant API server");

    let config = Arc::new(AppConfig::from_env());
    for (ready, integration) in [
        (config.is_configured(), "Supabase"),
        (config.is_llm_configured(), "Gemini"),
        (config.is_calendar_configured(), "Google Calendar"),
        (config.is_translation_configured(), "Sarvam translation"),
    ] {
        if !ready {
            warn!("{} is not configured; requests that need it will fail", integration);
        }
    }

    let sessions = build_session_store(&config).await;
    spawn_session_sweeper(sessions.clone(), config.session_sweep_interval());

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = create_router(config.clone(), sessions)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(trace::DefaultMakeSpan::new()
                    .level(Level::INFO))
                .on_response(trace::DefaultOnResponse::new()
                    .level(Level::INFO)),
        )
        .layer(cors);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
