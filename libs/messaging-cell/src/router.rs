use std::sync::Arc;

use axum::{middleware, routing::post, Router};

use shared_config::AppConfig;
use shared_utils::extractor::auth_middleware;

use crate::handlers;
use crate::state::MessagingState;

/// Provider-facing webhook. Unauthenticated: the provider posts form data.
pub fn webhook_routes(state: MessagingState) -> Router {
    Router::new()
        .route("/inbound", post(handlers::inbound_webhook))
        .with_state(state)
}

/// Dashboard assistant chat, behind the session token middleware.
pub fn assistant_routes(config: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/chat", post(handlers::assistant_chat))
        .layer(middleware::from_fn_with_state(config.clone(), auth_middleware))
        .with_state(config)
}
