use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};

use shared_config::AppConfig;

use crate::handlers;

/// Calendar routes. `/mcp` acts with the clinic's credentials; the event and
/// tool routes act with the caller's delegated Google token.
pub fn calendar_routes(config: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/mcp", post(handlers::mcp_proxy))
        .route("/events", get(handlers::list_events).post(handlers::create_event))
        .route("/events/{event_id}", put(handlers::update_event).delete(handlers::delete_event))
        .route("/tools", get(handlers::list_tools))
        .route("/tools/execute", post(handlers::execute_tool))
        .with_state(config)
}
