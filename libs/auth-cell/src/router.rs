use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};

use shared_config::AppConfig;

use crate::handlers;

pub fn auth_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/callback", get(handlers::oauth_callback))
        .route("/validate", post(handlers::validate))
        .route("/verify", post(handlers::verify))
        .with_state(state)
}
