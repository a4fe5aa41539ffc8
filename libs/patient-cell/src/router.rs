use std::sync::Arc;

use axum::{middleware, routing::get, Router};

use shared_config::AppConfig;
use shared_utils::extractor::auth_middleware;

use crate::handlers;

/// Dashboard read endpoints over the `patients` table.
pub fn patient_routes(config: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", get(handlers::list_patients))
        .route("/summary", get(handlers::patient_summary))
        .route("/phone/{phone}", get(handlers::get_patient_by_phone))
        .layer(middleware::from_fn_with_state(config.clone(), auth_middleware))
        .with_state(config)
}
