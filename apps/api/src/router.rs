use std::sync::Arc;

use axum::{
    Router,
    routing::get,
};

use auth_cell::auth_routes;
use calendar_cell::calendar_routes;
use doctor_cell::router::doctor_routes;
use messaging_cell::{assistant_routes, webhook_routes, MessagingState};
use patient_cell::{patient_routes, SessionStore};
use shared_config::AppConfig;

pub const LIVENESS: &str = "Clinic assistant API is running!";

pub fn create_router(state: Arc<AppConfig>, sessions: Arc<dyn SessionStore>) -> Router {
    Router::new()
        .route("/", get(|| async { LIVENESS }))
        .nest("/webhook", webhook_routes(MessagingState::new(state.clone(), sessions)))
        .nest("/calendar", calendar_routes(state.clone()))
        .nest("/dashboard/patients", patient_routes(state.clone()))
        .nest("/dashboard/doctors", doctor_routes(state.clone()))
        .nest("/auth", auth_routes(state.clone()))
        .nest("/assistant", assistant_routes(state))
}
