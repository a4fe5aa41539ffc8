use std::sync::Arc;

use patient_cell::SessionStore;
use shared_config::AppConfig;

use crate::services::heuristics::MessageHeuristics;

/// Shared by every webhook request.
#[derive(Clone)]
pub struct MessagingState {
    pub config: Arc<AppConfig>,
    pub sessions: Arc<dyn SessionStore>,
    pub heuristics: Arc<MessageHeuristics>,
}

impl MessagingState {
    pub fn new(config: Arc<AppConfig>, sessions: Arc<dyn SessionStore>) -> Self {
        Self {
            config,
            sessions,
            heuristics: Arc::new(MessageHeuristics::new()),
        }
    }
}
