use tracing::{debug, warn};

use llm_cell::AiService;
use patient_cell::{score_priority, Priority};
use shared_config::PriorityStrategy;

/// Priority for a new registration under the configured strategy. The model
/// path falls back to the keyword rules on any failure.
pub async fn assign_priority(strategy: PriorityStrategy, ai: &AiService, age: u32, disease: &str) -> Priority {
    let rules = score_priority(age, disease);

    match strategy {
        PriorityStrategy::Rules => rules,
        PriorityStrategy::Llm => match ai.classify_priority(age, disease).await {
            Ok(priority) => {
                debug!("Model priority {} (rules would give {})", priority, rules);
                priority
            }
            Err(e) => {
                warn!("Model priority unavailable, using rules: {}", e);
                rules
            }
        },
    }
}
