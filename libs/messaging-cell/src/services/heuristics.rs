use regex::Regex;

const AGE_PATTERN: &str = r"(?i)\d+\s*(?:yrs?|years?|age)";
const GENDER_PATTERN: &str = r"(?i)\b(?:male|female|m|f)\b";
const GREETING_PATTERN: &str = r"(?i)\b(?:hello|hi|start|help)\b";
const DISEASE_PATTERN: &str = r"(?i)\b(?:headache|fever|pain|diabetes|heart|asthma|cancer|stroke|hypertension|pneumonia|chest pain|breathing difficulty|severe pain|bleeding|unconscious|seizure|allergic reaction|heart_problem|heart disease|cardiac|cold|cough|stomach ache|back pain|joint pain|skin rash|eye problem|ear pain|dental issue)\b";

const MIN_COMMAS_FOR_DETAILS: usize = 3;

/// Cheap text checks run before any model call.
pub struct MessageHeuristics {
    patient_info_patterns: Vec<Regex>,
    greeting_pattern: Option<Regex>,
}

impl MessageHeuristics {
    pub fn new() -> Self {
        let patient_info_patterns = [AGE_PATTERN, GENDER_PATTERN, DISEASE_PATTERN]
            .iter()
            .filter_map(|p| Regex::new(p).ok())
            .collect();

        Self {
            patient_info_patterns,
            greeting_pattern: Regex::new(GREETING_PATTERN).ok(),
        }
    }

    /// Comma-separated details, an age, a gender word or a known symptom.
    pub fn has_patient_info(&self, message: &str) -> bool {
        message.matches(',').count() >= MIN_COMMAS_FOR_DETAILS
            || self.patient_info_patterns.iter().any(|p| p.is_match(message))
    }

    pub fn is_greeting(&self, message: &str) -> bool {
        !self.has_patient_info(message)
            && self
                .greeting_pattern
                .as_ref()
                .is_some_and(|p| p.is_match(message))
    }
}

impl Default for MessageHeuristics {
    fn default() -> Self {
        Self::new()
    }
}
