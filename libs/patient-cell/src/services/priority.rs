//! Rule-based triage scoring over age and disease keywords.

use crate::models::Priority;

const CRITICAL_KEYWORDS: &[&str] = &[
    "chest pain",
    "heart attack",
    "stroke",
    "unconscious",
    "seizure",
    "bleeding",
    "breathing difficulty",
    "difficulty breathing",
    "cardiac",
    "allergic reaction",
    "heart problem",
    "heart_problem",
    "heart disease",
];

const SERIOUS_KEYWORDS: &[&str] = &[
    "diabetes",
    "hypertension",
    "asthma",
    "pneumonia",
    "cancer",
    "severe pain",
    "high fever",
    "fracture",
    "kidney",
];

const MILD_KEYWORDS: &[&str] = &[
    "fever",
    "headache",
    "cold",
    "cough",
    "stomach ache",
    "back pain",
    "joint pain",
    "skin rash",
    "eye problem",
    "ear pain",
    "dental issue",
];

const HIGH_THRESHOLD: u32 = 5;
const MEDIUM_THRESHOLD: u32 = 3;

fn disease_points(disease: &str) -> u32 {
    let text = disease.to_lowercase();
    let mentions = |keywords: &[&str]| keywords.iter().any(|keyword| text.contains(keyword));

    if mentions(CRITICAL_KEYWORDS) {
        5
    } else if mentions(SERIOUS_KEYWORDS) {
        3
    } else if mentions(MILD_KEYWORDS) {
        1
    } else {
        0
    }
}

fn age_points(age: u32) -> u32 {
    match age {
        0..=5 => 2,
        50..=64 => 2,
        a if a >= 65 => 3,
        _ => 0,
    }
}

/// Points from the highest matching keyword tier plus an age bonus.
pub fn priority_points(age: u32, disease: &str) -> u32 {
    disease_points(disease) + age_points(age)
}

pub fn score_priority(age: u32, disease: &str) -> Priority {
    match priority_points(age, disease) {
        p if p >= HIGH_THRESHOLD => Priority::High,
        p if p >= MEDIUM_THRESHOLD => Priority::Medium,
        _ => Priority::Low,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn critical_symptoms_are_high_at_any_age() {
        assert_eq!(score_priority(30, "Severe chest pain since morning"), Priority::High);
        assert_eq!(score_priority(22, "had a seizure"), Priority::High);
    }

    #[test]
    fn age_raises_serious_conditions() {
        assert_eq!(score_priority(35, "diabetes"), Priority::Medium);
        assert_eq!(score_priority(58, "diabetes"), Priority::High);
        assert_eq!(score_priority(70, "hypertension"), Priority::High);
    }

    #[test]
    fn mild_symptoms_stay_low_for_adults() {
        assert_eq!(score_priority(28, "headache"), Priority::Low);
        assert_eq!(score_priority(40, "mild cough and cold"), Priority::Low);
    }

    #[test]
    fn young_children_and_elderly_get_bonus() {
        assert_eq!(priority_points(3, "fever"), 3);
        assert_eq!(score_priority(3, "fever"), Priority::Medium);
        assert_eq!(score_priority(80, "cough"), Priority::Medium);
        assert_eq!(score_priority(66, "routine check"), Priority::Medium);
    }

    #[test]
    fn only_highest_tier_counts() {
        assert_eq!(priority_points(30, "fever with chest pain and diabetes"), 5);
    }
}
