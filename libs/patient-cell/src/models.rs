use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const DEFAULT_LANGUAGE: &str = "English";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Patient {
    pub id: Uuid,
    pub name: String,
    pub age: u32,
    pub gender: Gender,
    pub disease: String,
    pub phone_number: String,
    pub language: Option<String>,
    pub priority: Priority,
    pub created_at: DateTime<Utc>,
}

impl Patient {
    pub fn preferred_language(&self) -> &str {
        self.language
            .as_deref()
            .filter(|lang| !lang.trim().is_empty())
            .unwrap_or(DEFAULT_LANGUAGE)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    /// Accepts the loose spellings patients type ("m", "FEMALE", "woman", ...).
    pub fn parse_loose(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "m" | "male" | "man" | "boy" => Some(Gender::Male),
            "f" | "female" | "woman" | "girl" => Some(Gender::Female),
            "other" | "o" | "non-binary" | "nonbinary" => Some(Gender::Other),
            _ => None,
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gender::Male => write!(f, "Male"),
            Gender::Female => write!(f, "Female"),
            Gender::Other => write!(f, "Other"),
        }
    }
}

/// Triage label assigned at registration.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub fn from_label(raw: &str) -> Option<Self> {
        let lowered = raw.trim().to_lowercase();
        match lowered.trim_end_matches(" priority") {
            "high" => Some(Priority::High),
            "medium" => Some(Priority::Medium),
            "low" => Some(Priority::Low),
            _ => None,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::High => write!(f, "High"),
            Priority::Medium => write!(f, "Medium"),
            Priority::Low => write!(f, "Low"),
        }
    }
}

/// Row written to `patients` on a completed registration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewPatient {
    pub name: String,
    pub age: u32,
    pub gender: Gender,
    pub disease: String,
    pub phone_number: String,
    pub language: Option<String>,
    pub priority: Priority,
}

/// Any subset of the registration fields, as produced by one extraction pass.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PatientFields {
    pub name: Option<String>,
    pub age: Option<u32>,
    pub gender: Option<Gender>,
    pub disease: Option<String>,
    pub language: Option<String>,
}

impl PatientFields {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.age.is_none()
            && self.gender.is_none()
            && self.disease.is_none()
            && self.language.is_none()
    }
}

/// Partially completed registration for one phone number.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PatientSession {
    pub phone_number: String,
    pub name: Option<String>,
    pub age: Option<u32>,
    pub gender: Option<Gender>,
    pub disease: Option<String>,
    pub language: Option<String>,
    pub last_updated: DateTime<Utc>,
}

impl PatientSession {
    pub fn new(phone_number: &str) -> Self {
        Self {
            phone_number: phone_number.to_string(),
            name: None,
            age: None,
            gender: None,
            disease: None,
            language: None,
            last_updated: Utc::now(),
        }
    }

    /// Name, age, gender and disease are required; language defaults to English.
    pub fn is_complete(&self) -> bool {
        self.name.is_some() && self.age.is_some() && self.gender.is_some() && self.disease.is_some()
    }

    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.name.is_none() {
            missing.push("name");
        }
        if self.age.is_none() {
            missing.push("age");
        }
        if self.gender.is_none() {
            missing.push("gender");
        }
        if self.disease.is_none() {
            missing.push("disease");
        }
        missing
    }

    pub fn has_any_field(&self) -> bool {
        self.name.is_some()
            || self.age.is_some()
            || self.gender.is_some()
            || self.disease.is_some()
            || self.language.is_some()
    }

    /// Overwrite only the fields present in `fields` and refresh `last_updated`.
    pub fn merge(&mut self, fields: &PatientFields, now: DateTime<Utc>) {
        if let Some(name) = &fields.name {
            self.name = Some(name.clone());
        }
        if let Some(age) = fields.age {
            self.age = Some(age);
        }
        if let Some(gender) = fields.gender {
            self.gender = Some(gender);
        }
        if let Some(disease) = &fields.disease {
            self.disease = Some(disease.clone());
        }
        if let Some(language) = &fields.language {
            self.language = Some(language.clone());
        }
        self.last_updated = now;
    }

    pub fn fields(&self) -> PatientFields {
        PatientFields {
            name: self.name.clone(),
            age: self.age,
            gender: self.gender,
            disease: self.disease.clone(),
            language: self.language.clone(),
        }
    }
}

impl NewPatient {
    /// Build the insert row from a complete set of fields.
    pub fn from_fields(phone_number: &str, fields: &PatientFields, priority: Priority) -> Option<Self> {
        Some(Self {
            name: fields.name.clone()?,
            age: fields.age?,
            gender: fields.gender?,
            disease: fields.disease.clone()?,
            phone_number: phone_number.to_string(),
            language: fields.language.clone(),
            priority,
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PrioritySummary {
    pub total: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

impl PrioritySummary {
    pub fn from_patients(patients: &[Patient]) -> Self {
        patients.iter().fold(Self::default(), |mut summary, patient| {
            summary.total += 1;
            match patient.priority {
                Priority::High => summary.high += 1,
                Priority::Medium => summary.medium += 1,
                Priority::Low => summary.low += 1,
            }
            summary
        })
    }
}
