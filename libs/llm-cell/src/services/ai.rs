use chrono::DateTime;
use chrono_tz::Tz;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use calendar_cell::CalendarEvent;
use patient_cell::{Gender, Patient, PatientFields, PatientSession, Priority};
use shared_config::AppConfig;

use crate::error::LlmError;
use crate::models::{CalendarCommand, ChatMessage, Intent};
use crate::services::{gemini::GeminiClient, json::parse_json, prompts};

const MIN_AGE: u32 = 1;
const MAX_AGE: u32 = 120;

#[derive(Deserialize)]
struct IntentReply {
    intent: String,
}

#[derive(Deserialize)]
struct RawFields {
    #[serde(default)]
    name: Value,
    #[serde(default)]
    age: Value,
    #[serde(default)]
    gender: Value,
    #[serde(default)]
    disease: Value,
    #[serde(default)]
    language: Value,
}

#[derive(Deserialize)]
struct PriorityReply {
    priority: String,
}

#[derive(Deserialize)]
struct EventIdReply {
    event_id: Option<String>,
}

#[derive(Deserialize)]
struct LanguageReply {
    language: Option<String>,
}

fn text_field(value: &Value) -> Option<String> {
    value
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty() && !s.eq_ignore_ascii_case("null") && !s.eq_ignore_ascii_case("unknown"))
        .map(str::to_string)
}

fn age_field(value: &Value) -> Option<u32> {
    let age = match value {
        Value::Number(n) => n.as_u64().or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64)),
        Value::String(s) => s
            .trim()
            .split(|c: char| !c.is_ascii_digit())
            .find(|part| !part.is_empty())
            .and_then(|digits| digits.parse().ok()),
        _ => None,
    }?;

    u32::try_from(age).ok().filter(|age| (MIN_AGE..=MAX_AGE).contains(age))
}

impl RawFields {
    fn validate(self) -> PatientFields {
        PatientFields {
            name: text_field(&self.name),
            age: age_field(&self.age),
            gender: self.gender.as_str().and_then(Gender::parse_loose),
            disease: text_field(&self.disease),
            language: text_field(&self.language),
        }
    }
}

/// Prompt-level operations over the Gemini client.
pub struct AiService {
    gemini: GeminiClient,
}

impl AiService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            gemini: GeminiClient::new(config),
        }
    }

    /// Labels the model does not recognise become `Intent::Unknown`;
    /// transport failures are still errors.
    pub async fn classify_intent(&self, message: &str) -> Result<Intent, LlmError> {
        let reply = self.gemini.generate(&prompts::intent(message)).await?;

        let intent = match parse_json::<IntentReply>(&reply) {
            Ok(parsed) => Intent::from_label(&parsed.intent),
            Err(e) => {
                warn!("Could not parse intent reply: {}", e);
                Intent::Unknown
            }
        };

        debug!("Classified intent: {}", intent);
        Ok(intent)
    }

    pub async fn extract_patient_fields(&self, message: &str, session: &PatientSession) -> Result<PatientFields, LlmError> {
        let reply = self.gemini.generate(&prompts::extract_patient(message, session)).await?;
        let raw: RawFields = parse_json(&reply)?;
        let fields = raw.validate();
        debug!("Extracted registration fields: {:?}", fields);
        Ok(fields)
    }

    /// Spelling fixes for free-text fields. Never fails: on any problem the
    /// input is returned unchanged.
    pub async fn correct_registration(&self, fields: &PatientFields) -> PatientFields {
        let corrected = match self.gemini.generate(&prompts::correct_registration(fields)).await {
            Ok(reply) => parse_json::<RawFields>(&reply),
            Err(e) => Err(e),
        };

        match corrected {
            Ok(raw) => PatientFields {
                name: text_field(&raw.name).or_else(|| fields.name.clone()),
                disease: text_field(&raw.disease).or_else(|| fields.disease.clone()),
                language: text_field(&raw.language).or_else(|| fields.language.clone()),
                ..fields.clone()
            },
            Err(e) => {
                warn!("Spelling correction skipped: {}", e);
                fields.clone()
            }
        }
    }

    pub async fn classify_priority(&self, age: u32, disease: &str) -> Result<Priority, LlmError> {
        let reply = self.gemini.generate(&prompts::priority(age, disease)).await?;

        let label = parse_json::<PriorityReply>(&reply)
            .map(|parsed| parsed.priority)
            .unwrap_or_else(|_| reply.trim().to_string());

        Priority::from_label(&label).ok_or(LlmError::UnexpectedReply(label))
    }

    pub async fn explain_disease(&self, disease: &str, language: &str) -> Result<String, LlmError> {
        let reply = self.gemini.generate(&prompts::explain_disease(disease, language)).await?;
        Ok(reply.trim().to_string())
    }

    pub async fn build_calendar_command(
        &self,
        message: &str,
        patient: &Patient,
        now: DateTime<Tz>,
    ) -> Result<CalendarCommand, LlmError> {
        let prompt = prompts::calendar_command(message, patient, &now.to_rfc3339(), now.timezone().name());
        let reply = self.gemini.generate(&prompt).await?;
        parse_json(&reply)
    }

    /// Id of the listed event the message refers to. Ids the model invents are
    /// discarded.
    pub async fn match_event_for_cancellation(
        &self,
        message: &str,
        events: &[CalendarEvent],
    ) -> Result<Option<String>, LlmError> {
        if events.is_empty() {
            return Ok(None);
        }

        let reply = self.gemini.generate(&prompts::match_event(message, events)).await?;
        let parsed: EventIdReply = parse_json(&reply)?;

        Ok(parsed
            .event_id
            .filter(|id| events.iter().any(|event| event.id.as_deref() == Some(id.as_str()))))
    }

    pub async fn extract_language(&self, message: &str) -> Result<Option<String>, LlmError> {
        let reply = self.gemini.generate(&prompts::extract_language(message)).await?;
        let parsed: LanguageReply = parse_json(&reply)?;
        Ok(parsed.language.map(|l| l.trim().to_string()).filter(|l| !l.is_empty()))
    }

    pub async fn contextual_reply(&self, patient: &Patient, message: &str) -> Result<String, LlmError> {
        self.gemini.generate(&prompts::contextual_reply(patient, message)).await
    }

    pub async fn registration_reply(&self, message: &str, missing: &[&str]) -> Result<String, LlmError> {
        self.gemini.generate(&prompts::registration_reply(message, missing)).await
    }

    pub async fn chat(&self, history: &[ChatMessage], events: Option<&[CalendarEvent]>) -> Result<String, LlmError> {
        self.gemini.generate(&prompts::chat(history, events)).await
    }

    pub async fn calendar_insights(&self, events: &[CalendarEvent]) -> Result<String, LlmError> {
        self.gemini.generate(&prompts::calendar_insights(events)).await
    }

    pub async fn extract_event(&self, message: &str, now: DateTime<Tz>) -> Result<CalendarEvent, LlmError> {
        let prompt = prompts::extract_event(message, &now.to_rfc3339(), now.timezone().name());
        let reply = self.gemini.generate(&prompt).await?;
        let event: CalendarEvent = parse_json(&reply)?;

        if event.summary.trim().is_empty() || event.start.instant().is_none() {
            return Err(LlmError::UnexpectedReply("event needs a summary and a start time".to_string()));
        }
        Ok(event)
    }
}
