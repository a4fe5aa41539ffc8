//! Turns one inbound message into one reply.
//!
//! Greetings are answered without a model call. Everything else is
//! classified first and routed to registration, booking, cancellation,
//! language change or a contextual reply.

use std::sync::Arc;

use anyhow::{anyhow, bail, Result};
use chrono::{Duration, Utc};
use chrono_tz::Tz;
use tracing::{info, instrument, warn};

use calendar_cell::{CalendarClient, CalendarEvent, CalendarMethod, ListEventsQuery};
use llm_cell::{AiService, Intent};
use patient_cell::{NewPatient, Patient, PatientFields, PatientService, PatientSession, SessionStore, DEFAULT_LANGUAGE};
use shared_config::AppConfig;
use shared_utils::phone::normalize_phone;
use translation_cell::{is_supported, supported_languages, translation_needed, SarvamTranslator, SpeakerGender};

use crate::services::heuristics::MessageHeuristics;
use crate::services::reply::NOT_UNDERSTOOD;
use crate::services::triage::assign_priority;
use crate::state::MessagingState;

const CANCELLATION_WINDOW_DAYS: i64 = 30;

const REGISTRATION_PROMPT: &str = "Hello! Welcome to our clinic. To register, please share your name, age, \
     gender, the symptoms or condition you need help with, and the language you prefer.";

pub struct ConversationService {
    config: Arc<AppConfig>,
    sessions: Arc<dyn SessionStore>,
    heuristics: Arc<MessageHeuristics>,
    patients: PatientService,
    ai: AiService,
    translator: SarvamTranslator,
}

impl ConversationService {
    pub fn new(state: &MessagingState) -> Self {
        Self {
            config: state.config.clone(),
            sessions: state.sessions.clone(),
            heuristics: state.heuristics.clone(),
            patients: PatientService::new(&state.config),
            ai: AiService::new(&state.config),
            translator: SarvamTranslator::new(&state.config),
        }
    }

    fn db_token(&self) -> String {
        self.patients.supabase().service_token().to_string()
    }

    fn clinic_tz(&self) -> Tz {
        self.config.clinic_tz().unwrap_or(Tz::UTC)
    }

    /// Translate into the patient's language, sending English if that fails.
    async fn localize(&self, text: String, language: &str) -> String {
        if !translation_needed(language) {
            return text;
        }
        match self.translator.translate(&text, language, SpeakerGender::Female).await {
            Ok(translated) => translated,
            Err(e) => {
                warn!("Sending untranslated reply: {}", e);
                text
            }
        }
    }

    #[instrument(skip(self, message, from), fields(phone = %normalize_phone(from)))]
    pub async fn handle(&self, message: &str, from: &str) -> Result<String> {
        let phone = normalize_phone(from);
        if phone.is_empty() {
            bail!("inbound message has no sender");
        }
        let message = message.trim();
        let token = self.db_token();

        if self.heuristics.is_greeting(message) {
            return self.greet(&phone, &token).await;
        }

        let intent = self.ai.classify_intent(message).await?;
        let patient = self.patients.get_by_phone(&phone, &token).await?;
        let session = self.sessions.get(&phone).await?;
        info!("Handling {} message ({})", intent, if patient.is_some() { "registered" } else { "new" });

        match (intent, patient) {
            (Intent::ChangeLanguage, patient) => self.change_language(message, &phone, patient, &token).await,
            (Intent::BookAppointment, Some(patient)) => self.book(message, &patient).await,
            (Intent::CancelAppointment, Some(patient)) => self.cancel(message, &patient).await,
            (Intent::BookAppointment | Intent::CancelAppointment, None) => Ok(format!(
                "Please register before managing appointments. {}",
                REGISTRATION_PROMPT
            )),
            (Intent::Register, None) => self.register_step(message, &phone, session, &token).await,
            (_, None) if self.heuristics.has_patient_info(message) || session.has_any_field() => {
                self.register_step(message, &phone, session, &token).await
            }
            (Intent::Register, Some(patient)) => {
                let reply = format!("You're already registered, {}. How can I help you today?", patient.name);
                Ok(self.localize(reply, patient.preferred_language()).await)
            }
            (Intent::Enquiry, Some(patient)) => Ok(self.ai.contextual_reply(&patient, message).await?),
            (Intent::Enquiry, None) => {
                Ok(self.ai.registration_reply(message, &session.missing_fields()).await?)
            }
            (Intent::Unknown, _) => Ok(NOT_UNDERSTOOD.to_string()),
        }
    }

    async fn greet(&self, phone: &str, token: &str) -> Result<String> {
        match self.patients.get_by_phone(phone, token).await? {
            Some(patient) => {
                let reply = format!("Welcome back, {}! How can I help you today?", patient.name);
                Ok(self.localize(reply, patient.preferred_language()).await)
            }
            None => Ok(REGISTRATION_PROMPT.to_string()),
        }
    }

    async fn register_step(&self, message: &str, phone: &str, session: PatientSession, token: &str) -> Result<String> {
        let fields = self.ai.extract_patient_fields(message, &session).await?;
        let session = self.sessions.merge(phone, &fields).await?;

        if !session.is_complete() {
            let reply = self.ai.registration_reply(message, &session.missing_fields()).await?;
            return Ok(reply);
        }

        let fields = self.ai.correct_registration(&session.fields()).await;
        self.complete_registration(phone, fields, token).await
    }

    async fn complete_registration(&self, phone: &str, fields: PatientFields, token: &str) -> Result<String> {
        if self.patients.phone_exists(phone, token).await? {
            self.sessions.clear(phone).await?;
            return Ok("You're already registered with us. How can I help you today?".to_string());
        }

        let (age, disease) = fields
            .age
            .zip(fields.disease.clone())
            .ok_or_else(|| anyhow!("registration session lost required fields"))?;
        let priority = assign_priority(self.config.priority_strategy, &self.ai, age, &disease).await;

        let new_patient = NewPatient::from_fields(phone, &fields, priority)
            .ok_or_else(|| anyhow!("registration session lost required fields"))?;
        let patient = self.patients.insert(new_patient, token).await?;
        self.sessions.clear(phone).await?;

        let explanation = match self.ai.explain_disease(&patient.disease, DEFAULT_LANGUAGE).await {
            Ok(text) => format!(" {}", text),
            Err(e) => {
                warn!("No condition explanation: {}", e);
                String::new()
            }
        };

        let reply = format!(
            "Thank you, {}! Your registration is complete. Your case has been marked {} priority.{}",
            patient.name, patient.priority, explanation
        );
        Ok(self.localize(reply, patient.preferred_language()).await)
    }

    async fn book(&self, message: &str, patient: &Patient) -> Result<String> {
        let now = Utc::now().with_timezone(&self.clinic_tz());
        let command = self.ai.build_calendar_command(message, patient, now).await?;

        if command.method.parse::<CalendarMethod>() != Ok(CalendarMethod::InsertEvent) {
            warn!("Refusing calendar method {} from a patient message", command.method);
            let reply = "I can only book new appointments here. Please tell me the day and time you'd like.".to_string();
            return Ok(self.localize(reply, patient.preferred_language()).await);
        }

        let mut event = command.params;
        if event.start.instant().is_none() || event.end.instant().is_none() {
            let reply = "Please tell me the day and time you'd like your appointment.".to_string();
            return Ok(self.localize(reply, patient.preferred_language()).await);
        }
        event.id = None;
        event.description = Some(booking_description(event.description.as_deref(), patient));

        let created = CalendarClient::new(&self.config).insert_event(&event).await?;
        info!("Booked appointment {:?} for patient {}", created.id, patient.id);

        let reply = format!(
            "Your appointment \"{}\" is booked for {}.",
            created.summary,
            created.start.display()
        );
        Ok(self.localize(reply, patient.preferred_language()).await)
    }

    async fn cancel(&self, message: &str, patient: &Patient) -> Result<String> {
        let client = CalendarClient::new(&self.config);
        let now = Utc::now();

        let events: Vec<CalendarEvent> = client
            .list_events(&ListEventsQuery {
                time_min: Some(now.to_rfc3339()),
                time_max: Some((now + Duration::days(CANCELLATION_WINDOW_DAYS)).to_rfc3339()),
                max_results: None,
            })
            .await?
            .into_iter()
            .filter(|event| belongs_to(event, patient))
            .collect();

        let matched = self
            .ai
            .match_event_for_cancellation(message, &events)
            .await?
            .and_then(|id| events.iter().find(|event| event.id.as_deref() == Some(id.as_str())));

        let reply = match matched {
            Some(event) => {
                let event_id = event.id.as_deref().unwrap_or_default();
                client.delete_event(event_id).await?;
                info!("Cancelled appointment {} for patient {}", event_id, patient.id);
                format!(
                    "Your appointment \"{}\" on {} has been cancelled.",
                    event.summary,
                    event.start.display()
                )
            }
            None => "I couldn't find an upcoming appointment matching your message.".to_string(),
        };
        Ok(self.localize(reply, patient.preferred_language()).await)
    }

    async fn change_language(
        &self,
        message: &str,
        phone: &str,
        patient: Option<Patient>,
        token: &str,
    ) -> Result<String> {
        let supported = supported_languages().join(", ");

        let language = match self.ai.extract_language(message).await? {
            Some(language) if is_supported(&language) => language,
            Some(language) => {
                return Ok(format!("Sorry, I can't reply in {} yet. I support: {}.", language, supported));
            }
            None => return Ok(format!("Which language would you like me to use? I support: {}.", supported)),
        };

        match patient {
            Some(_) => {
                self.patients.update_language(phone, &language, token).await?;
            }
            None => {
                let fields = PatientFields {
                    language: Some(language.clone()),
                    ..Default::default()
                };
                self.sessions.merge(phone, &fields).await?;
            }
        }

        info!("Language changed to {}", language);
        let reply = format!("Done! I'll reply in {} from now on.", language);
        Ok(self.localize(reply, &language).await)
    }
}

/// Description stored on booked events. Carries the priority label the
/// rescheduler reads back and the phone number used to scope cancellations.
pub fn booking_description(purpose: Option<&str>, patient: &Patient) -> String {
    let purpose = purpose.map(str::trim).filter(|p| !p.is_empty());
    let details = format!(
        "Patient: {} ({} years, {}), phone {}. Condition: {}. {} priority",
        patient.name, patient.age, patient.gender, patient.phone_number, patient.disease, patient.priority
    );

    match purpose {
        Some(purpose) => format!("{}\n{}", purpose, details),
        None => details,
    }
}

fn belongs_to(event: &CalendarEvent, patient: &Patient) -> bool {
    event
        .description
        .as_deref()
        .is_some_and(|d| d.contains(&patient.phone_number))
}
