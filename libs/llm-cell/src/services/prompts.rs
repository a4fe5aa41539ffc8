//! Prompt templates. Every structured prompt asks for a bare JSON object.

use calendar_cell::CalendarEvent;
use patient_cell::{Patient, PatientFields, PatientSession};

use crate::models::{ChatMessage, ChatRole, Intent};

pub fn intent(message: &str) -> String {
    let labels = Intent::LABELS
        .iter()
        .map(|label| format!("\"{}\"", label))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "Classify the intent of this message sent to a clinic's WhatsApp assistant.\n\
         Allowed intents: {labels}.\n\
         Reply with JSON only, in the form {{\"intent\": \"<one of the allowed intents>\"}}.\n\n\
         Message: \"{message}\""
    )
}

fn known_fields(session: &PatientSession) -> String {
    let mut known = Vec::new();
    if let Some(name) = &session.name {
        known.push(format!("name: {}", name));
    }
    if let Some(age) = session.age {
        known.push(format!("age: {}", age));
    }
    if let Some(gender) = session.gender {
        known.push(format!("gender: {}", gender));
    }
    if let Some(disease) = &session.disease {
        known.push(format!("disease: {}", disease));
    }
    if let Some(language) = &session.language {
        known.push(format!("language: {}", language));
    }

    if known.is_empty() {
        "nothing yet".to_string()
    } else {
        known.join(", ")
    }
}

pub fn extract_patient(message: &str, session: &PatientSession) -> String {
    let mut missing = session.missing_fields();
    if session.language.is_none() {
        missing.push("language");
    }

    format!(
        "Extract patient registration details from this message.\n\
         Already known: {known}.\n\
         Still missing: {missing}.\n\
         Return JSON only with the keys name, age, gender, disease, language. \
         Use null for anything the message does not state. age is a number; \
         gender is Male, Female or Other; disease is the symptom or condition \
         in the patient's words; language is the language name they prefer.\n\n\
         Message: \"{message}\"",
        known = known_fields(session),
        missing = missing.join(", "),
    )
}

pub fn correct_registration(fields: &PatientFields) -> String {
    format!(
        "Correct obvious spelling mistakes in these patient registration values. \
         Keep the meaning; do not translate.\n\
         name: {}\ndisease: {}\nlanguage: {}\n\
         Return JSON only: {{\"name\": \"...\", \"disease\": \"...\", \"language\": \"...\"}}",
        fields.name.as_deref().unwrap_or(""),
        fields.disease.as_deref().unwrap_or(""),
        fields.language.as_deref().unwrap_or(""),
    )
}

pub fn priority(age: u32, disease: &str) -> String {
    format!(
        "Assign a triage priority for a {age} year old patient reporting: \"{disease}\".\n\
         Return JSON only: {{\"priority\": \"High\" | \"Medium\" | \"Low\"}}"
    )
}

pub fn explain_disease(disease: &str, language: &str) -> String {
    format!(
        "In two short sentences, explain \"{disease}\" to a patient in plain words \
         and suggest when to seek urgent care. Do not diagnose. Respond in {language}."
    )
}

pub fn calendar_command(message: &str, patient: &Patient, now: &str, time_zone: &str) -> String {
    format!(
        "A registered patient wants to book an appointment. The current time is {now} ({time_zone}).\n\
         Patient: {name}, {age} years, {gender}. Condition: {disease}.\n\
         Return JSON only in this form:\n\
         {{\"method\": \"calendar.events.insert\", \"params\": {{\
         \"summary\": \"<short appointment title>\", \
         \"description\": \"<purpose of the visit>\", \
         \"start\": {{\"dateTime\": \"<RFC 3339>\", \"timeZone\": \"{time_zone}\"}}, \
         \"end\": {{\"dateTime\": \"<RFC 3339>\", \"timeZone\": \"{time_zone}\"}}}}}}\n\
         Appointments last 30 minutes unless the message says otherwise.\n\n\
         Message: \"{message}\"",
        name = patient.name,
        age = patient.age,
        gender = patient.gender,
        disease = patient.disease,
    )
}

pub fn match_event(message: &str, events: &[CalendarEvent]) -> String {
    let listing = events
        .iter()
        .map(|event| format!("- {}", event.brief()))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "A patient wants to cancel an appointment. Pick the event they mean from this list \
         (the id is in square brackets):\n{listing}\n\n\
         Return JSON only: {{\"event_id\": \"<id>\"}} or {{\"event_id\": null}} if none matches.\n\n\
         Message: \"{message}\""
    )
}

pub fn extract_language(message: &str) -> String {
    format!(
        "Which language does the sender want to switch to? \
         Return JSON only: {{\"language\": \"<language name in English>\"}} or {{\"language\": null}}.\n\n\
         Message: \"{message}\""
    )
}

pub fn contextual_reply(patient: &Patient, message: &str) -> String {
    format!(
        "Patient: {name} ({age} years, {gender})\n\
         Condition: {disease}\n\n\
         User: {message}\n\n\
         Instructions:\n\
         - Respond as a caring healthcare assistant\n\
         - Use the patient's name when appropriate\n\
         - Keep the response under 3 sentences\n\
         - Respond in {language}\n\n\
         Provide support, not medical advice.",
        name = patient.name,
        age = patient.age,
        gender = patient.gender,
        disease = patient.disease,
        language = patient.preferred_language(),
    )
}

pub fn registration_reply(message: &str, missing: &[&str]) -> String {
    format!(
        "New patient registration. Message: \"{message}\"\n\n\
         Instructions:\n\
         - Help complete the registration naturally\n\
         - Ask only for the missing details: {missing}\n\
         - Do not ask for an address or anything else\n\
         - Keep the response under 2 sentences\n\
         - For the condition, ask what symptoms brought them in\n\
         - Respond in the patient's preferred language if they mention one",
        missing = missing.join(", "),
    )
}

pub fn chat(history: &[ChatMessage], events: Option<&[CalendarEvent]>) -> String {
    let mut prompt = String::from(
        "You are an assistant for clinic staff. You can view upcoming calendar events, \
         help schedule or modify appointments, give calendar insights and answer general questions.\n\n\
         Conversation so far:\n",
    );

    for message in history {
        let speaker = match message.role {
            ChatRole::User => "User",
            ChatRole::Assistant => "Assistant",
        };
        prompt.push_str(&format!("{}: {}\n", speaker, message.content));
    }

    if let Some(events) = events.filter(|events| !events.is_empty()) {
        prompt.push_str("\nCurrent calendar events:\n");
        for event in events {
            prompt.push_str(&format!("- {} ({} to {})\n", event.summary, event.start.display(), event.end.display()));
        }
    }

    prompt.push_str("\nRespond as the assistant.");
    prompt
}

pub fn calendar_insights(events: &[CalendarEvent]) -> String {
    let listing = events
        .iter()
        .map(|event| format!("- {} ({} to {})", event.summary, event.start.display(), event.end.display()))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Analyse these calendar events:\n{listing}\n\n\
         Provide a short summary of the schedule, any conflicts or overlaps, \
         suggestions for better time management and the important events to prepare for."
    )
}

pub fn extract_event(message: &str, now: &str, time_zone: &str) -> String {
    format!(
        "Extract event details from this message. The current time is {now} ({time_zone}).\n\
         Return JSON only with: summary, description (optional), \
         start {{dateTime, timeZone}}, end {{dateTime, timeZone}}, location (optional). \
         Use {time_zone} when no timezone is given.\n\n\
         Message: \"{message}\""
    )
}
