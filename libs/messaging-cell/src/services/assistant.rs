use anyhow::Result;
use chrono::Utc;
use chrono_tz::Tz;
use tracing::{error, instrument};

use calendar_cell::{CalendarClient, ListEventsQuery};
use llm_cell::{AiService, ChatMessage};
use shared_config::AppConfig;

use crate::models::{AgentAction, AssistantResponse};

const AGENT_ERROR: &str = "I apologize, but I encountered an error processing your request. Please try again.";
const CALENDAR_ERROR: &str =
    "I encountered an error while accessing your calendar. Please check your permissions and try again.";

/// Calendar action implied by a staff message, if it mentions the calendar at all.
pub fn detect_calendar_intent(message: &str) -> Option<AgentAction> {
    let lower = message.to_lowercase();
    let mentions = |words: &[&str]| words.iter().any(|w| lower.contains(w));

    if !mentions(&["calendar", "event", "schedule"]) {
        return None;
    }

    if mentions(&["list", "show", "what"]) {
        Some(AgentAction::List)
    } else if mentions(&["create", "add", "schedule"]) {
        Some(AgentAction::Create)
    } else if mentions(&["update", "modify", "change"]) {
        Some(AgentAction::Update)
    } else if mentions(&["delete", "remove", "cancel"]) {
        Some(AgentAction::Delete)
    } else if mentions(&["insight", "analyze", "analyse", "summary"]) {
        Some(AgentAction::Insights)
    } else {
        None
    }
}

/// Dashboard chat agent over the LLM and the clinic calendar.
pub struct AssistantAgent {
    ai: AiService,
    calendar: CalendarClient,
    tz: Tz,
}

impl AssistantAgent {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            ai: AiService::new(config),
            calendar: CalendarClient::new(config),
            tz: config.clinic_tz().unwrap_or(Tz::UTC),
        }
    }

    #[instrument(skip(self, history))]
    pub async fn process(&self, message: &str, history: Vec<ChatMessage>) -> AssistantResponse {
        let mut history = history;
        history.push(ChatMessage::user(message));

        let outcome = match detect_calendar_intent(message) {
            Some(action) => self.calendar_request(message, &history, action).await.map_err(|e| (e, CALENDAR_ERROR)),
            None => self
                .ai
                .chat(&history, None)
                .await
                .map(|reply| AssistantResponse::new(reply, AgentAction::Chat))
                .map_err(|e| (e.into(), AGENT_ERROR)),
        };

        outcome.unwrap_or_else(|(e, reply): (anyhow::Error, &str)| {
            error!("Assistant request failed: {:#}", e);
            AssistantResponse::new(reply, AgentAction::Error)
        })
    }

    async fn calendar_request(
        &self,
        message: &str,
        history: &[ChatMessage],
        action: AgentAction,
    ) -> Result<AssistantResponse> {
        match action {
            AgentAction::Create => self.create_event(message, history).await,
            AgentAction::Update | AgentAction::Delete => {
                let hint = if action == AgentAction::Update {
                    "I can help you update events. Please specify which event you'd like to modify and what changes you want to make."
                } else {
                    "I can help you delete events. Please specify which event you'd like to remove."
                };
                let mut history = history.to_vec();
                history.push(ChatMessage::assistant(hint));
                let reply = self.ai.chat(&history, None).await?;
                Ok(AssistantResponse::new(reply, action))
            }
            AgentAction::Insights => {
                let events = self.calendar.list_events(&ListEventsQuery::default()).await?;
                let insights = self
                    .ai
                    .calendar_insights(&events)
                    .await
                    .unwrap_or_else(|_| "Unable to generate calendar insights at this time.".to_string());

                let mut history = history.to_vec();
                history.push(ChatMessage::assistant(insights.clone()));
                let reply = self.ai.chat(&history, None).await?;

                Ok(AssistantResponse {
                    insights: Some(insights),
                    ..AssistantResponse::new(reply, AgentAction::Insights).with_events(events)
                })
            }
            _ => {
                let events = self.calendar.list_events(&ListEventsQuery::default()).await?;
                let reply = self.ai.chat(history, Some(&events)).await?;
                Ok(AssistantResponse::new(reply, AgentAction::List).with_events(events))
            }
        }
    }

    async fn create_event(&self, message: &str, history: &[ChatMessage]) -> Result<AssistantResponse> {
        let now = Utc::now().with_timezone(&self.tz);
        let event = match self.ai.extract_event(message, now).await {
            Ok(event) => event,
            Err(e) => {
                error!("Could not extract event details: {}", e);
                return Ok(AssistantResponse::new(
                    "I had trouble understanding the event details. Please provide the event information in a clear format.",
                    AgentAction::Error,
                ));
            }
        };

        let created = self.calendar.insert_event(&event).await?;

        let mut history = history.to_vec();
        history.push(ChatMessage::assistant(format!("I've created the event: {}", created.summary)));
        let reply = self.ai.chat(&history, None).await?;

        Ok(AssistantResponse::new(reply, AgentAction::Create).with_events(vec![created]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_calendar_actions() {
        assert_eq!(detect_calendar_intent("show my calendar"), Some(AgentAction::List));
        assert_eq!(detect_calendar_intent("add an event at 3pm"), Some(AgentAction::Create));
        assert_eq!(detect_calendar_intent("schedule a checkup"), Some(AgentAction::Create));
        assert_eq!(detect_calendar_intent("remove the 3pm event"), Some(AgentAction::Delete));
        assert_eq!(detect_calendar_intent("calendar insights please"), Some(AgentAction::Insights));
        assert_eq!(detect_calendar_intent("how are you?"), None);
    }
}
