use serde::{Deserialize, Serialize};

use calendar_cell::CalendarEvent;
use llm_cell::ChatMessage;

/// Form fields posted by the messaging provider.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InboundMessage {
    #[serde(rename = "Body", default)]
    pub body: String,
    #[serde(rename = "From", default)]
    pub from: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssistantRequest {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub conversation_history: Vec<ChatMessage>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentAction {
    List,
    Create,
    Update,
    Delete,
    Insights,
    Chat,
    Error,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub events: Option<Vec<CalendarEvent>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insights: Option<String>,
    pub action: AgentAction,
}

impl AssistantResponse {
    pub fn new(message: impl Into<String>, action: AgentAction) -> Self {
        Self {
            message: message.into(),
            events: None,
            insights: None,
            action,
        }
    }

    pub fn with_events(mut self, events: Vec<CalendarEvent>) -> Self {
        self.events = Some(events);
        self
    }
}
