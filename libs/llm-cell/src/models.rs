use std::fmt;

use serde::{Deserialize, Serialize};

use calendar_cell::CalendarEvent;

/// What an inbound message is asking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Intent {
    Register,
    Enquiry,
    BookAppointment,
    CancelAppointment,
    ChangeLanguage,
    Unknown,
}

impl Intent {
    pub const LABELS: [&'static str; 5] = [
        "register",
        "enquiry",
        "book appointment",
        "cancel appointment",
        "change language",
    ];

    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().replace('_', " ").as_str() {
            "register" => Intent::Register,
            "enquiry" | "inquiry" => Intent::Enquiry,
            "book appointment" => Intent::BookAppointment,
            "cancel appointment" => Intent::CancelAppointment,
            "change language" => Intent::ChangeLanguage,
            _ => Intent::Unknown,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Intent::Register => "register",
            Intent::Enquiry => "enquiry",
            Intent::BookAppointment => "book appointment",
            Intent::CancelAppointment => "cancel appointment",
            Intent::ChangeLanguage => "change language",
            Intent::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self { role: ChatRole::User, content: content.into() }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: ChatRole::Assistant, content: content.into() }
    }
}

/// Calendar call proposed by the model for a booking message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarCommand {
    pub method: String,
    #[serde(default)]
    pub params: CalendarEvent,
}
