use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Start or end of an event. Timed events carry `dateTime`, all-day events only `date`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EventDateTime {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
}

impl EventDateTime {
    pub fn timed(date_time: impl Into<String>, time_zone: Option<&str>) -> Self {
        Self {
            date_time: Some(date_time.into()),
            date: None,
            time_zone: time_zone.map(str::to_string),
        }
    }

    /// Parsed instant for timed events; `None` for all-day or malformed values.
    pub fn instant(&self) -> Option<DateTime<FixedOffset>> {
        self.date_time
            .as_deref()
            .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
    }

    /// Human readable form used in chat replies.
    pub fn display(&self) -> String {
        self.date_time
            .clone()
            .or_else(|| self.date.clone())
            .unwrap_or_else(|| "unknown time".to_string())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Attendee {
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_status: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default)]
    pub start: EventDateTime,
    #[serde(default)]
    pub end: EventDateTime,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attendees: Vec<Attendee>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html_link: Option<String>,
    /// Provider fields this crate does not model (reminders, conferenceData,
    /// recurrence, ...). Kept so a full `PUT` writes them back unchanged.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CalendarEvent {
    pub fn is_all_day(&self) -> bool {
        self.start.date_time.is_none() && self.start.date.is_some()
    }

    /// One line per event, as fed to the language model and shown to staff.
    pub fn brief(&self) -> String {
        format!(
            "[{}] {} ({} - {}){}",
            self.id.as_deref().unwrap_or("no-id"),
            self.summary,
            self.start.display(),
            self.end.display(),
            self.description
                .as_deref()
                .filter(|d| !d.is_empty())
                .map(|d| format!(": {}", d))
                .unwrap_or_default()
        )
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventList {
    #[serde(default)]
    pub items: Vec<CalendarEvent>,
}

/// Filters accepted by the list call. Bounds are RFC 3339 strings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ListEventsQuery {
    pub time_min: Option<String>,
    pub time_max: Option<String>,
    pub max_results: Option<u32>,
}

/// Operations reachable through the `{method, params}` proxy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalendarMethod {
    ListEvents,
    InsertEvent,
    UpdateEvent,
    DeleteEvent,
    ListCalendars,
}

impl CalendarMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            CalendarMethod::ListEvents => "calendar.events.list",
            CalendarMethod::InsertEvent => "calendar.events.insert",
            CalendarMethod::UpdateEvent => "calendar.events.update",
            CalendarMethod::DeleteEvent => "calendar.events.delete",
            CalendarMethod::ListCalendars => "calendar.calendarList.list",
        }
    }
}

impl FromStr for CalendarMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "calendar.events.list" => Ok(CalendarMethod::ListEvents),
            "calendar.events.insert" => Ok(CalendarMethod::InsertEvent),
            "calendar.events.update" => Ok(CalendarMethod::UpdateEvent),
            "calendar.events.delete" => Ok(CalendarMethod::DeleteEvent),
            "calendar.calendarList.list" => Ok(CalendarMethod::ListCalendars),
            other => Err(other.to_string()),
        }
    }
}

impl fmt::Display for CalendarMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct McpRequest {
    pub method: String,
    #[serde(default)]
    pub params: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct McpResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl McpResponse {
    pub fn ok(data: Value) -> Self {
        Self { success: true, data: Some(data), error: None }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self { success: false, data: None, error: Some(error.into()) }
    }
}

/// Priority inferred from an event's free text.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum EventPriority {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TimeRange {
    #[default]
    Today,
    Week,
    Month,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum PriorityOrder {
    #[default]
    HighToLow,
    LowToHigh,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RescheduleRequest {
    #[serde(default)]
    pub time_range: TimeRange,
    #[serde(default)]
    pub priority_order: PriorityOrder,
    #[serde(default = "default_true")]
    pub respect_working_hours: bool,
}

fn default_true() -> bool {
    true
}

impl Default for RescheduleRequest {
    fn default() -> Self {
        Self {
            time_range: TimeRange::default(),
            priority_order: PriorityOrder::default(),
            respect_working_hours: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RescheduledEvent {
    pub id: String,
    pub summary: String,
    pub priority: EventPriority,
    pub old_time: String,
    pub new_time: String,
}

/// A computed move that has not been applied yet.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedMove {
    pub event: CalendarEvent,
    pub priority: EventPriority,
    pub new_start: DateTime<FixedOffset>,
    pub new_end: DateTime<FixedOffset>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RescheduleResult {
    pub message: String,
    pub rescheduled_events: Vec<RescheduledEvent>,
    pub total_events: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolExecuteRequest {
    pub tool: String,
    #[serde(default)]
    pub parameters: Value,
}
