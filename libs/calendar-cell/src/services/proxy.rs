//! `{method, params}` forwarding to the calendar client.
//!
//! Params follow the provider's own naming (`calendarId`, `eventId`, `timeMin`,
//! `timeMax`, `maxResults`) with the event body under `resource` or `requestBody`.

use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use crate::error::CalendarError;
use crate::models::{CalendarEvent, CalendarMethod, ListEventsQuery, McpRequest};
use crate::services::client::CalendarClient;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProxyParams {
    calendar_id: Option<String>,
    event_id: Option<String>,
    time_min: Option<String>,
    time_max: Option<String>,
    max_results: Option<u32>,
    #[serde(alias = "requestBody")]
    resource: Option<CalendarEvent>,
}

impl ProxyParams {
    fn parse(raw: Value) -> Result<Self, CalendarError> {
        if raw.is_null() {
            return Ok(Self::default());
        }
        serde_json::from_value(raw).map_err(|e| CalendarError::InvalidParams(e.to_string()))
    }

    fn event_id(&self) -> Result<&str, CalendarError> {
        self.event_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .ok_or_else(|| CalendarError::InvalidParams("eventId is required".to_string()))
    }

    fn take_resource(&mut self) -> Result<CalendarEvent, CalendarError> {
        self.resource
            .take()
            .ok_or_else(|| CalendarError::InvalidParams("resource is required".to_string()))
    }
}

/// Run one proxied call and return the provider-shaped payload.
pub async fn dispatch(client: &CalendarClient, request: McpRequest) -> Result<Value, CalendarError> {
    let method: CalendarMethod = request
        .method
        .parse()
        .map_err(CalendarError::UnknownMethod)?;
    let mut params = ProxyParams::parse(request.params)?;

    let client = match params.calendar_id.as_deref() {
        Some(id) if !id.is_empty() && id != client.calendar_id() => client.for_calendar(id),
        _ => client.clone(),
    };

    info!("Calendar proxy call {}", method);

    match method {
        CalendarMethod::ListEvents => {
            let query = ListEventsQuery {
                time_min: params.time_min.take(),
                time_max: params.time_max.take(),
                max_results: params.max_results,
            };
            let items = client.list_events(&query).await?;
            Ok(json!({ "items": items }))
        }
        CalendarMethod::InsertEvent => {
            let event = params.take_resource()?;
            Ok(json!(client.insert_event(&event).await?))
        }
        CalendarMethod::UpdateEvent => {
            let event_id = params.event_id()?.to_string();
            let event = params.take_resource()?;
            Ok(json!(client.update_event(&event_id, &event).await?))
        }
        CalendarMethod::DeleteEvent => {
            client.delete_event(params.event_id()?).await?;
            Ok(json!({ "deleted": true }))
        }
        CalendarMethod::ListCalendars => {
            let items = client.list_calendars().await?;
            Ok(json!({ "items": items }))
        }
    }
}
