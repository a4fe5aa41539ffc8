use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error};

use shared_config::AppConfig;

use crate::error::CalendarError;
use crate::models::{CalendarEvent, EventList, ListEventsQuery};

/// Client for the Google Calendar v3 REST API.
#[derive(Clone)]
pub struct CalendarClient {
    client: Client,
    base_url: String,
    calendar_id: String,
    access_token: String,
}

impl CalendarClient {
    /// Client acting with the clinic's own calendar credentials.
    pub fn new(config: &AppConfig) -> Self {
        Self::with_token(config, &config.calendar_access_token)
    }

    /// Client acting on behalf of a caller who supplied a Google access token.
    pub fn with_token(config: &AppConfig, access_token: &str) -> Self {
        let client = Client::builder()
            .timeout(config.http_timeout())
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: config.calendar_base_url.trim_end_matches('/').to_string(),
            calendar_id: config.calendar_id.clone(),
            access_token: access_token.to_string(),
        }
    }

    /// Same credentials, different calendar.
    pub fn for_calendar(&self, calendar_id: &str) -> Self {
        Self {
            calendar_id: calendar_id.to_string(),
            ..self.clone()
        }
    }

    pub fn calendar_id(&self) -> &str {
        &self.calendar_id
    }

    fn events_url(&self) -> String {
        format!(
            "{}/calendars/{}/events",
            self.base_url,
            urlencoding::encode(&self.calendar_id)
        )
    }

    fn event_url(&self, event_id: &str) -> String {
        format!("{}/{}", self.events_url(), urlencoding::encode(event_id))
    }

    fn authorized(&self, method: Method, url: &str) -> Result<RequestBuilder, CalendarError> {
        if self.access_token.is_empty() {
            return Err(CalendarError::NotConfigured);
        }
        debug!("Making {} request to {}", method, url);
        Ok(self.client.request(method, url).bearer_auth(&self.access_token))
    }

    async fn send(&self, request: RequestBuilder) -> Result<reqwest::Response, CalendarError> {
        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Calendar API error ({}): {}", status, body);
            let message = serde_json::from_str::<Value>(&body)
                .ok()
                .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
                .unwrap_or(body);
            return Err(CalendarError::Api { status: status.as_u16(), message });
        }

        Ok(response)
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, CalendarError> {
        Ok(self.send(request).await?.json::<T>().await?)
    }

    /// Expanded single events ordered by start time. Unset bounds default to
    /// the next seven days.
    pub async fn list_events(&self, query: &ListEventsQuery) -> Result<Vec<CalendarEvent>, CalendarError> {
        let now = chrono::Utc::now();
        let time_min = query.time_min.clone().unwrap_or_else(|| now.to_rfc3339());
        let time_max = query
            .time_max
            .clone()
            .unwrap_or_else(|| (now + chrono::Duration::days(7)).to_rfc3339());

        let mut params = vec![
            ("timeMin", time_min),
            ("timeMax", time_max),
            ("singleEvents", "true".to_string()),
            ("orderBy", "startTime".to_string()),
        ];
        if let Some(max) = query.max_results {
            params.push(("maxResults", max.to_string()));
        }

        let request = self.authorized(Method::GET, &self.events_url())?.query(&params);
        let list: EventList = self.send_json(request).await?;
        debug!("Fetched {} events from {}", list.items.len(), self.calendar_id);
        Ok(list.items)
    }

    pub async fn insert_event(&self, event: &CalendarEvent) -> Result<CalendarEvent, CalendarError> {
        let request = self.authorized(Method::POST, &self.events_url())?.json(event);
        self.send_json(request).await
    }

    pub async fn update_event(&self, event_id: &str, event: &CalendarEvent) -> Result<CalendarEvent, CalendarError> {
        let request = self.authorized(Method::PUT, &self.event_url(event_id))?.json(event);
        self.send_json(request).await
    }

    pub async fn delete_event(&self, event_id: &str) -> Result<(), CalendarError> {
        let request = self.authorized(Method::DELETE, &self.event_url(event_id))?;
        self.send(request).await?;
        Ok(())
    }

    /// Raw calendar list entries for the authenticated account.
    pub async fn list_calendars(&self) -> Result<Vec<Value>, CalendarError> {
        let url = format!("{}/users/me/calendarList", self.base_url);
        let request = self.authorized(Method::GET, &url)?;
        let body: Value = self.send_json(request).await?;
        Ok(body["items"].as_array().cloned().unwrap_or_default())
    }
}
