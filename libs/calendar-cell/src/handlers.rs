use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use axum_extra::TypedHeader;
use headers::{authorization::Bearer, Authorization};
use serde_json::{json, Value};
use tracing::{error, info};

use shared_config::AppConfig;
use shared_models::error::AppError;

use crate::error::CalendarError;
use crate::models::{CalendarEvent, ListEventsQuery, McpRequest, McpResponse, ToolExecuteRequest};
use crate::services::{client::CalendarClient, proxy, tools};

fn proxy_status(err: &CalendarError) -> StatusCode {
    match err {
        CalendarError::UnknownMethod(_) | CalendarError::InvalidParams(_) | CalendarError::InvalidEvent(_) => {
            StatusCode::BAD_REQUEST
        }
        CalendarError::NotConfigured => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// `{method, params}` forwarding with the clinic's calendar credentials.
pub async fn mcp_proxy(
    State(config): State<Arc<AppConfig>>,
    Json(request): Json<McpRequest>,
) -> (StatusCode, Json<McpResponse>) {
    let client = CalendarClient::new(&config);

    match proxy::dispatch(&client, request).await {
        Ok(data) => (StatusCode::OK, Json(McpResponse::ok(data))),
        Err(e) => {
            error!("Calendar proxy call failed: {}", e);
            (proxy_status(&e), Json(McpResponse::failed(e.to_string())))
        }
    }
}

pub async fn list_events(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Query(mut query): Query<ListEventsQuery>,
) -> Result<Json<Value>, AppError> {
    let client = CalendarClient::with_token(&config, auth.token());
    query.max_results = query.max_results.or(Some(10));

    let events = client.list_events(&query).await?;
    Ok(Json(json!({ "events": events })))
}

pub async fn create_event(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Json(event): Json<CalendarEvent>,
) -> Result<(StatusCode, Json<CalendarEvent>), AppError> {
    if event.summary.trim().is_empty() || (event.start.date_time.is_none() && event.start.date.is_none()) {
        return Err(CalendarError::InvalidEvent("summary and start are required".to_string()).into());
    }

    let client = CalendarClient::with_token(&config, auth.token());
    let created = client.insert_event(&event).await?;

    info!("Created calendar event {:?}", created.id);
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_event(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Path(event_id): Path<String>,
    Json(event): Json<CalendarEvent>,
) -> Result<Json<CalendarEvent>, AppError> {
    let client = CalendarClient::with_token(&config, auth.token());
    let updated = client.update_event(&event_id, &event).await?;
    Ok(Json(updated))
}

pub async fn delete_event(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Path(event_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let client = CalendarClient::with_token(&config, auth.token());
    client.delete_event(&event_id).await?;

    info!("Deleted calendar event {}", event_id);
    Ok(Json(json!({ "success": true })))
}

pub async fn list_tools() -> Json<Value> {
    Json(tools::catalogue())
}

pub async fn execute_tool(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Json(request): Json<ToolExecuteRequest>,
) -> Result<Json<Value>, AppError> {
    let client = CalendarClient::with_token(&config, auth.token());
    let data = tools::execute(&config, &client, request).await?;
    Ok(Json(json!({ "success": true, "data": data })))
}
