use serde_json::{json, Value};

use shared_config::AppConfig;

use crate::error::CalendarError;
use crate::models::{RescheduleRequest, ToolExecuteRequest};
use crate::services::client::CalendarClient;
use crate::services::scheduler::reschedule_by_priority;

pub const RESCHEDULE_TOOL: &str = "rescheduleByPriority";

/// Descriptions of the scheduling tools the dashboard agent may call.
pub fn catalogue() -> Value {
    json!({
        "tools": [
            {
                "name": RESCHEDULE_TOOL,
                "description": "Reschedule calendar events based on priority levels found in their titles and descriptions",
                "parameters": {
                    "type": "object",
                    "properties": {
                        "timeRange": {
                            "type": "string",
                            "enum": ["today", "week", "month"],
                            "description": "Time range for rescheduling",
                            "default": "today"
                        },
                        "priorityOrder": {
                            "type": "string",
                            "enum": ["high-to-low", "low-to-high"],
                            "description": "Order in which events are placed",
                            "default": "high-to-low"
                        },
                        "respectWorkingHours": {
                            "type": "boolean",
                            "description": "Keep events between 09:00 and 17:00",
                            "default": true
                        }
                    }
                }
            }
        ]
    })
}

pub async fn execute(
    config: &AppConfig,
    client: &CalendarClient,
    request: ToolExecuteRequest,
) -> Result<Value, CalendarError> {
    match request.tool.as_str() {
        RESCHEDULE_TOOL => {
            let params: RescheduleRequest = if request.parameters.is_null() {
                RescheduleRequest::default()
            } else {
                serde_json::from_value(request.parameters)
                    .map_err(|e| CalendarError::InvalidParams(e.to_string()))?
            };
            let result = reschedule_by_priority(config, client, &params).await?;
            Ok(json!(result))
        }
        other => Err(CalendarError::UnknownTool(other.to_string())),
    }
}
