use thiserror::Error;

use shared_models::error::AppError;

#[derive(Error, Debug)]
pub enum CalendarError {
    #[error("Calendar access is not configured")]
    NotConfigured,

    #[error("Calendar request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Calendar API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Unknown method: {0}")]
    UnknownMethod(String),

    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Invalid parameters: {0}")]
    InvalidParams(String),

    #[error("Invalid event: {0}")]
    InvalidEvent(String),

    #[error("Failed to reschedule events after {applied} updates: {message}")]
    PartialReschedule { applied: usize, message: String },
}

impl From<CalendarError> for AppError {
    fn from(err: CalendarError) -> Self {
        match err {
            CalendarError::NotConfigured => AppError::NotConfigured(err.to_string()),
            CalendarError::UnknownMethod(_)
            | CalendarError::UnknownTool(_)
            | CalendarError::InvalidParams(_)
            | CalendarError::InvalidEvent(_) => AppError::BadRequest(err.to_string()),
            CalendarError::Api { status: 401, .. } | CalendarError::Api { status: 403, .. } => {
                AppError::Auth(err.to_string())
            }
            CalendarError::Api { status: 404, .. } => AppError::NotFound(err.to_string()),
            _ => AppError::ExternalService(err.to_string()),
        }
    }
}
