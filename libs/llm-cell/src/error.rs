use thiserror::Error;

#[derive(Error, Debug)]
pub enum LlmError {
    #[error("LLM is not configured")]
    NotConfigured,

    #[error("LLM request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("LLM API error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("LLM returned no text")]
    EmptyResponse,

    #[error("LLM reply is not valid JSON: {0}")]
    InvalidJson(String),

    #[error("Unexpected LLM reply: {0}")]
    UnexpectedReply(String),
}
