// LLM cell: Gemini client plus the prompt-driven classifiers and extractors
// used by the messaging webhook and the dashboard assistant.

pub mod error;
pub mod models;
pub mod services;

pub use error::LlmError;
pub use models::*;
pub use services::{ai::AiService, gemini::GeminiClient, json::{parse_json, unwrap_json}};
