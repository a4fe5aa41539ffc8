pub mod ai;
pub mod gemini;
pub mod json;
pub mod prompts;
