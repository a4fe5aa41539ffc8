use thiserror::Error;

#[derive(Error, Debug)]
pub enum TranslationError {
    #[error("Translation is not configured")]
    NotConfigured,

    #[error("Translation request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Translation API error ({status}): {body}")]
    Api { status: u16, body: String },
}
