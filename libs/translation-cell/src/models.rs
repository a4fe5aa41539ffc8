use serde::{Deserialize, Serialize};

/// Voice the provider renders the translation for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpeakerGender {
    #[default]
    Male,
    Female,
}

#[derive(Debug, Serialize)]
pub(crate) struct TranslateRequest<'a> {
    pub input: &'a str,
    pub source_language_code: &'a str,
    pub target_language_code: &'a str,
    pub speaker_gender: SpeakerGender,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TranslateResponse {
    #[serde(default)]
    pub translated_text: Option<String>,
}
