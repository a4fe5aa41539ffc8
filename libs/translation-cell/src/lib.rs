pub mod error;
pub mod models;
pub mod services;

pub use error::TranslationError;
pub use models::SpeakerGender;
pub use services::{
    language::{is_supported, language_code, supported_languages, translation_needed},
    sarvam::SarvamTranslator,
};
