use reqwest::Client;
use tracing::{debug, error};

use shared_config::AppConfig;

use crate::error::TranslationError;
use crate::models::{SpeakerGender, TranslateRequest, TranslateResponse};
use crate::services::language::{language_code, ENGLISH};

/// Client for the Sarvam text translation endpoint.
#[derive(Clone)]
pub struct SarvamTranslator {
    client: Client,
    base_url: String,
    api_key: String,
}

impl SarvamTranslator {
    pub fn new(config: &AppConfig) -> Self {
        let client = Client::builder()
            .timeout(config.http_timeout())
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: config.sarvam_base_url.trim_end_matches('/').to_string(),
            api_key: config.sarvam_api_key.clone(),
        }
    }

    /// Translate `text` into `target` (a language name or code). English
    /// targets return the input untouched without a network call.
    pub async fn translate(
        &self,
        text: &str,
        target: &str,
        speaker_gender: SpeakerGender,
    ) -> Result<String, TranslationError> {
        let target_code = language_code(target);
        if target_code == ENGLISH {
            return Ok(text.to_string());
        }
        if self.api_key.is_empty() {
            return Err(TranslationError::NotConfigured);
        }

        debug!("Translating {} chars to {}", text.len(), target_code);

        let response = self.client
            .post(format!("{}/translate", self.base_url))
            .header("api-subscription-key", &self.api_key)
            .json(&TranslateRequest {
                input: text,
                source_language_code: "auto",
                target_language_code: target_code,
                speaker_gender,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Translation API error ({}): {}", status, body);
            return Err(TranslationError::Api { status: status.as_u16(), body });
        }

        let body: TranslateResponse = response.json().await?;
        Ok(body
            .translated_text
            .filter(|translated| !translated.trim().is_empty())
            .unwrap_or_else(|| text.to_string()))
    }
}
