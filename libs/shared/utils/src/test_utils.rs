use std::sync::Arc;

use base64::{engine::general_purpose, Engine as _};
use chrono::{Duration, Utc};
use hmac::{Hmac, Mac};
use serde_json::{json, Value};
use sha2::Sha256;
use uuid::Uuid;

use shared_config::{AppConfig, PriorityStrategy};
use shared_models::auth::User;

pub struct TestConfig {
    pub jwt_secret: String,
    pub supabase_url: String,
    pub supabase_anon_key: String,
    pub upstream_url: String,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "test-secret-key-for-jwt-validation-must-be-long-enough".to_string(),
            supabase_url: "http://localhost:54321".to_string(),
            supabase_anon_key: "test-anon-key".to_string(),
            upstream_url: "http://localhost:54322".to_string(),
        }
    }
}

impl TestConfig {
    /// Point Supabase, the LLM, the calendar and the translator at one mock server.
    /// Their paths do not overlap, so a single `wiremock::MockServer` can serve all four.
    pub fn with_mock_server(uri: &str) -> Self {
        Self {
            supabase_url: uri.to_string(),
            upstream_url: uri.to_string(),
            ..Self::default()
        }
    }

    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            supabase_url: self.supabase_url.clone(),
            supabase_anon_key: self.supabase_anon_key.clone(),
            supabase_jwt_secret: self.jwt_secret.clone(),
            supabase_service_role_key: "test-service-role-key".to_string(),
            gemini_api_key: "test-gemini-key".to_string(),
            gemini_base_url: self.upstream_url.clone(),
            gemini_model: "gemini-1.5-flash".to_string(),
            calendar_base_url: self.upstream_url.clone(),
            calendar_id: "primary".to_string(),
            calendar_access_token: "test-calendar-token".to_string(),
            sarvam_api_key: "test-sarvam-key".to_string(),
            sarvam_base_url: self.upstream_url.clone(),
            clinic_timezone: "Asia/Kolkata".to_string(),
            redis_url: None,
            session_ttl_secs: 3600,
            session_sweep_secs: 1800,
            priority_strategy: PriorityStrategy::Rules,
            http_timeout_secs: 5,
            port: 3000,
        }
    }

    pub fn to_arc(&self) -> Arc<AppConfig> {
        Arc::new(self.to_app_config())
    }
}

pub struct TestUser {
    pub id: String,
    pub email: String,
    pub role: String,
}

impl Default for TestUser {
    fn default() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            email: "staff@clinic.test".to_string(),
            role: "authenticated".to_string(),
        }
    }
}

impl TestUser {
    pub fn new(email: &str, role: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            email: email.to_string(),
            role: role.to_string(),
        }
    }

    pub fn staff(email: &str) -> Self {
        Self::new(email, "authenticated")
    }

    pub fn admin(email: &str) -> Self {
        Self::new(email, "admin")
    }

    pub fn to_user(&self) -> User {
        User {
            id: self.id.clone(),
            email: Some(self.email.clone()),
            role: Some(self.role.clone()),
            metadata: None,
            created_at: Some(Utc::now()),
        }
    }
}

pub struct JwtTestUtils;

impl JwtTestUtils {
    pub fn create_test_token(user: &TestUser, secret: &str, exp_hours: Option<i64>) -> String {
        let now = Utc::now();
        let exp = now + Duration::hours(exp_hours.unwrap_or(24));

        let header = json!({ "alg": "HS256", "typ": "JWT" });
        let payload = json!({
            "sub": user.id,
            "email": user.email,
            "role": user.role,
            "iat": now.timestamp(),
            "exp": exp.timestamp()
        });

        let header_encoded = general_purpose::URL_SAFE_NO_PAD.encode(header.to_string());
        let payload_encoded = general_purpose::URL_SAFE_NO_PAD.encode(payload.to_string());
        let signing_input = format!("{}.{}", header_encoded, payload_encoded);

        let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes())
            .expect("HMAC can take key of any size");
        mac.update(signing_input.as_bytes());
        let signature_encoded = general_purpose::URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());

        format!("{}.{}", signing_input, signature_encoded)
    }

    pub fn create_expired_token(user: &TestUser, secret: &str) -> String {
        Self::create_test_token(user, secret, Some(-1))
    }

    pub fn create_invalid_signature_token(user: &TestUser) -> String {
        Self::create_test_token(user, "wrong-secret", Some(24))
    }

    pub fn create_malformed_token() -> String {
        "invalid.token.format".to_string()
    }
}

/// Canned PostgREST / Auth payloads.
pub struct MockSupabaseResponses;

impl MockSupabaseResponses {
    pub fn patient_response(phone_number: &str, name: &str, priority: &str) -> Value {
        json!({
            "id": Uuid::new_v4(),
            "name": name,
            "age": 34,
            "gender": "Female",
            "disease": "migraine",
            "phone_number": phone_number,
            "language": "English",
            "priority": priority,
            "created_at": "2024-01-01T00:00:00Z"
        })
    }

    pub fn doctor_response(name: &str, specialization: &str) -> Value {
        json!({
            "id": Uuid::new_v4(),
            "name": name,
            "specialization": specialization,
            "email": "doctor@clinic.test",
            "phone": "9876543210",
            "status": "active",
            "created_at": "2024-01-01T00:00:00Z"
        })
    }

    pub fn auth_session_response() -> Value {
        json!({
            "access_token": "session-access-token",
            "refresh_token": "session-refresh-token",
            "expires_in": 3600,
            "provider_token": "google-provider-token",
            "user": { "id": Uuid::new_v4(), "email": "staff@clinic.test" }
        })
    }

    pub fn error_response(message: &str, code: &str) -> Value {
        json!({
            "message": message,
            "code": code
        })
    }
}

/// Canned `generateContent` replies.
pub struct MockGeminiResponses;

impl MockGeminiResponses {
    pub fn text_response(text: &str) -> Value {
        json!({
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [{ "text": text }]
                },
                "finishReason": "STOP"
            }]
        })
    }
}

/// Canned calendar event resources.
pub struct MockCalendarResponses;

impl MockCalendarResponses {
    pub fn event(id: &str, summary: &str, description: &str, start: &str, end: &str) -> Value {
        json!({
            "id": id,
            "summary": summary,
            "description": description,
            "start": { "dateTime": start, "timeZone": "Asia/Kolkata" },
            "end": { "dateTime": end, "timeZone": "Asia/Kolkata" }
        })
    }

    pub fn event_list(items: Vec<Value>) -> Value {
        json!({
            "kind": "calendar#events",
            "items": items
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_creation() {
        let app_config = TestConfig::default().to_app_config();

        assert_eq!(app_config.supabase_url, "http://localhost:54321");
        assert_eq!(app_config.supabase_anon_key, "test-anon-key");
        assert!(app_config.is_configured());
        assert!(app_config.is_llm_configured());
    }

    #[test]
    fn mock_server_config_shares_one_upstream() {
        let app_config = TestConfig::with_mock_server("http://127.0.0.1:9999").to_app_config();
        assert_eq!(app_config.supabase_url, "http://127.0.0.1:9999");
        assert_eq!(app_config.gemini_base_url, "http://127.0.0.1:9999");
        assert_eq!(app_config.calendar_base_url, "http://127.0.0.1:9999");
        assert_eq!(app_config.sarvam_base_url, "http://127.0.0.1:9999");
    }

    #[test]
    fn test_jwt_token_creation() {
        let user = TestUser::default();
        let token = JwtTestUtils::create_test_token(&user, "test-secret", Some(1));

        assert_eq!(token.split('.').count(), 3);
    }
}
