use std::env;
use std::str::FromStr;
use std::time::Duration;

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tracing::warn;

pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_CALENDAR_BASE_URL: &str = "https://www.googleapis.com/calendar/v3";
pub const DEFAULT_SARVAM_BASE_URL: &str = "https://api.sarvam.ai";

/// How a triage priority is assigned to a newly registered patient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriorityStrategy {
    /// Deterministic age + disease keyword scoring.
    Rules,
    /// Ask the LLM, falling back to the rules when it fails.
    Llm,
}

impl FromStr for PriorityStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "rules" | "static" => Ok(PriorityStrategy::Rules),
            "llm" | "ai" => Ok(PriorityStrategy::Llm),
            other => Err(format!("unknown priority strategy: {}", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub supabase_url: String,
    pub supabase_anon_key: String,
    pub supabase_jwt_secret: String,
    pub supabase_service_role_key: String,
    pub gemini_api_key: String,
    pub gemini_base_url: String,
    pub gemini_model: String,
    pub calendar_base_url: String,
    pub calendar_id: String,
    pub calendar_access_token: String,
    pub sarvam_api_key: String,
    pub sarvam_base_url: String,
    pub clinic_timezone: String,
    pub redis_url: Option<String>,
    pub session_ttl_secs: u64,
    pub session_sweep_secs: u64,
    pub priority_strategy: PriorityStrategy,
    pub http_timeout_secs: u64,
    pub port: u16,
}

fn required(key: &str) -> String {
    env::var(key).unwrap_or_else(|_| {
        warn!("{} not set, using empty value", key);
        String::new()
    })
}

fn with_default(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| {
        warn!("{} not set, using default", key);
        default.to_string()
    })
}

fn parsed<T: FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            warn!("{} has an invalid value ({}), using default", key, raw);
            default
        }),
        Err(_) => default,
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            supabase_url: required("SUPABASE_URL"),
            supabase_anon_key: required("SUPABASE_ANON_PUBLIC_KEY"),
            supabase_jwt_secret: required("SUPABASE_JWT_SECRET"),
            supabase_service_role_key: env::var("SUPABASE_SERVICE_ROLE_KEY").unwrap_or_default(),
            gemini_api_key: required("GEMINI_API_KEY"),
            gemini_base_url: with_default("GEMINI_BASE_URL", DEFAULT_GEMINI_BASE_URL),
            gemini_model: with_default("GEMINI_MODEL", "gemini-1.5-flash"),
            calendar_base_url: with_default("GOOGLE_CALENDAR_BASE_URL", DEFAULT_CALENDAR_BASE_URL),
            calendar_id: with_default("GOOGLE_CALENDAR_ID", "primary"),
            calendar_access_token: required("GOOGLE_CALENDAR_ACCESS_TOKEN"),
            sarvam_api_key: required("SARVAM_API_KEY"),
            sarvam_base_url: with_default("SARVAM_BASE_URL", DEFAULT_SARVAM_BASE_URL),
            clinic_timezone: with_default("CLINIC_TIMEZONE", "Asia/Kolkata"),
            redis_url: env::var("REDIS_URL").ok().filter(|url| !url.is_empty()),
            session_ttl_secs: parsed("SESSION_TTL_SECS", 3600),
            session_sweep_secs: parsed("SESSION_SWEEP_SECS", 1800),
            priority_strategy: parsed("PRIORITY_STRATEGY", PriorityStrategy::Rules),
            http_timeout_secs: parsed("HTTP_TIMEOUT_SECS", 20),
            port: parsed("PORT", 3000),
        };

        if !config.is_configured() {
            warn!("Application not fully configured - missing environment variables");
        }
        if config.clinic_tz().is_none() {
            warn!("CLINIC_TIMEZONE {} is not a known timezone, falling back to UTC", config.clinic_timezone);
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.supabase_url.is_empty()
            && !self.supabase_anon_key.is_empty()
            && !self.supabase_jwt_secret.is_empty()
    }

    pub fn is_llm_configured(&self) -> bool {
        !self.gemini_api_key.is_empty() && !self.gemini_base_url.is_empty()
    }

    pub fn is_calendar_configured(&self) -> bool {
        !self.calendar_access_token.is_empty() && !self.calendar_base_url.is_empty()
    }

    pub fn is_translation_configured(&self) -> bool {
        !self.sarvam_api_key.is_empty() && !self.sarvam_base_url.is_empty()
    }

    pub fn clinic_tz(&self) -> Option<Tz> {
        self.clinic_timezone.parse::<Tz>().ok()
    }

    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_secs)
    }

    pub fn session_sweep_interval(&self) -> Duration {
        Duration::from_secs(self.session_sweep_secs.max(1))
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_strategy_parses_aliases() {
        assert_eq!("rules".parse::<PriorityStrategy>(), Ok(PriorityStrategy::Rules));
        assert_eq!(" LLM ".parse::<PriorityStrategy>(), Ok(PriorityStrategy::Llm));
        assert!("random".parse::<PriorityStrategy>().is_err());
    }
}
