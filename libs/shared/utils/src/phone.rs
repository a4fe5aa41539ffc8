//! Phone number normalisation.
//!
//! Inbound messages carry the sender as `whatsapp:+91XXXXXXXXXX` or a plain
//! E.164 number; patients and sessions are keyed by the bare 10-digit number.

const WHATSAPP_PREFIX: &str = "whatsapp:";
const COUNTRY_CODE: &str = "91";

/// Reduce a sender address to the 10-digit key used for patients and sessions.
pub fn normalize_phone(raw: &str) -> String {
    let trimmed = raw.trim();
    let without_channel = trimmed.strip_prefix(WHATSAPP_PREFIX).unwrap_or(trimmed);
    let without_plus_code = without_channel
        .strip_prefix("+91")
        .unwrap_or(without_channel);

    let mut cleaned: String = without_plus_code
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '(' | ')'))
        .collect();

    if cleaned.starts_with(COUNTRY_CODE) && cleaned.chars().count() > 10 {
        cleaned = cleaned[COUNTRY_CODE.len()..].to_string();
    }

    let len = cleaned.chars().count();
    if len > 10 {
        cleaned = cleaned.chars().skip(len - 10).collect();
    }

    cleaned
}
