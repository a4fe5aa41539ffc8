//! Language names and codes understood by the translator.

pub const ENGLISH: &str = "en";

const LANGUAGE_CODES: &[(&str, &str)] = &[
    ("english", "en"),
    ("hindi", "hi-IN"),
    ("bengali", "bn"),
    ("tamil", "ta"),
    ("telugu", "te"),
    ("marathi", "mr"),
    ("gujarati", "gu"),
    ("kannada", "kn"),
    ("malayalam", "ml"),
    ("punjabi", "pa"),
    ("odia", "or"),
    ("oriya", "or"),
    ("assamese", "as"),
    ("en", "en"),
    ("hi", "hi-IN"),
    ("bn", "bn"),
    ("ta", "ta"),
    ("te", "te"),
    ("mr", "mr"),
    ("gu", "gu"),
    ("kn", "kn"),
    ("ml", "ml"),
    ("pa", "pa"),
    ("or", "or"),
    ("as", "as"),
];

fn lookup(language: &str) -> Option<&'static str> {
    let key = language.trim().to_lowercase();
    LANGUAGE_CODES
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, code)| *code)
}

/// Provider code for a language name or code; unknown languages map to English.
pub fn language_code(language: &str) -> &'static str {
    lookup(language).unwrap_or(ENGLISH)
}

pub fn translation_needed(language: &str) -> bool {
    language_code(language) != ENGLISH
}

/// Language names (not bare codes) accepted by `language_code`.
pub fn supported_languages() -> Vec<&'static str> {
    LANGUAGE_CODES
        .iter()
        .map(|(name, _)| *name)
        .filter(|name| name.len() > 2)
        .collect()
}

pub fn is_supported(language: &str) -> bool {
    lookup(language).is_some()
}
