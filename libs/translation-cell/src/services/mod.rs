pub mod language;
pub mod sarvam;
