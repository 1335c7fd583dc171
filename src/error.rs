//! Error types for voiceactions

use std::io;
use thiserror::Error;

/// Main error type for voiceactions
#[derive(Error, Debug)]
pub enum VoiceActionsError {
    #[error("Terminal error: {0}")]
    Terminal(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Preference store error: {0}")]
    Preferences(String),

    #[error("Speech synthesis error: {0}")]
    Speech(String),

    #[error("Dialog session error: {0}")]
    Session(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("INI parse error: {0}")]
    IniParse(String),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for voiceactions operations
pub type Result<T> = std::result::Result<T, VoiceActionsError>;

impl From<String> for VoiceActionsError {
    fn from(s: String) -> Self {
        VoiceActionsError::Other(s)
    }
}

impl From<&str> for VoiceActionsError {
    fn from(s: &str) -> Self {
        VoiceActionsError::Other(s.to_string())
    }
}

impl From<serde_json::Error> for VoiceActionsError {
    fn from(e: serde_json::Error) -> Self {
        VoiceActionsError::Session(format!("JSON error: {}", e))
    }
}
