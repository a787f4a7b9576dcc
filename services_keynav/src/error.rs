//! Engine errors

use hint_labels::AlphabetError;
use services_settings::SettingsError;
use thiserror::Error;

/// Errors from configuring the engine or preparing a navigation
///
/// None of these reach the host: key handling logs them and carries on.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum EngineError {
    #[error("Hint alphabet: {0}")]
    Alphabet(#[from] AlphabetError),

    #[error("Settings: {0}")]
    Settings(#[from] SettingsError),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Refused for {0}")]
    Refused(String),
}

/// Engine result
pub type EngineResult<T> = Result<T, EngineError>;
