//! Settings persistence layer
//!
//! Overrides are stored through the host's storage collaborator as a
//! versioned JSON document. Loading is safe against corruption: anything
//! unreadable falls back to no overrides.

use crate::{SettingKey, SettingValue};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Serializable container for settings overrides
/// Uses BTreeMap for stable ordering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettingsOverridesData {
    /// Version of the settings format (for future migrations)
    pub version: u32,
    pub overrides: BTreeMap<String, SettingValue>,
}

impl SettingsOverridesData {
    /// Current version of the settings format
    pub const CURRENT_VERSION: u32 = 1;

    /// Creates a new empty settings data
    pub fn new() -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            overrides: BTreeMap::new(),
        }
    }

    /// Creates settings data from registry overrides
    pub fn from_overrides(overrides: &BTreeMap<SettingKey, SettingValue>) -> Self {
        let mut data = Self::new();
        for (key, value) in overrides {
            data.overrides.insert(key.as_str().to_string(), value.clone());
        }
        data
    }

    /// Converts settings data to registry overrides
    pub fn to_overrides(&self) -> BTreeMap<SettingKey, SettingValue> {
        self.overrides
            .iter()
            .map(|(key, value)| (SettingKey::new(key.as_str()), value.clone()))
            .collect()
    }
}

impl Default for SettingsOverridesData {
    fn default() -> Self {
        Self::new()
    }
}

/// Result type for persistence operations
pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// Errors that can occur during persistence operations
#[derive(Debug, Clone, Error, PartialEq)]
pub enum PersistenceError {
    #[error("Failed to serialize settings: {0}")]
    SerializationFailed(String),

    #[error("Failed to deserialize settings: {0}")]
    DeserializationFailed(String),

    #[error("Unsupported settings version: {0}")]
    UnsupportedVersion(u32),
}

/// Serializes settings overrides to a JSON string
pub fn serialize_overrides(data: &SettingsOverridesData) -> PersistenceResult<String> {
    serde_json::to_string(data).map_err(|e| PersistenceError::SerializationFailed(e.to_string()))
}

/// Deserializes settings overrides from a JSON string
pub fn deserialize_overrides(text: &str) -> PersistenceResult<SettingsOverridesData> {
    let data: SettingsOverridesData = serde_json::from_str(text)
        .map_err(|e| PersistenceError::DeserializationFailed(e.to_string()))?;

    // Check version compatibility
    if data.version != SettingsOverridesData::CURRENT_VERSION {
        return Err(PersistenceError::UnsupportedVersion(data.version));
    }

    Ok(data)
}

/// Attempts to load settings, falling back to no overrides on error
///
/// The error is returned alongside so the caller can log it.
pub fn load_overrides_safe(text: &str) -> (SettingsOverridesData, Option<PersistenceError>) {
    match deserialize_overrides(text) {
        Ok(data) => (data, None),
        Err(err) => (SettingsOverridesData::new(), Some(err)),
    }
}
