//! # Settings Registry Service
//!
//! Typed configuration for the keynav engine.
//!
//! ## Philosophy
//!
//! - **Typed settings**: All settings have explicit types, not stringly-typed
//! - **Layered**: Read-only defaults + one persisted override layer
//! - **Deterministic**: Settings are serializable and reproducible
//! - **Testable**: All settings logic can be tested independently
//!
//! ## Features
//!
//! - Read-only defaults baked in ([`create_default_registry`])
//! - Overrides persisted through the host's storage collaborator
//!   ([`persistence`])
//! - A typed view the engine consumes ([`EngineSettings`])
//! - No config files, no environment variables
//!
//! ## Example
//!
//! ```
//! use services_settings::{create_default_registry, keys, EngineSettings, SettingValue};
//!
//! let mut registry = create_default_registry();
//! registry.set_override(keys::SCROLL_STEP, SettingValue::Integer(40)).unwrap();
//!
//! let settings = EngineSettings::from_registry(&registry).unwrap();
//! assert_eq!(settings.scroll_step, 40.0);
//! ```

pub mod engine;
pub mod persistence;

pub use engine::EngineSettings;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Setting key (path-like identifier)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SettingKey(String);

impl SettingKey {
    /// Creates a new setting key
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Returns the key as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Checks if this key starts with the given prefix
    pub fn starts_with(&self, prefix: &str) -> bool {
        self.0.starts_with(prefix)
    }
}

impl fmt::Display for SettingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for SettingKey {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Setting value (strongly typed)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SettingValue {
    /// Boolean value
    Boolean(bool),
    /// Integer value
    Integer(i64),
    /// Floating point value
    Float(f64),
    /// String value
    String(String),
}

impl SettingValue {
    /// Tries to get as boolean
    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            SettingValue::Boolean(v) => Some(*v),
            _ => None,
        }
    }

    /// Tries to get as integer
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            SettingValue::Integer(v) => Some(*v),
            _ => None,
        }
    }

    /// Tries to get as float; integers widen
    pub fn as_float(&self) -> Option<f64> {
        match self {
            SettingValue::Float(v) => Some(*v),
            SettingValue::Integer(v) => Some(*v as f64),
            _ => None,
        }
    }

    /// Tries to get as string
    pub fn as_string(&self) -> Option<&str> {
        match self {
            SettingValue::String(v) => Some(v.as_str()),
            _ => None,
        }
    }

    /// Name of the value's type, for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            SettingValue::Boolean(_) => "boolean",
            SettingValue::Integer(_) => "integer",
            SettingValue::Float(_) => "float",
            SettingValue::String(_) => "string",
        }
    }

    fn accepts(&self, other: &SettingValue) -> bool {
        matches!(
            (self, other),
            (SettingValue::Boolean(_), SettingValue::Boolean(_))
                | (SettingValue::Integer(_), SettingValue::Integer(_))
                | (SettingValue::Float(_), SettingValue::Float(_))
                | (SettingValue::Float(_), SettingValue::Integer(_))
                | (SettingValue::String(_), SettingValue::String(_))
        )
    }
}

impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingValue::Boolean(v) => write!(f, "{}", v),
            SettingValue::Integer(v) => write!(f, "{}", v),
            SettingValue::Float(v) => write!(f, "{}", v),
            SettingValue::String(v) => write!(f, "{}", v),
        }
    }
}

/// Settings errors
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SettingsError {
    #[error("Unknown setting: {0}")]
    UnknownKey(SettingKey),

    #[error("Setting {key} expects a {expected} value, got {found}")]
    WrongType {
        key: SettingKey,
        expected: &'static str,
        found: &'static str,
    },

    #[error("Setting {key} has invalid value: {value}")]
    InvalidValue { key: SettingKey, value: String },
}

/// Settings registry
#[derive(Debug, Clone, Default)]
pub struct SettingsRegistry {
    /// Default settings (read-only)
    defaults: BTreeMap<SettingKey, SettingValue>,
    /// Overrides layered on top of the defaults
    overrides: BTreeMap<SettingKey, SettingValue>,
}

impl SettingsRegistry {
    /// Creates an empty settings registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a default setting
    pub fn register_default(&mut self, key: impl Into<SettingKey>, value: SettingValue) {
        self.defaults.insert(key.into(), value);
    }

    /// Sets an override
    ///
    /// The key must have a default and the value must have the default's
    /// type (an integer is accepted where a float is expected).
    pub fn set_override(
        &mut self,
        key: impl Into<SettingKey>,
        value: SettingValue,
    ) -> Result<(), SettingsError> {
        let key = key.into();
        let default = self
            .defaults
            .get(&key)
            .ok_or_else(|| SettingsError::UnknownKey(key.clone()))?;

        if !default.accepts(&value) {
            return Err(SettingsError::WrongType {
                key,
                expected: default.type_name(),
                found: value.type_name(),
            });
        }

        self.overrides.insert(key, value);
        Ok(())
    }

    /// Removes an override, returning true if one existed
    pub fn reset_to_default(&mut self, key: &SettingKey) -> bool {
        self.overrides.remove(key).is_some()
    }

    /// Gets the effective setting value (override or default)
    pub fn get(&self, key: &SettingKey) -> Option<&SettingValue> {
        self.overrides.get(key).or_else(|| self.defaults.get(key))
    }

    /// Gets the default value for a setting
    pub fn get_default(&self, key: &SettingKey) -> Option<&SettingValue> {
        self.defaults.get(key)
    }

    /// Returns all default setting keys
    pub fn list_defaults(&self) -> Vec<SettingKey> {
        self.defaults.keys().cloned().collect()
    }

    /// Returns all effective settings with a given prefix
    pub fn list_with_prefix(&self, prefix: &str) -> Vec<(SettingKey, SettingValue)> {
        self.defaults
            .keys()
            .filter(|key| key.starts_with(prefix))
            .filter_map(|key| self.get(key).map(|value| (key.clone(), value.clone())))
            .collect()
    }

    /// Exports the override layer for persistence
    pub fn export_overrides(&self) -> BTreeMap<SettingKey, SettingValue> {
        self.overrides.clone()
    }

    /// Applies loaded overrides
    ///
    /// Entries that fail validation are skipped and returned so the caller
    /// can report them.
    pub fn apply_overrides(
        &mut self,
        overrides: BTreeMap<SettingKey, SettingValue>,
    ) -> Vec<SettingsError> {
        let mut rejected = Vec::new();
        for (key, value) in overrides {
            if let Err(err) = self.set_override(key, value) {
                rejected.push(err);
            }
        }
        rejected
    }

    /// Clears all overrides
    pub fn clear_overrides(&mut self) {
        self.overrides.clear();
    }
}

/// Setting keys
pub mod keys {
    pub const SCROLL_STEP: &str = "scroll.step";
    pub const SCROLL_PAGE_RATIO: &str = "scroll.page_ratio";
    pub const SCROLL_HALF_PAGE_RATIO: &str = "scroll.half_page_ratio";
    pub const HINTS_CHARS: &str = "hints.chars";
    pub const MARKS_LOAD_TIMEOUT_MS: &str = "marks.load_timeout_ms";
    pub const MARKS_LOCAL_URL_POLICY: &str = "marks.local_url_policy";
    pub const CMDLINE_CLOSE_DELAY_MS: &str = "cmdline.close_delay_ms";
    pub const STATUS_ERROR_TTL_MS: &str = "status.error_ttl_ms";
    pub const STATUS_INFO_TTL_MS: &str = "status.info_ttl_ms";
    pub const TABS_SCOPE: &str = "tabs.scope";
}

/// Keys under which the engine persists state through the host
pub mod storage_keys {
    pub const ENABLED: &str = "keynav.enabled";
    pub const GLOBAL_MARKS: &str = "keynav.global_marks";
    pub const SETTINGS: &str = "keynav.settings";
}

/// Creates a settings registry with default settings
pub fn create_default_registry() -> SettingsRegistry {
    let mut registry = SettingsRegistry::new();

    // Scrolling
    registry.register_default(keys::SCROLL_STEP, SettingValue::Integer(75));
    registry.register_default(keys::SCROLL_PAGE_RATIO, SettingValue::Float(0.9));
    registry.register_default(keys::SCROLL_HALF_PAGE_RATIO, SettingValue::Float(0.5));

    // Follow mode
    registry.register_default(
        keys::HINTS_CHARS,
        SettingValue::String("asdfghjklqwertyuiopzxcvbnm".to_string()),
    );

    // Marks
    registry.register_default(keys::MARKS_LOAD_TIMEOUT_MS, SettingValue::Integer(1500));
    registry.register_default(
        keys::MARKS_LOCAL_URL_POLICY,
        SettingValue::String("exact".to_string()),
    );

    // Command line and status
    registry.register_default(keys::CMDLINE_CLOSE_DELAY_MS, SettingValue::Integer(1500));
    registry.register_default(keys::STATUS_ERROR_TTL_MS, SettingValue::Integer(3000));
    registry.register_default(keys::STATUS_INFO_TTL_MS, SettingValue::Integer(1500));

    // Tabs
    registry.register_default(
        keys::TABS_SCOPE,
        SettingValue::String("current_window".to_string()),
    );

    registry
}
