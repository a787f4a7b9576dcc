//! Typed settings view consumed by the engine

use crate::{keys, SettingKey, SettingValue, SettingsError, SettingsRegistry};
use core_types::{ContextScope, UrlMatchPolicy};

/// Effective engine configuration
#[derive(Debug, Clone, PartialEq)]
pub struct EngineSettings {
    /// Line scroll distance in pixels
    pub scroll_step: f64,
    /// Page scroll as a fraction of viewport height
    pub page_ratio: f64,
    pub half_page_ratio: f64,
    pub hint_chars: String,
    /// Fallback delay before scrolling a freshly opened mark target
    pub mark_load_timeout_ms: u64,
    pub local_url_policy: UrlMatchPolicy,
    /// Delay before the command line closes after a successful switch
    pub cmdline_close_delay_ms: u64,
    pub error_ttl_ms: u64,
    pub info_ttl_ms: u64,
    pub tab_scope: ContextScope,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            scroll_step: 75.0,
            page_ratio: 0.9,
            half_page_ratio: 0.5,
            hint_chars: "asdfghjklqwertyuiopzxcvbnm".to_string(),
            mark_load_timeout_ms: 1500,
            local_url_policy: UrlMatchPolicy::Exact,
            cmdline_close_delay_ms: 1500,
            error_ttl_ms: 3000,
            info_ttl_ms: 1500,
            tab_scope: ContextScope::CurrentWindow,
        }
    }
}

impl EngineSettings {
    /// Reads every engine setting from the registry
    pub fn from_registry(registry: &SettingsRegistry) -> Result<Self, SettingsError> {
        let policy = string(registry, keys::MARKS_LOCAL_URL_POLICY)?;
        let scope = string(registry, keys::TABS_SCOPE)?;

        Ok(Self {
            scroll_step: positive_float(registry, keys::SCROLL_STEP)?,
            page_ratio: positive_float(registry, keys::SCROLL_PAGE_RATIO)?,
            half_page_ratio: positive_float(registry, keys::SCROLL_HALF_PAGE_RATIO)?,
            hint_chars: string(registry, keys::HINTS_CHARS)?.to_string(),
            mark_load_timeout_ms: millis(registry, keys::MARKS_LOAD_TIMEOUT_MS)?,
            local_url_policy: UrlMatchPolicy::parse(policy)
                .ok_or_else(|| invalid(keys::MARKS_LOCAL_URL_POLICY, policy))?,
            cmdline_close_delay_ms: millis(registry, keys::CMDLINE_CLOSE_DELAY_MS)?,
            error_ttl_ms: millis(registry, keys::STATUS_ERROR_TTL_MS)?,
            info_ttl_ms: millis(registry, keys::STATUS_INFO_TTL_MS)?,
            tab_scope: ContextScope::parse(scope).ok_or_else(|| invalid(keys::TABS_SCOPE, scope))?,
        })
    }
}

fn lookup<'a>(registry: &'a SettingsRegistry, key: &str) -> Result<&'a SettingValue, SettingsError> {
    let key = SettingKey::new(key);
    registry
        .get(&key)
        .ok_or(SettingsError::UnknownKey(key))
}

fn wrong_type(key: &str, expected: &'static str, value: &SettingValue) -> SettingsError {
    SettingsError::WrongType {
        key: SettingKey::new(key),
        expected,
        found: value.type_name(),
    }
}

fn invalid(key: &str, value: impl ToString) -> SettingsError {
    SettingsError::InvalidValue {
        key: SettingKey::new(key),
        value: value.to_string(),
    }
}

fn string<'a>(registry: &'a SettingsRegistry, key: &str) -> Result<&'a str, SettingsError> {
    let value = lookup(registry, key)?;
    value.as_string().ok_or_else(|| wrong_type(key, "string", value))
}

fn positive_float(registry: &SettingsRegistry, key: &str) -> Result<f64, SettingsError> {
    let value = lookup(registry, key)?;
    let v = value.as_float().ok_or_else(|| wrong_type(key, "float", value))?;
    if v.is_finite() && v > 0.0 {
        Ok(v)
    } else {
        Err(invalid(key, v))
    }
}

fn millis(registry: &SettingsRegistry, key: &str) -> Result<u64, SettingsError> {
    let value = lookup(registry, key)?;
    let v = value
        .as_integer()
        .ok_or_else(|| wrong_type(key, "integer", value))?;
    u64::try_from(v).map_err(|_| invalid(key, v))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::create_default_registry;

    #[test]
    fn test_defaults_match_registry_defaults() {
        let settings = EngineSettings::from_registry(&create_default_registry()).unwrap();
        assert_eq!(settings, EngineSettings::default());
    }

    #[test]
    fn test_overrides_flow_through() {
        let mut registry = create_default_registry();
        registry
            .set_override(keys::MARKS_LOCAL_URL_POLICY, SettingValue::String("ignore_fragment".into()))
            .unwrap();
        registry
            .set_override(keys::TABS_SCOPE, SettingValue::String("all_windows".into()))
            .unwrap();
        registry
            .set_override(keys::SCROLL_HALF_PAGE_RATIO, SettingValue::Float(0.25))
            .unwrap();

        let settings = EngineSettings::from_registry(&registry).unwrap();
        assert_eq!(settings.local_url_policy, UrlMatchPolicy::IgnoreFragment);
        assert_eq!(settings.tab_scope, ContextScope::AllWindows);
        assert_eq!(settings.half_page_ratio, 0.25);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let mut registry = create_default_registry();
        registry
            .set_override(keys::MARKS_LOCAL_URL_POLICY, SettingValue::String("fuzzy".into()))
            .unwrap();
        assert!(matches!(
            EngineSettings::from_registry(&registry),
            Err(SettingsError::InvalidValue { .. })
        ));

        let mut registry = create_default_registry();
        registry
            .set_override(keys::STATUS_ERROR_TTL_MS, SettingValue::Integer(-1))
            .unwrap();
        assert!(EngineSettings::from_registry(&registry).is_err());

        let mut registry = create_default_registry();
        registry
            .set_override(keys::SCROLL_STEP, SettingValue::Integer(0))
            .unwrap();
        assert!(EngineSettings::from_registry(&registry).is_err());
    }
}
