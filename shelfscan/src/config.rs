//! Effective configuration for shelfscan
//!
//! Multi-tier resolution with ENV → TOML priority for the catalog API key
//! and the append endpoint. Everything else comes from the TOML file (or
//! built-in defaults).

use shelfscan_common::config::TomlConfig;
use tracing::{info, warn};

/// Catalog API key override
pub const API_KEY_ENV_VAR: &str = "SHELFSCAN_BOOKS_API_KEY";

/// Append endpoint override
pub const APPEND_URL_ENV_VAR: &str = "SHELFSCAN_APPEND_URL";

/// Validate API key (non-empty, non-whitespace)
pub fn is_valid_key(key: &str) -> bool {
    !key.trim().is_empty()
}

/// Where an overridable setting was taken from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingSource {
    Environment,
    Toml,
}

impl SettingSource {
    fn describe(&self) -> &'static str {
        match self {
            SettingSource::Environment => "environment variable",
            SettingSource::Toml => "TOML config",
        }
    }
}

/// Outcome of catalog API key resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyResolution {
    pub key: Option<String>,
    pub source: Option<SettingSource>,
    /// Valid keys in both environment and TOML
    pub conflict: bool,
}

/// Resolve the catalog API key
///
/// **Priority:** ENV → TOML. `key == None` means requests go out without a key.
pub fn resolve_api_key(toml_config: &TomlConfig) -> KeyResolution {
    let env_key = std::env::var(API_KEY_ENV_VAR)
        .ok()
        .filter(|k| is_valid_key(k));
    let toml_key = toml_config
        .catalog
        .api_key
        .clone()
        .filter(|k| is_valid_key(k));
    let conflict = env_key.is_some() && toml_key.is_some();

    match (env_key, toml_key) {
        (Some(key), _) => KeyResolution {
            key: Some(key),
            source: Some(SettingSource::Environment),
            conflict,
        },
        (None, Some(key)) => KeyResolution {
            key: Some(key),
            source: Some(SettingSource::Toml),
            conflict,
        },
        (None, None) => KeyResolution {
            key: None,
            source: None,
            conflict,
        },
    }
}

/// Resolve the append-log endpoint
///
/// **Priority:** ENV → TOML. `None` disables appending.
pub fn resolve_append_endpoint(toml_config: &TomlConfig) -> Option<(String, SettingSource)> {
    let env_url = std::env::var(APPEND_URL_ENV_VAR)
        .ok()
        .filter(|u| !u.trim().is_empty());

    if let Some(url) = env_url {
        return Some((url, SettingSource::Environment));
    }
    toml_config
        .append
        .endpoint
        .clone()
        .filter(|u| !u.trim().is_empty())
        .map(|url| (url, SettingSource::Toml))
}

/// TOML config with environment overrides applied
#[derive(Debug, Clone)]
pub struct EffectiveConfig {
    pub config: TomlConfig,
    pub api_key_source: Option<SettingSource>,
    pub api_key_conflict: bool,
    pub append_source: Option<SettingSource>,
}

impl EffectiveConfig {
    /// Log where the overridable settings came from
    ///
    /// Call after the tracing subscriber is installed.
    pub fn log_resolution(&self) {
        if self.api_key_conflict {
            warn!(
                "Catalog API key found in environment and TOML. Using environment (highest priority)."
            );
        }
        if let Some(source) = self.api_key_source {
            info!("Catalog API key loaded from {}", source.describe());
        }
        if let Some(source) = self.append_source {
            info!("Append endpoint loaded from {}", source.describe());
        }
    }
}

/// Apply environment overrides to a loaded TOML config
pub fn apply_env_overrides(mut config: TomlConfig) -> EffectiveConfig {
    let key = resolve_api_key(&config);
    let append = resolve_append_endpoint(&config);

    config.catalog.api_key = key.key;
    let append_source = append.as_ref().map(|(_, source)| *source);
    config.append.endpoint = append.map(|(url, _)| url);

    EffectiveConfig {
        config,
        api_key_source: key.source,
        api_key_conflict: key.conflict,
        append_source,
    }
}

/// Keep the last four characters of a secret
pub fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 4 {
        return "****".to_string();
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("****{}", tail)
}

/// Copy of the config safe to print
pub fn redacted(config: &TomlConfig) -> TomlConfig {
    let mut config = config.clone();
    config.catalog.api_key = config.catalog.api_key.as_deref().map(mask_secret);
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid_key() {
        assert!(is_valid_key("abc"));
        assert!(!is_valid_key(""));
        assert!(!is_valid_key("   "));
    }

    #[test]
    fn test_mask_secret() {
        assert_eq!(mask_secret("AIzaSyExample1234"), "****1234");
        assert_eq!(mask_secret("abc"), "****");
    }

    #[test]
    fn test_redacted_masks_only_api_key() {
        let mut config = TomlConfig::default();
        config.catalog.api_key = Some("secret-key-9876".to_string());
        config.append.endpoint = Some("https://example.com/exec".to_string());

        let shown = redacted(&config);
        assert_eq!(shown.catalog.api_key.as_deref(), Some("****9876"));
        assert_eq!(shown.append.endpoint, config.append.endpoint);
    }
}
