use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, fs, path::PathBuf};

use crate::provider::ProviderId;

/// Configuration for a single provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub api_key: String,

    /// Overrides the provider's public endpoint, e.g. for a local mock.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Example TOML:
    /// [providers.openweather]
    /// api_key = "..."
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
}

impl Config {
    pub fn provider_config(&self, id: ProviderId) -> Option<&ProviderConfig> {
        self.providers.get(id.as_str())
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        Ok(project_dirs()?.config_dir().join("config.toml"))
    }

    /// Apply API keys from the process environment on top of the file.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|name| std::env::var(name).ok())
    }

    /// Like [`Self::with_env_overrides`] with an explicit variable lookup.
    pub fn with_overrides_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        for id in ProviderId::all() {
            if let Some(key) = lookup(id.env_var()).filter(|k| !k.trim().is_empty()) {
                self.upsert_provider_api_key(*id, key);
            }
        }
        self
    }

    /// Set or replace a provider API key, keeping any base URL override.
    pub fn upsert_provider_api_key(&mut self, provider_id: ProviderId, api_key: String) {
        self.providers
            .entry(provider_id.as_str().to_string())
            .and_modify(|cfg| cfg.api_key = api_key.clone())
            .or_insert(ProviderConfig { api_key, base_url: None });
    }

    /// Returns API key for a provider, if present.
    pub fn provider_api_key(&self, provider_id: ProviderId) -> Option<&str> {
        self.provider_config(provider_id).map(|cfg| cfg.api_key.as_str())
    }

    pub fn provider_base_url(&self, provider_id: ProviderId) -> Option<&str> {
        self.provider_config(provider_id).and_then(|cfg| cfg.base_url.as_deref())
    }

    pub fn is_provider_configured(&self, provider_id: ProviderId) -> bool {
        self.provider_api_key(provider_id).is_some_and(|k| !k.is_empty())
    }
}

/// Platform directories shared by the config file and the data files.
pub(crate) fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("dev", "weather-dashboard", "dashboard")
        .ok_or_else(|| anyhow!("Could not determine platform config directory"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::ProviderId;

    #[test]
    fn empty_config_has_no_keys() {
        let cfg = Config::default();

        assert_eq!(cfg.provider_api_key(ProviderId::OpenWeather), None);
        assert!(!cfg.is_provider_configured(ProviderId::ExchangeRate));
    }

    #[test]
    fn set_api_key_for_provider() {
        let mut cfg = Config::default();

        cfg.upsert_provider_api_key(ProviderId::OpenWeather, "OPEN_KEY".into());

        assert_eq!(cfg.provider_api_key(ProviderId::OpenWeather), Some("OPEN_KEY"));
        assert!(cfg.is_provider_configured(ProviderId::OpenWeather));
        assert!(!cfg.is_provider_configured(ProviderId::ExchangeRate));
    }

    #[test]
    fn upsert_keeps_base_url() {
        let mut cfg = Config::from_toml(
            r#"
            [providers.exchangerate]
            api_key = "OLD"
            base_url = "http://localhost:8080/v6"
            "#,
        )
        .expect("valid toml");

        cfg.upsert_provider_api_key(ProviderId::ExchangeRate, "NEW".into());

        assert_eq!(cfg.provider_api_key(ProviderId::ExchangeRate), Some("NEW"));
        assert_eq!(cfg.provider_base_url(ProviderId::ExchangeRate), Some("http://localhost:8080/v6"));
    }

    #[test]
    fn env_overrides_replace_file_keys() {
        let mut cfg = Config::default();
        cfg.upsert_provider_api_key(ProviderId::OpenWeather, "FILE_KEY".into());

        let cfg = cfg.with_overrides_from(|name| match name {
            "OPENWEATHER_API_KEY" => Some("ENV_KEY".into()),
            "EXCHANGERATE_API_KEY" => Some("   ".into()),
            _ => None,
        });

        assert_eq!(cfg.provider_api_key(ProviderId::OpenWeather), Some("ENV_KEY"));
        assert_eq!(cfg.provider_api_key(ProviderId::ExchangeRate), None);
    }

    #[test]
    fn toml_roundtrip_keeps_providers() {
        let mut cfg = Config::default();
        cfg.upsert_provider_api_key(ProviderId::OpenWeather, "A".into());
        cfg.upsert_provider_api_key(ProviderId::ExchangeRate, "B".into());

        let text = toml::to_string_pretty(&cfg).expect("serialize");
        let back = Config::from_toml(&text).expect("parse");

        assert_eq!(back.provider_api_key(ProviderId::OpenWeather), Some("A"));
        assert_eq!(back.provider_api_key(ProviderId::ExchangeRate), Some("B"));
        assert!(!text.contains("base_url"));
    }
}
