use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::warn;

use crate::session::timer::{DEFAULT_DWELL, MAX_DWELL};

const FILENAME: &str = "config.yaml";
const APP_DIR: &str = "improv";

pub const URL_ENV: &str = "SUPABASE_URL";
pub const ANON_KEY_ENV: &str = "SUPABASE_ANON_KEY";

const MAX_DWELL_SECS: u64 = MAX_DWELL.as_secs();

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<ProviderConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defaults: Option<DefaultsConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Project URL, e.g. `https://abcd.supabase.co`. `SUPABASE_URL` overrides it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Public anon key. `SUPABASE_ANON_KEY` overrides it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anon_key: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DefaultsConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dwell_secs: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub windowed: Option<bool>,
}

/// Fully resolved connection settings for the Supabase provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderSettings {
    pub url: String,
    pub anon_key: String,
}

impl Config {
    pub fn path() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|d| d.join(APP_DIR).join(FILENAME))
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))
    }

    pub fn load() -> Result<Self> {
        let path = Self::path()?;
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                anyhow::anyhow!("No config found. Run `improv config init` to create one.")
            } else {
                anyhow::anyhow!("Failed to read config: {e}")
            }
        })?;
        let config: Config = serde_yaml::from_str(&contents)?;
        Ok(config)
    }

    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }

    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let yaml = serde_yaml::to_string(self)?;
        let contents = format!("# improv configuration\n{yaml}");
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Resolve provider settings, letting the environment override the file.
    pub fn provider_settings(&self) -> Result<ProviderSettings> {
        self.provider_settings_with(|name| std::env::var(name).ok())
    }

    pub fn provider_settings_with(
        &self,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<ProviderSettings> {
        let file = self.provider.clone().unwrap_or_default();
        let pick = |name: &str, fallback: Option<String>| {
            env(name)
                .filter(|v| !v.trim().is_empty())
                .or(fallback.filter(|v| !v.trim().is_empty()))
        };

        let url = pick(URL_ENV, file.url).ok_or_else(|| {
            anyhow::anyhow!(
                "No Supabase URL configured. Set {URL_ENV} or run `improv config set provider.url <url>`."
            )
        })?;
        let anon_key = pick(ANON_KEY_ENV, file.anon_key).ok_or_else(|| {
            anyhow::anyhow!(
                "No Supabase anon key configured. Set {ANON_KEY_ENV} or run `improv config set provider.anon_key <key>`."
            )
        })?;
        validate_url(&url)?;

        Ok(ProviderSettings { url, anon_key })
    }

    pub fn theme_name(&self) -> &str {
        self.defaults
            .as_ref()
            .and_then(|d| d.theme.as_deref())
            .unwrap_or("light")
    }

    /// Dwell from the file, falling back to the default when unset or out of range.
    pub fn dwell(&self) -> Duration {
        match self.defaults.as_ref().and_then(|d| d.dwell_secs) {
            None => DEFAULT_DWELL,
            Some(secs) if (1..=MAX_DWELL_SECS).contains(&secs) => Duration::from_secs(secs),
            Some(secs) => {
                warn!(
                    dwell_secs = secs,
                    "Ignoring out-of-range defaults.dwell_secs (1-{MAX_DWELL_SECS}), using {}s",
                    DEFAULT_DWELL.as_secs()
                );
                DEFAULT_DWELL
            }
        }
    }

    pub fn windowed(&self) -> bool {
        self.defaults
            .as_ref()
            .and_then(|d| d.windowed)
            .unwrap_or(false)
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "provider.url" => {
                validate_url(value)?;
                self.provider
                    .get_or_insert_with(ProviderConfig::default)
                    .url = Some(value.trim_end_matches('/').to_string());
            }
            "provider.anon_key" => {
                if value.trim().is_empty() {
                    anyhow::bail!("Invalid anon key: must not be empty.");
                }
                self.provider
                    .get_or_insert_with(ProviderConfig::default)
                    .anon_key = Some(value.to_string());
            }
            "defaults.theme" => {
                match value {
                    "light" | "dark" => {}
                    _ => anyhow::bail!("Invalid theme: {value}. Must be 'light' or 'dark'."),
                }
                self.defaults
                    .get_or_insert_with(DefaultsConfig::default)
                    .theme = Some(value.to_string());
            }
            "defaults.dwell_secs" => {
                let secs = parse_dwell_secs(value)?;
                self.defaults
                    .get_or_insert_with(DefaultsConfig::default)
                    .dwell_secs = Some(secs);
            }
            "defaults.windowed" => {
                let windowed = match value {
                    "true" | "yes" | "on" => true,
                    "false" | "no" | "off" => false,
                    _ => anyhow::bail!("Invalid windowed value: {value}. Must be 'true' or 'false'."),
                };
                self.defaults
                    .get_or_insert_with(DefaultsConfig::default)
                    .windowed = Some(windowed);
            }
            _ => anyhow::bail!(
                "Unknown config key: {key}. Valid keys: provider.url, provider.anon_key, defaults.theme, defaults.dwell_secs, defaults.windowed"
            ),
        }
        Ok(())
    }

    /// A copy safe to print: the anon key is shortened.
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if let Some(key) = copy.provider.as_mut().and_then(|p| p.anon_key.as_mut()) {
            *key = redact(key);
        }
        copy
    }
}

pub fn parse_dwell_secs(value: &str) -> Result<u64> {
    match value.parse::<u64>() {
        Ok(secs) if (1..=MAX_DWELL_SECS).contains(&secs) => Ok(secs),
        _ => anyhow::bail!(
            "Invalid dwell_secs: {value}. Must be a whole number of seconds between 1 and {MAX_DWELL_SECS}."
        ),
    }
}

fn validate_url(url: &str) -> Result<()> {
    if url.starts_with("https://") || url.starts_with("http://") {
        Ok(())
    } else {
        anyhow::bail!("Invalid provider URL: {url}. Must start with http:// or https://.")
    }
}

fn redact(key: &str) -> String {
    if key.chars().count() <= 8 {
        return "********".to_string();
    }
    let head: String = key.chars().take(4).collect();
    format!("{head}********")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_set_and_read_defaults() {
        let mut config = Config::default();
        config.set("defaults.theme", "dark").unwrap();
        config.set("defaults.dwell_secs", "30").unwrap();
        config.set("defaults.windowed", "yes").unwrap();
        assert_eq!(config.theme_name(), "dark");
        assert_eq!(config.dwell(), Duration::from_secs(30));
        assert!(config.windowed());
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = Config::default();
        assert_eq!(config.theme_name(), "light");
        assert_eq!(config.dwell(), DEFAULT_DWELL);
        assert!(!config.windowed());
    }

    #[test]
    fn test_set_rejects_bad_values() {
        let mut config = Config::default();
        assert!(config.set("defaults.theme", "sepia").is_err());
        assert!(config.set("defaults.dwell_secs", "0").is_err());
        assert!(config.set("defaults.dwell_secs", "601").is_err());
        assert!(config.set("defaults.dwell_secs", "ten").is_err());
        assert!(config.set("defaults.windowed", "maybe").is_err());
        assert!(config.set("provider.url", "demo.supabase.co").is_err());
        assert!(config.set("provider.anon_key", "  ").is_err());
        assert!(config.set("defaults.color", "blue").is_err());
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_provider_settings_from_file() {
        let mut config = Config::default();
        config.set("provider.url", "https://demo.supabase.co/").unwrap();
        config.set("provider.anon_key", "anon-key-value").unwrap();
        let settings = config.provider_settings_with(no_env).unwrap();
        assert_eq!(settings.url, "https://demo.supabase.co");
        assert_eq!(settings.anon_key, "anon-key-value");
    }

    #[test]
    fn test_env_overrides_file() {
        let mut config = Config::default();
        config.set("provider.url", "https://file.supabase.co").unwrap();
        config.set("provider.anon_key", "file-key").unwrap();
        let settings = config
            .provider_settings_with(|name| match name {
                URL_ENV => Some("https://env.supabase.co".into()),
                _ => Some(String::new()),
            })
            .unwrap();
        assert_eq!(settings.url, "https://env.supabase.co");
        // Blank env values fall through to the file.
        assert_eq!(settings.anon_key, "file-key");
    }

    #[test]
    fn test_missing_provider_settings() {
        let err = Config::default()
            .provider_settings_with(no_env)
            .unwrap_err()
            .to_string();
        assert!(err.contains(URL_ENV), "{err}");
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(FILENAME);

        let mut config = Config::default();
        config.set("provider.url", "https://demo.supabase.co").unwrap();
        config.set("defaults.dwell_secs", "15").unwrap();
        config.save_to(&path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("# improv configuration"));
        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_out_of_range_dwell_in_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(FILENAME);

        std::fs::write(&path, "defaults:\n  dwell_secs: 0\n").unwrap();
        assert_eq!(Config::load_from(&path).unwrap().dwell(), DEFAULT_DWELL);

        std::fs::write(&path, "defaults:\n  dwell_secs: 18446744073709551615\n").unwrap();
        assert_eq!(Config::load_from(&path).unwrap().dwell(), DEFAULT_DWELL);

        std::fs::write(&path, "defaults:\n  dwell_secs: 600\n").unwrap();
        assert_eq!(Config::load_from(&path).unwrap().dwell(), MAX_DWELL);
    }

    #[test]
    fn test_load_missing_file_hint() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load_from(&dir.path().join(FILENAME))
            .unwrap_err()
            .to_string();
        assert!(err.contains("improv config init"), "{err}");
    }

    #[test]
    fn test_redacted_hides_key() {
        let mut config = Config::default();
        config.set("provider.anon_key", "eyJhbGciOiJIUzI1NiJ9").unwrap();
        let shown = config.redacted();
        assert_eq!(
            shown.provider.unwrap().anon_key.as_deref(),
            Some("eyJh********")
        );
        assert_eq!(redact("short"), "********");
    }
}
