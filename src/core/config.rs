use crate::core::currency::CurrencyCode;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

pub const DEFAULT_PRIVATBANK_URL: &str = "https://api.privatbank.ua";

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct PrivatBankProviderConfig {
    pub base_url: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProvidersConfig {
    pub privatbank: Option<PrivatBankProviderConfig>,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        ProvidersConfig {
            privatbank: Some(PrivatBankProviderConfig {
                base_url: DEFAULT_PRIVATBANK_URL.to_string(),
            }),
        }
    }
}

fn default_currency() -> CurrencyCode {
    CurrencyCode::uah()
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    /// Currency calculations are reported in unless asked otherwise.
    #[serde(default = "default_currency")]
    pub currency: CurrencyCode,
    #[serde(default)]
    pub providers: ProvidersConfig,
    pub data_path: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            currency: default_currency(),
            providers: ProvidersConfig::default(),
            data_path: None,
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        Self::load_from_path(&config_path)
    }

    fn project_dirs() -> Result<ProjectDirs> {
        ProjectDirs::from("com", "bankbook", "bankbook")
            .context("Could not determine project directories")
    }

    pub fn default_config_path() -> Result<PathBuf> {
        Ok(Self::project_dirs()?.config_dir().join("config.yaml"))
    }

    /// Directory holding the record store.
    pub fn data_path(&self) -> Result<PathBuf> {
        if let Some(custom_path) = &self.data_path {
            return Ok(PathBuf::from(custom_path));
        }
        Ok(Self::project_dirs()?.data_dir().join("store"))
    }

    pub fn rates_base_url(&self) -> &str {
        self.providers
            .privatbank
            .as_ref()
            .map_or(DEFAULT_PRIVATBANK_URL, |p| &p.base_url)
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_deserialization() {
        let yaml_str = r#"
currency: "usd"
data_path: "/tmp/bankbook"
providers:
  privatbank:
    base_url: "http://example.com/privat"
"#;

        let config: AppConfig = serde_yaml::from_str(yaml_str).expect("Failed to deserialize");
        assert_eq!(config.currency, CurrencyCode::new("USD"));
        assert_eq!(config.rates_base_url(), "http://example.com/privat");
        assert_eq!(
            config.data_path().unwrap(),
            PathBuf::from("/tmp/bankbook")
        );
    }

    #[test]
    fn test_config_defaults() {
        let config: AppConfig = serde_yaml::from_str("data_path: ~\n").unwrap();
        assert_eq!(config.currency, CurrencyCode::uah());
        assert_eq!(config.rates_base_url(), DEFAULT_PRIVATBANK_URL);
        assert!(config.data_path.is_none());

        let config: AppConfig = serde_yaml::from_str("providers: {}\n").unwrap();
        assert!(config.providers.privatbank.is_none());
        assert_eq!(config.rates_base_url(), DEFAULT_PRIVATBANK_URL);
    }

    #[test]
    fn test_load_from_path() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("config.yaml");
        fs::write(&path, "currency: EUR\n")?;

        let config = AppConfig::load_from_path(&path)?;
        assert_eq!(config.currency.as_str(), "EUR");

        let missing = AppConfig::load_from_path(dir.path().join("missing.yaml"));
        assert!(missing.unwrap_err().to_string().contains("Failed to read"));
        Ok(())
    }
}
