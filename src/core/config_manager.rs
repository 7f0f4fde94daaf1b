// src/core/config_manager.rs
//! Unified configuration: optional YAML file, then environment overrides

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "prospector.yaml";

#[derive(Debug, Clone, Default)]
pub struct ConfigManager {
    pub environment: String,
    pub linkedin: LinkedInConfig,
    pub sheets: SheetsConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LinkedInConfig {
    pub base_url: String,
    /// Value of the `li_at` cookie of a logged-in browser session
    pub session_cookie: Option<String>,
    pub page_delay_ms: u64,
    pub max_pages: usize,
    pub timeout_secs: u64,
}

impl Default for LinkedInConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.linkedin.com".to_string(),
            session_cookie: None,
            page_delay_ms: 1500,
            max_pages: 10,
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SheetsConfig {
    pub api_url: String,
    pub drive_url: String,
    pub timeout_secs: u64,
}

impl Default for SheetsConfig {
    fn default() -> Self {
        Self {
            api_url: "https://sheets.googleapis.com/v4".to_string(),
            drive_url: "https://www.googleapis.com/drive/v3".to_string(),
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub log_file: PathBuf,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_file: PathBuf::from("/tmp/linkedin-prospector.log"),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct ConfigSection {
    linkedin: LinkedInConfig,
    sheets: SheetsConfig,
    logging: LoggingConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConfigFile {
    local: ConfigSection,
    production: Option<ConfigSection>,
}

impl ConfigManager {
    /// Load configuration for the current environment.
    ///
    /// An explicit `path` must exist; otherwise `prospector.yaml` in the
    /// working directory is used when present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let environment = Self::get_environment();

        let config_path = match path {
            Some(path) => {
                if !path.exists() {
                    anyhow::bail!("Config file not found: {}", path.display());
                }
                Some(path.to_path_buf())
            }
            None => Some(PathBuf::from(DEFAULT_CONFIG_FILE)).filter(|p| p.exists()),
        };

        let mut config = match config_path {
            Some(config_path) => {
                let content = std::fs::read_to_string(&config_path).with_context(|| {
                    format!("Failed to read config file: {}", config_path.display())
                })?;
                Self::from_yaml(&content, &environment).with_context(|| {
                    format!("Failed to parse config file: {}", config_path.display())
                })?
            }
            None => Self {
                environment,
                ..Self::default()
            },
        };

        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    fn get_environment() -> String {
        std::env::var("PROSPECTOR_ENV")
            .or_else(|_| std::env::var("ENVIRONMENT"))
            .unwrap_or_else(|_| "local".to_string())
    }

    /// Build configuration from YAML text, picking the section of `environment`
    pub fn from_yaml(content: &str, environment: &str) -> Result<Self> {
        let file: ConfigFile = serde_yaml::from_str(content).context("Invalid YAML")?;

        let section = match environment {
            "production" => file
                .production
                .context("No 'production' section in configuration")?,
            _ => file.local,
        };

        Ok(Self {
            environment: environment.to_string(),
            linkedin: section.linkedin,
            sheets: section.sheets,
            logging: section.logging,
        })
    }

    /// Apply environment variable overrides, read through `lookup`
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(cookie) = lookup("LINKEDIN_SESSION_COOKIE") {
            self.linkedin.session_cookie = Some(cookie);
        }
        if let Some(url) = lookup("LINKEDIN_BASE_URL") {
            self.linkedin.base_url = url;
        }
        if let Some(delay) = lookup("LINKEDIN_PAGE_DELAY_MS") {
            self.linkedin.page_delay_ms = delay
                .parse()
                .with_context(|| format!("LINKEDIN_PAGE_DELAY_MS must be a number, got '{}'", delay))?;
        }
        if let Some(timeout) = lookup("HTTP_TIMEOUT_SECS") {
            let timeout: u64 = timeout
                .parse()
                .with_context(|| format!("HTTP_TIMEOUT_SECS must be a number, got '{}'", timeout))?;
            self.linkedin.timeout_secs = timeout;
            self.sheets.timeout_secs = timeout;
        }
        if let Some(url) = lookup("GOOGLE_SHEETS_API_URL") {
            self.sheets.api_url = url;
        }
        if let Some(url) = lookup("GOOGLE_DRIVE_API_URL") {
            self.sheets.drive_url = url;
        }
        if let Some(path) = lookup("PROSPECTOR_LOG_FILE") {
            self.logging.log_file = PathBuf::from(path);
        }

        if self.linkedin.max_pages == 0 {
            anyhow::bail!("linkedin.max_pages must be at least 1");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const YAML: &str = r#"
local:
  linkedin:
    page_delay_ms: 10
  logging:
    log_file: /tmp/local.log
production:
  linkedin:
    base_url: https://linkedin.example
    max_pages: 3
  sheets:
    api_url: https://sheets.example/v4
"#;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_local_section_with_defaults() {
        let config = ConfigManager::from_yaml(YAML, "local").unwrap();

        assert_eq!(config.environment, "local");
        assert_eq!(config.linkedin.page_delay_ms, 10);
        assert_eq!(config.linkedin.base_url, "https://www.linkedin.com");
        assert_eq!(config.linkedin.max_pages, 10);
        assert_eq!(config.logging.log_file, PathBuf::from("/tmp/local.log"));
        assert_eq!(config.sheets.api_url, "https://sheets.googleapis.com/v4");
    }

    #[test]
    fn test_production_section() {
        let config = ConfigManager::from_yaml(YAML, "production").unwrap();

        assert_eq!(config.linkedin.base_url, "https://linkedin.example");
        assert_eq!(config.linkedin.max_pages, 3);
        assert_eq!(config.linkedin.page_delay_ms, 1500);
        assert_eq!(config.sheets.api_url, "https://sheets.example/v4");
    }

    #[test]
    fn test_missing_production_section() {
        assert!(ConfigManager::from_yaml("local: {}", "production").is_err());
    }

    #[test]
    fn test_env_overrides() {
        let mut config = ConfigManager::default();
        config
            .apply_overrides(lookup_from(&[
                ("LINKEDIN_SESSION_COOKIE", "AQED"),
                ("HTTP_TIMEOUT_SECS", "5"),
                ("GOOGLE_DRIVE_API_URL", "http://localhost:1/drive"),
            ]))
            .unwrap();

        assert_eq!(config.linkedin.session_cookie.as_deref(), Some("AQED"));
        assert_eq!(config.linkedin.timeout_secs, 5);
        assert_eq!(config.sheets.timeout_secs, 5);
        assert_eq!(config.sheets.drive_url, "http://localhost:1/drive");
    }

    #[test]
    fn test_invalid_numeric_override() {
        let mut config = ConfigManager::default();
        let err = config
            .apply_overrides(lookup_from(&[("LINKEDIN_PAGE_DELAY_MS", "soon")]))
            .unwrap_err();
        assert!(err.to_string().contains("LINKEDIN_PAGE_DELAY_MS"));
    }

    #[test]
    fn test_explicit_missing_file() {
        let result = ConfigManager::load(Some(Path::new("/nonexistent/prospector.yaml")));
        assert!(result.is_err());
    }
}
