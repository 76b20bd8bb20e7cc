//! Dashboard configuration
//!
//! Config is resolved in three layers:
//! 1. Embedded defaults (`config/dashboard.toml`, compiled into the binary)
//! 2. Override file: `--config <path>` or ~/.config/vendas/dashboard.toml
//! 3. Environment variables (`VENDAS_API_URL`, `VENDAS_TIMEOUT_SECS`)
//!
//! Override files may be partial; missing keys keep the previous layer's value.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::dashboard::TopSellers;
use crate::error::{Error, Result};
use crate::filter::YearRange;

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/dashboard.toml");

/// Environment variable overriding the sales API URL
pub const API_URL_ENV: &str = "VENDAS_API_URL";

/// Environment variable overriding the request timeout (seconds)
pub const TIMEOUT_ENV: &str = "VENDAS_TIMEOUT_SECS";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Config {
    pub api: ApiConfig,
    pub dashboard: DashboardSettings,
    /// Where the override layer came from
    #[serde(skip)]
    pub source: ConfigSource,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSettings {
    /// Rows in the "top states" bar charts
    pub top_states: usize,
    /// Default number of sellers in the seller tab
    pub top_sellers: u8,
    pub year_min: i32,
    pub year_max: i32,
}

impl DashboardSettings {
    pub fn year_range(&self) -> YearRange {
        YearRange {
            min: self.year_min,
            max: self.year_max,
        }
    }

    pub fn default_top_sellers(&self) -> TopSellers {
        TopSellers::new(self.top_sellers).unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ConfigSource {
    #[default]
    Embedded,
    File(PathBuf),
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Embedded => write!(f, "embedded defaults"),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig {
                base_url: "https://labdados.com/produtos".to_string(),
                timeout_secs: 30,
            },
            dashboard: DashboardSettings {
                top_states: 5,
                top_sellers: 5,
                year_min: 2020,
                year_max: 2023,
            },
            source: ConfigSource::Embedded,
        }
    }
}

impl Config {
    /// Load configuration from all layers, reading the process environment
    ///
    /// An explicit `override_path` must exist; the default user config file is optional.
    pub fn load(override_path: Option<&Path>) -> Result<Self> {
        Self::load_with_env(override_path, |key| std::env::var(key).ok())
    }

    /// Load configuration with a custom environment lookup (for testing)
    pub fn load_with_env<F>(override_path: Option<&Path>, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = parse_config(DEFAULT_CONFIG, Config::default())?;

        let path = match override_path {
            Some(path) if !path.exists() => {
                return Err(Error::Config(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            Some(path) => Some(path.to_path_buf()),
            None => default_config_path().filter(|p| p.exists()),
        };

        if let Some(path) = path {
            let content = fs::read_to_string(&path)?;
            config = parse_config(&content, config)?;
            config.source = ConfigSource::File(path);
        }

        config.apply_env(env)?;
        config.validate()?;
        Ok(config)
    }

    fn apply_env<F>(&mut self, env: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = env(API_URL_ENV).filter(|s| !s.trim().is_empty()) {
            self.api.base_url = url.trim().to_string();
        }
        if let Some(timeout) = env(TIMEOUT_ENV).filter(|s| !s.trim().is_empty()) {
            self.api.timeout_secs = timeout.trim().parse().map_err(|_| {
                Error::Config(format!("{} must be a number of seconds", TIMEOUT_ENV))
            })?;
        }
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.api.base_url.trim().is_empty() {
            return Err(Error::Config("api.base_url must not be empty".into()));
        }
        if self.api.timeout_secs == 0 {
            return Err(Error::Config("api.timeout_secs must be positive".into()));
        }
        if TopSellers::new(self.dashboard.top_sellers).is_none() {
            return Err(Error::Config(format!(
                "dashboard.top_sellers must be between {} and {}",
                TopSellers::MIN,
                TopSellers::MAX
            )));
        }
        if self.dashboard.top_states == 0 {
            return Err(Error::Config("dashboard.top_states must be positive".into()));
        }
        if self.dashboard.year_min > self.dashboard.year_max {
            return Err(Error::Config(
                "dashboard.year_min must not exceed dashboard.year_max".into(),
            ));
        }
        Ok(())
    }
}

/// Default override location (~/.config/vendas/dashboard.toml on Linux)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("vendas").join("dashboard.toml"))
}

/// Raw config structure for TOML parsing
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    api: Option<RawApi>,
    dashboard: Option<RawDashboard>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawApi {
    base_url: Option<String>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawDashboard {
    top_states: Option<usize>,
    top_sellers: Option<u8>,
    year_min: Option<i32>,
    year_max: Option<i32>,
}

/// Parse TOML content on top of `base`
fn parse_config(content: &str, base: Config) -> Result<Config> {
    let raw: RawConfig = toml::from_str(content)
        .map_err(|e| Error::Config(format!("Invalid config TOML: {}", e)))?;

    let mut config = base;

    if let Some(api) = raw.api {
        if let Some(url) = api.base_url {
            config.api.base_url = url;
        }
        if let Some(timeout) = api.timeout_secs {
            config.api.timeout_secs = timeout;
        }
    }

    if let Some(dashboard) = raw.dashboard {
        if let Some(n) = dashboard.top_states {
            config.dashboard.top_states = n;
        }
        if let Some(n) = dashboard.top_sellers {
            config.dashboard.top_sellers = n;
        }
        if let Some(year) = dashboard.year_min {
            config.dashboard.year_min = year;
        }
        if let Some(year) = dashboard.year_max {
            config.dashboard.year_max = year;
        }
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_embedded_defaults() {
        let config = parse_config(DEFAULT_CONFIG, Config::default()).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.api.timeout(), Duration::from_secs(30));
        assert_eq!(config.dashboard.year_range(), YearRange::default());
    }

    #[test]
    fn test_partial_override() {
        let content = r#"
[dashboard]
top_sellers = 8
"#;
        let config = parse_config(content, Config::default()).unwrap();
        assert_eq!(config.dashboard.top_sellers, 8);
        assert_eq!(config.dashboard.top_states, 5);
        assert_eq!(config.api.base_url, "https://labdados.com/produtos");
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = parse_config("[api]\nbase = \"x\"\n", Config::default()).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[api]\nbase_url = \"http://localhost:9999/produtos\"").unwrap();

        let config = Config::load_with_env(Some(file.path()), no_env).unwrap();
        assert_eq!(config.api.base_url, "http://localhost:9999/produtos");
        assert_eq!(config.source, ConfigSource::File(file.path().to_path_buf()));
    }

    #[test]
    fn test_missing_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        let err = Config::load_with_env(Some(&missing), no_env).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_env_overrides_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[api]\nbase_url = \"http://file\"\ntimeout_secs = 5").unwrap();

        let config = Config::load_with_env(Some(file.path()), |key| match key {
            API_URL_ENV => Some("http://env/produtos".to_string()),
            TIMEOUT_ENV => Some("12".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config.api.base_url, "http://env/produtos");
        assert_eq!(config.api.timeout_secs, 12);
    }

    #[test]
    fn test_invalid_timeout_env() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[api]").unwrap();
        let err = Config::load_with_env(Some(file.path()), |key| {
            (key == TIMEOUT_ENV).then(|| "soon".to_string())
        })
        .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_validation() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[dashboard]\ntop_sellers = 11").unwrap();
        assert!(Config::load_with_env(Some(file.path()), no_env).is_err());

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[dashboard]\nyear_min = 2024").unwrap();
        assert!(Config::load_with_env(Some(file.path()), no_env).is_err());
    }
}
