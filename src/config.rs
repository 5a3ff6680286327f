//! Configuration management for QuoteSphere

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use crate::client::{JOKEAPI_BASE_URL, QUOTABLE_BASE_URL};
use crate::coordinator::FetchSettings;
use crate::error::ConfigError;
use crate::logging::LogFormat;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub source: SourceConfig,
    pub fetch: FetchConfig,
    pub storage: StorageConfig,
    pub share: ShareConfig,
    pub logging: LoggingSection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Quotable,
    JokeApi,
    Embedded,
}

impl FromStr for SourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "quotable" => Ok(SourceKind::Quotable),
            "jokeapi" => Ok(SourceKind::JokeApi),
            "embedded" => Ok(SourceKind::Embedded),
            _ => Err(format!(
                "Invalid source: '{}'. Valid options: quotable, jokeapi, embedded",
                s
            )),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub kind: SourceKind,
    /// Overrides the per-kind default API root.
    pub base_url: Option<String>,
    pub request_timeout_secs: u64,
    pub embedded_latency_ms: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            kind: SourceKind::Quotable,
            base_url: None,
            request_timeout_secs: 10,
            embedded_latency_ms: 800,
        }
    }
}

impl SourceConfig {
    pub fn resolved_base_url(&self) -> String {
        match (&self.base_url, self.kind) {
            (Some(url), _) => url.clone(),
            (None, SourceKind::JokeApi) => JOKEAPI_BASE_URL.to_string(),
            (None, _) => QUOTABLE_BASE_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    pub max_retries: u32,
    pub backoff_ms: u64,
    pub debounce_ms: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            backoff_ms: 1000,
            debounce_ms: 300,
        }
    }
}

impl FetchConfig {
    pub fn settings(&self) -> FetchSettings {
        FetchSettings {
            max_retries: self.max_retries,
            backoff: Duration::from_millis(self.backoff_ms),
            debounce: Duration::from_millis(self.debounce_ms),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub favorites_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            favorites_path: "~/.local/share/quotesphere/favorites.json".to_string(),
        }
    }
}

impl StorageConfig {
    pub fn expanded_favorites_path(&self) -> PathBuf {
        expand_path(&self.favorites_path)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ShareConfig {
    /// Shell command the formatted quote is piped into.
    pub command: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    pub format: String,
    pub level: String,
    pub file: Option<String>,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            format: "text".to_string(),
            level: "info".to_string(),
            file: None,
        }
    }
}

impl LoggingSection {
    pub fn log_format(&self) -> Result<LogFormat, ConfigError> {
        self.format
            .parse()
            .map_err(|message| ConfigError::InvalidValue {
                field: "logging.format".to_string(),
                message,
            })
    }

    pub fn expanded_file(&self) -> Option<PathBuf> {
        self.file.as_deref().map(expand_path)
    }
}

impl Config {
    /// Load configuration from the default location, or defaults when absent.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = resolve_config_path()?;
        if !config_path.exists() {
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.fetch.max_retries == 0 {
            return Err(ConfigError::InvalidValue {
                field: "fetch.max_retries".to_string(),
                message: "must allow at least one attempt".to_string(),
            });
        }
        self.logging.log_format()?;
        Ok(())
    }
}

fn expand_path(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).to_string())
}

/// Resolve the configuration file path: `QUOTESPHERE_CONFIG`, else the XDG config dir
pub fn resolve_config_path() -> Result<PathBuf, ConfigError> {
    if let Ok(path) = std::env::var("QUOTESPHERE_CONFIG") {
        return Ok(expand_path(&path));
    }

    let config_dir = dirs::config_dir()
        .ok_or_else(|| ConfigError::MissingField("config directory".to_string()))?;

    Ok(config_dir.join("quotesphere").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.source.kind, SourceKind::Quotable);
        assert_eq!(config.source.resolved_base_url(), "https://api.quotable.io");
        let settings = config.fetch.settings();
        assert_eq!(settings.max_retries, 3);
        assert_eq!(settings.backoff, Duration::from_millis(1000));
        assert_eq!(settings.debounce, Duration::from_millis(300));
    }

    #[test]
    fn test_parse_partial_file_keeps_defaults() {
        let config = Config::parse(
            r#"
            [source]
            kind = "jokeapi"

            [fetch]
            backoff_ms = 250
            "#,
        )
        .unwrap();
        assert_eq!(config.source.kind, SourceKind::JokeApi);
        assert_eq!(config.source.resolved_base_url(), "https://v2.jokeapi.dev");
        assert_eq!(config.fetch.backoff_ms, 250);
        assert_eq!(config.fetch.max_retries, 3);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_parse_rejects_zero_retries() {
        let err = Config::parse("[fetch]\nmax_retries = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn test_parse_rejects_bad_log_format() {
        let err = Config::parse("[logging]\nformat = \"xml\"\n").unwrap_err();
        assert!(err.to_string().contains("logging.format"));
    }

    #[test]
    fn test_load_from_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[source]\nkind = \"embedded\"\nembedded_latency_ms = 0\n[share]\ncommand = \"cat\"\n",
        )
        .unwrap();

        let config = Config::load_from_path(&path).unwrap();
        assert_eq!(config.source.kind, SourceKind::Embedded);
        assert_eq!(config.source.embedded_latency_ms, 0);
        assert_eq!(config.share.command.as_deref(), Some("cat"));
    }

    #[test]
    fn test_source_kind_from_str() {
        assert_eq!("JokeAPI".parse::<SourceKind>().unwrap(), SourceKind::JokeApi);
        assert!("rss".parse::<SourceKind>().is_err());
    }
}
