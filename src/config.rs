//! Configuration System
//!
//! Loads client configuration from a TOML file with `TAILINK_*`
//! environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::map;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub map: MapConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// REST API connection
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:8000/api/".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Base URL with exactly one trailing slash, so endpoint paths append cleanly
    pub fn normalized_base_url(&self) -> String {
        format!("{}/", self.base_url.trim().trim_end_matches('/'))
    }
}

/// Where the session token is kept
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SessionConfig {
    pub path: Option<String>,
}

impl SessionConfig {
    pub fn resolve_path(&self) -> PathBuf {
        match &self.path {
            Some(path) => PathBuf::from(path),
            None => dirs::data_local_dir()
                .map(|p| p.join("tailink").join("session.toml"))
                .unwrap_or_else(|| PathBuf::from("./.tailink_session.toml")),
        }
    }
}

/// Map view settings
#[derive(Debug, Clone, Deserialize)]
pub struct MapConfig {
    #[serde(default)]
    pub maptiler_key: String,

    #[serde(default = "default_center")]
    pub center: [f64; 2],

    #[serde(default = "default_zoom")]
    pub zoom: f64,
}

fn default_center() -> [f64; 2] {
    map::DEFAULT_CENTER
}

fn default_zoom() -> f64 {
    map::DEFAULT_ZOOM
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            maptiler_key: String::new(),
            center: default_center(),
            zoom: default_zoom(),
        }
    }
}

impl MapConfig {
    pub fn style_url(&self) -> String {
        map::style_url(&self.maptiler_key)
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment.
    ///
    /// Nothing is logged here: callers usually load config before the
    /// subscriber exists, so files that failed to load are handed back.
    pub fn load_default() -> LoadedConfig {
        let config_paths: Vec<PathBuf> = [
            dirs::config_dir().map(|p| p.join("tailink").join("config.toml")),
            Some(PathBuf::from("./config.toml")),
        ]
        .into_iter()
        .flatten()
        .collect();

        Self::load_first(&config_paths)
    }

    /// Load the first existing file in `paths` that parses
    pub fn load_first(paths: &[PathBuf]) -> LoadedConfig {
        let mut skipped = Vec::new();

        for path in paths {
            if !path.exists() {
                continue;
            }
            match Self::load_with_env(path) {
                Ok(config) => {
                    return LoadedConfig {
                        config,
                        source: Some(path.clone()),
                        skipped,
                    }
                }
                Err(e) => skipped.push(e),
            }
        }

        LoadedConfig {
            config: Self::from_env(),
            source: None,
            skipped,
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("TAILINK_API_URL") {
            self.api.base_url = url;
        }
        if let Ok(timeout) = std::env::var("TAILINK_API_TIMEOUT") {
            if let Ok(secs) = timeout.parse() {
                self.api.request_timeout_secs = secs;
            }
        }

        if let Ok(path) = std::env::var("TAILINK_SESSION_PATH") {
            self.session.path = Some(path);
        }

        if let Ok(key) = std::env::var("TAILINK_MAPTILER_KEY") {
            self.map.maptiler_key = key;
        }

        if let Ok(level) = std::env::var("TAILINK_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("TAILINK_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Result of searching the default config locations
#[derive(Debug)]
pub struct LoadedConfig {
    pub config: Config,
    /// File the config came from; `None` means defaults plus environment
    pub source: Option<PathBuf>,
    /// Files that exist but failed to load
    pub skipped: Vec<ConfigError>,
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Tailink Configuration
#
# Environment variables override these settings:
# - TAILINK_API_URL
# - TAILINK_API_TIMEOUT
# - TAILINK_SESSION_PATH
# - TAILINK_MAPTILER_KEY
# - TAILINK_LOG_LEVEL
# - TAILINK_LOG_FORMAT

[api]
# Base URL of the Tailink REST API (endpoint paths are appended to it)
base_url = "http://localhost:8000/api/"

# Request timeout in seconds
request_timeout_secs = 30

[session]
# Where the login token is stored (default: <data dir>/tailink/session.toml)
# path = "/home/me/.local/share/tailink/session.toml"

[map]
# MapTiler API key for the streets style
maptiler_key = ""

# Initial center as [longitude, latitude]
center = [34.860, 32.195]

# Initial zoom level
zoom = 14.0

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_template_parses() {
        let config: Config = toml::from_str(&generate_default_config()).unwrap();
        assert_eq!(config.api.base_url, "http://localhost:8000/api/");
        assert_eq!(config.api.request_timeout_secs, 30);
        assert_eq!(config.map.center, [34.860, 32.195]);
        assert_eq!(config.logging.format, "pretty");
        assert!(config.session.path.is_none());
    }

    #[test]
    fn test_load_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[api]\nbase_url = \"https://tailink.example/api\"\n\n\
             [session]\npath = \"/tmp/s.toml\"\n",
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.api.base_url, "https://tailink.example/api");
        assert_eq!(config.api.request_timeout_secs, 30);
        assert_eq!(config.session.resolve_path(), PathBuf::from("/tmp/s.toml"));
        assert_eq!(config.map.zoom, 14.0);
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_load_first_reports_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let broken = dir.path().join("broken.toml");
        let good = dir.path().join("good.toml");
        std::fs::write(&broken, "not = [valid").unwrap();
        std::fs::write(&good, "[map]\nzoom = 9.0\n").unwrap();

        let paths = [dir.path().join("absent.toml"), broken.clone(), good.clone()];
        let loaded = Config::load_first(&paths);

        assert_eq!(loaded.source, Some(good));
        assert_eq!(loaded.config.map.zoom, 9.0);
        assert_eq!(loaded.skipped.len(), 1);
        assert!(matches!(&loaded.skipped[0], ConfigError::Parse { path, .. } if *path == broken));
    }

    #[test]
    fn test_load_first_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let broken = dir.path().join("config.toml");
        std::fs::write(&broken, "not = [valid").unwrap();

        let loaded = Config::load_first(&[broken]);

        assert!(loaded.source.is_none());
        assert_eq!(loaded.skipped.len(), 1);
        assert_eq!(loaded.config.map.zoom, 14.0);
    }

    #[test]
    fn test_normalized_base_url() {
        assert_eq!(
            ApiConfig::new("http://localhost:8000/api").normalized_base_url(),
            "http://localhost:8000/api/"
        );
        assert_eq!(
            ApiConfig::new("http://localhost:8000/api//").normalized_base_url(),
            "http://localhost:8000/api/"
        );
    }

    #[test]
    fn test_style_url_carries_key() {
        let map = MapConfig {
            maptiler_key: "k123".to_string(),
            ..MapConfig::default()
        };
        assert!(map.style_url().ends_with("style.json?key=k123"));
    }
}
