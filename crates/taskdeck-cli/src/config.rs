//! Configuration and file system paths for the CLI.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

/// Default API base URL.
pub const DEFAULT_API_URL: &str = "http://localhost:8080";

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Manages file system paths for the CLI.
#[derive(Debug, Clone)]
pub struct Paths {
    /// Base directory for runtime files (~/.taskdeck)
    base_dir: PathBuf,
}

impl Paths {
    /// Create a new Paths instance rooted at `~/.taskdeck`.
    pub fn new() -> Result<Self> {
        let home = dirs::home_dir().context("could not determine home directory")?;
        Ok(Self {
            base_dir: home.join(".taskdeck"),
        })
    }

    /// Create a new Paths instance with a custom base directory.
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Config file path (~/.taskdeck/config.json).
    pub fn config_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Credential file path (~/.taskdeck/credentials.json).
    pub fn credentials_file(&self) -> PathBuf {
        self.base_dir.join("credentials.json")
    }

    /// Create the base directory if it does not exist.
    pub fn ensure_dirs(&self) -> Result<()> {
        std::fs::create_dir_all(&self.base_dir)
            .with_context(|| format!("could not create {}", self.base_dir.display()))?;
        Ok(())
    }
}

/// CLI configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// API base URL.
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from the config file, falling back to defaults,
    /// then apply environment overrides.
    pub fn load(paths: &Paths) -> Result<Self> {
        let config_path = paths.config_file();

        let mut config = if config_path.exists() {
            Self::load_from_file(&config_path)?
        } else {
            Self::default()
        };

        config.load_from_env();
        Ok(config)
    }

    /// Load configuration from a specific file.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("could not read {}", path.display()))?;
        let config: Config = serde_json::from_str(&content)
            .with_context(|| format!("{} is not valid configuration", path.display()))?;
        Ok(config)
    }

    /// Save configuration to the config file.
    pub fn save(&self, paths: &Paths) -> Result<()> {
        paths.ensure_dirs()?;
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(paths.config_file(), content)?;
        Ok(())
    }

    /// Override configuration from environment variables.
    fn load_from_env(&mut self) {
        if let Ok(api_url) = std::env::var("TASKDECK_API_URL") {
            self.api_url = api_url;
        }
        if let Ok(log_level) = std::env::var("TASKDECK_LOG_LEVEL") {
            self.log_level = log_level;
        }
    }

    /// Get the API base URL as a parsed URL.
    pub fn api_url(&self) -> Result<Url> {
        Url::parse(&self.api_url)
            .with_context(|| format!("invalid API URL: {}", self.api_url))
    }
}
