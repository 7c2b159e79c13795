//! Configuration management for the coding tracker
//!
//! Loads settings from TOML file at ~/.coding-tracker/config.toml

use crate::error::{CoreError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Database configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Demonstration data configuration
    #[serde(default)]
    pub seed: SeedConfig,
}

/// Database location
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite file (default: ~/.coding-tracker/coding-tracker.db)
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

fn default_db_path() -> PathBuf {
    default_data_dir().join("coding-tracker.db")
}

fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .map(|p| p.join(".coding-tracker"))
        .unwrap_or_else(|| PathBuf::from(".coding-tracker"))
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        DatabaseConfig {
            path: default_db_path(),
        }
    }
}

/// Seeding of an empty database with synthetic sessions
#[derive(Debug, Clone, Deserialize)]
pub struct SeedConfig {
    /// Whether an empty table gets demonstration rows
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Number of sessions to generate
    #[serde(default = "default_seed_sessions")]
    pub sessions: usize,
}

fn default_true() -> bool {
    true
}

fn default_seed_sessions() -> usize {
    15
}

impl Default for SeedConfig {
    fn default() -> Self {
        SeedConfig {
            enabled: true,
            sessions: default_seed_sessions(),
        }
    }
}

impl SeedConfig {
    /// Seeding switched off
    pub fn disabled() -> Self {
        SeedConfig {
            enabled: false,
            ..SeedConfig::default()
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let expanded_path = expand_path(path.as_ref());

        if !expanded_path.exists() {
            return Err(CoreError::Config(format!(
                "Configuration file not found: {}",
                expanded_path.display()
            )));
        }

        let content = std::fs::read_to_string(&expanded_path)?;
        let config: Config = toml::from_str(&content)?;

        Ok(config)
    }

    /// Get the default configuration file path
    pub fn default_path() -> PathBuf {
        default_data_dir().join("config.toml")
    }

    /// Get the database path, expanding ~ if present
    pub fn db_path(&self) -> PathBuf {
        expand_path(&self.database.path)
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(&mut self) {
        if let Ok(path) = std::env::var("CODING_TRACKER_DB") {
            if !path.is_empty() {
                self.database.path = PathBuf::from(path);
            }
        }
        if let Ok(seed) = std::env::var("CODING_TRACKER_SEED") {
            match seed.as_str() {
                "true" | "1" => self.seed.enabled = true,
                "false" | "0" => self.seed.enabled = false,
                other => tracing::warn!("Ignoring invalid CODING_TRACKER_SEED value: {}", other),
            }
        }
    }

    /// Create a default configuration file at the given path
    pub fn create_default<P: AsRef<Path>>(path: P) -> Result<()> {
        let content = r#"# Coding Tracker Configuration

[database]
# SQLite file holding the coding sessions
path = "~/.coding-tracker/coding-tracker.db"

[seed]
# Fill an empty database with demonstration sessions
enabled = true
sessions = 15
"#;

        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;

        Ok(())
    }
}

/// Expand ~ to home directory in paths
pub fn expand_path(path: &Path) -> PathBuf {
    if let Ok(rest) = path.strip_prefix("~") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    path.to_path_buf()
}
