//! Configuration loading for Prosemeter
//!
//! A `.prosemeter.json` file configures weights, cache TTL, the qualitative
//! collaborator timeout, and the CLI threshold. The loader searches the
//! working directory and its parents; an explicitly requested file that does
//! not exist is an error, a missing default file is not.

use crate::ScoringWeights;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_FILENAME: &str = ".prosemeter.json";

const DEFAULT_CACHE_TTL_SECS: u64 = 7 * 24 * 60 * 60;
const DEFAULT_QUALITATIVE_TIMEOUT_MS: u64 = 10_000;

/// On-disk configuration schema. Every field is optional; omitted fields fall
/// back to defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Config {
    /// Analyzer weights; missing fields within take their default values
    pub weights: Option<ScoringWeights>,
    /// Cache entry lifetime in seconds
    pub cache_ttl_secs: Option<u64>,
    /// How long to wait for the qualitative collaborator
    pub qualitative_timeout_ms: Option<u64>,
    /// Minimum composite score for CLI success
    pub threshold: Option<u8>,
    /// Override the qualitative endpoint URL
    pub endpoint: Option<String>,
    /// Override the qualitative model name
    pub model: Option<String>,
}

impl Config {
    pub fn weights(&self) -> ScoringWeights {
        self.weights.unwrap_or_default()
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs.unwrap_or(DEFAULT_CACHE_TTL_SECS))
    }

    pub fn qualitative_timeout(&self) -> Duration {
        Duration::from_millis(
            self.qualitative_timeout_ms
                .unwrap_or(DEFAULT_QUALITATIVE_TIMEOUT_MS),
        )
    }
}

/// Find and load the config file. Searches `work_dir` then its parents; a
/// `custom_path` that does not exist is an error.
pub fn load_config(work_dir: &Path, custom_path: Option<&Path>) -> Result<Config> {
    let path = if let Some(p) = custom_path {
        let path = if p.is_absolute() {
            p.to_path_buf()
        } else {
            work_dir.join(p)
        };
        if path.exists() {
            Some(path)
        } else {
            anyhow::bail!("Config file not found: {}", path.display());
        }
    } else {
        find_config_in_parents(work_dir)
    };

    match path {
        Some(path) => load_config_file(&path),
        None => Ok(Config::default()),
    }
}

fn load_config_file(config_path: &Path) -> Result<Config> {
    let content = fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config: {}", config_path.display()))?;
    let config: Config = serde_json::from_str(&content)
        .with_context(|| format!("Invalid JSON in config: {}", config_path.display()))?;

    Ok(config)
}

fn find_config_in_parents(start_dir: &Path) -> Option<PathBuf> {
    let mut dir = start_dir;
    loop {
        let candidate = dir.join(CONFIG_FILENAME);
        if candidate.exists() {
            return Some(candidate);
        }
        dir = dir.parent()?;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_default_config_falls_back_to_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = load_config(dir.path(), None).unwrap();
        assert!(config.weights.is_none());
        assert_eq!(config.cache_ttl(), Duration::from_secs(7 * 24 * 60 * 60));
        assert_eq!(config.qualitative_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn missing_custom_config_is_an_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let result = load_config(dir.path(), Some(Path::new("nope.json")));
        assert!(result.is_err());
    }

    #[test]
    fn loads_config_from_parent_directory() {
        let dir = tempfile::TempDir::new().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILENAME),
            r#"{"threshold": 75, "cacheTtlSecs": 60}"#,
        )
        .unwrap();
        let child = dir.path().join("nested/deeper");
        fs::create_dir_all(&child).unwrap();

        let config = load_config(&child, None).unwrap();
        assert_eq!(config.threshold, Some(75));
        assert_eq!(config.cache_ttl(), Duration::from_secs(60));
    }

    #[test]
    fn partial_weights_fill_in_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILENAME),
            r#"{"weights": {"readability": 50.0}}"#,
        )
        .unwrap();

        let config = load_config(dir.path(), None).unwrap();
        let weights = config.weights();
        assert_eq!(weights.readability, 50.0);
        assert_eq!(weights.writing_quality, 30.0);
    }

    #[test]
    fn invalid_json_is_an_error() {
        let dir = tempfile::TempDir::new().unwrap();
        fs::write(dir.path().join(CONFIG_FILENAME), "{ not json").unwrap();
        let result = load_config(dir.path(), None);
        assert!(result.is_err());
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let dir = tempfile::TempDir::new().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILENAME),
            r#"{"thresold": 75}"#,
        )
        .unwrap();
        let result = load_config(dir.path(), None);
        assert!(result.is_err(), "typoed keys should not load silently");
    }
}
