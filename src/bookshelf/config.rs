use crate::error::{Result, ShelfError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

const CONFIG_FILENAME: &str = "config.json";
const DEFAULT_LATENCY_MS: u64 = 1500;
const DEFAULT_PAGE_SIZE: usize = 10;

/// Configuration for bookshelf, stored in `config.json` in the config directory
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ShelfConfig {
    /// Simulated storage round trip for every mutation, in milliseconds
    #[serde(default = "default_latency_ms")]
    pub latency_ms: u64,

    /// Rows per page when a table first shows up
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Page sizes offered by the tables
    #[serde(default = "default_page_size_options")]
    pub page_size_options: Vec<usize>,

    /// Whether a fresh shelf starts with the default books
    #[serde(default = "default_seed")]
    pub seed: bool,
}

fn default_latency_ms() -> u64 {
    DEFAULT_LATENCY_MS
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

fn default_page_size_options() -> Vec<usize> {
    vec![5, 10, 20, 50]
}

fn default_seed() -> bool {
    true
}

impl Default for ShelfConfig {
    fn default() -> Self {
        Self {
            latency_ms: DEFAULT_LATENCY_MS,
            page_size: DEFAULT_PAGE_SIZE,
            page_size_options: default_page_size_options(),
            seed: true,
        }
    }
}

impl ShelfConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path)?;
        let config: ShelfConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir)?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);
        let content = serde_json::to_string_pretty(self)?;
        fs::write(config_path, content)?;
        Ok(())
    }

    pub fn latency(&self) -> Duration {
        Duration::from_millis(self.latency_ms)
    }

    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            return Err(ShelfError::Config("page_size must be at least 1".into()));
        }
        if self.page_size_options.is_empty() || self.page_size_options.contains(&0) {
            return Err(ShelfError::Config(
                "page_size_options must list sizes of at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Current value of `key`, rendered for display.
    pub fn get(&self, key: &str) -> Result<String> {
        match key {
            "latency-ms" => Ok(self.latency_ms.to_string()),
            "page-size" => Ok(self.page_size.to_string()),
            "page-size-options" => Ok(self
                .page_size_options
                .iter()
                .map(|n| n.to_string())
                .collect::<Vec<_>>()
                .join(",")),
            "seed" => Ok(self.seed.to_string()),
            other => Err(ShelfError::Config(format!("Unknown config key: {}", other))),
        }
    }

    /// Sets `key` from its display form.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let invalid = || ShelfError::Config(format!("Invalid value for {}: {}", key, value));
        let mut next = self.clone();
        match key {
            "latency-ms" => next.latency_ms = value.parse().map_err(|_| invalid())?,
            "page-size" => next.page_size = value.parse().map_err(|_| invalid())?,
            "page-size-options" => {
                next.page_size_options = value
                    .split(',')
                    .map(|s| s.trim().parse::<usize>())
                    .collect::<std::result::Result<_, _>>()
                    .map_err(|_| invalid())?
            }
            "seed" => next.seed = value.parse().map_err(|_| invalid())?,
            other => return Err(ShelfError::Config(format!("Unknown config key: {}", other))),
        }
        next.validate()?;
        *self = next;
        Ok(())
    }

    pub const KEYS: [&'static str; 4] = ["latency-ms", "page-size", "page-size-options", "seed"];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ShelfConfig::default();
        assert_eq!(config.latency(), Duration::from_millis(1500));
        assert_eq!(config.page_size, 10);
        assert!(config.seed);
    }

    #[test]
    fn test_load_missing_config() {
        let dir = tempfile::tempdir().unwrap();
        let config = ShelfConfig::load(dir.path()).unwrap();
        assert_eq!(config, ShelfConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("nested");

        let mut config = ShelfConfig::default();
        config.set("latency-ms", "250").unwrap();
        config.set("page-size-options", "3, 6").unwrap();
        config.save(&nested).unwrap();

        let loaded = ShelfConfig::load(&nested).unwrap();
        assert_eq!(loaded.latency_ms, 250);
        assert_eq!(loaded.page_size_options, vec![3, 6]);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILENAME), r#"{"seed": false}"#).unwrap();

        let loaded = ShelfConfig::load(dir.path()).unwrap();
        assert!(!loaded.seed);
        assert_eq!(loaded.page_size, 10);
    }

    #[test]
    fn test_rejects_bad_values() {
        let mut config = ShelfConfig::default();
        assert!(matches!(
            config.set("page-size", "0"),
            Err(ShelfError::Config(_))
        ));
        assert!(config.set("seed", "maybe").is_err());
        assert!(config.set("colour", "blue").is_err());
        assert_eq!(config, ShelfConfig::default());
        assert_eq!(config.get("page-size").unwrap(), "10");
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILENAME), r#"{"page_size": 0}"#).unwrap();
        assert!(ShelfConfig::load(dir.path()).is_err());
    }
}
