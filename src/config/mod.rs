mod schema;

pub use schema::{ColorMode, Config};

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;
use tracing::debug;

use crate::store::MAX_REPORTS;

/// Get the config directory path (~/.config/pcos-risk/)
pub fn get_config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".config").join("pcos-risk"))
}

/// Get the default config file path (~/.config/pcos-risk/config.yaml)
pub fn get_config_path() -> Result<PathBuf> {
    Ok(get_config_dir()?.join("config.yaml"))
}

/// Default data directory: the platform data dir, falling back to the config dir.
pub fn default_data_dir() -> Result<PathBuf> {
    match dirs::data_dir() {
        Some(dir) => Ok(dir.join("pcos-risk")),
        None => get_config_dir(),
    }
}

impl Config {
    /// Configured data directory, or the platform default.
    pub fn data_dir(&self) -> Result<PathBuf> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => default_data_dir(),
        }
    }

    pub fn history_limit(&self) -> usize {
        self.history_limit.unwrap_or(MAX_REPORTS)
    }
}

/// Load configuration from a YAML file
///
/// # Arguments
///
/// * `path` - Optional path to config file. If None, uses default path (~/.config/pcos-risk/config.yaml)
///
/// # Errors
///
/// Returns an error if:
/// - An explicitly given config file does not exist
/// - The config file cannot be read
/// - The YAML cannot be parsed
///
/// A missing file at the default path is not an error; defaults are used.
pub fn load_config(path: Option<PathBuf>) -> Result<Config> {
    let explicit = path.is_some();
    let config_path = match path {
        Some(p) => p,
        None => get_config_path()?,
    };

    if !config_path.exists() {
        if explicit {
            anyhow::bail!("Config file not found at {}", config_path.display());
        }
        debug!(path = %config_path.display(), "no config file, using defaults");
        return Ok(Config::default());
    }

    let config_content = fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read config file at {}", config_path.display()))?;

    let config: Config = serde_saphyr::from_str(&config_content)
        .with_context(|| format!("Failed to parse config: invalid YAML in {}", config_path.display()))?;

    debug!(path = %config_path.display(), "config loaded");
    Ok(config)
}

/// Validate configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_config(config: &Config) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if let Some(limit) = config.history_limit {
        if limit == 0 || limit > MAX_REPORTS {
            errors.push(format!(
                "history_limit: must be between 1 and {}, got {}",
                MAX_REPORTS, limit
            ));
        }
    }

    if let Some(ref dir) = config.data_dir {
        if dir.as_os_str().is_empty() {
            errors.push("data_dir: must not be empty".to_string());
        } else if dir.is_file() {
            errors.push(format!("data_dir: {} is a file", dir.display()));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_explicit_missing_file_is_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing.yaml");
        let err = load_config(Some(path)).unwrap_err();
        assert!(err.to_string().contains("Config file not found"));
    }

    #[test]
    fn test_load_config_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "color: always\nhistory_limit: 4\n").unwrap();
        let config = load_config(Some(path)).unwrap();
        assert_eq!(config.color, ColorMode::Always);
        assert_eq!(config.history_limit(), 4);
    }

    #[test]
    fn test_load_invalid_yaml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "color: [unclosed\n").unwrap();
        let err = load_config(Some(path)).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config"));
    }

    #[test]
    fn test_explicit_data_dir_wins() {
        let config = Config {
            data_dir: Some(PathBuf::from("/srv/pcos")),
            ..Config::default()
        };
        assert_eq!(config.data_dir().unwrap(), PathBuf::from("/srv/pcos"));
    }

    #[test]
    fn test_history_limit_defaults_to_store_cap() {
        assert_eq!(Config::default().history_limit(), MAX_REPORTS);
    }

    #[test]
    fn test_valid_config() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("not-a-dir");
        fs::write(&file, "").unwrap();
        let config = Config {
            data_dir: Some(file),         // Error 1
            color: ColorMode::Auto,
            history_limit: Some(11),      // Error 2
        };
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors[0].contains("history_limit"));
        assert!(errors[1].contains("data_dir"));
    }

    #[test]
    fn test_zero_history_limit() {
        let config = Config {
            history_limit: Some(0),
            ..Config::default()
        };
        assert!(validate_config(&config).is_err());
    }
}
