use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration. Every field is optional.
///
/// Example YAML:
/// ```yaml
/// data_dir: /home/me/.local/share/pcos-risk
/// color: auto
/// history_limit: 5
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Directory holding the report and account store
    /// (default: platform data dir + "pcos-risk")
    #[serde(default)]
    pub data_dir: Option<PathBuf>,

    /// When to color terminal output
    #[serde(default)]
    pub color: ColorMode,

    /// Number of reports shown by `history` (default: all stored, at most 10)
    #[serde(default)]
    pub history_limit: Option<usize>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    /// Color when stdout is a terminal
    #[default]
    Auto,
    Always,
    Never,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.data_dir.is_none());
        assert_eq!(config.color, ColorMode::Auto);
        assert!(config.history_limit.is_none());
    }

    #[test]
    fn test_empty_config_parse() {
        let config: Config = serde_saphyr::from_str("{}").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_full_config_parse() {
        let yaml = r#"
data_dir: /tmp/pcos
color: never
history_limit: 5
"#;
        let config: Config = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(config.data_dir, Some(PathBuf::from("/tmp/pcos")));
        assert_eq!(config.color, ColorMode::Never);
        assert_eq!(config.history_limit, Some(5));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let yaml = "queries: []\n";
        assert!(serde_saphyr::from_str::<Config>(yaml).is_err());
    }

    #[test]
    fn test_config_serde_roundtrip() {
        let config = Config {
            data_dir: Some(PathBuf::from("/data")),
            color: ColorMode::Always,
            history_limit: Some(3),
        };
        let yaml = serde_saphyr::to_string(&config).unwrap();
        let parsed: Config = serde_saphyr::from_str(&yaml).unwrap();
        assert_eq!(config, parsed);
    }
}
