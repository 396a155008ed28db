use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub json: bool,
    #[serde(default)]
    pub interval_ms: u64,
    #[serde(default)]
    pub count: i64,
    #[serde(default = "default_cpu_window_ms")]
    pub cpu_window_ms: u64,
    #[serde(default)]
    pub disk_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            json: false,
            interval_ms: 0,
            count: 0,
            cpu_window_ms: default_cpu_window_ms(),
            disk_path: None,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse YAML in {path}: {source}")]
    Parse {
        path: String,
        source: serde_yaml::Error,
    },
    #[error("invalid configuration: {0}")]
    Validation(String),
}

impl Config {
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path_ref = path.as_ref();
        let path_display = path_ref.display().to_string();
        let text = fs::read_to_string(path_ref).map_err(|source| ConfigError::Read {
            path: path_display.clone(),
            source,
        })?;

        let cfg: Config = serde_yaml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path_display,
            source,
        })?;

        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=MAX_CPU_WINDOW_MS).contains(&self.cpu_window_ms) {
            return Err(ConfigError::Validation(format!(
                "cpu_window_ms must be in 1..={MAX_CPU_WINDOW_MS}"
            )));
        }
        if let Some(path) = &self.disk_path {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::Validation(
                    "disk_path must not be empty".to_string(),
                ));
            }
        }
        Ok(())
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn cpu_window(&self) -> Duration {
        Duration::from_millis(self.cpu_window_ms)
    }

    pub fn example_yaml() -> &'static str {
        include_str!("../config.yaml.example")
    }
}

const MAX_CPU_WINDOW_MS: u64 = 10_000;

const fn default_cpu_window_ms() -> u64 {
    200
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let cfg: Config = serde_yaml::from_str("{}").expect("parse");
        cfg.validate().expect("defaults are valid");
        assert!(!cfg.json);
        assert_eq!(cfg.interval(), Duration::ZERO);
        assert_eq!(cfg.count, 0);
        assert_eq!(cfg.cpu_window(), Duration::from_millis(200));
        assert!(cfg.disk_path.is_none());
    }

    #[test]
    fn example_yaml_is_valid() {
        let cfg: Config = serde_yaml::from_str(Config::example_yaml()).expect("parse example");
        cfg.validate().expect("example is valid");
    }

    #[test]
    fn zero_cpu_window_is_rejected() {
        let cfg = Config {
            cpu_window_ms: 0,
            ..Config::default()
        };
        assert!(matches!(cfg.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn empty_disk_path_is_rejected() {
        let cfg = Config {
            disk_path: Some(PathBuf::new()),
            ..Config::default()
        };
        assert!(matches!(cfg.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = Config::load_from_file("/nonexistent/hoststat.yaml").expect_err("missing");
        assert!(matches!(err, ConfigError::Read { .. }));
        assert!(err.to_string().contains("/nonexistent/hoststat.yaml"));
    }

    #[test]
    fn parses_full_file() {
        let text = "json: true\ninterval_ms: 1500\ncount: -1\ncpu_window_ms: 250\ndisk_path: /var\n";
        let cfg: Config = serde_yaml::from_str(text).expect("parse");
        cfg.validate().expect("valid");
        assert!(cfg.json);
        assert_eq!(cfg.interval(), Duration::from_millis(1500));
        assert_eq!(cfg.count, -1);
        assert_eq!(cfg.cpu_window(), Duration::from_millis(250));
        assert_eq!(cfg.disk_path, Some(PathBuf::from("/var")));
    }
}
