use std::{env, fmt, fs, path};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::checker::PROBE_TIMEOUT;
use crate::scheduler::{DEFAULT_CONCURRENCY, DEFAULT_INTERVAL};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    ReadFailed(std::io::Error),
    #[error("failed to write config file: {0}")]
    WriteFailed(std::io::Error),
    #[error("failed to parse config file: {0}")]
    ParseFailed(toml::de::Error),
    #[error("failed to serialize config: {0}")]
    SerializeFailed(toml::ser::Error),
    #[error("no usable config directory available")]
    ConfigPathUnavailable,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: Server,
    pub monitoring: Monitoring,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Server {
    pub bind: String,
    pub port: u16,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Monitoring {
    /// Seconds between scheduler ticks
    pub interval_seconds: u64,
    /// Per-probe timeout in milliseconds
    pub probe_timeout_ms: u64,
    /// Concurrent per-site checks within a tick
    pub concurrency: usize,
}

impl Default for Server {
    fn default() -> Self {
        Self { bind: "0.0.0.0".into(), port: 3001 }
    }
}

impl Default for Monitoring {
    fn default() -> Self {
        Self {
            interval_seconds: DEFAULT_INTERVAL.as_secs(),
            probe_timeout_ms: PROBE_TIMEOUT.as_millis() as u64,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self { server: Server::default(), monitoring: Monitoring::default() }
    }
}

/// Used to ensure we are actually reading a toml file
fn normalize_toml_path(path: &path::Path) -> path::PathBuf {
    let mut path = path.to_path_buf();
    if path.extension().map(|ext| ext != "toml").unwrap_or(true) {
        path.set_extension("toml");
    }
    path
}

/// Get default config path ($XDG_CONFIG_HOME/sitepulse/config.toml or
/// $HOME/.config/...)
fn default_config_path() -> Result<path::PathBuf, ConfigError> {
    let path = if let Ok(config_home) = env::var("XDG_CONFIG_HOME") {
        path::PathBuf::from(config_home)
    } else if let Some(home_dir) = env::home_dir() {
        home_dir.join(".config")
    } else {
        return Err(ConfigError::ConfigPathUnavailable);
    };

    Ok(path.join("sitepulse/config.toml"))
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Resolved configuration:")?;
        writeln!(f, "  server: {}:{}", self.server.bind, self.server.port)?;
        writeln!(f, "  tick interval: {}s", self.monitoring.interval_seconds)?;
        writeln!(f, "  probe timeout: {}ms", self.monitoring.probe_timeout_ms)?;
        write!(f, "  tick concurrency: {}", self.monitoring.concurrency)
    }
}

impl Config {
    /// Generate Config structure from file
    ///
    /// Creates a default config in ~/.config/sitepulse/config.toml
    ///  or the specified path, with the name config.toml if one does not exist
    pub fn from_config(optional_path: Option<impl AsRef<path::Path>>) -> Result<Self, ConfigError> {
        let config_path: path::PathBuf = if let Some(path) = optional_path {
            normalize_toml_path(path.as_ref())
        } else {
            default_config_path()?
        };

        if config_path.exists() {
            let raw_string = fs::read_to_string(&config_path).map_err(ConfigError::ReadFailed)?;
            toml::from_str(raw_string.as_str()).map_err(ConfigError::ParseFailed)
        } else {
            let config = Self::default();
            config.write_config(&config_path)?;
            Ok(config)
        }
    }

    /// Serialize and write a config to a file
    pub fn write_config(&self, path: &path::Path) -> Result<(), ConfigError> {
        let config_str: String =
            toml::to_string_pretty(self).map_err(ConfigError::SerializeFailed)?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(ConfigError::WriteFailed)?;
        }

        fs::write(path, config_str).map_err(ConfigError::WriteFailed)
    }

    /// Apply environment overrides. `PORT` takes precedence over the
    /// configured server port.
    pub fn apply_env_overrides(&mut self) {
        if let Some(port) = env::var("PORT").ok().and_then(|v| v.parse().ok()) {
            self.server.port = port;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_cadence() {
        let config = Config::default();

        assert_eq!(config.server.port, 3001);
        assert_eq!(config.monitoring.interval_seconds, 10);
        assert_eq!(config.monitoring.probe_timeout_ms, 5000);
    }

    #[test]
    fn missing_file_writes_defaults_and_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let written = Config::from_config(Some(&path)).unwrap();
        assert!(path.exists());

        let reloaded = Config::from_config(Some(&path)).unwrap();
        assert_eq!(reloaded.server.port, written.server.port);
        assert_eq!(reloaded.monitoring.interval_seconds, written.monitoring.interval_seconds);
    }

    #[test]
    fn partial_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[server]\nport = 8080\n").unwrap();

        let config = Config::from_config(Some(&path)).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.monitoring.interval_seconds, 10);
    }

    #[test]
    fn display_reports_every_setting() {
        let rendered = Config::default().to_string();

        assert!(rendered.contains("0.0.0.0:3001"));
        assert!(rendered.contains("tick interval: 10s"));
        assert!(rendered.contains("probe timeout: 5000ms"));
        assert!(rendered.contains("tick concurrency: 4"));
    }

    #[test]
    fn non_toml_extension_is_normalized() {
        assert_eq!(
            normalize_toml_path(path::Path::new("/tmp/config.json")),
            path::PathBuf::from("/tmp/config.toml")
        );
    }
}
