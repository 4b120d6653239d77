//! Configuration management

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Daemon configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaemonConfig {
    /// Path to configuration file
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Device node the monitor's serial link is attached to.
    /// `-` reads stdin instead (useful for replaying captures).
    pub device_path: String,

    /// Unix socket path for IPC queries (status / session log)
    pub ipc_socket_path: String,

    /// Unix socket path for the live event broadcast
    pub events_socket_path: String,

    /// Durable session log (single JSON document)
    pub session_log_path: String,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        let ipc_socket_path = vitalink_paths::get_ipc_socket_path()
            .map(|p| p.to_string_lossy().into_owned())
            .unwrap_or_else(|_| "/tmp/vitalink.sock".to_string());

        let events_socket_path = vitalink_paths::get_events_socket_path()
            .map(|p| p.to_string_lossy().into_owned())
            .unwrap_or_else(|_| "/tmp/vitalink_events.sock".to_string());

        let session_log_path = vitalink_paths::get_session_log_path()
            .map(|p| p.to_string_lossy().into_owned())
            .unwrap_or_else(|_| "sessions.json".to_string());

        Self {
            config_path: Self::default_config_path(),
            device_path: "/dev/ttyUSB0".to_string(),
            ipc_socket_path,
            events_socket_path,
            session_log_path,
        }
    }
}

impl DaemonConfig {
    /// Load configuration from file, or create default
    pub fn load(path_override: Option<PathBuf>) -> Result<Self> {
        let config_path = match path_override {
            Some(path) => path,
            None => Self::default_config_path(),
        };

        if config_path.exists() {
            // Load existing config
            let contents = std::fs::read_to_string(&config_path)
                .context("Failed to read config file")?;

            let mut config: DaemonConfig = toml::from_str(&contents)
                .context("Failed to parse config file")?;

            config.config_path = config_path;
            Ok(config)
        } else {
            // Create default config
            let mut config = Self::default();
            config.config_path = config_path;
            config.save()
                .context("Failed to save default config")?;
            Ok(config)
        }
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        // Ensure config directory exists
        if let Some(parent) = self.config_path.parent() {
            std::fs::create_dir_all(parent)
                .context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self)
            .context("Failed to serialize config")?;

        std::fs::write(&self.config_path, contents)
            .context("Failed to write config file")?;

        Ok(())
    }

    /// Get default config path
    fn default_config_path() -> PathBuf {
        vitalink_paths::get_config_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join("config.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_creates_default() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");

        let config = DaemonConfig::load(Some(path.clone())).unwrap();
        assert!(path.exists());
        assert_eq!(config.config_path, path);
        assert_eq!(config.device_path, "/dev/ttyUSB0");
    }

    #[test]
    fn test_save_load_round_trip() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");

        let mut config = DaemonConfig::default();
        config.config_path = path.clone();
        config.device_path = "/dev/ttyACM3".to_string();
        config.save().unwrap();

        let loaded = DaemonConfig::load(Some(path)).unwrap();
        assert_eq!(loaded.device_path, "/dev/ttyACM3");
        assert_eq!(loaded.session_log_path, config.session_log_path);
    }
}
