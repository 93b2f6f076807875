use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Top-level application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub data: DataConfig,
    pub submission: SubmissionConfig,
}

/// Data directory configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Override the default data directory.
    pub data_dir: Option<PathBuf>,
}

/// Booking submission endpoint configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SubmissionConfig {
    /// Base URL of the booking-creation endpoint.
    pub endpoint: String,
    /// Request timeout in seconds for submission calls.
    pub timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data: DataConfig::default(),
            submission: SubmissionConfig::default(),
        }
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        Self { data_dir: None }
    }
}

impl Default for SubmissionConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:8080/bookings".to_string(),
            timeout_secs: 30,
        }
    }
}

impl AppConfig {
    /// Load configuration from `~/.config/freightdesk/config.toml`.
    /// Returns `Default` if the file is missing or unparseable.
    pub fn load() -> Self {
        let config_path = Self::config_path();
        match std::fs::read_to_string(&config_path) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(config) => {
                    log::info!("Loaded config from {}", config_path.display());
                    config
                }
                Err(e) => {
                    log::warn!(
                        "Failed to parse config at {}: {e}, using defaults",
                        config_path.display()
                    );
                    Self::default()
                }
            },
            Err(_) => {
                log::debug!(
                    "No config file at {}, using defaults",
                    config_path.display()
                );
                Self::default()
            }
        }
    }

    /// Resolved data directory (override or XDG default).
    pub fn data_dir(&self) -> PathBuf {
        self.data.data_dir.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .map(|d| d.join("freightdesk"))
                .unwrap_or_else(|| PathBuf::from("data"))
        })
    }

    /// Submission request timeout as a [`Duration`].
    pub fn submission_timeout(&self) -> Duration {
        Duration::from_secs(self.submission.timeout_secs)
    }

    fn config_path() -> PathBuf {
        dirs::config_dir()
            .map(|d| d.join("freightdesk").join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert!(config.data.data_dir.is_none());
        assert_eq!(config.submission.timeout_secs, 30);
        assert!(config.submission.endpoint.ends_with("/bookings"));
    }

    #[test]
    fn test_parse_partial_config() {
        let config: AppConfig = toml::from_str(
            r#"
            [submission]
            endpoint = "https://api.example.com/v1/bookings"
            "#,
        )
        .unwrap();
        assert_eq!(config.submission.endpoint, "https://api.example.com/v1/bookings");
        // Unspecified fields keep their defaults
        assert_eq!(config.submission.timeout_secs, 30);
        assert!(config.data.data_dir.is_none());
    }

    #[test]
    fn test_data_dir_override() {
        let mut config = AppConfig::default();
        config.data.data_dir = Some(PathBuf::from("/tmp/freightdesk-test"));
        assert_eq!(config.data_dir(), PathBuf::from("/tmp/freightdesk-test"));
    }
}
