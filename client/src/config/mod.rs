//! Central module for application-wide configuration settings.
//!
//! This module handles loading and managing configuration parameters such as
//! the remote API base URL, HTTP timeouts, the notification poll interval and
//! the directory used for durable client-local session state.

use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: String,
    pub request_timeout_seconds: u64,
    pub poll_interval_seconds: u64,
    pub storage_dir: PathBuf,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let api_base_url = env::var("API_BASE_URL").context("API_BASE_URL not set")?;

        let request_timeout_seconds = env::var("API_TIMEOUT_SECONDS")
            .unwrap_or_else(|_| "10".to_string())
            .parse::<u64>()
            .context("API_TIMEOUT_SECONDS must be a valid number")?;

        let poll_interval_seconds = env::var("NOTIFICATION_POLL_SECONDS")
            .unwrap_or_else(|_| "30".to_string())
            .parse::<u64>()
            .context("NOTIFICATION_POLL_SECONDS must be a valid number")?;

        let storage_dir = match env::var("CLIENT_STATE_DIR") {
            Ok(dir) => PathBuf::from(dir),
            Err(_) => dirs::data_dir()
                .context("could not determine a data directory for session state")?
                .join("mentorhub"),
        };

        Ok(Config {
            api_base_url,
            request_timeout_seconds,
            poll_interval_seconds,
            storage_dir,
        })
    }

    /// Notification poll interval as a [`Duration`].
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_seconds)
    }
}
