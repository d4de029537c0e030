//! Environment-variable configuration
//!
//! The appliance has no CLI; everything comes from the environment.
//! GITHUB_TOKEN and GITHUB_USERNAME are required, the rest have defaults.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::ConfigError;
use crate::store::Brightness;

const DEFAULT_POLL_INTERVAL_SECS: u64 = 900;
const DEFAULT_BRIGHTNESS: f32 = 1.0;
const DEFAULT_BRIGHTNESS_FILE: &str = "brightness.txt";

#[derive(Debug, Clone)]
pub struct Config {
    /// Wi-Fi credentials, consumed by sessions that manage the radio
    pub wifi_ssid: String,
    pub wifi_password: String,
    /// Personal access token with read:user scope
    pub github_token: String,
    pub github_username: String,
    /// Time between refresh cycles
    pub poll_interval: Duration,
    /// Brightness used when nothing has been persisted yet
    pub default_brightness: Brightness,
    /// Where the brightness setting is persisted
    pub brightness_file: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            wifi_ssid: env::var("WIFI_SSID").unwrap_or_default(),
            wifi_password: env::var("WIFI_PASS").unwrap_or_default(),
            github_token: env::var("GITHUB_TOKEN")
                .map_err(|_| ConfigError::Missing("GITHUB_TOKEN"))?,
            github_username: env::var("GITHUB_USERNAME")
                .map_err(|_| ConfigError::Missing("GITHUB_USERNAME"))?,
            poll_interval: Duration::from_secs(
                env::var("POLL_INTERVAL_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(DEFAULT_POLL_INTERVAL_SECS),
            ),
            default_brightness: Brightness::new(
                env::var("DEFAULT_BRIGHTNESS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(DEFAULT_BRIGHTNESS),
            ),
            brightness_file: env::var("BRIGHTNESS_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_BRIGHTNESS_FILE)),
        })
    }
}
