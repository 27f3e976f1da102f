//! Logger configuration.
//!
//! A [`LoggerConfig`] names the data file, the sampling interval and the
//! retention window. Every field has a default, so an empty JSON object is a
//! valid configuration file.
//!
//! ```json
//! {
//!   "data_file": "/var/lib/sensorlog/sensor-data.json",
//!   "interval_minutes": 30,
//!   "retention_days": 7,
//!   "retention_time": "12:00:00"
//! }
//! ```

use std::path::{Path, PathBuf};

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};
use crate::policy::DEFAULT_INTERVAL_MINUTES;
use crate::readout;
use crate::store::Store;

/// Default data file name.
const DEFAULT_DATA_FILE: &str = "sensor-data.json";

/// Default retention in whole days.
const DEFAULT_RETENTION_DAYS: u32 = 30;

/// Settings for a logger process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// Path of the persisted JSON document.
    pub data_file: PathBuf,

    /// Sampling interval in minutes; unsupported values fall back to 10.
    pub interval_minutes: u32,

    /// Whole days of history to keep.
    pub retention_days: u32,

    /// Extra age on top of `retention_days`, as `HH:MM:SS`.
    pub retention_time: String,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            interval_minutes: DEFAULT_INTERVAL_MINUTES,
            retention_days: DEFAULT_RETENTION_DAYS,
            retention_time: "00:00:00".to_string(),
        }
    }
}

impl LoggerConfig {
    /// Reads a configuration from a JSON file.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::Read`] if the file cannot be read
    /// - [`ConfigError::Parse`] if it is not a valid configuration
    /// - [`ConfigError::InvalidRetentionTime`] if `retention_time` is not
    ///   `HH:MM:SS`
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: Self = serde_json::from_str(&data).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })?;
        config.retention_time()?;
        Ok(config)
    }

    /// Returns the parsed retention time of day.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidRetentionTime`] if the field is not
    /// `HH:MM:SS`.
    pub fn retention_time(&self) -> Result<NaiveTime> {
        readout::parse_time(&self.retention_time).ok_or_else(|| {
            ConfigError::InvalidRetentionTime {
                value: self.retention_time.clone(),
            }
            .into()
        })
    }

    /// Builds an empty store with the configured interval.
    pub fn store(&self) -> Store {
        Store::new(self.interval_minutes)
    }
}
