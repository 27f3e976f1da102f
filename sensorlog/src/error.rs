//! Error types for the sensorlog readout engine.
//!
//! Store operations themselves never fail: rejected readouts are dropped and
//! malformed persisted entries are skipped. Errors only surface from the
//! collaborators around the store (data file I/O, configuration, and the
//! field protocol parser), plus [`MalformedEntry`] which describes why a
//! persisted entry was skipped.

use std::path::PathBuf;

use thiserror::Error;

/// The main error type for all fallible sensorlog operations.
#[derive(Error, Debug)]
pub enum SensorlogError {
    /// Error reading or writing the persisted data file.
    #[error("data file error: {0}")]
    Persist(#[from] PersistError),

    /// Error loading logger configuration.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// Error parsing a line of the sensor field protocol.
    #[error("frame error: {0}")]
    Frame(#[from] FrameError),
}

/// Errors that can occur when loading or saving the persisted data file.
#[derive(Error, Debug)]
pub enum PersistError {
    /// The data file exists but could not be read.
    #[error("failed to read data file '{}': {source}", path.display())]
    Read {
        /// The data file path.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The data file is not valid JSON.
    #[error("failed to parse data file '{}': {source}", path.display())]
    Parse {
        /// The data file path.
        path: PathBuf,
        /// The underlying JSON parsing error.
        #[source]
        source: serde_json::Error,
    },

    /// The data file is valid JSON but its top-level value is not an object.
    #[error("data file '{}' does not contain a JSON object", path.display())]
    NotAnObject {
        /// The data file path.
        path: PathBuf,
    },

    /// Failed to serialize the store document.
    #[error("failed to serialize store document: {source}")]
    Serialize {
        /// The underlying JSON serialization error.
        #[source]
        source: serde_json::Error,
    },

    /// Failed to write the data file.
    #[error("failed to write data file '{}': {source}", path.display())]
    Write {
        /// The path that could not be written.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Errors that can occur when loading a logger configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config '{}': {source}", path.display())]
    Read {
        /// The configuration file path.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid.
    #[error("failed to parse config '{}': {source}", path.display())]
    Parse {
        /// The configuration file path.
        path: PathBuf,
        /// The underlying JSON parsing error.
        #[source]
        source: serde_json::Error,
    },

    /// The retention time is not in `HH:MM:SS` form.
    #[error("invalid retention time '{value}': expected HH:MM:SS")]
    InvalidRetentionTime {
        /// The rejected value.
        value: String,
    },
}

/// Errors that can occur when parsing a line of the sensor field protocol.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FrameError {
    /// A known field tag carried a value that is not a decimal number.
    #[error("invalid value '{value}' for field '{tag}'")]
    InvalidValue {
        /// The field tag (`T`, `H` or `P`).
        tag: char,
        /// The text that failed to parse.
        value: String,
    },
}

/// Reason a persisted entry failed the well-formedness check on load.
///
/// These are diagnostics, not failures: the entry is skipped and loading
/// continues with its siblings.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MalformedEntry {
    /// The array element is not a JSON object.
    #[error("entry is not a JSON object")]
    NotAnObject,

    /// A required key is absent.
    #[error("missing field '{field}'")]
    MissingField {
        /// The missing key.
        field: &'static str,
    },

    /// A measurement field is present but not a finite number.
    #[error("field '{field}' is not a number")]
    NotANumber {
        /// The offending key.
        field: &'static str,
    },

    /// The `date` field is not a `DD-MM-YYYY` string.
    #[error("invalid date '{value}': expected DD-MM-YYYY")]
    InvalidDate {
        /// The rejected value, rendered as JSON text.
        value: String,
    },

    /// The `time` field is not an `HH:MM:SS` string.
    #[error("invalid time '{value}': expected HH:MM:SS")]
    InvalidTime {
        /// The rejected value, rendered as JSON text.
        value: String,
    },
}

/// Type alias for `Result<T, SensorlogError>`.
pub type Result<T> = std::result::Result<T, SensorlogError>;
