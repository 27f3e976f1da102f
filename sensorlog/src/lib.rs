//! # sensorlog
//!
//! Readout admission, retention and JSON persistence for environmental
//! sensor loggers.
//!
//! A serial-attached weather sensor reports temperature, humidity and
//! pressure every few hundred milliseconds. Keeping every sample is useless;
//! sensorlog keeps one readout per sampling slot, ages old readouts out, and
//! round-trips the whole history through a single JSON file.
//!
//! ## Key Properties
//!
//! - Interval alignment: readouts are kept only on 10/20/30/40/50 minute
//!   boundaries, or on the full hour
//! - One readout per minute slot, first write wins
//! - Inclusive age-based pruning
//! - Tolerant loading: malformed persisted entries are skipped, not fatal
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use sensorlog::{DataFile, Readout, Store};
//! use chrono::NaiveTime;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let file = DataFile::new("./sensor-data.json");
//!
//! // Sample every 30 minutes and restore the previous history.
//! let mut store = Store::new(30);
//! file.load_into(&mut store)?;
//!
//! // Offer a readout; it is silently dropped if it misses the interval.
//! store.append(Readout::new(21.5, 40.0, 1013.2));
//!
//! // Keep one week of history.
//! store.prune(7, NaiveTime::MIN);
//!
//! file.save(&store)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`readout`] — Single readout and its JSON form
//! - [`policy`] — Sampling-interval admission policy
//! - [`store`] — Admission, pruning and document codec
//! - [`persist`] — Data file load/save around the store
//! - [`frame`] — Device field protocol parsing and readout assembly
//! - [`config`] — Logger configuration
//! - [`error`] — Error types

pub mod config;
pub mod error;
pub mod frame;
pub mod persist;
pub mod policy;
pub mod readout;
pub mod store;

// Re-export primary API types at crate root for convenience.
pub use config::LoggerConfig;
pub use error::{MalformedEntry, Result, SensorlogError};
pub use frame::{Field, ReadoutAssembler};
pub use persist::DataFile;
pub use policy::AdmissionPolicy;
pub use readout::Readout;
pub use store::{LoadReport, Store};
