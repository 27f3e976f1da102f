//! Store module for the sensorlog readout engine.
//!
//! The [`Store`] holds readouts in insertion order and owns the three rules
//! that make the logger useful:
//!
//! - **Admission**: a live readout is kept only if its minute-of-hour lines up
//!   with the sampling interval and its minute slot is still free.
//! - **Retention**: [`Store::prune`] drops everything at or before a cutoff
//!   computed from a maximum age.
//! - **Persistence codec**: the whole collection round-trips through a single
//!   JSON document; entries read back from disk must pass a well-formedness
//!   check but are otherwise trusted.
//!
//! # Document Layout
//!
//! ```text
//! { "sensor-data": [
//!     { "date": "01-01-2024", "time": "10:00:00",
//!       "temperature": 21.5, "humidity": 40.0, "pressure": 1013.2 },
//!     ...
//! ] }
//! ```
//!
//! # Example Usage
//!
//! ```rust
//! use chrono::NaiveDate;
//! use sensorlog::{Readout, Store};
//!
//! let hour = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//! let mut store = Store::new(30);
//!
//! for minute in [0, 30, 45] {
//!     let at = hour.and_hms_opt(10, minute, 0).unwrap();
//!     store.append(Readout::with_timestamp(21.0, 40.0, 1013.0, at));
//! }
//!
//! // 10:45 does not line up with a 30 minute interval.
//! assert_eq!(store.len(), 2);
//!
//! let document = store.to_json();
//! let mut restored = Store::new(30);
//! let report = restored.deserialize(&document);
//! assert_eq!(report.loaded, 2);
//! ```
//!
//! # Thread Safety
//!
//! The store is meant to be owned by a single producer loop. Wrap it in
//! external synchronization if it must be shared.

use chrono::{Local, NaiveDateTime, NaiveTime, TimeDelta, Timelike};
use serde_json::{Map, Value};

use crate::error::MalformedEntry;
use crate::policy::AdmissionPolicy;
use crate::readout::{
    self, DATE_KEY, HUMIDITY_KEY, PRESSURE_KEY, Readout, TEMPERATURE_KEY, TIME_KEY,
};

/// Ordered collection of readouts with an admission policy.
#[derive(Debug, Clone, Default)]
pub struct Store {
    /// Readouts in insertion order.
    entries: Vec<Readout>,
    /// Interval alignment applied by [`Store::append`].
    policy: AdmissionPolicy,
}

/// Outcome of [`Store::deserialize`].
///
/// Skipped entries are not errors; the report exists so callers can surface
/// them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Number of entries added to the store.
    pub loaded: usize,
    /// Array index and reason for every entry that was skipped.
    pub skipped: Vec<(usize, MalformedEntry)>,
}

impl LoadReport {
    /// Returns `true` if no entry was skipped.
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
    }
}

impl Store {
    /// Top-level key of the persisted document.
    pub const JSON_KEY: &'static str = "sensor-data";

    /// Creates an empty store sampling every `interval_minutes`.
    ///
    /// See [`AdmissionPolicy::from_interval`] for the accepted values and the
    /// fallback applied to everything else.
    pub fn new(interval_minutes: u32) -> Self {
        Self::with_policy(AdmissionPolicy::from_interval(interval_minutes))
    }

    /// Creates an empty store with an explicit policy.
    pub fn with_policy(policy: AdmissionPolicy) -> Self {
        Self {
            entries: Vec::new(),
            policy,
        }
    }

    /// Returns the admission policy.
    pub fn policy(&self) -> AdmissionPolicy {
        self.policy
    }

    /// Offers a live readout to the store.
    ///
    /// The readout is kept if [`Store::valid_readout`] accepts it and silently
    /// dropped otherwise. Producers push best-effort; the first readout to
    /// claim a minute slot wins.
    ///
    /// Measurements are not range-checked. A non-finite value (NaN or
    /// infinity) is admitted but is written as `null` by
    /// [`Store::to_json`], so that entry is skipped on the next load.
    pub fn append(&mut self, readout: Readout) {
        if self.valid_readout(&readout) {
            tracing::debug!(timestamp = %readout.timestamp(), "readout stored");
            self.entries.push(readout);
        } else {
            tracing::trace!(timestamp = %readout.timestamp(), "readout dropped");
        }
    }

    /// Returns `true` if `readout` would be admitted by [`Store::append`].
    ///
    /// The readout's minute must line up with the policy, and no stored
    /// entry may already occupy the same minute slot.
    pub fn valid_readout(&self, readout: &Readout) -> bool {
        if !self.policy.is_aligned(readout.minute()) {
            return false;
        }

        !self.entries.iter().any(|entry| entry.same_minute(readout))
    }

    /// Removes readouts older than the given age, measured from now.
    ///
    /// The cutoff is `now - max_age_days - max_age_time`, where the time of
    /// day is read as an elapsed duration since midnight. Entries stamped at
    /// or before the cutoff are removed. Returns the number of removed
    /// entries.
    pub fn prune(&mut self, max_age_days: u32, max_age_time: NaiveTime) -> usize {
        self.prune_at(Local::now().naive_local(), max_age_days, max_age_time)
    }

    /// Same as [`Store::prune`] but relative to an explicit `now`.
    pub fn prune_at(
        &mut self,
        now: NaiveDateTime,
        max_age_days: u32,
        max_age_time: NaiveTime,
    ) -> usize {
        let Some(cutoff) = prune_cutoff(now, max_age_days, max_age_time) else {
            // Cutoff lies before any representable instant.
            return 0;
        };

        let before = self.entries.len();
        self.entries.retain(|entry| entry.timestamp() > cutoff);
        let removed = before - self.entries.len();

        if removed > 0 {
            tracing::debug!(removed, %cutoff, "pruned readouts");
        }
        removed
    }

    /// Writes every entry, in store order, under [`Store::JSON_KEY`].
    pub fn serialize_into(&self, output: &mut Map<String, Value>) {
        let data = self.entries.iter().map(Readout::to_json).collect();
        output.insert(Self::JSON_KEY.to_string(), Value::Array(data));
    }

    /// Serializes the store into a fresh JSON document.
    pub fn to_json(&self) -> Value {
        let mut document = Map::new();
        self.serialize_into(&mut document);
        Value::Object(document)
    }

    /// Loads entries from a persisted document.
    ///
    /// Each element of the array under [`Store::JSON_KEY`] must pass
    /// [`check_entry`]; elements that do not are logged and skipped. Loaded
    /// entries are appended as-is, without interval alignment or slot
    /// deduplication. A missing key or a non-array value loads nothing.
    pub fn deserialize(&mut self, input: &Value) -> LoadReport {
        let mut report = LoadReport::default();

        let Some(data) = input.get(Self::JSON_KEY).and_then(Value::as_array) else {
            tracing::debug!(key = Self::JSON_KEY, "no readout array in document");
            return report;
        };

        for (index, element) in data.iter().enumerate() {
            match check_entry(element) {
                Ok(readout) => {
                    self.entries.push(readout);
                    report.loaded += 1;
                }
                Err(reason) => {
                    tracing::warn!(index, %reason, "omitting invalid readout entry");
                    report.skipped.push((index, reason));
                }
            }
        }

        report
    }

    /// Returns the number of stored readouts.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the store holds no readouts.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the stored readouts in insertion order.
    pub fn entries(&self) -> &[Readout] {
        &self.entries
    }

    /// Iterates over the stored readouts in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Readout> {
        self.entries.iter()
    }

    /// Returns the most recently inserted readout.
    pub fn latest(&self) -> Option<&Readout> {
        self.entries.last()
    }
}

impl<'a> IntoIterator for &'a Store {
    type Item = &'a Readout;
    type IntoIter = std::slice::Iter<'a, Readout>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Computes the prune cutoff, or `None` if it underflows the calendar.
fn prune_cutoff(now: NaiveDateTime, days: u32, time: NaiveTime) -> Option<NaiveDateTime> {
    let age = TimeDelta::try_days(i64::from(days))?
        + TimeDelta::seconds(i64::from(time.num_seconds_from_midnight()));
    now.checked_sub_signed(age)
}

/// Well-formedness check applied to persisted entries on load.
///
/// The entry must be an object carrying numeric `temperature`, `humidity`
/// and `pressure` fields, a `DD-MM-YYYY` `date` and an `HH:MM:SS` `time`.
///
/// # Errors
///
/// Returns the first [`MalformedEntry`] reason found.
pub fn check_entry(input: &Value) -> Result<Readout, MalformedEntry> {
    let object = input.as_object().ok_or(MalformedEntry::NotAnObject)?;

    let temperature = number_field(object, TEMPERATURE_KEY)?;
    let pressure = number_field(object, PRESSURE_KEY)?;
    let humidity = number_field(object, HUMIDITY_KEY)?;

    let date = object
        .get(DATE_KEY)
        .ok_or(MalformedEntry::MissingField { field: DATE_KEY })?;
    let date = date
        .as_str()
        .and_then(readout::parse_date)
        .ok_or_else(|| MalformedEntry::InvalidDate {
            value: date.to_string(),
        })?;

    let time = object
        .get(TIME_KEY)
        .ok_or(MalformedEntry::MissingField { field: TIME_KEY })?;
    let time = time
        .as_str()
        .and_then(readout::parse_time)
        .ok_or_else(|| MalformedEntry::InvalidTime {
            value: time.to_string(),
        })?;

    Ok(Readout::with_timestamp(
        temperature,
        humidity,
        pressure,
        date.and_time(time),
    ))
}

fn number_field(object: &Map<String, Value>, field: &'static str) -> Result<f64, MalformedEntry> {
    let value = object
        .get(field)
        .ok_or(MalformedEntry::MissingField { field })?;

    value
        .as_f64()
        .filter(|number| number.is_finite())
        .ok_or(MalformedEntry::NotANumber { field })
}
