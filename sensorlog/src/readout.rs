//! Single environmental readout and its JSON representation.
//!
//! A [`Readout`] is one temperature/humidity/pressure triple taken at one
//! instant. Timestamps are local wall-clock values without a zone, which is
//! how the sensor logger has always written them to disk.
//!
//! # JSON Form
//!
//! ```text
//! { "date": "DD-MM-YYYY", "time": "HH:MM:SS",
//!   "temperature": 21.5, "humidity": 40.0, "pressure": 1013.2 }
//! ```

use std::fmt;

use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde_json::{Map, Value};

/// `chrono` format string for the persisted `date` field (`DD-MM-YYYY`).
pub const DATE_FORMAT: &str = "%d-%m-%Y";

/// `chrono` format string for the persisted `time` field (`HH:MM:SS`).
pub const TIME_FORMAT: &str = "%H:%M:%S";

/// JSON key of the date field.
pub(crate) const DATE_KEY: &str = "date";
/// JSON key of the time field.
pub(crate) const TIME_KEY: &str = "time";
/// JSON key of the temperature field.
pub(crate) const TEMPERATURE_KEY: &str = "temperature";
/// JSON key of the humidity field.
pub(crate) const HUMIDITY_KEY: &str = "humidity";
/// JSON key of the pressure field.
pub(crate) const PRESSURE_KEY: &str = "pressure";

/// One measurement triple at one instant.
///
/// Readouts carry no range validation: whatever the producer measured is
/// kept as-is. The timestamp is always present; a readout built without an
/// explicit one is stamped with the current local time.
///
/// # Example
///
/// ```rust
/// use chrono::NaiveDate;
/// use sensorlog::Readout;
///
/// let at = NaiveDate::from_ymd_opt(2024, 1, 1)
///     .and_then(|d| d.and_hms_opt(10, 0, 5))
///     .unwrap();
/// let readout = Readout::with_timestamp(21.5, 40.0, 1013.2, at);
///
/// let json = readout.to_json();
/// assert_eq!(json["date"], "01-01-2024");
/// assert_eq!(json["time"], "10:00:05");
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Readout {
    temperature: f64,
    humidity: f64,
    pressure: f64,
    timestamp: NaiveDateTime,
}

impl Readout {
    /// Creates a readout stamped with the current local time.
    pub fn new(temperature: f64, humidity: f64, pressure: f64) -> Self {
        Self::with_timestamp(temperature, humidity, pressure, Local::now().naive_local())
    }

    /// Creates a readout with an explicit timestamp.
    ///
    /// Non-finite measurements are accepted here but serialize as JSON
    /// `null`, which fails the load-time check; they do not survive a
    /// save/load cycle.
    pub fn with_timestamp(
        temperature: f64,
        humidity: f64,
        pressure: f64,
        timestamp: NaiveDateTime,
    ) -> Self {
        Self {
            temperature,
            humidity,
            pressure,
            timestamp,
        }
    }

    /// Temperature in degrees Celsius.
    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    /// Relative humidity in percent.
    pub fn humidity(&self) -> f64 {
        self.humidity
    }

    /// Pressure in hectopascals.
    pub fn pressure(&self) -> f64 {
        self.pressure
    }

    /// Instant the readout was taken.
    pub fn timestamp(&self) -> NaiveDateTime {
        self.timestamp
    }

    /// Minute-of-hour of the timestamp, used by interval alignment.
    pub fn minute(&self) -> u32 {
        self.timestamp.minute()
    }

    /// Returns `true` if both readouts fall into the same minute slot.
    ///
    /// Date, hour and minute must match; seconds and anything finer are
    /// ignored. This is the store's deduplication predicate, not a general
    /// equality.
    pub fn same_minute(&self, other: &Readout) -> bool {
        let (a, b) = (self.timestamp, other.timestamp);
        a.date() == b.date() && a.hour() == b.hour() && a.minute() == b.minute()
    }

    /// Serializes the readout as a JSON object.
    pub fn to_json(&self) -> Value {
        let mut object = Map::new();
        self.serialize_into(&mut object);
        Value::Object(object)
    }

    /// Writes the readout's five keys into an existing JSON object.
    pub fn serialize_into(&self, output: &mut Map<String, Value>) {
        output.insert(
            DATE_KEY.to_string(),
            Value::String(self.timestamp.format(DATE_FORMAT).to_string()),
        );
        output.insert(
            TIME_KEY.to_string(),
            Value::String(self.timestamp.format(TIME_FORMAT).to_string()),
        );
        output.insert(TEMPERATURE_KEY.to_string(), Value::from(self.temperature));
        output.insert(HUMIDITY_KEY.to_string(), Value::from(self.humidity));
        output.insert(PRESSURE_KEY.to_string(), Value::from(self.pressure));
    }

    /// Decodes a readout from a JSON object without validating it.
    ///
    /// Missing or non-numeric measurements decode as `0.0`. A missing or
    /// malformed `date`/`time` decodes as the zero instant
    /// (`1970-01-01 00:00:00`). Use [`Store::deserialize`] to load persisted
    /// data with validation.
    ///
    /// [`Store::deserialize`]: crate::Store::deserialize
    pub fn from_json(input: &Value) -> Self {
        let number = |key: &str| input.get(key).and_then(Value::as_f64).unwrap_or(0.0);

        let date = input.get(DATE_KEY).and_then(Value::as_str).and_then(parse_date);
        let time = input.get(TIME_KEY).and_then(Value::as_str).and_then(parse_time);
        let timestamp = match (date, time) {
            (Some(date), Some(time)) => date.and_time(time),
            _ => NaiveDateTime::default(),
        };

        Self {
            temperature: number(TEMPERATURE_KEY),
            humidity: number(HUMIDITY_KEY),
            pressure: number(PRESSURE_KEY),
            timestamp,
        }
    }
}

impl fmt::Display for Readout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Temperature: {} °C, Humidity: {} %, Pressure {} hPa",
            self.temperature, self.humidity, self.pressure
        )
    }
}

/// Parses a `DD-MM-YYYY` date.
pub(crate) fn parse_date(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text, DATE_FORMAT).ok()
}

/// Parses an `HH:MM:SS` time of day.
pub(crate) fn parse_time(text: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(text, TIME_FORMAT).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    #[test]
    fn test_new_is_stamped_now() {
        let before = Local::now().naive_local();
        let readout = Readout::new(1.0, 2.0, 3.0);
        let after = Local::now().naive_local();

        assert!(readout.timestamp() >= before);
        assert!(readout.timestamp() <= after);
    }

    #[test]
    fn test_same_minute_ignores_seconds() {
        let a = Readout::with_timestamp(1.0, 1.0, 1.0, at(10, 0, 5));
        let b = Readout::with_timestamp(2.0, 2.0, 2.0, at(10, 0, 45));
        let c = Readout::with_timestamp(1.0, 1.0, 1.0, at(10, 1, 5));

        assert!(a.same_minute(&b));
        assert!(b.same_minute(&a));
        assert!(!a.same_minute(&c));
    }

    #[test]
    fn test_same_minute_checks_date_and_hour() {
        let a = Readout::with_timestamp(1.0, 1.0, 1.0, at(10, 0, 0));
        let next_hour = Readout::with_timestamp(1.0, 1.0, 1.0, at(11, 0, 0));
        let next_day = Readout::with_timestamp(
            1.0,
            1.0,
            1.0,
            NaiveDate::from_ymd_opt(2024, 1, 2)
                .unwrap()
                .and_hms_opt(10, 0, 0)
                .unwrap(),
        );

        assert!(!a.same_minute(&next_hour));
        assert!(!a.same_minute(&next_day));
    }

    #[test]
    fn test_to_json_layout() {
        let readout = Readout::with_timestamp(21.5, 40.25, 1013.0, at(9, 5, 7));
        let value = readout.to_json();

        assert_eq!(
            value,
            json!({
                "date": "01-01-2024",
                "time": "09:05:07",
                "temperature": 21.5,
                "humidity": 40.25,
                "pressure": 1013.0,
            })
        );
    }

    #[test]
    fn test_from_json_preserves_fields() {
        let readout = Readout::with_timestamp(-3.5, 88.0, 998.7, at(23, 59, 59));
        let decoded = Readout::from_json(&readout.to_json());

        assert_eq!(decoded, readout);
    }

    #[test]
    fn test_from_json_accepts_integer_numbers() {
        let decoded = Readout::from_json(&json!({
            "date": "15-06-2023",
            "time": "12:30:00",
            "temperature": 20,
            "humidity": 50,
            "pressure": 1000,
        }));

        assert_eq!(decoded.temperature(), 20.0);
        assert_eq!(decoded.humidity(), 50.0);
        assert_eq!(decoded.pressure(), 1000.0);
        assert_eq!(decoded.minute(), 30);
    }

    #[test]
    fn test_from_json_is_lenient() {
        let decoded = Readout::from_json(&json!({
            "date": "2024-01-01",
            "temperature": "warm",
            "pressure": 1001.5,
        }));

        assert_eq!(decoded.temperature(), 0.0);
        assert_eq!(decoded.humidity(), 0.0);
        assert_eq!(decoded.pressure(), 1001.5);
        assert_eq!(decoded.timestamp(), NaiveDateTime::default());
    }

    #[test]
    fn test_serialize_into_keeps_existing_keys() {
        let mut object = Map::new();
        object.insert("station".to_string(), json!("roof"));

        Readout::with_timestamp(1.0, 2.0, 3.0, at(0, 0, 0)).serialize_into(&mut object);

        assert_eq!(object.len(), 6);
        assert_eq!(object["station"], "roof");
        assert_eq!(object["time"], "00:00:00");
    }

    #[test]
    fn test_display() {
        let readout = Readout::with_timestamp(21.5, 40.0, 1013.25, at(0, 0, 0));
        assert_eq!(
            readout.to_string(),
            "Temperature: 21.5 °C, Humidity: 40 %, Pressure 1013.25 hPa"
        );
    }

    #[test]
    fn test_parse_helpers() {
        assert_eq!(parse_date("29-02-2024"), NaiveDate::from_ymd_opt(2024, 2, 29));
        assert_eq!(parse_date("30-02-2024"), None);
        assert_eq!(parse_date("2024-02-01"), None);
        assert_eq!(parse_time("07:08:09"), NaiveTime::from_hms_opt(7, 8, 9));
        assert_eq!(parse_time("25:00:00"), None);
        assert_eq!(parse_time("10:00"), None);
    }
}
