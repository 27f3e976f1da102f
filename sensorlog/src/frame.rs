//! Producer side: the sensor's text field protocol.
//!
//! After the serial layer has decoded a line, it looks like
//! `T21.50|H40.2|P1013.25`: `|`-separated segments, each a one-letter tag
//! followed by a decimal value. [`parse_line`] turns a line into [`Field`]
//! updates and [`ReadoutAssembler`] collects updates until one full
//! measurement cycle is available as a [`Readout`].

use chrono::{Local, NaiveDateTime};

use crate::error::{FrameError, Result};
use crate::readout::Readout;

/// Segment separator.
const SEPARATOR: char = '|';

/// One measurement update from the device.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Field {
    /// `T` segment, degrees Celsius.
    Temperature(f64),
    /// `H` segment, percent relative humidity.
    Humidity(f64),
    /// `P` segment, hectopascals.
    Pressure(f64),
}

/// Parses one decoded protocol line into field updates.
///
/// Empty segments and unknown tags are ignored.
///
/// # Errors
///
/// Returns [`FrameError::InvalidValue`] if a `T`, `H` or `P` segment does
/// not carry a finite decimal number.
///
/// # Example
///
/// ```rust
/// use sensorlog::frame::{parse_line, Field};
///
/// let fields = parse_line("T21.5|H40|P1013.25").unwrap();
/// assert_eq!(fields, vec![
///     Field::Temperature(21.5),
///     Field::Humidity(40.0),
///     Field::Pressure(1013.25),
/// ]);
/// ```
pub fn parse_line(line: &str) -> Result<Vec<Field>> {
    let mut fields = Vec::with_capacity(3);

    for segment in line.split(SEPARATOR).map(str::trim) {
        let mut chars = segment.chars();
        let Some(tag) = chars.next() else {
            continue;
        };
        let text = chars.as_str();

        let make: fn(f64) -> Field = match tag {
            'T' => Field::Temperature,
            'H' => Field::Humidity,
            'P' => Field::Pressure,
            _ => continue,
        };

        let value = text
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| FrameError::InvalidValue {
                tag,
                value: text.to_string(),
            })?;
        fields.push(make(value));
    }

    Ok(fields)
}

/// Collects field updates until a full readout can be built.
///
/// Each field keeps its most recent value. Once temperature, humidity and
/// pressure are all present, taking a readout empties the assembler for the
/// next cycle.
#[derive(Debug, Clone, Default)]
pub struct ReadoutAssembler {
    temperature: Option<f64>,
    humidity: Option<f64>,
    pressure: Option<f64>,
}

impl ReadoutAssembler {
    /// Creates an empty assembler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a field update, replacing any earlier value of that kind.
    pub fn push(&mut self, field: Field) {
        match field {
            Field::Temperature(v) => self.temperature = Some(v),
            Field::Humidity(v) => self.humidity = Some(v),
            Field::Pressure(v) => self.pressure = Some(v),
        }
    }

    /// Returns `true` once all three fields have been seen.
    pub fn is_complete(&self) -> bool {
        self.temperature.is_some() && self.humidity.is_some() && self.pressure.is_some()
    }

    /// Builds a readout stamped with the current local time, if complete.
    pub fn take(&mut self) -> Option<Readout> {
        self.take_at(Local::now().naive_local())
    }

    /// Builds a readout stamped with `timestamp`, if complete.
    pub fn take_at(&mut self, timestamp: NaiveDateTime) -> Option<Readout> {
        let (Some(t), Some(h), Some(p)) = (self.temperature, self.humidity, self.pressure) else {
            return None;
        };
        *self = Self::default();
        Some(Readout::with_timestamp(t, h, p, timestamp))
    }

    /// Parses `line`, records its fields and returns a readout if the cycle
    /// is now complete.
    ///
    /// # Errors
    ///
    /// Returns the [`parse_line`] error; no field from a bad line is
    /// recorded.
    pub fn feed_line_at(
        &mut self,
        line: &str,
        timestamp: NaiveDateTime,
    ) -> Result<Option<Readout>> {
        for field in parse_line(line)? {
            self.push(field);
        }
        Ok(self.take_at(timestamp))
    }
}
