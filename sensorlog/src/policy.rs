//! Sampling-interval admission policy.
//!
//! The policy decides which minute-of-hour a readout must fall on to be
//! stored. Intervals are whole multiples of ten minutes up to an hour; the
//! hourly setting is a distinct full-hour mode that only admits readouts taken
//! at minute zero.

use serde::{Deserialize, Serialize};

/// Interval used when the configured value is not supported.
pub const DEFAULT_INTERVAL_MINUTES: u32 = 10;

/// Interval value that selects full-hour mode.
pub const FULL_HOUR_MINUTES: u32 = 60;

/// Minute-alignment rule applied when a readout is appended to a store.
///
/// # Example
///
/// ```rust
/// use sensorlog::AdmissionPolicy;
///
/// let policy = AdmissionPolicy::from_interval(20);
/// assert!(policy.is_aligned(40));
/// assert!(!policy.is_aligned(30));
///
/// // Unsupported intervals fall back to ten minutes.
/// assert_eq!(AdmissionPolicy::from_interval(15).interval_minutes(), 10);
/// ```
///
/// A policy serializes as its interval in minutes and is decoded through
/// [`AdmissionPolicy::from_interval`], so the fallback applies to decoded
/// values too.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "u32", into = "u32")]
pub struct AdmissionPolicy {
    interval_minutes: u32,
    full_hour: bool,
}

impl AdmissionPolicy {
    /// Builds a policy from a sampling interval in minutes.
    ///
    /// Accepted values are 10, 20, 30, 40, 50 and 60. Anything else silently
    /// falls back to [`DEFAULT_INTERVAL_MINUTES`]. A value of 60 enables
    /// full-hour mode.
    pub fn from_interval(minutes: u32) -> Self {
        let supported = (DEFAULT_INTERVAL_MINUTES..=FULL_HOUR_MINUTES).contains(&minutes)
            && minutes % 10 == 0;

        if !supported {
            tracing::debug!(
                requested = minutes,
                fallback = DEFAULT_INTERVAL_MINUTES,
                "unsupported sampling interval"
            );
            return Self::default();
        }

        Self {
            interval_minutes: minutes,
            full_hour: minutes == FULL_HOUR_MINUTES,
        }
    }

    /// The effective sampling interval in minutes.
    pub fn interval_minutes(&self) -> u32 {
        self.interval_minutes
    }

    /// Whether only top-of-hour readouts are admitted.
    pub fn is_full_hour(&self) -> bool {
        self.full_hour
    }

    /// Returns `true` if a readout taken at `minute` past the hour lines up
    /// with this policy.
    pub fn is_aligned(&self, minute: u32) -> bool {
        if self.full_hour {
            minute == 0
        } else {
            minute % self.interval_minutes == 0
        }
    }
}

impl Default for AdmissionPolicy {
    fn default() -> Self {
        Self {
            interval_minutes: DEFAULT_INTERVAL_MINUTES,
            full_hour: false,
        }
    }
}

impl From<u32> for AdmissionPolicy {
    fn from(minutes: u32) -> Self {
        Self::from_interval(minutes)
    }
}

impl From<AdmissionPolicy> for u32 {
    fn from(policy: AdmissionPolicy) -> Self {
        policy.interval_minutes
    }
}
