//! Wall-clock times of day (`HH:MM`) and the 12-hour display format.
//!
//! Schedules store times as 24-hour `HH:MM` strings. [`ClockTime`] is the
//! parsed form; it serializes back to the zero-padded string so stored
//! submissions keep their original shape.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{AvailabilityError, Result};

/// A time of day with minute precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClockTime {
    hour: u8,
    minute: u8,
}

impl ClockTime {
    /// Build a time from hour (0-23) and minute (0-59).
    pub fn new(hour: u8, minute: u8) -> Result<Self> {
        if hour > 23 || minute > 59 {
            return Err(AvailabilityError::InvalidTime(format!(
                "{}:{:02}",
                hour, minute
            )));
        }
        Ok(Self { hour, minute })
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    pub fn minute(&self) -> u8 {
        self.minute
    }

    /// Minutes since midnight.
    pub fn minutes_from_midnight(&self) -> u32 {
        u32::from(self.hour) * 60 + u32::from(self.minute)
    }

    /// Render in 12-hour form with an AM/PM suffix, dropping `:00` minutes.
    ///
    /// ```
    /// use availability_engine::ClockTime;
    ///
    /// let t: ClockTime = "13:30".parse().unwrap();
    /// assert_eq!(t.to_12_hour(), "1:30PM");
    /// let t: ClockTime = "09:00".parse().unwrap();
    /// assert_eq!(t.to_12_hour(), "9AM");
    /// ```
    pub fn to_12_hour(&self) -> String {
        let suffix = if self.hour >= 12 { "PM" } else { "AM" };
        let hour = match self.hour % 12 {
            0 => 12,
            h => h,
        };
        if self.minute == 0 {
            format!("{}{}", hour, suffix)
        } else {
            format!("{}:{:02}{}", hour, self.minute, suffix)
        }
    }
}

impl FromStr for ClockTime {
    type Err = AvailabilityError;

    /// Accepts `H:MM` or `HH:MM`. Minutes must be exactly two digits.
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || AvailabilityError::InvalidTime(s.to_string());

        let (h, m) = s.trim().split_once(':').ok_or_else(invalid)?;
        if h.is_empty() || h.len() > 2 || m.len() != 2 {
            return Err(invalid());
        }
        if !h.bytes().chain(m.bytes()).all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }

        let hour: u8 = h.parse().map_err(|_| invalid())?;
        let minute: u8 = m.parse().map_err(|_| invalid())?;
        ClockTime::new(hour, minute).map_err(|_| invalid())
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl Serialize for ClockTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ClockTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// A start/end pair of clock times for one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: ClockTime,
    pub end: ClockTime,
}

impl TimeWindow {
    pub fn new(start: ClockTime, end: ClockTime) -> Self {
        Self { start, end }
    }

    /// Length of the window in minutes; zero when `end` is not after `start`.
    pub fn minutes(&self) -> u32 {
        self.end
            .minutes_from_midnight()
            .saturating_sub(self.start.minutes_from_midnight())
    }

    /// The fallback business window, 09:00-17:00.
    pub fn business_hours() -> Self {
        Self {
            start: ClockTime { hour: 9, minute: 0 },
            end: ClockTime { hour: 17, minute: 0 },
        }
    }
}

impl Default for TimeWindow {
    fn default() -> Self {
        Self::business_hours()
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start.to_12_hour(), self.end.to_12_hour())
    }
}

/// Convert a 24-hour `HH:MM` string to 12-hour display form.
///
/// # Errors
/// Returns `AvailabilityError::InvalidTime` when `time` is not a valid `HH:MM`.
pub fn format_time(time: &str) -> Result<String> {
    Ok(time.parse::<ClockTime>()?.to_12_hour())
}
