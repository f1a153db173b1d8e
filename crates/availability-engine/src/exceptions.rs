//! One-off date overrides: days off and additional working days.
//!
//! Exception dates are stored as the raw string that came in (from the form
//! or from the language model) so that a malformed date can be carried
//! without failing the whole record. Comparisons use the *date key*: the
//! calendar-date component of the string, taken literally. A value such as
//! `2024-03-05T23:00:00-05:00` keys as 2024-03-05; no timezone conversion is
//! applied, which is what keeps late-evening entries on the right day.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::clock::{ClockTime, TimeWindow};
use crate::error::{AvailabilityError, Result};

/// Extract the date key from a `YYYY-MM-DD` or ISO 8601 datetime string.
///
/// Returns `None` when no calendar date can be read.
pub fn date_key(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    let head = raw.get(..10)?;
    let rest = &raw[10..];
    if !(rest.is_empty() || rest.starts_with('T') || rest.starts_with(' ')) {
        return None;
    }
    NaiveDate::parse_from_str(head, "%Y-%m-%d").ok()
}

/// Parse a date-only string, as accepted on the command line and in tools.
///
/// # Errors
/// Returns `AvailabilityError::InvalidDate` when no date key can be read.
pub fn parse_date(raw: &str) -> Result<NaiveDate> {
    date_key(raw).ok_or_else(|| AvailabilityError::InvalidDate(raw.to_string()))
}

/// A single-date override of the weekly schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExceptionDate {
    pub date: String,
    /// Model responses often omit this; intake sets it from the list.
    #[serde(default)]
    pub available: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<ClockTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<ClockTime>,
}

impl ExceptionDate {
    pub fn day_off(date: NaiveDate) -> Self {
        Self {
            date: date.format("%Y-%m-%d").to_string(),
            available: false,
            start_time: None,
            end_time: None,
        }
    }

    pub fn work_day(date: NaiveDate) -> Self {
        Self {
            date: date.format("%Y-%m-%d").to_string(),
            available: true,
            start_time: None,
            end_time: None,
        }
    }

    /// Additional working day with its own hours.
    pub fn work_day_with_window(date: NaiveDate, window: TimeWindow) -> Self {
        Self {
            start_time: Some(window.start),
            end_time: Some(window.end),
            ..Self::work_day(date)
        }
    }

    pub fn key(&self) -> Option<NaiveDate> {
        date_key(&self.date)
    }

    pub fn matches(&self, date: NaiveDate) -> bool {
        self.key() == Some(date)
    }

    /// The exception's own window, only when both ends are given.
    pub fn window(&self) -> Option<TimeWindow> {
        match (self.start_time, self.end_time) {
            (Some(start), Some(end)) => Some(TimeWindow::new(start, end)),
            _ => None,
        }
    }
}

/// The two disjoint override lists.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExceptionSet {
    #[serde(default)]
    pub days_off: Vec<ExceptionDate>,
    #[serde(default)]
    pub additional_work_days: Vec<ExceptionDate>,
}

impl ExceptionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn day_off(&self, date: NaiveDate) -> Option<&ExceptionDate> {
        find(&self.days_off, date)
    }

    pub fn additional_work_day(&self, date: NaiveDate) -> Option<&ExceptionDate> {
        find(&self.additional_work_days, date)
    }

    pub fn is_day_off(&self, date: NaiveDate) -> bool {
        self.day_off(date).is_some()
    }

    pub fn is_additional_work_day(&self, date: NaiveDate) -> bool {
        self.additional_work_day(date).is_some()
    }

    /// Record a day off. Replaces an existing day off on the same date.
    pub fn add_day_off(&mut self, date: NaiveDate) {
        upsert(&mut self.days_off, ExceptionDate::day_off(date));
    }

    /// Record an additional working day. Replaces an existing entry on the
    /// same date, so re-adding with new hours updates them.
    pub fn add_additional_work_day(&mut self, entry: ExceptionDate) {
        let entry = ExceptionDate {
            available: true,
            ..entry
        };
        upsert(&mut self.additional_work_days, entry);
    }

    /// Returns whether an entry was removed.
    pub fn remove_day_off(&mut self, date: NaiveDate) -> bool {
        remove(&mut self.days_off, date)
    }

    /// Returns whether an entry was removed.
    pub fn remove_additional_work_day(&mut self, date: NaiveDate) -> bool {
        remove(&mut self.additional_work_days, date)
    }

    /// Dates listed both as a day off and as an additional working day.
    /// These resolve as days off.
    pub fn conflicts(&self) -> Vec<NaiveDate> {
        let mut dates: Vec<NaiveDate> = self
            .days_off
            .iter()
            .filter_map(ExceptionDate::key)
            .filter(|d| self.is_additional_work_day(*d))
            .collect();
        dates.sort();
        dates.dedup();
        dates
    }

    /// Raw date strings in either list that have no readable date key.
    pub fn unparsable(&self) -> Vec<&str> {
        self.days_off
            .iter()
            .chain(self.additional_work_days.iter())
            .filter(|e| e.key().is_none())
            .map(|e| e.date.as_str())
            .collect()
    }
}

fn find(entries: &[ExceptionDate], date: NaiveDate) -> Option<&ExceptionDate> {
    entries.iter().find(|e| e.matches(date))
}

fn upsert(entries: &mut Vec<ExceptionDate>, entry: ExceptionDate) {
    let key = entry.key();
    match entries.iter_mut().find(|e| key.is_some() && e.key() == key) {
        Some(existing) => *existing = entry,
        None => entries.push(entry),
    }
}

fn remove(entries: &mut Vec<ExceptionDate>, date: NaiveDate) -> bool {
    let before = entries.len();
    entries.retain(|e| !e.matches(date));
    entries.len() != before
}
