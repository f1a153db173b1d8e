//! Month calendar expansion.
//!
//! Builds a render-ready grid for one month: leading blank cells so day 1
//! lands under its weekday column (Sunday-first), then one resolved
//! [`DayAvailability`] per date.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::error::{AvailabilityError, Result};
use crate::resolver::{resolve_day, AvailabilityProfile, DayAvailability, ResolveOptions};

pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Column headers, Sunday-first.
pub const WEEKDAY_HEADERS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// Month number (1-12) for a full English month name, case-insensitive.
pub fn parse_month_name(name: &str) -> Result<u32> {
    MONTH_NAMES
        .iter()
        .position(|m| m.eq_ignore_ascii_case(name.trim()))
        .map(|i| i as u32 + 1)
        .ok_or_else(|| AvailabilityError::InvalidMonth(name.to_string()))
}

/// Number of days in a month, leap-year aware.
pub fn days_in_month(year: i32, month: u32) -> Result<u32> {
    let first = first_of_month(year, month)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .ok_or_else(|| AvailabilityError::InvalidMonth(format!("{}-{:02}", year, month)))?;
    Ok((next - first).num_days() as u32)
}

fn first_of_month(year: i32, month: u32) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| AvailabilityError::InvalidMonth(format!("{}-{:02}", year, month)))
}

/// One cell of the month grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CalendarCell<'a> {
    Empty,
    Day(&'a DayAvailability),
}

/// A resolved month.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthGrid {
    pub year: i32,
    pub month: u32,
    /// Blank cells before day 1 (0 = month starts on Sunday).
    pub leading_blanks: u32,
    pub days: Vec<DayAvailability>,
}

impl MonthGrid {
    /// `"March 2024"`.
    pub fn title(&self) -> String {
        let name = (self.month as usize)
            .checked_sub(1)
            .and_then(|i| MONTH_NAMES.get(i));
        match name {
            Some(name) => format!("{} {}", name, self.year),
            None => format!("{}-{:02}", self.year, self.month),
        }
    }

    /// Resolved day by day-of-month (1-based).
    pub fn day(&self, day_of_month: u32) -> Option<&DayAvailability> {
        let index = day_of_month.checked_sub(1)? as usize;
        self.days.get(index)
    }

    /// Blanks followed by every day.
    pub fn cells(&self) -> impl Iterator<Item = CalendarCell<'_>> {
        std::iter::repeat_n(CalendarCell::Empty, self.leading_blanks as usize)
            .chain(self.days.iter().map(CalendarCell::Day))
    }

    /// Rows of seven cells; the final row is padded with blanks.
    pub fn weeks(&self) -> Vec<[CalendarCell<'_>; 7]> {
        let cells: Vec<CalendarCell<'_>> = self.cells().collect();
        cells
            .chunks(7)
            .map(|chunk| {
                let mut row = [CalendarCell::Empty; 7];
                row[..chunk.len()].copy_from_slice(chunk);
                row
            })
            .collect()
    }

    pub fn available_days(&self) -> impl Iterator<Item = &DayAvailability> {
        self.days.iter().filter(|d| d.available)
    }
}

/// Resolve every day of `month` (1-12) in `year`.
///
/// # Errors
/// Returns `AvailabilityError::InvalidMonth` for a month outside 1-12 or a
/// year chrono cannot represent.
pub fn month_grid(
    profile: &AvailabilityProfile,
    year: i32,
    month: u32,
    options: &ResolveOptions,
) -> Result<MonthGrid> {
    let first = first_of_month(year, month)?;
    let len = days_in_month(year, month)?;

    let days = first
        .iter_days()
        .take(len as usize)
        .map(|date| resolve_day(profile, date, options))
        .collect();

    Ok(MonthGrid {
        year,
        month,
        leading_blanks: first.weekday().num_days_from_sunday(),
        days,
    })
}
