//! Availability resolution for a single calendar day.
//!
//! Combines the recurring weekly schedule, the exception lists and the
//! service catalog into one [`DayAvailability`]. Precedence, highest first:
//!
//! 1. day off: unavailable, no window, no services
//! 2. additional working day: available; own hours, else the weekday's
//!    scheduled hours, else the default window
//! 3. weekly schedule: available iff the weekday entry is selected
//!
//! Resolution is pure and never fails; anything ambiguous reads as
//! unavailable.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::clock::TimeWindow;
use crate::exceptions::{ExceptionDate, ExceptionSet};
use crate::schedule::{weekday_name, WeeklySchedule};
use crate::services::{ServiceCatalog, ServiceKey};

/// Everything needed to resolve a provider's availability.
///
/// Unknown JSON fields are ignored, so a stored submission deserializes
/// directly into a profile.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityProfile {
    #[serde(default)]
    pub services: ServiceCatalog,
    #[serde(default)]
    pub schedule: WeeklySchedule,
    #[serde(default)]
    pub days_off: Vec<ExceptionDate>,
    #[serde(default)]
    pub additional_work_days: Vec<ExceptionDate>,
}

impl AvailabilityProfile {
    pub fn new(
        services: ServiceCatalog,
        schedule: WeeklySchedule,
        exceptions: ExceptionSet,
    ) -> Self {
        Self {
            services,
            schedule,
            days_off: exceptions.days_off,
            additional_work_days: exceptions.additional_work_days,
        }
    }

    /// Resolve one day with default options.
    pub fn resolve(&self, date: NaiveDate) -> DayAvailability {
        resolve_day(self, date, &ResolveOptions::default())
    }
}

/// Knobs for resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResolveOptions {
    /// Hours for an additional working day when neither the exception nor
    /// the weekday entry gives any.
    pub default_window: TimeWindow,
}

/// Why a day resolved the way it did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DayKind {
    /// Selected weekday in the weekly schedule.
    Regular,
    /// Weekday not selected, or missing from the schedule.
    Unscheduled,
    DayOff,
    AdditionalWorkDay,
}

/// Resolved availability for one calendar date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayAvailability {
    pub date: NaiveDate,
    pub available: bool,
    pub kind: DayKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub window: Option<TimeWindow>,
    pub active_services: Vec<ServiceKey>,
}

impl DayAvailability {
    fn closed(date: NaiveDate, kind: DayKind) -> Self {
        Self {
            date,
            available: false,
            kind,
            window: None,
            active_services: Vec::new(),
        }
    }

    fn open(date: NaiveDate, kind: DayKind, window: TimeWindow, services: &ServiceCatalog) -> Self {
        Self {
            date,
            available: true,
            kind,
            window: Some(window),
            active_services: services.selected_keys(),
        }
    }
}

/// Resolve availability for `date`.
pub fn resolve_day(
    profile: &AvailabilityProfile,
    date: NaiveDate,
    options: &ResolveOptions,
) -> DayAvailability {
    if find_exception(&profile.days_off, date, "day off").is_some() {
        return DayAvailability::closed(date, DayKind::DayOff);
    }

    let weekday = date.weekday();
    let scheduled = profile.schedule.get(weekday);

    let extra = find_exception(&profile.additional_work_days, date, "additional work day");
    if let Some(extra) = extra {
        let window = extra
            .window()
            .or_else(|| scheduled.map(|s| s.window()))
            .unwrap_or(options.default_window);
        return DayAvailability::open(
            date,
            DayKind::AdditionalWorkDay,
            window,
            &profile.services,
        );
    }

    match scheduled {
        Some(entry) if entry.selected => {
            DayAvailability::open(date, DayKind::Regular, entry.window(), &profile.services)
        }
        Some(_) => DayAvailability::closed(date, DayKind::Unscheduled),
        None => {
            tracing::trace!(
                weekday = weekday_name(weekday),
                "no schedule entry, treating as unavailable"
            );
            DayAvailability::closed(date, DayKind::Unscheduled)
        }
    }
}

/// First entry whose date key equals `date`. Entries without a readable
/// date never match.
fn find_exception<'a>(
    entries: &'a [ExceptionDate],
    date: NaiveDate,
    list: &str,
) -> Option<&'a ExceptionDate> {
    let mut found = None;
    for entry in entries {
        match entry.key() {
            Some(key) if key == date => {
                found = Some(entry);
                break;
            }
            Some(_) => {}
            None => tracing::debug!(date = %entry.date, list, "ignoring unparsable exception date"),
        }
    }
    found
}
