//! Validation and normalization of structured responses from the language model.
//!
//! The hosted model turns a provider's free-text description into JSON of the
//! shape `{services, schedule, daysOff, additionalWorkDays}`. That JSON is
//! untrusted: this module checks its structure, decodes it, and normalizes
//! the exception lists before any of it reaches a draft.

use chrono::Datelike;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{AvailabilityError, Result};
use crate::exceptions::{ExceptionDate, ExceptionSet};
use crate::resolver::AvailabilityProfile;
use crate::schedule::{weekday_name, WeeklySchedule, WEEK};
use crate::services::{ServiceCatalog, ServiceKey};

/// A decoded, normalized model response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntakeResponse {
    pub services: ServiceCatalog,
    pub schedule: WeeklySchedule,
    pub days_off: Vec<ExceptionDate>,
    pub additional_work_days: Vec<ExceptionDate>,
}

impl IntakeResponse {
    pub fn exceptions(&self) -> ExceptionSet {
        ExceptionSet {
            days_off: self.days_off.clone(),
            additional_work_days: self.additional_work_days.clone(),
        }
    }

    pub fn into_profile(self) -> AvailabilityProfile {
        AvailabilityProfile {
            services: self.services,
            schedule: self.schedule,
            days_off: self.days_off,
            additional_work_days: self.additional_work_days,
        }
    }
}

/// List every structural problem in a raw model response.
///
/// An empty list means the response has all four services, all seven
/// weekdays, and both exception arrays.
pub fn validate_structure(response: &Value) -> Vec<String> {
    let mut errors = Vec::new();

    match response.get("services") {
        Some(services) if !services.is_null() => {
            for key in ServiceKey::ALL {
                if services.get(key.as_str()).is_none_or(Value::is_null) {
                    errors.push(format!("Missing service: {}", key.as_str()));
                }
            }
        }
        _ => errors.push("Missing services object".to_string()),
    }

    match response.get("schedule") {
        Some(schedule) if !schedule.is_null() => {
            for day in WEEK {
                let name = weekday_name(day);
                if schedule.get(name).is_none_or(Value::is_null) {
                    errors.push(format!("Missing schedule for {}", name));
                }
            }
        }
        _ => errors.push("Missing schedule object".to_string()),
    }

    if !response.get("daysOff").is_some_and(Value::is_array) {
        errors.push("daysOff must be an array".to_string());
    }
    if !response.get("additionalWorkDays").is_some_and(Value::is_array) {
        errors.push("additionalWorkDays must be an array".to_string());
    }

    errors
}

/// Parse, validate and normalize a model response.
///
/// Exception dates outside `current_year` are moved into it (month and day
/// kept), since the model is told to assume the current year. Entries whose
/// date still cannot be read are logged and dropped.
///
/// # Errors
/// - `AvailabilityError::Json` if `json` is not JSON or does not decode.
/// - `AvailabilityError::InvalidIntake` listing every structural problem.
pub fn parse_intake(json: &str, current_year: i32) -> Result<IntakeResponse> {
    let value: Value = serde_json::from_str(json)?;

    let errors = validate_structure(&value);
    if !errors.is_empty() {
        return Err(AvailabilityError::InvalidIntake(errors));
    }

    let mut response: IntakeResponse = serde_json::from_value(value)?;
    for (day, schedule) in response.schedule.iter() {
        if schedule.selected && schedule.window().minutes() == 0 {
            tracing::warn!(
                day = weekday_name(day),
                window = %schedule.window(),
                "selected day has an empty working window"
            );
        }
    }
    response.days_off = normalize_exceptions(response.days_off, current_year, false);
    response.additional_work_days =
        normalize_exceptions(response.additional_work_days, current_year, true);
    Ok(response)
}

/// [`parse_intake`] against the current local year.
pub fn parse_intake_now(json: &str) -> Result<IntakeResponse> {
    parse_intake(json, chrono::Local::now().year())
}

fn normalize_exceptions(
    entries: Vec<ExceptionDate>,
    current_year: i32,
    available: bool,
) -> Vec<ExceptionDate> {
    entries
        .into_iter()
        .filter_map(|entry| {
            let date = force_year(&entry.date, current_year);
            let normalized = ExceptionDate {
                date,
                available,
                ..entry
            };
            if normalized.key().is_none() {
                tracing::warn!(date = %normalized.date, "dropping exception with unreadable date");
                return None;
            }
            Some(normalized)
        })
        .collect()
}

/// Replace the year of a `YYYY-MM-DD...` string unless it already starts
/// with `current_year`. Strings that do not split into three parts are
/// returned unchanged.
fn force_year(raw: &str, current_year: i32) -> String {
    let raw = raw.trim();
    let year = current_year.to_string();
    if raw.starts_with(&year) {
        return raw.to_string();
    }
    let mut parts = raw.splitn(3, '-');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(_), Some(month), Some(rest)) => format!("{}-{}-{}", year, month, rest),
        _ => raw.to_string(),
    }
}
