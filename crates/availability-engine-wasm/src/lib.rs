//! WASM bindings for availability-engine.
//!
//! Exposes single-day resolution, month grids, 12-hour time formatting,
//! language-model intake validation and the service summary table to the
//! JavaScript rendering layer via `wasm-bindgen`. All complex types cross the
//! boundary as JSON strings.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p availability-engine-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target web --out-dir web/wasm/ \
//!   target/wasm32-unknown-unknown/release/availability_engine_wasm.wasm
//! ```

use availability_engine::calendar::{self, MonthGrid};
use availability_engine::exceptions::parse_date;
use availability_engine::intake;
use availability_engine::offerings::{self, ServiceSummary};
use availability_engine::resolver::{
    self, AvailabilityProfile, DayAvailability, DayKind, ResolveOptions,
};
use serde::Serialize;
use wasm_bindgen::prelude::*;

// ---------------------------------------------------------------------------
// Serde-friendly DTOs for crossing the WASM boundary as JSON
// ---------------------------------------------------------------------------

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WindowDto {
    start: String,
    end: String,
    /// 12-hour display form, e.g. "9AM-5PM".
    label: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DayDto {
    date: String,
    day_of_month: u32,
    available: bool,
    kind: DayKind,
    /// Renders the "Vacation" badge.
    day_off: bool,
    /// Renders the "Extra" badge.
    extra: bool,
    window: Option<WindowDto>,
    active_services: Vec<String>,
}

impl From<&DayAvailability> for DayDto {
    fn from(d: &DayAvailability) -> Self {
        use chrono::Datelike;

        Self {
            date: d.date.format("%Y-%m-%d").to_string(),
            day_of_month: d.date.day(),
            available: d.available,
            kind: d.kind,
            day_off: d.kind == DayKind::DayOff,
            extra: d.kind == DayKind::AdditionalWorkDay,
            window: d.window.map(|w| WindowDto {
                start: w.start.to_12_hour(),
                end: w.end.to_12_hour(),
                label: w.to_string(),
            }),
            active_services: d.active_services.iter().map(|s| s.to_string()).collect(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MonthGridDto {
    title: String,
    year: i32,
    month: u32,
    leading_blanks: u32,
    /// `null` for blank cells, then one entry per day.
    cells: Vec<Option<DayDto>>,
}

impl From<&MonthGrid> for MonthGridDto {
    fn from(grid: &MonthGrid) -> Self {
        let blanks = (0..grid.leading_blanks).map(|_| None);
        let days = grid.days.iter().map(|d| Some(DayDto::from(d)));
        Self {
            title: grid.title(),
            year: grid.year,
            month: grid.month,
            leading_blanks: grid.leading_blanks,
            cells: blanks.chain(days).collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn parse_profile(json: &str) -> Result<AvailabilityProfile, String> {
    serde_json::from_str(json).map_err(|e| format!("Invalid profile JSON: {}", e))
}

fn parse_options(json: Option<&str>) -> Result<ResolveOptions, String> {
    match json {
        Some(s) if !s.trim().is_empty() => {
            serde_json::from_str(s).map_err(|e| format!("Invalid options JSON: {}", e))
        }
        _ => Ok(ResolveOptions::default()),
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|e| format!("Serialization error: {}", e))
}

fn resolve_day_json(
    profile_json: &str,
    date: &str,
    options_json: Option<&str>,
) -> Result<String, String> {
    let profile = parse_profile(profile_json)?;
    let options = parse_options(options_json)?;
    let date = parse_date(date).map_err(|e| e.to_string())?;
    let day = resolver::resolve_day(&profile, date, &options);
    to_json(&DayDto::from(&day))
}

fn month_grid_json(
    profile_json: &str,
    year: i32,
    month: u32,
    options_json: Option<&str>,
) -> Result<String, String> {
    let profile = parse_profile(profile_json)?;
    let options = parse_options(options_json)?;
    let grid =
        calendar::month_grid(&profile, year, month, &options).map_err(|e| e.to_string())?;
    to_json(&MonthGridDto::from(&grid))
}

fn parse_intake_json(response_json: &str, current_year: i32) -> Result<String, String> {
    let intake = intake::parse_intake(response_json, current_year).map_err(|e| e.to_string())?;
    to_json(&intake)
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct OfferingsDto {
    services: Vec<ServiceSummary>,
    generic_logistics: Vec<String>,
}

fn summarize_offerings_json(form_json: &str) -> Result<String, String> {
    let details = offerings::parse_offerings_form(form_json).map_err(|e| e.to_string())?;
    to_json(&OfferingsDto {
        services: details.summary(),
        generic_logistics: details.generic_logistics(),
    })
}

// ---------------------------------------------------------------------------
// WASM exports
// ---------------------------------------------------------------------------

/// Resolve one day.
///
/// `profile_json` is a profile or stored submission (`{services, schedule,
/// daysOff, additionalWorkDays, ...}`); `date` is `YYYY-MM-DD`;
/// `options_json` optionally overrides `{defaultWindow}`.
#[wasm_bindgen(js_name = "resolveDay")]
pub fn resolve_day(
    profile_json: &str,
    date: &str,
    options_json: Option<String>,
) -> Result<String, JsValue> {
    resolve_day_json(profile_json, date, options_json.as_deref())
        .map_err(|e| JsValue::from_str(&e))
}

/// Resolve every day of `month` (1-12) into a Sunday-first grid.
#[wasm_bindgen(js_name = "monthGrid")]
pub fn month_grid(
    profile_json: &str,
    year: i32,
    month: u32,
    options_json: Option<String>,
) -> Result<String, JsValue> {
    month_grid_json(profile_json, year, month, options_json.as_deref())
        .map_err(|e| JsValue::from_str(&e))
}

/// Convert `HH:MM` to 12-hour display form (`"13:30"` → `"1:30PM"`).
#[wasm_bindgen(js_name = "formatTime")]
pub fn format_time(time: &str) -> Result<String, JsValue> {
    availability_engine::format_time(time).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Validate and normalize a structured language-model response.
///
/// Returns the normalized JSON, or an error listing every structural problem.
#[wasm_bindgen(js_name = "parseIntake")]
pub fn parse_intake(response_json: &str, current_year: i32) -> Result<String, JsValue> {
    parse_intake_json(response_json, current_year).map_err(|e| JsValue::from_str(&e))
}

/// Validate the service-offerings form and build the summary table.
///
/// Returns `{services: [...rows], genericLogistics: [...lines]}`.
#[wasm_bindgen(js_name = "summarizeOfferings")]
pub fn summarize_offerings(form_json: &str) -> Result<String, JsValue> {
    summarize_offerings_json(form_json).map_err(|e| JsValue::from_str(&e))
}
