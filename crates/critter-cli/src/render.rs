//! Plain-text rendering of a month grid and the service summary table.
//!
//! ```text
//! March 2024
//!  Sun  Mon  Tue  Wed  Thu  Fri  Sat
//!                            1*   2
//!    3    4*   5*   6*   7*   8*   9+
//! ```
//!
//! followed by a legend and an agenda of the days that have something on.
//! [`render_offerings`] prints one block per selected service.

use std::fmt::Write;

use availability_engine::calendar::{CalendarCell, WEEKDAY_HEADERS};
use availability_engine::{DayAvailability, DayKind, MonthGrid, ServiceOfferingDetails};

fn marker(day: &DayAvailability) -> char {
    match day.kind {
        DayKind::Regular => '*',
        DayKind::AdditionalWorkDay => '+',
        DayKind::DayOff => 'x',
        DayKind::Unscheduled => ' ',
    }
}

pub fn render_month(grid: &MonthGrid) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", grid.title());

    let header: Vec<String> = WEEKDAY_HEADERS.iter().map(|h| format!("{:>4}", h)).collect();
    let _ = writeln!(out, "{}", header.join(" ").trim_end());

    for week in grid.weeks() {
        let row: Vec<String> = week
            .iter()
            .map(|cell| match cell {
                CalendarCell::Empty => "    ".to_string(),
                CalendarCell::Day(day) => {
                    use chrono::Datelike;
                    format!("{:>3}{}", day.date.day(), marker(day))
                }
            })
            .collect();
        let _ = writeln!(out, "{}", row.join(" ").trim_end());
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "* available   + extra working day   x day off");

    let agenda: Vec<String> = grid
        .days
        .iter()
        .filter(|d| d.available || d.kind == DayKind::DayOff)
        .map(agenda_line)
        .collect();
    if !agenda.is_empty() {
        let _ = writeln!(out);
        for line in agenda {
            let _ = writeln!(out, "{}", line);
        }
    }

    out.trim_end().to_string()
}

fn agenda_line(day: &DayAvailability) -> String {
    let date = day.date.format("%a %b %e");
    if day.kind == DayKind::DayOff {
        return format!("{}  day off", date);
    }

    let window = day.window.map(|w| w.to_string()).unwrap_or_default();
    let services: Vec<&str> = day.active_services.iter().map(|s| s.label()).collect();
    let mut line = format!("{}  {:<14} {}", date, window, services.join(", "));
    if day.kind == DayKind::AdditionalWorkDay {
        line.push_str(" (extra)");
    }
    line.trim_end().to_string()
}

pub fn render_offerings(details: &ServiceOfferingDetails) -> String {
    let mut out = String::new();
    for row in details.summary() {
        let _ = writeln!(out, "{}", row.label);
        let durations: Vec<String> = row.durations.iter().map(|d| d.to_string()).collect();
        section(&mut out, "Durations", &durations);
        section(&mut out, "Pets", &row.accepted_pets);
        section(&mut out, "Restrictions", &row.restrictions);
        section(&mut out, "Logistics", &row.logistics);
        let _ = writeln!(out);
    }

    let _ = writeln!(out, "General");
    for line in details.generic_logistics() {
        let _ = writeln!(out, "  {}", line);
    }
    if let Some(comments) = &details.additional_comments {
        let _ = writeln!(out);
        let _ = writeln!(out, "Comments: {}", comments);
    }
    out.trim_end().to_string()
}

fn section(out: &mut String, name: &str, lines: &[String]) {
    let value = if lines.is_empty() {
        "-".to_string()
    } else {
        lines.join("; ")
    };
    let _ = writeln!(out, "  {:<13}{}", format!("{}:", name), value);
}
