//! The recurring weekly schedule, keyed by full weekday name.

use std::fmt;

use chrono::Weekday;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::clock::{ClockTime, TimeWindow};
use crate::error::{AvailabilityError, Result};

/// Monday-first order used for iteration and serialization.
pub const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Full English name of a weekday, as used for schedule keys.
pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Parse a full weekday name (case-insensitive).
pub fn parse_weekday_name(name: &str) -> Result<Weekday> {
    WEEK.iter()
        .copied()
        .find(|d| weekday_name(*d).eq_ignore_ascii_case(name.trim()))
        .ok_or_else(|| AvailabilityError::InvalidWeekday(name.to_string()))
}

/// One weekday's recurring availability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DaySchedule {
    pub selected: bool,
    pub start_time: ClockTime,
    pub end_time: ClockTime,
}

impl DaySchedule {
    pub fn window(&self) -> TimeWindow {
        TimeWindow::new(self.start_time, self.end_time)
    }
}

impl Default for DaySchedule {
    /// Unselected, business hours.
    fn default() -> Self {
        let window = TimeWindow::business_hours();
        Self {
            selected: false,
            start_time: window.start,
            end_time: window.end,
        }
    }
}

/// Weekday → [`DaySchedule`]. A weekday may be absent, which reads as
/// "not available".
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WeeklySchedule {
    days: [Option<DaySchedule>; 7],
}

impl WeeklySchedule {
    /// A schedule with no weekday entries at all.
    pub fn empty() -> Self {
        Self::default()
    }

    /// All seven weekdays present, unselected, 09:00-17:00.
    pub fn unselected_week() -> Self {
        Self {
            days: [Some(DaySchedule::default()); 7],
        }
    }

    pub fn get(&self, day: Weekday) -> Option<&DaySchedule> {
        self.days[day.num_days_from_monday() as usize].as_ref()
    }

    pub fn set(&mut self, day: Weekday, schedule: DaySchedule) {
        self.days[day.num_days_from_monday() as usize] = Some(schedule);
    }

    /// Builder-style [`set`](Self::set).
    pub fn with(mut self, day: Weekday, schedule: DaySchedule) -> Self {
        self.set(day, schedule);
        self
    }

    pub fn remove(&mut self, day: Weekday) -> Option<DaySchedule> {
        self.days[day.num_days_from_monday() as usize].take()
    }

    /// Whether the weekday is a regular working day. Missing entries are not.
    pub fn is_selected(&self, day: Weekday) -> bool {
        self.get(day).is_some_and(|d| d.selected)
    }

    /// Present entries in Monday-first order.
    pub fn iter(&self) -> impl Iterator<Item = (Weekday, &DaySchedule)> {
        WEEK.iter()
            .zip(self.days.iter())
            .filter_map(|(day, entry)| entry.as_ref().map(|s| (*day, s)))
    }

    /// Weekdays with no entry.
    pub fn missing_days(&self) -> Vec<Weekday> {
        WEEK.iter()
            .copied()
            .filter(|d| self.get(*d).is_none())
            .collect()
    }
}

impl Serialize for WeeklySchedule {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let present: Vec<_> = self.iter().collect();
        let mut map = serializer.serialize_map(Some(present.len()))?;
        for (day, schedule) in present {
            map.serialize_entry(weekday_name(day), schedule)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for WeeklySchedule {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct ScheduleVisitor;

        impl<'de> Visitor<'de> for ScheduleVisitor {
            type Value = WeeklySchedule;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map from weekday name to {selected, startTime, endTime}")
            }

            fn visit_map<A: MapAccess<'de>>(
                self,
                mut access: A,
            ) -> std::result::Result<WeeklySchedule, A::Error> {
                let mut schedule = WeeklySchedule::empty();
                while let Some(name) = access.next_key::<String>()? {
                    let day = parse_weekday_name(&name).map_err(serde::de::Error::custom)?;
                    let entry: DaySchedule = access.next_value()?;
                    schedule.set(day, entry);
                }
                Ok(schedule)
            }
        }

        deserializer.deserialize_map(ScheduleVisitor)
    }
}
