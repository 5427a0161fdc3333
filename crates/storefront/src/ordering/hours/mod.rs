//! Weekly opening hours and the "open now" check.
//!
//! Hours arrive as a loosely shaped JSON blob from the configuration store. Parsing is
//! total: anything unrecognised is dropped, and a store with no usable segments is
//! treated as always open.

mod parser;

use chrono::{Datelike, NaiveDateTime, Timelike};
use serde::Serialize;
use serde_json::Value;

const LAST_MINUTE_OF_DAY: u16 = 24 * 60 - 1;

/// Contiguous open interval within one day, expressed in minutes since midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeSegment {
    pub start: u16,
    pub end: u16,
    pub crosses_midnight: bool,
}

impl TimeSegment {
    pub fn new(start: u16, end: u16) -> Self {
        let start = start.min(LAST_MINUTE_OF_DAY);
        let end = end.min(LAST_MINUTE_OF_DAY);
        Self {
            start,
            end,
            crosses_midnight: end <= start,
        }
    }

    /// Whether the segment, opened on the current day, covers `minute`.
    pub fn contains(&self, minute: u16) -> bool {
        if self.crosses_midnight {
            minute >= self.start || minute < self.end
        } else {
            self.start <= minute && minute < self.end
        }
    }

    /// Whether a segment opened yesterday is still running at `minute` today.
    pub fn carries_over(&self, minute: u16) -> bool {
        self.crosses_midnight && minute < self.end
    }
}

/// Segments per day of week, indexed 0 = Sunday through 6 = Saturday.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WeeklyHours {
    days: [Vec<TimeSegment>; 7],
}

impl WeeklyHours {
    /// Builds the schedule from a structured or string-encoded JSON value.
    pub fn from_value(value: &Value) -> Self {
        parser::parse_weekly_hours(value)
    }

    pub fn segments(&self, day_from_sunday: usize) -> &[TimeSegment] {
        self.days
            .get(day_from_sunday)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.days.iter().all(Vec::is_empty)
    }

    /// An empty schedule is always open.
    pub fn is_open_at(&self, at: NaiveDateTime) -> bool {
        if self.is_empty() {
            return true;
        }

        let today = at.weekday().num_days_from_sunday() as usize;
        let yesterday = (today + 6) % 7;
        let minute = (at.hour() * 60 + at.minute()) as u16;

        self.days[today]
            .iter()
            .any(|segment| segment.contains(minute))
            || self.days[yesterday]
                .iter()
                .any(|segment| segment.carries_over(minute))
    }

    pub(crate) fn push(&mut self, day_from_sunday: usize, segment: TimeSegment) {
        if let Some(day) = self.days.get_mut(day_from_sunday) {
            day.push(segment);
        }
    }
}

/// Whether the store accepts orders at `at`. Missing or unusable hours mean always open.
pub fn is_open_now(hours: Option<&Value>, at: NaiveDateTime) -> bool {
    match hours {
        None | Some(Value::Null) => true,
        Some(value) => WeeklyHours::from_value(value).is_open_at(at),
    }
}
