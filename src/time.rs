//! Time-of-week offsets.
//!
//! Meetings are placed on a two-week axis measured in seconds from Sunday
//! 00:00: days 0..6 are the teaching week, days 7..13 the exam week.
use serde::{Deserialize, Serialize};
use std::fmt;

pub const SECONDS_PER_MINUTE: u64 = 60;
pub const SECONDS_PER_HOUR: u64 = 60 * SECONDS_PER_MINUTE;
pub const SECONDS_PER_DAY: u64 = 24 * SECONDS_PER_HOUR;
pub const SECONDS_PER_WEEK: u64 = 7 * SECONDS_PER_DAY;

const DAY_NAMES: [&str; 7] = ["SUN", "MON", "TUE", "WED", "THU", "FRI", "SAT"];

/// A point on the schedule axis, in seconds since the start of the teaching week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeekTime(pub u64);

impl WeekTime {
    /// Builds an offset from a weekday (0 = Sunday) and a clock time.
    pub fn from_day_clock(day: u64, hour: u64, minute: u64) -> Self {
        WeekTime(day * SECONDS_PER_DAY + hour * SECONDS_PER_HOUR + minute * SECONDS_PER_MINUTE)
    }

    pub fn day(self) -> u64 {
        self.0 / SECONDS_PER_DAY
    }

    pub fn is_exam_week(self) -> bool {
        self.day() >= 7
    }

    pub fn hour(self) -> u64 {
        self.0 % SECONDS_PER_DAY / SECONDS_PER_HOUR
    }

    pub fn minute(self) -> u64 {
        self.0 % SECONDS_PER_HOUR / SECONDS_PER_MINUTE
    }

    /// Short day label, `EX_` prefixed in the exam week and `???` past it.
    pub fn day_label(self) -> String {
        let day = self.day();
        match day {
            0..=6 => DAY_NAMES[day as usize].to_string(),
            7..=13 => format!("EX_{}", DAY_NAMES[(day - 7) as usize]),
            _ => "???".to_string(),
        }
    }
}

impl fmt::Display for WeekTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hour = self.hour();
        let suffix = if hour >= 12 { "PM" } else { "AM" };
        let clock_hour = match hour % 12 {
            0 => 12,
            h => h,
        };
        write!(f, "{} {}:{:02} {}", self.day_label(), clock_hour, self.minute(), suffix)
    }
}

/// Parses a registrar `HHMM` clock string (e.g. `"1330"`) into seconds past midnight.
pub fn parse_hhmm(raw: &str) -> Option<u64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.len() > 4 || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let digits: u64 = trimmed.parse().ok()?;
    let (hours, minutes) = (digits / 100, digits % 100);
    if hours > 24 || minutes >= 60 || (hours == 24 && minutes != 0) {
        return None;
    }
    Some(hours * SECONDS_PER_HOUR + minutes * SECONDS_PER_MINUTE)
}
