// Clock module
// Wall-clock times on the booking grid, stored as minutes since midnight

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Grid resolution in minutes. Every sub-slot is one interval wide.
pub const TIME_INTERVAL: u16 = 15;

/// Sub-slots per hour bucket.
pub const SLOTS_PER_HOUR: u16 = 60 / TIME_INTERVAL;

pub const MINUTES_PER_DAY: u16 = 24 * 60;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClockTimeError {
    #[error("invalid time format '{0}', expected HH:MM")]
    Format(String),
    #[error("time {hour:02}:{minute:02} is out of range")]
    OutOfRange { hour: u16, minute: u16 },
}

/// A time of day on a 24-hour clock.
///
/// "24:00" is representable so that a range can end exactly at midnight.
/// Comparisons and arithmetic always work on whole minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClockTime(u16);

impl ClockTime {
    pub const MIDNIGHT: ClockTime = ClockTime(0);
    pub const END_OF_DAY: ClockTime = ClockTime(MINUTES_PER_DAY);

    /// Build a time from hour and minute components.
    ///
    /// # Examples
    /// ```
    /// use court_grid::models::clock::ClockTime;
    ///
    /// let t = ClockTime::from_hm(9, 30).unwrap();
    /// assert_eq!(t.to_string(), "09:30");
    /// assert_eq!(t.minutes(), 570);
    /// ```
    pub fn from_hm(hour: u16, minute: u16) -> Result<Self, ClockTimeError> {
        if minute >= 60 || hour > 24 || (hour == 24 && minute != 0) {
            return Err(ClockTimeError::OutOfRange { hour, minute });
        }
        Ok(Self(hour * 60 + minute))
    }

    /// Infallible constructor for literal times; anything past "24:00" clamps.
    pub const fn hm(hour: u16, minute: u16) -> Self {
        let minutes = hour * 60 + minute;
        if minutes > MINUTES_PER_DAY {
            Self(MINUTES_PER_DAY)
        } else {
            Self(minutes)
        }
    }

    pub fn from_minutes(minutes: u16) -> Result<Self, ClockTimeError> {
        if minutes > MINUTES_PER_DAY {
            return Err(ClockTimeError::OutOfRange {
                hour: minutes / 60,
                minute: minutes % 60,
            });
        }
        Ok(Self(minutes))
    }

    pub fn minutes(self) -> u16 {
        self.0
    }

    pub fn hour(self) -> u16 {
        self.0 / 60
    }

    pub fn minute(self) -> u16 {
        self.0 % 60
    }

    /// Adds minutes, saturating at "24:00".
    pub fn saturating_add(self, minutes: u16) -> Self {
        Self(self.0.saturating_add(minutes).min(MINUTES_PER_DAY))
    }

    /// Subtracts minutes, saturating at midnight.
    pub fn saturating_sub(self, minutes: u16) -> Self {
        Self(self.0.saturating_sub(minutes))
    }

    /// One grid interval later, saturating at end of day.
    pub fn next_slot(self) -> Self {
        self.saturating_add(TIME_INTERVAL)
    }

    pub fn floor_to_grid(self) -> Self {
        Self(self.0 - self.0 % TIME_INTERVAL)
    }

    /// Snap up to the next grid line, saturating at end of day.
    pub fn ceil_to_grid(self) -> Self {
        if self.is_on_grid() {
            self
        } else {
            self.floor_to_grid().saturating_add(TIME_INTERVAL)
        }
    }

    pub fn floor_to_hour(self) -> Self {
        Self(self.0 - self.0 % 60)
    }

    pub fn is_on_grid(self) -> bool {
        self.0 % TIME_INTERVAL == 0
    }

    /// Converts to a chrono time; "24:00" has no `NaiveTime` equivalent.
    pub fn to_naive_time(self) -> Option<NaiveTime> {
        NaiveTime::from_hms_opt(u32::from(self.hour()), u32::from(self.minute()), 0)
    }

    pub fn from_naive_time(time: NaiveTime) -> Self {
        // hour() < 24 and minute() < 60 always hold for NaiveTime
        Self((time.hour() * 60 + time.minute()) as u16)
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl FromStr for ClockTime {
    type Err = ClockTimeError;

    /// Parses "HH:MM". A trailing ":SS" is accepted and ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let mut parts = trimmed.split(':');
        let (Some(hour), Some(minute)) = (parts.next(), parts.next()) else {
            return Err(ClockTimeError::Format(s.to_string()));
        };
        if let Some(seconds) = parts.next() {
            if seconds.len() != 2 || !seconds.chars().all(|c| c.is_ascii_digit()) {
                return Err(ClockTimeError::Format(s.to_string()));
            }
        }
        if parts.next().is_some() || minute.len() != 2 || hour.is_empty() || hour.len() > 2 {
            return Err(ClockTimeError::Format(s.to_string()));
        }
        if !hour.chars().chain(minute.chars()).all(|c| c.is_ascii_digit()) {
            return Err(ClockTimeError::Format(s.to_string()));
        }

        let hour: u16 = hour
            .parse()
            .map_err(|_| ClockTimeError::Format(s.to_string()))?;
        let minute: u16 = minute
            .parse()
            .map_err(|_| ClockTimeError::Format(s.to_string()))?;

        Self::from_hm(hour, minute)
    }
}

impl TryFrom<String> for ClockTime {
    type Error = ClockTimeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ClockTime> for String {
    fn from(value: ClockTime) -> Self {
        value.to_string()
    }
}

/// Half-open interval `[start, end)` of clock times.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimeRange {
    pub start: ClockTime,
    pub end: ClockTime,
}

impl TimeRange {
    pub fn new(start: ClockTime, end: ClockTime) -> Self {
        Self { start, end }
    }

    /// True when the range covers no time at all.
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    pub fn contains(&self, time: ClockTime) -> bool {
        self.start <= time && time < self.end
    }

    pub fn overlaps(&self, other: &TimeRange) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// True when `other` lies entirely inside this range.
    pub fn covers(&self, other: &TimeRange) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    pub fn duration_minutes(&self) -> u16 {
        self.end.minutes().saturating_sub(self.start.minutes())
    }

    /// Grid start times inside the range.
    pub fn grid_slots(&self) -> Vec<ClockTime> {
        let mut slots = Vec::new();
        let mut cursor = self.start.floor_to_grid();
        while cursor < self.end {
            slots.push(cursor);
            if cursor == ClockTime::END_OF_DAY {
                break;
            }
            cursor = cursor.next_slot();
        }
        slots
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.start, self.end)
    }
}

#[cfg(test)]
pub(crate) fn t(value: &str) -> ClockTime {
    value.parse().expect("valid test time")
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("00:00", 0)]
    #[test_case("09:15", 555)]
    #[test_case("9:15", 555)]
    #[test_case("23:45", 1425)]
    #[test_case("24:00", 1440)]
    #[test_case("14:30:00", 870)]
    fn test_parse_valid(input: &str, minutes: u16) {
        assert_eq!(input.parse::<ClockTime>().unwrap().minutes(), minutes);
    }

    #[test_case("")]
    #[test_case("12")]
    #[test_case("12:5")]
    #[test_case("ab:cd")]
    #[test_case("24:15")]
    #[test_case("10:60")]
    #[test_case("10:00:0")]
    #[test_case("10:00:00:00")]
    #[test_case("+9:30")]
    #[test_case("09:+5")]
    fn test_parse_invalid(input: &str) {
        assert!(input.parse::<ClockTime>().is_err());
    }

    #[test]
    fn test_display_is_zero_padded() {
        assert_eq!(ClockTime::from_hm(7, 5).unwrap().to_string(), "07:05");
        assert_eq!(ClockTime::END_OF_DAY.to_string(), "24:00");
    }

    #[test]
    fn test_floor_to_grid() {
        assert_eq!(t("22:50").floor_to_grid(), t("22:45"));
        assert_eq!(t("22:45").floor_to_grid(), t("22:45"));
        assert!(t("10:30").is_on_grid());
        assert!(!t("10:31").is_on_grid());
    }

    #[test]
    fn test_ceil_to_grid() {
        assert_eq!(t("08:10").ceil_to_grid(), t("08:15"));
        assert_eq!(t("08:15").ceil_to_grid(), t("08:15"));
        assert_eq!(t("23:59").ceil_to_grid(), ClockTime::END_OF_DAY);
    }

    #[test]
    fn test_saturating_arithmetic() {
        assert_eq!(t("23:50").saturating_add(30), ClockTime::END_OF_DAY);
        assert_eq!(t("00:10").saturating_sub(30), ClockTime::MIDNIGHT);
        assert_eq!(t("10:00").next_slot(), t("10:15"));
    }

    #[test]
    fn test_range_is_half_open() {
        let range = TimeRange::new(t("09:00"), t("10:00"));
        assert!(range.contains(t("09:00")));
        assert!(range.contains(t("09:45")));
        assert!(!range.contains(t("10:00")));
        assert!(!range.contains(t("08:45")));
    }

    #[test]
    fn test_touching_ranges_do_not_overlap() {
        let a = TimeRange::new(t("09:00"), t("10:00"));
        let b = TimeRange::new(t("10:00"), t("11:00"));
        assert!(!a.overlaps(&b));
        assert!(!b.overlaps(&a));
        assert!(a.overlaps(&TimeRange::new(t("09:45"), t("10:15"))));
    }

    #[test]
    fn test_grid_slots() {
        let range = TimeRange::new(t("10:00"), t("11:00"));
        let slots: Vec<String> = range.grid_slots().iter().map(|s| s.to_string()).collect();
        assert_eq!(slots, vec!["10:00", "10:15", "10:30", "10:45"]);
        assert!(TimeRange::new(t("10:00"), t("10:00")).grid_slots().is_empty());
    }

    #[test]
    fn test_serde_uses_hh_mm_strings() {
        let json = serde_json::to_string(&t("08:30")).unwrap();
        assert_eq!(json, "\"08:30\"");
        let parsed: ClockTime = serde_json::from_str("\"21:15\"").unwrap();
        assert_eq!(parsed, t("21:15"));
        assert!(serde_json::from_str::<ClockTime>("\"25:00\"").is_err());
    }

    #[test]
    fn test_naive_time_conversion() {
        let time = NaiveTime::from_hms_opt(13, 45, 12).unwrap();
        assert_eq!(ClockTime::from_naive_time(time), t("13:45"));
        assert!(ClockTime::END_OF_DAY.to_naive_time().is_none());
    }
}
