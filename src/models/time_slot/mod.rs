//! Quantized day grid.
//!
//! A business day is split into hour buckets of four 15-minute sub-slots.
//! The grid is rebuilt whenever the selected date or the business hours
//! change and is never mutated afterwards.

use serde::Serialize;

use super::business_hours::BusinessHours;
use super::clock::{ClockTime, TimeRange, SLOTS_PER_HOUR, TIME_INTERVAL};

/// One 15-minute unit inside an hour bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubSlot {
    pub time: ClockTime,
    /// Offset inside the hour bucket (0, 15, 30 or 45)
    pub minutes: u16,
    pub is_available: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSlot {
    pub hour: ClockTime,
    pub sub_slots: Vec<SubSlot>,
}

/// Immutable snapshot of the grid rows for one date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayGrid {
    slots: Vec<TimeSlot>,
    hours: Option<BusinessHours>,
    ceiling: ClockTime,
}

impl DayGrid {
    /// Build the rows for a day.
    ///
    /// Rows run from the opening hour (or `fallback_open` on a closed day) up
    /// to the closing ceiling. A sub-slot is available when it falls inside
    /// the business hours and starts before the ceiling.
    pub fn build(hours: Option<BusinessHours>, ceiling: ClockTime, fallback_open: ClockTime) -> Self {
        let first_hour = hours
            .map(|h| h.start)
            .unwrap_or(fallback_open)
            .floor_to_hour();

        let mut slots = Vec::new();
        let mut hour = first_hour;
        while hour < ceiling {
            let sub_slots = (0..SLOTS_PER_HOUR)
                .map(|index| {
                    let minutes = index * TIME_INTERVAL;
                    let time = hour.saturating_add(minutes);
                    let is_available = time < ceiling
                        && hours.is_some_and(|h| h.is_time_in_range(time));
                    SubSlot {
                        time,
                        minutes,
                        is_available,
                    }
                })
                .collect();
            slots.push(TimeSlot { hour, sub_slots });
            hour = hour.saturating_add(60);
        }

        Self {
            slots,
            hours,
            ceiling,
        }
    }

    pub fn slots(&self) -> &[TimeSlot] {
        &self.slots
    }

    pub fn business_hours(&self) -> Option<BusinessHours> {
        self.hours
    }

    pub fn ceiling(&self) -> ClockTime {
        self.ceiling
    }

    /// All sub-slots top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &SubSlot> {
        self.slots.iter().flat_map(|slot| slot.sub_slots.iter())
    }

    pub fn row_count(&self) -> usize {
        self.slots.len() * usize::from(SLOTS_PER_HOUR)
    }

    pub fn row_at(&self, index: usize) -> Option<&SubSlot> {
        let per_hour = usize::from(SLOTS_PER_HOUR);
        self.slots
            .get(index / per_hour)
            .and_then(|slot| slot.sub_slots.get(index % per_hour))
    }

    /// Resolve an (hour bucket, sub-slot index) pair to a time of day.
    pub fn time_at(hour: ClockTime, sub_slot: u8) -> ClockTime {
        hour.floor_to_hour()
            .saturating_add(u16::from(sub_slot) * TIME_INTERVAL)
    }

    pub fn is_available(&self, time: ClockTime) -> bool {
        self.rows().any(|row| row.time == time && row.is_available)
    }

    /// Window a drag may cover: first sub-slot at or after opening, up to
    /// the ceiling.
    pub fn selectable_window(&self) -> Option<TimeRange> {
        let hours = self.hours?;
        let window = TimeRange::new(hours.start.ceil_to_grid(), self.ceiling);
        (!window.is_empty()).then_some(window)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::clock::t;
    use pretty_assertions::assert_eq;

    fn open(start: &str, end: &str) -> Option<BusinessHours> {
        Some(BusinessHours::new(t(start), t(end)))
    }

    #[test]
    fn test_grid_runs_from_opening_hour_to_ceiling() {
        let grid = DayGrid::build(open("08:30", "22:00"), t("23:00"), t("08:00"));
        assert_eq!(grid.slots().first().unwrap().hour, t("08:00"));
        assert_eq!(grid.slots().last().unwrap().hour, t("22:00"));
        assert_eq!(grid.row_count(), 15 * 4);
    }

    #[test]
    fn test_sub_slot_availability_follows_business_hours() {
        let grid = DayGrid::build(open("08:30", "22:00"), t("23:00"), t("08:00"));
        let first_hour: Vec<(u16, bool)> = grid.slots()[0]
            .sub_slots
            .iter()
            .map(|s| (s.minutes, s.is_available))
            .collect();
        assert_eq!(
            first_hour,
            vec![(0, false), (15, false), (30, true), (45, true)]
        );
        assert!(grid.is_available(t("21:45")));
        assert!(!grid.is_available(t("22:00")));
    }

    #[test]
    fn test_ceiling_caps_availability() {
        let grid = DayGrid::build(open("09:00", "24:00"), t("23:00"), t("08:00"));
        assert!(grid.is_available(t("22:45")));
        assert!(!grid.is_available(t("23:00")));
        assert_eq!(
            grid.selectable_window(),
            Some(TimeRange::new(t("09:00"), t("23:00")))
        );
    }

    #[test]
    fn test_off_grid_opening_starts_window_at_next_sub_slot() {
        let grid = DayGrid::build(open("08:10", "22:00"), t("23:00"), t("08:00"));
        assert!(!grid.is_available(t("08:00")));
        assert!(grid.is_available(t("08:15")));
        assert_eq!(
            grid.selectable_window(),
            Some(TimeRange::new(t("08:15"), t("23:00")))
        );
    }

    #[test]
    fn test_closed_day_has_no_available_slots() {
        let grid = DayGrid::build(None, t("23:00"), t("08:00"));
        assert!(grid.row_count() > 0);
        assert!(grid.rows().all(|row| !row.is_available));
        assert!(grid.selectable_window().is_none());
    }

    #[test]
    fn test_time_at_and_row_at() {
        assert_eq!(DayGrid::time_at(t("14:00"), 3), t("14:45"));
        let grid = DayGrid::build(open("10:00", "12:00"), t("23:00"), t("08:00"));
        assert_eq!(grid.row_at(5).unwrap().time, t("10:15"));
        assert!(grid.row_at(grid.row_count()).is_none());
    }
}
