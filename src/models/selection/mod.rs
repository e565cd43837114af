// Selection module
// Pending, not-yet-committed drag region on the booking grid

use serde::Serialize;

use super::clock::{ClockTime, TimeRange};
use super::court::CourtId;

/// The part of a selection that falls on a single court.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourtSelection {
    pub court_id: CourtId,
    #[serde(rename = "startTime")]
    pub start: ClockTime,
    #[serde(rename = "endTime")]
    pub end: ClockTime,
    pub slots: Vec<ClockTime>,
}

impl CourtSelection {
    pub fn range(&self) -> TimeRange {
        TimeRange::new(self.start, self.end)
    }
}

/// Rectangular selection: one entry per spanned court, all sharing the same
/// time bounds. The top-level fields cache the bounding rectangle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
    pub selections: Vec<CourtSelection>,
    pub start_court_id: CourtId,
    pub end_court_id: CourtId,
    #[serde(rename = "startTime")]
    pub start: ClockTime,
    #[serde(rename = "endTime")]
    pub end: ClockTime,
    pub slots: Vec<ClockTime>,
}

impl Selection {
    /// Build a selection covering `courts` (in display order) over `range`.
    ///
    /// Returns `None` for an empty court list or an empty range.
    pub fn rectangle(courts: &[CourtId], range: TimeRange) -> Option<Self> {
        if range.is_empty() {
            return None;
        }
        let first = courts.first()?.clone();
        let last = courts.last()?.clone();
        let slots = range.grid_slots();

        let selections = courts
            .iter()
            .map(|court_id| CourtSelection {
                court_id: court_id.clone(),
                start: range.start,
                end: range.end,
                slots: slots.clone(),
            })
            .collect();

        Some(Self {
            selections,
            start_court_id: first,
            end_court_id: last,
            start: range.start,
            end: range.end,
            slots,
        })
    }

    pub fn range(&self) -> TimeRange {
        TimeRange::new(self.start, self.end)
    }

    pub fn duration_minutes(&self) -> u16 {
        self.range().duration_minutes()
    }

    pub fn court_ids(&self) -> impl Iterator<Item = &CourtId> {
        self.selections.iter().map(|entry| &entry.court_id)
    }

    pub fn for_court(&self, court_id: &CourtId) -> Option<&CourtSelection> {
        self.selections.iter().find(|entry| &entry.court_id == court_id)
    }

    /// True when the sub-slot starting at `time` on `court_id` is selected.
    pub fn includes(&self, court_id: &CourtId, time: ClockTime) -> bool {
        self.for_court(court_id)
            .is_some_and(|entry| entry.range().contains(time))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::clock::t;

    fn courts(ids: &[&str]) -> Vec<CourtId> {
        ids.iter().map(|id| CourtId::new(*id)).collect()
    }

    #[test]
    fn test_rectangle_shares_bounds_across_courts() {
        let range = TimeRange::new(t("10:00"), t("11:00"));
        let selection = Selection::rectangle(&courts(&["c2", "c3", "c4"]), range).unwrap();

        assert_eq!(selection.selections.len(), 3);
        assert!(selection
            .selections
            .iter()
            .all(|entry| entry.range() == range && entry.slots.len() == 4));
        assert_eq!(selection.start_court_id, CourtId::new("c2"));
        assert_eq!(selection.end_court_id, CourtId::new("c4"));
        assert_eq!(selection.duration_minutes(), 60);
    }

    #[test]
    fn test_rectangle_rejects_empty_inputs() {
        let range = TimeRange::new(t("10:00"), t("11:00"));
        assert!(Selection::rectangle(&[], range).is_none());
        let empty = TimeRange::new(t("10:00"), t("10:00"));
        assert!(Selection::rectangle(&courts(&["c1"]), empty).is_none());
    }

    #[test]
    fn test_includes() {
        let range = TimeRange::new(t("10:00"), t("10:30"));
        let selection = Selection::rectangle(&courts(&["c1"]), range).unwrap();
        assert!(selection.includes(&CourtId::new("c1"), t("10:15")));
        assert!(!selection.includes(&CourtId::new("c1"), t("10:30")));
        assert!(!selection.includes(&CourtId::new("c2"), t("10:15")));
    }
}
