// Blocked slot module
// Administrator-imposed unavailability windows

use serde::{Deserialize, Serialize};

use super::clock::{ClockTime, TimeRange};
use super::court::CourtId;
use super::occupancy::Occupancy;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockedSlot {
    pub court_id: CourtId,
    #[serde(rename = "startTime")]
    pub start: ClockTime,
    #[serde(rename = "endTime")]
    pub end: ClockTime,
    #[serde(default)]
    pub reason: Option<String>,
}

impl BlockedSlot {
    pub fn new(court_id: CourtId, start: ClockTime, end: ClockTime) -> Self {
        Self {
            court_id,
            start,
            end,
            reason: None,
        }
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    pub fn display_reason(&self) -> &str {
        self.reason.as_deref().unwrap_or("Blocked")
    }
}

impl Occupancy for BlockedSlot {
    fn court_id(&self) -> &CourtId {
        &self.court_id
    }

    fn range(&self) -> TimeRange {
        TimeRange::new(self.start, self.end)
    }

    fn set_range(&mut self, range: TimeRange) {
        self.start = range.start;
        self.end = range.end;
    }
}
