// Business hours module
// Opening window for a single day

use serde::{Deserialize, Serialize};

use super::clock::{ClockTime, TimeRange};

/// Opening hours for one day, half-open like every other range on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessHours {
    pub start: ClockTime,
    pub end: ClockTime,
}

impl BusinessHours {
    pub fn new(start: ClockTime, end: ClockTime) -> Self {
        Self { start, end }
    }

    pub fn range(&self) -> TimeRange {
        TimeRange::new(self.start, self.end)
    }

    pub fn is_time_in_range(&self, time: ClockTime) -> bool {
        self.range().contains(time)
    }
}
