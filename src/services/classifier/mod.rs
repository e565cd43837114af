//! Slot classification for the booking grid.
//!
//! For every (court, sub-slot) the grid asks whether the cell is covered by
//! a confirmed booking, an administrator block, or nothing. Matched cells
//! also report where they sit inside their interval so touching intervals
//! can be drawn as one continuous bar and the label drawn exactly once.
//!
//! Bookings and blocks are indexed per court when the classifier is built,
//! which keeps per-cell lookups cheap for a full day of renders.

use std::collections::HashMap;

use crate::models::blocked_slot::BlockedSlot;
use crate::models::booking::Booking;
use crate::models::clock::{ClockTime, TimeRange};
use crate::models::court::CourtId;
use crate::models::occupancy::Occupancy;
use crate::models::selection::Selection;

/// Position of a sub-slot within the interval that covers it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Placement {
    /// The sub-slot is the interval's first one; draw the label here
    pub is_start: bool,
    /// Another interval on the court ends exactly where this one starts
    pub has_adjacent_top: bool,
    /// Another interval on the court starts exactly where this one ends
    pub has_adjacent_bottom: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SlotStatus<'a> {
    Confirmed {
        booking: &'a Booking,
        placement: Placement,
    },
    Blocked {
        block: &'a BlockedSlot,
        placement: Placement,
    },
    Free,
}

impl<'a> SlotStatus<'a> {
    pub fn is_free(&self) -> bool {
        matches!(self, SlotStatus::Free)
    }

    pub fn placement(&self) -> Option<Placement> {
        match self {
            SlotStatus::Confirmed { placement, .. } | SlotStatus::Blocked { placement, .. } => {
                Some(*placement)
            }
            SlotStatus::Free => None,
        }
    }

    /// Interval covering the slot, if any.
    pub fn range(&self) -> Option<TimeRange> {
        match self {
            SlotStatus::Confirmed { booking, .. } => Some(booking.range()),
            SlotStatus::Blocked { block, .. } => Some(block.range()),
            SlotStatus::Free => None,
        }
    }
}

/// Render state of a single grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellState {
    Confirmed,
    Blocked,
    Selected,
    Free,
}

#[derive(Debug, Default)]
struct CourtIndex {
    /// Booking indices sorted by start time
    bookings: Vec<usize>,
    /// Block indices sorted by start time
    blocks: Vec<usize>,
    starts: HashMap<ClockTime, usize>,
    ends: HashMap<ClockTime, usize>,
}

impl CourtIndex {
    fn record(&mut self, range: TimeRange) {
        *self.starts.entry(range.start).or_default() += 1;
        *self.ends.entry(range.end).or_default() += 1;
    }

    fn placement(&self, range: TimeRange, time: ClockTime) -> Placement {
        Placement {
            is_start: time == range.start,
            has_adjacent_top: self.ends.contains_key(&range.start),
            has_adjacent_bottom: self.starts.contains_key(&range.end),
        }
    }
}

/// Read-only classifier over one date's bookings and blocks.
pub struct SlotClassifier<'a> {
    bookings: &'a [Booking],
    blocks: &'a [BlockedSlot],
    courts: HashMap<&'a CourtId, CourtIndex>,
}

impl<'a> SlotClassifier<'a> {
    pub fn new(bookings: &'a [Booking], blocks: &'a [BlockedSlot]) -> Self {
        let mut courts: HashMap<&'a CourtId, CourtIndex> = HashMap::new();

        for (index, booking) in bookings.iter().enumerate() {
            let range = booking.range();
            if range.is_empty() {
                continue;
            }
            let entry = courts.entry(&booking.court_id).or_default();
            entry.bookings.push(index);
            entry.record(range);
        }

        for (index, block) in blocks.iter().enumerate() {
            let range = block.range();
            if range.is_empty() {
                continue;
            }
            let entry = courts.entry(&block.court_id).or_default();
            entry.blocks.push(index);
            entry.record(range);
        }

        for entry in courts.values_mut() {
            entry.bookings.sort_by_key(|&i| bookings[i].start);
            entry.blocks.sort_by_key(|&i| blocks[i].start);
        }

        Self {
            bookings,
            blocks,
            courts,
        }
    }

    /// Classify the sub-slot starting at `time` on `court_id`.
    ///
    /// Confirmed bookings take priority over blocks, which take priority over
    /// free time. Intervals are half-open, so a boundary slot belongs to the
    /// interval that starts there.
    pub fn classify(&self, court_id: &CourtId, time: ClockTime) -> SlotStatus<'a> {
        let Some(index) = self.courts.get(court_id) else {
            return SlotStatus::Free;
        };

        if let Some(booking) = find_covering(self.bookings, &index.bookings, time) {
            return SlotStatus::Confirmed {
                booking,
                placement: index.placement(booking.range(), time),
            };
        }

        if let Some(block) = find_covering(self.blocks, &index.blocks, time) {
            return SlotStatus::Blocked {
                block,
                placement: index.placement(block.range(), time),
            };
        }

        SlotStatus::Free
    }

    pub fn is_occupied(&self, court_id: &CourtId, time: ClockTime) -> bool {
        !self.classify(court_id, time).is_free()
    }

    /// Cell state for rendering; free cells inside the pending selection
    /// show as selected.
    pub fn cell_state(
        &self,
        court_id: &CourtId,
        time: ClockTime,
        selection: Option<&Selection>,
    ) -> CellState {
        match self.classify(court_id, time) {
            SlotStatus::Confirmed { .. } => CellState::Confirmed,
            SlotStatus::Blocked { .. } => CellState::Blocked,
            SlotStatus::Free if selection.is_some_and(|s| s.includes(court_id, time)) => {
                CellState::Selected
            }
            SlotStatus::Free => CellState::Free,
        }
    }
}

fn find_covering<'a, T: Occupancy>(items: &'a [T], order: &[usize], time: ClockTime) -> Option<&'a T> {
    let candidates = order.partition_point(|&i| items[i].range().start <= time);
    order[..candidates]
        .iter()
        .rev()
        .map(|&i| &items[i])
        .find(|item| item.range().contains(time))
}
