//! Drag-selection state machine for the booking grid.
//!
//! Turns pointer gestures over (court x sub-slot) cells into a normalized,
//! rectangular `Selection`. The selector never talks to the pointer device
//! directly: callers feed it `PointerEvent`s (or call `begin` / `update` /
//! `commit` / `cancel`), which keeps it testable without a window.
//!
//! States: `Idle -> Selecting -> Idle`. Releasing the pointer commits the
//! selection; leaving the window discards it.

use crate::models::clock::{ClockTime, TimeRange, TIME_INTERVAL};
use crate::models::court::CourtId;
use crate::models::selection::Selection;
use crate::models::time_slot::DayGrid;
use crate::services::classifier::SlotClassifier;

/// A grid cell addressed the way the grid renders it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridCell {
    pub court_id: CourtId,
    pub hour: ClockTime,
    pub sub_slot: u8,
}

impl GridCell {
    pub fn new(court_id: CourtId, hour: ClockTime, sub_slot: u8) -> Self {
        Self {
            court_id,
            hour,
            sub_slot,
        }
    }

    /// Cell whose sub-slot starts at `time`.
    pub fn at(court_id: CourtId, time: ClockTime) -> Self {
        let time = time.floor_to_grid();
        let sub_slot = ((time.minutes() % 60) / TIME_INTERVAL) as u8;
        Self::new(court_id, time.floor_to_hour(), sub_slot)
    }

    pub fn time(&self) -> ClockTime {
        DayGrid::time_at(self.hour, self.sub_slot)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PointerEvent {
    Down(GridCell),
    Enter(GridCell),
    /// Pointer released anywhere, not only over the grid
    Up,
    /// Pointer left the application window
    LeaveWindow,
}

/// Decides whether a drag may start on a cell.
pub trait CellGuard {
    fn is_selectable(&self, court_id: &CourtId, time: ClockTime) -> bool;
}

/// Guard used by the grid: the cell must be inside business hours and not
/// already booked or blocked.
pub struct GridGuard<'g, 'a> {
    pub grid: &'g DayGrid,
    pub classifier: &'g SlotClassifier<'a>,
}

impl<'g, 'a> CellGuard for GridGuard<'g, 'a> {
    fn is_selectable(&self, court_id: &CourtId, time: ClockTime) -> bool {
        self.grid.is_available(time) && !self.classifier.is_occupied(court_id, time)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectorOutcome {
    /// Event had no effect
    Ignored,
    /// A new drag began; pending guest/participant forms must be reset
    Started,
    /// The selection rectangle changed
    Updated,
    /// Drag finished; hand the selection to the booking dialog
    Committed(Selection),
    /// Drag aborted without a selection
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Anchor {
    court_index: usize,
    time: ClockTime,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum DragState {
    Idle,
    Selecting { anchor: Anchor },
}

pub struct GridSelector {
    /// Courts in display order; the selectable court range is contiguous in it
    courts: Vec<CourtId>,
    window: Option<TimeRange>,
    state: DragState,
    selection: Option<Selection>,
}

impl GridSelector {
    pub fn new(courts: Vec<CourtId>, window: Option<TimeRange>) -> Self {
        Self {
            courts,
            window,
            state: DragState::Idle,
            selection: None,
        }
    }

    /// Replace the visible court order. Any drag in progress is discarded.
    pub fn set_courts(&mut self, courts: Vec<CourtId>) {
        if self.courts != courts {
            self.courts = courts;
            self.cancel();
        }
    }

    /// Replace the selectable window (opening time to closing ceiling).
    pub fn set_window(&mut self, window: Option<TimeRange>) {
        if self.window != window {
            self.window = window;
            self.cancel();
        }
    }

    pub fn window(&self) -> Option<TimeRange> {
        self.window
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Selecting { .. })
    }

    /// Selection being dragged right now, if any.
    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    /// Dispatch a pointer event.
    pub fn handle(&mut self, event: PointerEvent, guard: &dyn CellGuard) -> SelectorOutcome {
        match event {
            PointerEvent::Down(cell) => self.begin(&cell, guard),
            PointerEvent::Enter(cell) => self.update(&cell),
            PointerEvent::Up => match self.commit() {
                Some(selection) => SelectorOutcome::Committed(selection),
                None => SelectorOutcome::Ignored,
            },
            PointerEvent::LeaveWindow => {
                if self.is_dragging() {
                    self.cancel();
                    SelectorOutcome::Cancelled
                } else {
                    SelectorOutcome::Ignored
                }
            }
        }
    }

    /// Anchor a new drag on `cell`, seeding a single-slot selection.
    ///
    /// Ignored when the cell is not selectable, is outside the window, or
    /// belongs to a court that is not displayed.
    pub fn begin(&mut self, cell: &GridCell, guard: &dyn CellGuard) -> SelectorOutcome {
        let Some(window) = self.window else {
            return SelectorOutcome::Ignored;
        };
        let Some(court_index) = self.court_index(&cell.court_id) else {
            return SelectorOutcome::Ignored;
        };

        let time = cell.time().floor_to_grid();
        if !window.contains(time) || !guard.is_selectable(&cell.court_id, time) {
            log::debug!("Ignoring pointer-down on {} at {}", cell.court_id, time);
            return SelectorOutcome::Ignored;
        }

        let anchor = Anchor { court_index, time };
        let Some(selection) = self.rectangle(&anchor, court_index, time, window) else {
            return SelectorOutcome::Ignored;
        };

        log::debug!(
            "Drag started on {} at {}",
            cell.court_id,
            selection.range()
        );
        self.state = DragState::Selecting { anchor };
        self.selection = Some(selection);
        SelectorOutcome::Started
    }

    /// Stretch the selection so it spans the anchor and `cell`.
    pub fn update(&mut self, cell: &GridCell) -> SelectorOutcome {
        let DragState::Selecting { anchor } = &self.state else {
            return SelectorOutcome::Ignored;
        };
        let Some(window) = self.window else {
            return SelectorOutcome::Ignored;
        };
        let Some(court_index) = self.court_index(&cell.court_id) else {
            return SelectorOutcome::Ignored;
        };

        let Some(selection) = self.rectangle(anchor, court_index, cell.time(), window) else {
            return SelectorOutcome::Ignored;
        };

        if self.selection.as_ref() == Some(&selection) {
            return SelectorOutcome::Ignored;
        }
        self.selection = Some(selection);
        SelectorOutcome::Updated
    }

    /// Finish the drag, returning the selection to hand to the booking dialog.
    pub fn commit(&mut self) -> Option<Selection> {
        if !self.is_dragging() {
            return None;
        }
        self.state = DragState::Idle;
        let selection = self.selection.take();
        if let Some(selection) = &selection {
            log::debug!(
                "Drag committed: {} court(s), {}",
                selection.selections.len(),
                selection.range()
            );
        }
        selection
    }

    /// Drop the drag and any selection without committing.
    pub fn cancel(&mut self) {
        if self.is_dragging() {
            log::debug!("Drag cancelled");
        }
        self.state = DragState::Idle;
        self.selection = None;
    }

    fn court_index(&self, court_id: &CourtId) -> Option<usize> {
        self.courts.iter().position(|id| id == court_id)
    }

    /// Rectangle between the anchor and the current cell, normalized so the
    /// start never exceeds the end, snapped to the grid and clamped to the
    /// window.
    fn rectangle(
        &self,
        anchor: &Anchor,
        court_index: usize,
        current: ClockTime,
        window: TimeRange,
    ) -> Option<Selection> {
        let (first, last) = if anchor.court_index <= court_index {
            (anchor.court_index, court_index)
        } else {
            (court_index, anchor.court_index)
        };
        let courts = self.courts.get(first..=last)?;

        let current = current.floor_to_grid();
        let low = anchor.time.min(current);
        let high = anchor.time.max(current).next_slot();

        let start = low.max(window.start).floor_to_grid();
        let end = high.min(window.end);

        Selection::rectangle(courts, TimeRange::new(start, end))
    }
}
