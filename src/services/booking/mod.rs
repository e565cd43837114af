//! Booking data source.
//!
//! The grid never owns booking data: it reads a day's bookings and blocks
//! from a `BookingSource` and writes new or trimmed bookings back to it.
//! `memory` provides a process-local source, `loader` runs fetches off the
//! UI thread and `commit` writes a confirmed selection back.

use anyhow::Result;
use chrono::NaiveDate;

use crate::models::blocked_slot::BlockedSlot;
use crate::models::booking::{Booking, BookingId};
use crate::models::court::BranchId;

pub mod commit;
pub mod loader;
pub mod memory;

/// External booking service as seen by the grid.
#[cfg_attr(test, mockall::automock)]
pub trait BookingSource: Send + Sync {
    fn bookings_by_date(&self, date: NaiveDate, branch_id: &BranchId) -> Result<Vec<Booking>>;

    fn blocked_slots_by_date(&self, date: NaiveDate, branch_id: &BranchId) -> Result<Vec<BlockedSlot>>;

    /// Store a new booking and return it with its service-issued id.
    fn create_booking(&self, branch_id: &BranchId, booking: Booking) -> Result<Booking>;

    fn update_booking(&self, branch_id: &BranchId, booking: &Booking) -> Result<()>;

    fn delete_booking(&self, branch_id: &BranchId, id: &BookingId) -> Result<()>;

    /// Overwrite the blocked slots of one date, e.g. after a selection
    /// trimmed some of them.
    fn replace_blocked_slots(
        &self,
        date: NaiveDate,
        branch_id: &BranchId,
        blocked: Vec<BlockedSlot>,
    ) -> Result<()>;
}
