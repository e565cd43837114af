use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::{anyhow, Result};
use chrono::NaiveDate;

use super::BookingSource;
use crate::models::blocked_slot::BlockedSlot;
use crate::models::booking::{Booking, BookingId};
use crate::models::court::BranchId;

#[derive(Default)]
struct Store {
    next_id: u64,
    bookings: HashMap<BranchId, Vec<Booking>>,
    blocks: HashMap<(BranchId, NaiveDate), Vec<BlockedSlot>>,
}

/// Booking source kept in process memory.
///
/// Used by the desktop binary when no remote service is configured and by
/// tests. Nothing survives a restart.
#[derive(Default)]
pub struct InMemoryBookingSource {
    store: Mutex<Store>,
}

impl InMemoryBookingSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an administrator block for a date.
    pub fn add_block(&self, branch_id: &BranchId, date: NaiveDate, block: BlockedSlot) -> Result<()> {
        let mut store = self.lock()?;
        store
            .blocks
            .entry((branch_id.clone(), date))
            .or_default()
            .push(block);
        Ok(())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Store>> {
        self.store
            .lock()
            .map_err(|_| anyhow!("Booking store lock poisoned"))
    }
}

impl BookingSource for InMemoryBookingSource {
    fn bookings_by_date(&self, date: NaiveDate, branch_id: &BranchId) -> Result<Vec<Booking>> {
        let store = self.lock()?;
        let mut bookings: Vec<Booking> = store
            .bookings
            .get(branch_id)
            .map(|all| all.iter().filter(|b| b.date == date).cloned().collect())
            .unwrap_or_default();
        bookings.sort_by(|a, b| (&a.court_id, a.start).cmp(&(&b.court_id, b.start)));
        Ok(bookings)
    }

    fn blocked_slots_by_date(&self, date: NaiveDate, branch_id: &BranchId) -> Result<Vec<BlockedSlot>> {
        let store = self.lock()?;
        Ok(store
            .blocks
            .get(&(branch_id.clone(), date))
            .cloned()
            .unwrap_or_default())
    }

    fn create_booking(&self, branch_id: &BranchId, mut booking: Booking) -> Result<Booking> {
        booking.validate().map_err(|e| anyhow!(e))?;

        let mut store = self.lock()?;
        store.next_id += 1;
        booking.id = Some(BookingId::new(format!("bk-{}", store.next_id)));
        store
            .bookings
            .entry(branch_id.clone())
            .or_default()
            .push(booking.clone());

        log::info!(
            "Created booking {} on {} {} {}",
            booking.id.as_ref().map(|id| id.as_str()).unwrap_or_default(),
            booking.court_id,
            booking.date,
            booking.start
        );
        Ok(booking)
    }

    fn update_booking(&self, branch_id: &BranchId, booking: &Booking) -> Result<()> {
        let id = booking
            .id
            .as_ref()
            .ok_or_else(|| anyhow!("Booking ID is required for update"))?;
        booking.validate().map_err(|e| anyhow!(e))?;

        let mut store = self.lock()?;
        let existing = store
            .bookings
            .get_mut(branch_id)
            .and_then(|all| all.iter_mut().find(|b| b.id.as_ref() == Some(id)))
            .ok_or_else(|| anyhow!("Booking with id {} not found", id))?;
        *existing = booking.clone();
        Ok(())
    }

    fn delete_booking(&self, branch_id: &BranchId, id: &BookingId) -> Result<()> {
        let mut store = self.lock()?;
        let all = store
            .bookings
            .get_mut(branch_id)
            .ok_or_else(|| anyhow!("Booking with id {} not found", id))?;
        let before = all.len();
        all.retain(|b| b.id.as_ref() != Some(id));
        if all.len() == before {
            return Err(anyhow!("Booking with id {} not found", id));
        }
        Ok(())
    }

    fn replace_blocked_slots(
        &self,
        date: NaiveDate,
        branch_id: &BranchId,
        blocked: Vec<BlockedSlot>,
    ) -> Result<()> {
        let mut store = self.lock()?;
        store.blocks.insert((branch_id.clone(), date), blocked);
        Ok(())
    }
}
