//! Writing a confirmed selection back to the booking source.
//!
//! A `PendingCommit` is prepared as soon as the booking dialog is saved. It
//! holds the new bookings (one per selected court) and the overlap plans for
//! the day's bookings and blocks, so the caller can ask the operator before
//! anything changes. Committing re-checks that the cached day is the one
//! the plans were computed from, applies them, and writes the changed
//! records to the source.

use anyhow::{anyhow, bail, Context, Result};
use chrono::NaiveDate;

use super::loader::DayBookings;
use super::BookingSource;
use crate::models::blocked_slot::BlockedSlot;
use crate::models::booking::{Booking, BookingId, BookingKind, PaymentStatus};
use crate::models::occupancy::Occupancy;
use crate::models::selection::Selection;
use crate::services::overlap::{
    Adjustment, OverlapResolver, ResolutionPlan, ResolutionSummary, ResolveError,
};

/// Form fields shared by every booking created from one selection.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BookingDraft {
    pub title: String,
    pub description: String,
    pub price: Option<f64>,
    pub payment_status: PaymentStatus,
    pub participants: Vec<String>,
    pub kind: BookingKind,
}

impl BookingDraft {
    /// One booking per court in the selection, all with the same bounds.
    pub fn bookings_for(&self, selection: &Selection, date: NaiveDate) -> Result<Vec<Booking>, String> {
        selection
            .selections
            .iter()
            .map(|court| {
                let mut builder = Booking::builder()
                    .court(court.court_id.clone())
                    .date(date)
                    .range(court.range())
                    .payment_status(self.payment_status)
                    .kind(self.kind);

                if !self.title.trim().is_empty() {
                    builder = builder.title(self.title.trim());
                }
                if !self.description.trim().is_empty() {
                    builder = builder.description(self.description.trim());
                }
                if let Some(price) = self.price {
                    builder = builder.price(price);
                }
                for name in &self.participants {
                    builder = builder.participant(name.clone());
                }
                builder.build()
            })
            .collect()
    }
}

/// What a successful commit did.
#[derive(Debug, Clone, PartialEq)]
pub struct CommitReport {
    pub created: Vec<Booking>,
    pub bookings: ResolutionSummary,
    pub blocks: ResolutionSummary,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PendingCommit {
    pub selection: Selection,
    pub bookings: Vec<Booking>,
    generation: u64,
    booking_plan: ResolutionPlan,
    block_plan: ResolutionPlan,
}

impl PendingCommit {
    pub fn prepare(
        resolver: &OverlapResolver,
        selection: Selection,
        bookings: Vec<Booking>,
        day: &DayBookings,
    ) -> Self {
        let booking_plan = resolver.plan(&selection, &day.bookings);
        let block_plan = resolver.plan(&selection, &day.blocked);
        Self {
            selection,
            bookings,
            generation: day.generation,
            booking_plan,
            block_plan,
        }
    }

    /// The operator must confirm before existing records are touched.
    pub fn needs_confirmation(&self) -> bool {
        !self.booking_plan.is_empty() || !self.block_plan.is_empty()
    }

    pub fn booking_plan(&self) -> &ResolutionPlan {
        &self.booking_plan
    }

    pub fn block_plan(&self) -> &ResolutionPlan {
        &self.block_plan
    }

    /// Prompt text for the overlap confirmation.
    pub fn describe(&self) -> String {
        let mut message = self.booking_plan.describe();
        let blocks = self.block_plan.affected_count();
        if blocks > 0 {
            message.push_str(&format!(
                " {} blocked slot{} will be shortened or cleared.",
                blocks,
                if blocks == 1 { "" } else { "s" }
            ));
        }
        message
    }

    /// Apply the plans to `day` and write the result to `source`.
    ///
    /// Fails with `ResolveError::StaleSnapshot` when `day` was reloaded or
    /// edited after `prepare`; nothing is written in that case. Every write
    /// is checked up front, new records go in before existing ones are
    /// touched, and a failure part way undoes what was already written.
    pub fn commit(
        self,
        resolver: &OverlapResolver,
        source: &dyn BookingSource,
        day: &DayBookings,
    ) -> Result<CommitReport> {
        if day.generation != self.generation {
            log::warn!(
                "Commit prepared against generation {} but day is at {}",
                self.generation,
                day.generation
            );
            return Err(ResolveError::StaleSnapshot.into());
        }

        let mut resolved = day.bookings.clone();
        let booking_summary = resolver.apply(&self.booking_plan, &mut resolved)?;
        let mut blocked = day.blocked.clone();
        let block_summary = resolver.apply(&self.block_plan, &mut blocked)?;

        let writes = BookingWrites::from_plan(&self.booking_plan, day)?;
        let blocks = (!self.block_plan.is_empty()).then_some(blocked);

        let mut journal = Vec::new();
        let created = match write_all(source, day, self.bookings, writes, blocks, &mut journal) {
            Ok(created) => created,
            Err(err) => {
                let failed = roll_back(source, day, journal);
                if failed > 0 {
                    return Err(err.context(format!(
                        "{} change(s) could not be undone, reload before retrying",
                        failed
                    )));
                }
                return Err(err);
            }
        };

        log::info!(
            "Committed {} booking(s) for {} ({})",
            created.len(),
            day.key.date,
            self.selection.range()
        );

        Ok(CommitReport {
            created,
            bookings: booking_summary,
            blocks: block_summary,
        })
    }
}

/// Source writes for the existing bookings a plan touches.
///
/// Only records named by the plan appear here, so bookings loaded without
/// an id are left alone unless the selection overlaps them.
#[derive(Debug, Default)]
struct BookingWrites {
    /// Trimmed bookings with their original for undo
    updates: Vec<(BookingId, Booking, Booking)>,
    /// Tails of split bookings, stored as new records
    fragments: Vec<Booking>,
    deletes: Vec<(BookingId, Booking)>,
}

impl BookingWrites {
    fn from_plan(plan: &ResolutionPlan, day: &DayBookings) -> Result<Self> {
        let mut writes = Self::default();
        for planned in plan.adjustments() {
            let original = day
                .bookings
                .get(planned.index)
                .ok_or(ResolveError::StaleSnapshot)?;
            let Some(id) = original.id.clone() else {
                bail!(
                    "Cannot modify booking without id on {} ({})",
                    original.court_id,
                    original.range()
                );
            };

            match planned.adjustment {
                Adjustment::TrimTail { range } | Adjustment::TrimHead { range } => {
                    let mut trimmed = original.clone();
                    trimmed.set_range(range);
                    writes.updates.push((id, original.clone(), trimmed));
                }
                Adjustment::Split { head, tail } => {
                    let mut trimmed = original.clone();
                    trimmed.set_range(head);
                    writes.updates.push((id, original.clone(), trimmed));
                    writes.fragments.push(original.fragment(tail));
                }
                Adjustment::Remove => writes.deletes.push((id, original.clone())),
            }
        }
        Ok(writes)
    }
}

/// A write that reached the source.
enum Applied {
    Created(Booking),
    Updated(Booking),
    BlocksReplaced,
    Deleted(Booking),
}

fn write_all(
    source: &dyn BookingSource,
    day: &DayBookings,
    new_bookings: Vec<Booking>,
    writes: BookingWrites,
    blocks: Option<Vec<BlockedSlot>>,
    journal: &mut Vec<Applied>,
) -> Result<Vec<Booking>> {
    let branch_id = &day.key.branch_id;

    let mut created = Vec::with_capacity(new_bookings.len());
    for booking in new_bookings {
        let court_id = booking.court_id.clone();
        let stored = source
            .create_booking(branch_id, booking)
            .with_context(|| format!("Failed to create booking on {}", court_id))?;
        journal.push(Applied::Created(stored.clone()));
        created.push(stored);
    }

    for fragment in writes.fragments {
        let stored = source
            .create_booking(branch_id, fragment)
            .context("Failed to store split booking")?;
        journal.push(Applied::Created(stored));
    }

    for (id, original, trimmed) in writes.updates {
        source
            .update_booking(branch_id, &trimmed)
            .with_context(|| format!("Failed to trim booking {}", id))?;
        journal.push(Applied::Updated(original));
    }

    if let Some(blocked) = blocks {
        source
            .replace_blocked_slots(day.key.date, branch_id, blocked)
            .context("Failed to update blocked slots")?;
        journal.push(Applied::BlocksReplaced);
    }

    for (id, original) in writes.deletes {
        source
            .delete_booking(branch_id, &id)
            .with_context(|| format!("Failed to remove booking {}", id))?;
        journal.push(Applied::Deleted(original));
    }

    Ok(created)
}

/// Undo `journal` newest first. Returns how many writes could not be undone.
fn roll_back(source: &dyn BookingSource, day: &DayBookings, journal: Vec<Applied>) -> usize {
    let branch_id = &day.key.branch_id;
    let mut failed = 0;

    for applied in journal.into_iter().rev() {
        let result = match &applied {
            Applied::Created(booking) => match &booking.id {
                Some(id) => source.delete_booking(branch_id, id),
                None => Err(anyhow!("source issued no id for the new booking")),
            },
            Applied::Updated(original) => source.update_booking(branch_id, original),
            Applied::BlocksReplaced => {
                source.replace_blocked_slots(day.key.date, branch_id, day.blocked.clone())
            }
            // Re-created under a new id
            Applied::Deleted(original) => {
                let mut restored = original.clone();
                restored.id = None;
                source.create_booking(branch_id, restored).map(|_| ())
            }
        };

        if let Err(err) = result {
            failed += 1;
            log::error!("Could not undo commit step: {:#}", err);
        }
    }

    if failed == 0 {
        log::warn!("Partial commit for {} was rolled back", day.key.date);
    }
    failed
}
