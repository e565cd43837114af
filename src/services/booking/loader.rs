//! Background loading of a day's bookings.
//!
//! Fetches run on a worker thread and report back over a channel that the
//! UI polls once per frame. Every request is tagged with a generation
//! number; a response is only accepted if it belongs to the most recent
//! request, so flipping quickly between dates can never let an older
//! response overwrite a newer one. An accepted response replaces the
//! cached day outright.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use chrono::NaiveDate;

use super::BookingSource;
use crate::models::blocked_slot::BlockedSlot;
use crate::models::booking::Booking;
use crate::models::court::BranchId;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FetchKey {
    pub date: NaiveDate,
    pub branch_id: BranchId,
}

/// Cached snapshot of one date at one branch.
#[derive(Debug, Clone, PartialEq)]
pub struct DayBookings {
    pub key: FetchKey,
    pub generation: u64,
    pub bookings: Vec<Booking>,
    pub blocked: Vec<BlockedSlot>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Idle,
    Loading,
    Ready,
    Failed(String),
    /// No branch is selected; the grid shows an empty state
    MissingBranch,
}

struct FetchResponse {
    generation: u64,
    key: FetchKey,
    result: Result<(Vec<Booking>, Vec<BlockedSlot>), String>,
}

pub struct BookingLoader {
    source: Arc<dyn BookingSource>,
    generation: u64,
    current_key: Option<FetchKey>,
    tx: Sender<FetchResponse>,
    rx: Receiver<FetchResponse>,
    state: LoadState,
    data: Option<DayBookings>,
}

impl BookingLoader {
    pub fn new(source: Arc<dyn BookingSource>) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            source,
            generation: 0,
            current_key: None,
            tx,
            rx,
            state: LoadState::Idle,
            data: None,
        }
    }

    pub fn source(&self) -> &Arc<dyn BookingSource> {
        &self.source
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state == LoadState::Loading
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn current_key(&self) -> Option<&FetchKey> {
        self.current_key.as_ref()
    }

    pub fn data(&self) -> Option<&DayBookings> {
        self.data.as_ref()
    }

    pub fn data_mut(&mut self) -> Option<&mut DayBookings> {
        self.data.as_mut()
    }

    /// Start fetching `date` for `branch_id`, superseding any fetch in flight.
    ///
    /// Returns the generation assigned to the request.
    pub fn request(&mut self, date: NaiveDate, branch_id: Option<&BranchId>) -> u64 {
        self.generation += 1;
        let generation = self.generation;

        let Some(branch_id) = branch_id else {
            log::warn!("No branch selected; skipping booking fetch for {}", date);
            self.current_key = None;
            self.data = None;
            self.state = LoadState::MissingBranch;
            return generation;
        };

        let key = FetchKey {
            date,
            branch_id: branch_id.clone(),
        };
        self.current_key = Some(key.clone());
        self.state = LoadState::Loading;

        log::debug!(
            "Fetching bookings for {} at {} (generation {})",
            key.date,
            key.branch_id,
            generation
        );

        let source = Arc::clone(&self.source);
        let tx = self.tx.clone();
        thread::spawn(move || {
            let result = (|| -> anyhow::Result<(Vec<Booking>, Vec<BlockedSlot>)> {
                let bookings = source.bookings_by_date(key.date, &key.branch_id)?;
                let blocked = source.blocked_slots_by_date(key.date, &key.branch_id)?;
                Ok((bookings, blocked))
            })()
            .map_err(|err| format!("{:#}", err));

            let _ = tx.send(FetchResponse {
                generation,
                key,
                result,
            });
        });

        generation
    }

    /// Re-run the current request, e.g. after writing to the source.
    pub fn reload(&mut self) -> Option<u64> {
        let key = self.current_key.clone()?;
        Some(self.request(key.date, Some(&key.branch_id)))
    }

    /// Drain finished fetches without blocking. Returns true when the
    /// visible state changed.
    pub fn poll(&mut self) -> bool {
        let mut changed = false;
        while let Ok(response) = self.rx.try_recv() {
            changed |= self.accept(response);
        }
        changed
    }

    /// Block until the current request resolves or `timeout` elapses.
    pub fn wait(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        while self.is_loading() {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.rx.recv_timeout(remaining) {
                Ok(response) => {
                    self.accept(response);
                }
                Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => {
                    return false;
                }
            }
        }
        true
    }

    fn accept(&mut self, response: FetchResponse) -> bool {
        if response.generation != self.generation {
            log::warn!(
                "Dropping stale booking response for {} (generation {}, current {})",
                response.key.date,
                response.generation,
                self.generation
            );
            return false;
        }

        match response.result {
            Ok((bookings, blocked)) => {
                log::info!(
                    "Loaded {} bookings and {} blocked slots for {}",
                    bookings.len(),
                    blocked.len(),
                    response.key.date
                );
                self.data = Some(DayBookings {
                    key: response.key,
                    generation: response.generation,
                    bookings,
                    blocked,
                });
                self.state = LoadState::Ready;
            }
            Err(err) => {
                log::error!("Failed to load bookings for {}: {}", response.key.date, err);
                self.data = None;
                self.state = LoadState::Failed(err);
            }
        }
        true
    }
}
