// Test fixtures - reusable test data
// Provides consistent courts, dates and bookings across the test files

#![allow(dead_code)]

use chrono::NaiveDate;
use court_grid::models::booking::Booking;
use court_grid::models::clock::ClockTime;
use court_grid::models::court::{BranchId, Court, CourtId};

/// Parse "HH:MM"; panics on malformed fixtures.
pub fn clock(text: &str) -> ClockTime {
    text.parse().unwrap()
}

pub fn branch() -> BranchId {
    BranchId::new("main")
}

/// Sample dates for testing
pub mod dates {
    use super::*;

    /// Friday, open 08:00 - 23:00 under the default schedule
    pub fn friday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 14).unwrap()
    }

    /// Saturday, open 09:00 - 21:00 under the default schedule
    pub fn saturday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 15).unwrap()
    }
}

/// Four courts in display order, matching the default settings
pub fn courts() -> Vec<Court> {
    (1..=4)
        .map(|n| Court::new(format!("court-{}", n), format!("Court {}", n)))
        .collect()
}

pub fn court_ids() -> Vec<CourtId> {
    courts().into_iter().map(|court| court.id).collect()
}

pub fn booking(court: &str, start: &str, end: &str) -> Booking {
    Booking::new(CourtId::new(court), dates::friday(), clock(start), clock(end)).unwrap()
}
