//! Business-hours provider.
//!
//! Decides, for a given date, which part of the day is bookable. The grid
//! asks once per date change and rebuilds its `DayGrid` from the answer.

use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate};

use crate::models::business_hours::BusinessHours;
use crate::models::clock::ClockTime;
use crate::models::settings::{GridSettings, WeeklyHours};

pub trait BusinessHoursProvider {
    /// Opening hours for `date`, or `None` when the branch is closed.
    fn hours_for(&self, date: NaiveDate) -> Option<BusinessHours>;

    fn is_time_in_range(&self, date: NaiveDate, time: ClockTime) -> bool {
        self.hours_for(date)
            .is_some_and(|hours| hours.is_time_in_range(time))
    }
}

/// Recurring weekly opening hours with one-off closures.
#[derive(Debug, Clone)]
pub struct WeeklySchedule {
    hours: WeeklyHours,
    closed_dates: BTreeSet<NaiveDate>,
}

impl WeeklySchedule {
    pub fn new(hours: WeeklyHours) -> Self {
        Self {
            hours,
            closed_dates: BTreeSet::new(),
        }
    }

    pub fn from_settings(settings: &GridSettings) -> Self {
        Self {
            hours: settings.business_hours.clone(),
            closed_dates: settings.closed_dates.iter().copied().collect(),
        }
    }

    pub fn close_on(&mut self, date: NaiveDate) {
        self.closed_dates.insert(date);
    }
}

impl BusinessHoursProvider for WeeklySchedule {
    fn hours_for(&self, date: NaiveDate) -> Option<BusinessHours> {
        if self.closed_dates.contains(&date) {
            return None;
        }
        self.hours.for_weekday(date.weekday())
    }
}
