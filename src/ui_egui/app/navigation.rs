use chrono::{Duration, Local, NaiveDate};

use super::BookingGridApp;
use crate::models::time_slot::DayGrid;
use crate::services::business_hours::BusinessHoursProvider;

impl BookingGridApp {
    pub(super) fn navigate_previous(&mut self) {
        self.set_date(self.current_date - Duration::days(1));
    }

    pub(super) fn navigate_next(&mut self) {
        self.set_date(self.current_date + Duration::days(1));
    }

    pub(super) fn jump_to_today(&mut self) {
        self.set_date(Local::now().date_naive());
    }

    /// Switch the grid to `date`: rebuild the rows, drop any drag or open
    /// booking form, and fetch the day.
    pub(super) fn set_date(&mut self, date: NaiveDate) {
        self.current_date = date;
        let hours = self.schedule.hours_for(date);
        self.grid = DayGrid::build(hours, self.settings.closing_ceiling, self.settings.fallback_open);
        self.selector.set_window(self.grid.selectable_window());
        self.selector.cancel();
        self.booking_dialog = None;
        self.pending_commit = None;
        self.confirm_dialog.cancel();
        self.loader.request(date, self.settings.branch_id());
    }
}
