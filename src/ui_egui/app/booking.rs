use std::sync::Arc;

use egui::Context;

use super::confirm::ConfirmAction;
use super::BookingGridApp;
use crate::services::booking::commit::{BookingDraft, CommitReport, PendingCommit};
use crate::services::overlap::ResolveError;
use crate::ui_egui::dialogs::booking_dialog::{render_booking_dialog, BookingDialogResult};

impl BookingGridApp {
    pub(super) fn handle_booking_dialog(&mut self, ctx: &Context) {
        let Some(state) = self.booking_dialog.as_mut() else {
            return;
        };

        match render_booking_dialog(ctx, state, &self.courts) {
            BookingDialogResult::None => {}
            BookingDialogResult::Cancelled => {
                if state.is_dirty() {
                    self.confirm_dialog.request(ConfirmAction::DiscardBooking);
                } else {
                    self.booking_dialog = None;
                }
            }
            BookingDialogResult::Save(draft) => {
                if self.pending_commit.is_none() {
                    self.save_booking(draft);
                }
            }
        }
    }

    /// Turn the saved form into a commit, asking first when existing
    /// bookings or blocks would change.
    fn save_booking(&mut self, draft: BookingDraft) {
        let Some(state) = self.booking_dialog.as_mut() else {
            return;
        };

        let bookings = match draft.bookings_for(&state.selection, self.current_date) {
            Ok(bookings) => bookings,
            Err(err) => {
                state.error_message = Some(err);
                return;
            }
        };

        let Some(day) = self
            .loader
            .data()
            .filter(|day| self.loader.current_key() == Some(&day.key))
        else {
            state.error_message = Some("Bookings for this date are still loading".to_string());
            return;
        };

        let pending = PendingCommit::prepare(&self.resolver, state.selection.clone(), bookings, day);
        if pending.needs_confirmation() {
            self.confirm_dialog.request(ConfirmAction::for_commit(&pending));
            self.pending_commit = Some(pending);
        } else {
            self.commit_booking(pending);
        }
    }

    pub(super) fn commit_booking(&mut self, pending: PendingCommit) {
        let Some(day) = self.loader.data() else {
            self.toast_manager.error("Bookings are no longer loaded, please retry");
            return;
        };
        let source = Arc::clone(self.loader.source());

        match pending.commit(&self.resolver, source.as_ref(), day) {
            Ok(report) => {
                self.toast_manager.success(commit_message(&report));
                self.booking_dialog = None;
                self.loader.reload();
            }
            Err(err) if err.downcast_ref::<ResolveError>().is_some() => {
                log::warn!("Discarding booking commit: {}", err);
                self.toast_manager.error(err.to_string());
                self.booking_dialog = None;
                self.loader.reload();
            }
            Err(err) => {
                log::error!("Failed to save booking: {:#}", err);
                let message = format!("Failed to save booking: {:#}", err);
                match self.booking_dialog.as_mut() {
                    Some(state) => state.error_message = Some(message),
                    None => self.toast_manager.error(message),
                }
                self.loader.reload();
            }
        }
    }
}

fn commit_message(report: &CommitReport) -> String {
    let created = report.created.len();
    let mut message = format!(
        "Saved {} booking{}",
        created,
        if created == 1 { "" } else { "s" }
    );
    let changed = report.bookings.trimmed
        + report.bookings.split
        + report.bookings.removed
        + report.blocks.trimmed
        + report.blocks.split
        + report.blocks.removed;
    if changed > 0 {
        message.push_str(&format!(", adjusted {} existing", changed));
    }
    message
}
