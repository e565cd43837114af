//! Confirmation dialog for actions that change existing bookings.

use egui::{Context, RichText};

use super::BookingGridApp;
use crate::services::booking::commit::PendingCommit;

/// Types of confirmation dialogs
#[derive(Debug, Clone)]
pub enum ConfirmAction {
    /// Save a selection that trims or removes overlapping records
    ResolveOverlaps { summary: String, removed: usize },
    /// Close the booking dialog and drop what was typed
    DiscardBooking,
}

impl ConfirmAction {
    pub fn for_commit(pending: &PendingCommit) -> Self {
        ConfirmAction::ResolveOverlaps {
            summary: pending.describe(),
            removed: pending.booking_plan().removed_count() + pending.block_plan().removed_count(),
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ConfirmAction::ResolveOverlaps { .. } => "Overlapping Bookings",
            ConfirmAction::DiscardBooking => "Discard Booking",
        }
    }

    pub fn message(&self) -> String {
        match self {
            ConfirmAction::ResolveOverlaps { summary, .. } => {
                format!("{}\n\nSave the new booking anyway?", summary)
            }
            ConfirmAction::DiscardBooking => {
                "The booking has not been saved.\n\nDiscard it?".to_string()
            }
        }
    }

    pub fn confirm_text(&self) -> &'static str {
        match self {
            ConfirmAction::ResolveOverlaps { .. } => "Save",
            ConfirmAction::DiscardBooking => "Discard",
        }
    }

    /// Destructive actions show the confirm button in red
    pub fn is_destructive(&self) -> bool {
        match self {
            ConfirmAction::ResolveOverlaps { removed, .. } => *removed > 0,
            ConfirmAction::DiscardBooking => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmResult {
    Confirmed,
    Cancelled,
    /// Dialog is still open
    Pending,
}

#[derive(Debug, Default)]
pub struct ConfirmDialogState {
    pending_action: Option<ConfirmAction>,
}

impl ConfirmDialogState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request(&mut self, action: ConfirmAction) {
        self.pending_action = Some(action);
    }

    pub fn is_open(&self) -> bool {
        self.pending_action.is_some()
    }

    pub fn cancel(&mut self) {
        self.pending_action = None;
    }

    /// Render the dialog; the action is handed back once confirmed.
    pub fn render(&mut self, ctx: &Context) -> (ConfirmResult, Option<ConfirmAction>) {
        let Some(action) = &self.pending_action else {
            return (ConfirmResult::Pending, None);
        };

        let mut result = ConfirmResult::Pending;

        egui::Window::new(action.title())
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.set_min_width(300.0);
                ui.set_max_width(400.0);
                ui.add_space(10.0);

                if action.is_destructive() {
                    ui.horizontal(|ui| {
                        ui.label(RichText::new("⚠").size(24.0).color(egui::Color32::from_rgb(220, 150, 50)));
                        ui.label(action.message());
                    });
                } else {
                    ui.label(action.message());
                }

                ui.add_space(15.0);
                ui.separator();
                ui.add_space(10.0);

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let confirm_button = if action.is_destructive() {
                        egui::Button::new(RichText::new(action.confirm_text()).color(egui::Color32::WHITE))
                            .fill(egui::Color32::from_rgb(180, 60, 60))
                    } else {
                        egui::Button::new(action.confirm_text())
                    };
                    if ui.add(confirm_button).clicked() {
                        result = ConfirmResult::Confirmed;
                    }
                    ui.add_space(10.0);
                    if ui.button("Cancel").clicked() {
                        result = ConfirmResult::Cancelled;
                    }
                });
                ui.add_space(5.0);
            });

        if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            result = ConfirmResult::Cancelled;
        }

        match result {
            ConfirmResult::Pending => (result, None),
            ConfirmResult::Confirmed => (result, self.pending_action.take()),
            ConfirmResult::Cancelled => {
                self.pending_action = None;
                (result, None)
            }
        }
    }
}

impl BookingGridApp {
    /// Render the confirmation dialog and carry out confirmed actions
    pub(super) fn handle_confirm_dialog(&mut self, ctx: &Context) {
        let (result, action) = self.confirm_dialog.render(ctx);
        match (result, action) {
            (ConfirmResult::Confirmed, Some(ConfirmAction::ResolveOverlaps { .. })) => {
                if let Some(pending) = self.pending_commit.take() {
                    self.commit_booking(pending);
                }
            }
            (ConfirmResult::Confirmed, Some(ConfirmAction::DiscardBooking)) => {
                log::info!("Booking dialog discarded");
                self.booking_dialog = None;
            }
            (ConfirmResult::Cancelled, _) => {
                if self.pending_commit.take().is_some() {
                    log::info!("Overlap resolution cancelled; booking dialog stays open");
                }
            }
            _ => {}
        }
    }
}
