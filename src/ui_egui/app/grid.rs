use egui::{Color32, RichText};

use super::BookingGridApp;
use crate::services::booking::loader::{DayBookings, LoadState};
use crate::services::classifier::SlotClassifier;
use crate::services::selector::{GridGuard, PointerEvent, SelectorOutcome};
use crate::ui_egui::dialogs::booking_dialog::BookingDialogState;
use crate::ui_egui::views::booking_grid::BookingGridView;
use crate::ui_egui::views::GridPalette;
use crate::utils::labels::date_heading;

impl BookingGridApp {
    pub(super) fn render_toolbar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            if ui.button("◀").on_hover_text("Previous day").clicked() {
                self.navigate_previous();
            }

            let mut date = self.current_date;
            ui.add(egui_extras::DatePickerButton::new(&mut date).id_source("grid_date_picker"));
            if date != self.current_date {
                self.set_date(date);
            }

            if ui.button("▶").on_hover_text("Next day").clicked() {
                self.navigate_next();
            }
            if ui.button("Today").clicked() {
                self.jump_to_today();
            }

            ui.separator();
            ui.heading(date_heading(self.current_date));

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if let Some(branch) = &self.settings.branch {
                    ui.label(RichText::new(&branch.name).strong());
                }
                if self.loader.is_loading() {
                    ui.spinner();
                }
            });
        });
    }

    pub(super) fn render_day(&mut self, ui: &mut egui::Ui) {
        match self.loader.state() {
            LoadState::MissingBranch => {
                ui.centered_and_justified(|ui| {
                    ui.label("No branch selected. Choose a branch in the settings file to see its courts.");
                });
                return;
            }
            LoadState::Failed(message) => {
                let message = message.clone();
                ui.horizontal(|ui| {
                    ui.colored_label(Color32::RED, format!("Could not load bookings: {}", message));
                    if ui.button("Retry").clicked() {
                        self.loader.reload();
                    }
                });
                return;
            }
            LoadState::Idle | LoadState::Loading | LoadState::Ready => {}
        }

        if self.courts.is_empty() {
            ui.label("No active courts are configured for this branch.");
            return;
        }

        let Some(day) = self.visible_day() else {
            ui.centered_and_justified(|ui| {
                ui.spinner();
                ui.label("Loading bookings…");
            });
            return;
        };

        if self.grid.business_hours().is_none() {
            ui.label(RichText::new("Closed on this date").italics());
        }

        let classifier = SlotClassifier::new(&day.bookings, &day.blocked);
        let palette = GridPalette::from_theme(&self.theme);
        let view = BookingGridView {
            grid: &self.grid,
            courts: &self.courts,
            classifier: &classifier,
            selection: self.selector.selection(),
            dragging: self.selector.is_dragging(),
        };
        let events = egui::ScrollArea::both()
            .drag_to_scroll(false)
            .auto_shrink([false, false])
            .show(ui, |ui| view.show(ui, &palette))
            .inner;

        if !self.is_modal_open() {
            self.handle_pointer_events(events);
        }
    }

    /// Day snapshot matching the date on screen. A response for another
    /// date is never shown while the current one is still loading.
    fn visible_day(&self) -> Option<&DayBookings> {
        let day = self.loader.data()?;
        (self.loader.current_key() == Some(&day.key)).then_some(day)
    }

    /// Feed pointer events to the selector and react to its outcomes.
    pub(super) fn handle_pointer_events(&mut self, events: Vec<PointerEvent>) {
        let Some(day) = self
            .loader
            .data()
            .filter(|day| self.loader.current_key() == Some(&day.key))
        else {
            return;
        };
        let classifier = SlotClassifier::new(&day.bookings, &day.blocked);
        let guard = GridGuard {
            grid: &self.grid,
            classifier: &classifier,
        };

        for event in events {
            match self.selector.handle(event, &guard) {
                SelectorOutcome::Started => {
                    // A new drag supersedes any half-filled booking form
                    self.booking_dialog = None;
                    self.pending_commit = None;
                }
                SelectorOutcome::Committed(selection) => {
                    self.booking_dialog = Some(BookingDialogState::new(selection));
                }
                SelectorOutcome::Cancelled => {
                    log::debug!("Drag abandoned outside the window");
                }
                SelectorOutcome::Updated | SelectorOutcome::Ignored => {}
            }
        }
    }
}
