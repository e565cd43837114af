//! Booking creation dialog shown when a drag selection is committed.

use egui::{Color32, Context, RichText};

use crate::models::booking::{BookingKind, PaymentStatus};
use crate::models::court::Court;
use crate::models::selection::Selection;
use crate::services::booking::commit::BookingDraft;
use crate::utils::labels::selection_summary;

/// Result from the booking dialog
pub enum BookingDialogResult {
    /// Dialog is still open
    None,
    /// User closed the dialog without saving
    Cancelled,
    /// User saved the form
    Save(BookingDraft),
}

/// State for the booking dialog
pub struct BookingDialogState {
    pub selection: Selection,
    pub title: String,
    pub description: String,
    pub kind: BookingKind,
    pub price: String,
    pub payment_status: PaymentStatus,
    pub participants: Vec<String>,
    /// Name being typed into the participant field
    pub participant_input: String,
    pub error_message: Option<String>,
}

impl BookingDialogState {
    pub fn new(selection: Selection) -> Self {
        Self {
            selection,
            title: String::new(),
            description: String::new(),
            kind: BookingKind::Shift,
            price: String::new(),
            payment_status: PaymentStatus::Pending,
            participants: Vec::new(),
            participant_input: String::new(),
            error_message: None,
        }
    }

    /// Add the typed participant, ignoring blanks and duplicates.
    pub fn add_participant(&mut self) {
        let name = self.participant_input.trim().to_string();
        if !name.is_empty() && !self.participants.contains(&name) {
            self.participants.push(name);
        }
        self.participant_input.clear();
    }

    /// Whether anything was typed that cancelling would lose.
    pub fn is_dirty(&self) -> bool {
        !self.title.trim().is_empty()
            || !self.description.trim().is_empty()
            || !self.price.trim().is_empty()
            || !self.participants.is_empty()
            || !self.participant_input.trim().is_empty()
    }

    pub fn to_draft(&self) -> Result<BookingDraft, String> {
        if self.title.len() > 200 {
            return Err("Booking title is too long (max 200 characters)".to_string());
        }

        let price = match self.price.trim() {
            "" => None,
            raw => Some(
                raw.replace(',', ".")
                    .parse::<f64>()
                    .map_err(|_| format!("'{}' is not a valid price", raw))?,
            ),
        };
        if price.is_some_and(|p| !p.is_finite() || p < 0.0) {
            return Err("Booking price must be a non-negative amount".to_string());
        }

        let mut participants = self.participants.clone();
        let pending = self.participant_input.trim();
        if !pending.is_empty() && !participants.iter().any(|p| p == pending) {
            participants.push(pending.to_string());
        }

        Ok(BookingDraft {
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            price,
            payment_status: self.payment_status,
            participants,
            kind: self.kind,
        })
    }
}

/// Renders the booking dialog
pub fn render_booking_dialog(
    ctx: &Context,
    state: &mut BookingDialogState,
    courts: &[Court],
) -> BookingDialogResult {
    let mut result = BookingDialogResult::None;
    let mut open = true;

    egui::Window::new("New Booking")
        .open(&mut open)
        .collapsible(false)
        .resizable(false)
        .default_width(420.0)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            if let Some(ref error) = state.error_message {
                ui.colored_label(Color32::RED, RichText::new(error).strong());
                ui.add_space(8.0);
            }

            ui.label(RichText::new(selection_summary(&state.selection, courts)).strong());
            ui.add_space(8.0);

            egui::Grid::new("booking_form_grid")
                .num_columns(2)
                .spacing([10.0, 8.0])
                .show(ui, |ui| {
                    ui.label("Title:");
                    ui.text_edit_singleline(&mut state.title);
                    ui.end_row();

                    ui.label("Type:");
                    ui.horizontal(|ui| {
                        for kind in [BookingKind::Shift, BookingKind::Class] {
                            ui.radio_value(&mut state.kind, kind, kind.label());
                        }
                    });
                    ui.end_row();

                    ui.label("Price:");
                    ui.add(egui::TextEdit::singleline(&mut state.price).hint_text("0.00"));
                    ui.end_row();

                    ui.label("Payment:");
                    egui::ComboBox::from_id_source("booking_payment_status")
                        .selected_text(state.payment_status.label())
                        .show_ui(ui, |ui| {
                            for status in [PaymentStatus::Pending, PaymentStatus::Partial, PaymentStatus::Paid] {
                                ui.selectable_value(&mut state.payment_status, status, status.label());
                            }
                        });
                    ui.end_row();
                });

            ui.add_space(6.0);
            ui.label("Description:");
            ui.text_edit_multiline(&mut state.description);

            ui.add_space(6.0);
            ui.label("Participants:");
            let mut removed = None;
            for (index, name) in state.participants.iter().enumerate() {
                ui.horizontal(|ui| {
                    ui.label(name);
                    if ui.small_button("✕").clicked() {
                        removed = Some(index);
                    }
                });
            }
            if let Some(index) = removed {
                state.participants.remove(index);
            }
            ui.horizontal(|ui| {
                let input = ui.add(
                    egui::TextEdit::singleline(&mut state.participant_input).hint_text("Name"),
                );
                let submitted = input.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                if ui.button("Add").clicked() || submitted {
                    state.add_participant();
                }
            });

            ui.add_space(12.0);
            ui.separator();
            ui.horizontal(|ui| {
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("Save").clicked() {
                        match state.to_draft() {
                            Ok(draft) => result = BookingDialogResult::Save(draft),
                            Err(err) => state.error_message = Some(err),
                        }
                    }
                    if ui.button("Cancel").clicked() {
                        result = BookingDialogResult::Cancelled;
                    }
                });
            });
        });

    if !open {
        result = BookingDialogResult::Cancelled;
    }
    result
}
