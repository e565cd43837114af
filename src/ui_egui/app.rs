mod booking;
mod confirm;
mod grid;
mod lifecycle;
mod navigation;
mod toast;

use std::time::Duration;

use chrono::NaiveDate;

use self::confirm::ConfirmDialogState;
use self::toast::ToastManager;
use crate::models::court::Court;
use crate::models::settings::GridSettings;
use crate::models::time_slot::DayGrid;
use crate::services::booking::commit::PendingCommit;
use crate::services::booking::loader::BookingLoader;
use crate::services::business_hours::WeeklySchedule;
use crate::services::overlap::OverlapResolver;
use crate::services::selector::GridSelector;
use crate::ui_egui::dialogs::booking_dialog::BookingDialogState;
use crate::ui_egui::theme::GridTheme;

/// How often to check the loader while a fetch is in flight
const LOAD_POLL_INTERVAL: Duration = Duration::from_millis(100);

pub struct BookingGridApp {
    settings: GridSettings,
    /// Courts in display order
    courts: Vec<Court>,
    schedule: WeeklySchedule,
    current_date: NaiveDate,
    /// Rows for `current_date`; rebuilt on every date change
    grid: DayGrid,
    loader: BookingLoader,
    selector: GridSelector,
    resolver: OverlapResolver,
    theme: GridTheme,
    booking_dialog: Option<BookingDialogState>,
    /// Commit waiting for the overlap confirmation
    pending_commit: Option<PendingCommit>,
    confirm_dialog: ConfirmDialogState,
    toast_manager: ToastManager,
}

impl eframe::App for BookingGridApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.loader.poll() {
            ctx.request_repaint();
        }
        if self.loader.is_loading() {
            ctx.request_repaint_after(LOAD_POLL_INTERVAL);
        }

        if self.selector.is_dragging() && ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            self.selector.cancel();
        }

        egui::TopBottomPanel::top("date_navigation").show(ctx, |ui| {
            self.render_toolbar(ui);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.render_day(ui);
        });

        self.handle_booking_dialog(ctx);
        self.handle_confirm_dialog(ctx);
        self.toast_manager.render(ctx, self.theme.is_dark);
    }
}

impl BookingGridApp {
    fn is_modal_open(&self) -> bool {
        self.booking_dialog.is_some() || self.confirm_dialog.is_open()
    }
}
