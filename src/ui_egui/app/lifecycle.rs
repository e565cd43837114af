use std::sync::Arc;

use chrono::{Local, NaiveDate};

use super::confirm::ConfirmDialogState;
use super::toast::ToastManager;
use super::BookingGridApp;
use crate::models::court::visible_courts;
use crate::models::settings::GridSettings;
use crate::models::time_slot::DayGrid;
use crate::services::booking::loader::BookingLoader;
use crate::services::booking::BookingSource;
use crate::services::business_hours::WeeklySchedule;
use crate::services::overlap::OverlapResolver;
use crate::services::selector::GridSelector;
use crate::ui_egui::theme::GridTheme;

impl BookingGridApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        settings: GridSettings,
        source: Arc<dyn BookingSource>,
    ) -> Self {
        let app = Self::with_settings(settings, source, Local::now().date_naive());
        app.theme.apply_to_context(&cc.egui_ctx);
        app
    }

    /// Build the app for `date` and start loading its bookings.
    pub fn with_settings(
        settings: GridSettings,
        source: Arc<dyn BookingSource>,
        date: NaiveDate,
    ) -> Self {
        let courts = visible_courts(&settings.courts);
        let schedule = WeeklySchedule::from_settings(&settings);
        let resolver = OverlapResolver::new(settings.trim_policy);
        let theme = GridTheme::for_mode(settings.dark_mode);
        log::info!(
            "Booking grid for {} with {} courts, trim policy {:?}",
            settings
                .branch
                .as_ref()
                .map(|branch| branch.name.as_str())
                .unwrap_or("no branch"),
            courts.len(),
            settings.trim_policy
        );

        let court_ids = courts.iter().map(|court| court.id.clone()).collect();
        let grid = DayGrid::build(None, settings.closing_ceiling, settings.fallback_open);

        let mut app = Self {
            courts,
            schedule,
            current_date: date,
            grid,
            loader: BookingLoader::new(source),
            selector: GridSelector::new(court_ids, None),
            resolver,
            theme,
            booking_dialog: None,
            pending_commit: None,
            confirm_dialog: ConfirmDialogState::new(),
            toast_manager: ToastManager::new(),
            settings,
        };
        app.set_date(date);
        app
    }
}
