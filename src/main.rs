// Court booking grid
// Main entry point

use std::sync::Arc;

use anyhow::Result;
use chrono::{Local, NaiveDate};

use court_grid::models::blocked_slot::BlockedSlot;
use court_grid::models::booking::{Booking, BookingKind, PaymentStatus};
use court_grid::models::clock::ClockTime;
use court_grid::models::settings::GridSettings;
use court_grid::services::booking::memory::InMemoryBookingSource;
use court_grid::services::booking::BookingSource;
use court_grid::services::settings::SettingsService;
use court_grid::ui_egui::BookingGridApp;

fn main() -> eframe::Result<()> {
    env_logger::init();

    log::info!("Starting court booking grid");

    let settings = load_settings();
    let source = Arc::new(InMemoryBookingSource::new());
    if let Err(err) = seed_sample_day(&source, &settings, Local::now().date_naive()) {
        log::warn!("Could not add sample bookings: {:#}", err);
    }
    let source: Arc<dyn BookingSource> = source;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Court Grid")
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([800.0, 600.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Court Grid",
        options,
        Box::new(move |cc| Ok(Box::new(BookingGridApp::new(cc, settings, source)))),
    )
}

fn load_settings() -> GridSettings {
    match SettingsService::from_environment().and_then(|service| service.load()) {
        Ok(settings) => settings,
        Err(err) => {
            log::error!("Failed to load settings, using defaults: {:#}", err);
            GridSettings::default()
        }
    }
}

/// Put a few bookings and a maintenance block on `date` so the in-memory
/// grid has something to show.
fn seed_sample_day(source: &InMemoryBookingSource, settings: &GridSettings, date: NaiveDate) -> Result<()> {
    let Some(branch_id) = settings.branch_id() else {
        return Ok(());
    };
    let mut courts = settings.courts.iter().filter(|court| court.active);

    if let Some(court) = courts.next() {
        for (start, end, title) in [((9, 0), (10, 30), "Morning rental"), ((10, 30), (12, 0), "Doubles")] {
            let booking = Booking::builder()
                .court(court.id.clone())
                .date(date)
                .start(ClockTime::hm(start.0, start.1))
                .end(ClockTime::hm(end.0, end.1))
                .title(title)
                .payment_status(PaymentStatus::Paid)
                .build()
                .map_err(anyhow::Error::msg)?;
            source.create_booking(branch_id, booking)?;
        }
    }

    if let Some(court) = courts.next() {
        let class = Booking::builder()
            .court(court.id.clone())
            .date(date)
            .start(ClockTime::hm(18, 0))
            .end(ClockTime::hm(19, 30))
            .title("Junior clinic")
            .kind(BookingKind::Class)
            .participant("Ana")
            .participant("Luis")
            .build()
            .map_err(anyhow::Error::msg)?;
        source.create_booking(branch_id, class)?;

        source.add_block(
            branch_id,
            date,
            BlockedSlot::new(court.id.clone(), ClockTime::hm(13, 0), ClockTime::hm(14, 0))
                .with_reason("Net repair"),
        )?;
    }

    Ok(())
}
