// Integration tests for the booking grid: load a day, drag a selection,
// resolve overlaps and write the result back to the source.

mod fixtures;

use std::sync::Arc;
use std::time::Duration;

use court_grid::models::blocked_slot::BlockedSlot;
use court_grid::models::booking::BookingKind;
use court_grid::models::clock::TimeRange;
use court_grid::models::court::CourtId;
use court_grid::models::occupancy::Occupancy;
use court_grid::models::settings::{GridSettings, TrimPolicy};
use court_grid::models::time_slot::DayGrid;
use court_grid::services::booking::commit::{BookingDraft, PendingCommit};
use court_grid::services::booking::loader::{BookingLoader, LoadState};
use court_grid::services::booking::memory::InMemoryBookingSource;
use court_grid::services::booking::BookingSource;
use court_grid::services::business_hours::{BusinessHoursProvider, WeeklySchedule};
use court_grid::services::classifier::{SlotClassifier, SlotStatus};
use court_grid::services::overlap::OverlapResolver;
use court_grid::services::selector::{GridCell, GridGuard, GridSelector, PointerEvent, SelectorOutcome};
use court_grid::services::settings::SettingsService;
use fixtures::{booking, branch, clock, court_ids, dates};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

const TIMEOUT: Duration = Duration::from_secs(5);

fn seeded_source() -> Arc<InMemoryBookingSource> {
    let source = Arc::new(InMemoryBookingSource::new());
    source.create_booking(&branch(), booking("court-1", "14:00", "16:00")).unwrap();
    source.create_booking(&branch(), booking("court-2", "15:00", "15:30")).unwrap();
    source.create_booking(&branch(), booking("court-3", "09:00", "10:00")).unwrap();
    source
        .add_block(
            &branch(),
            dates::friday(),
            BlockedSlot::new(CourtId::new("court-4"), clock("12:00"), clock("13:00")),
        )
        .unwrap();
    source
}

fn day_grid(settings: &GridSettings) -> DayGrid {
    let schedule = WeeklySchedule::from_settings(settings);
    DayGrid::build(
        schedule.hours_for(dates::friday()),
        settings.closing_ceiling,
        settings.fallback_open,
    )
}

fn cell(court: &str, time: &str) -> GridCell {
    GridCell::at(CourtId::new(court), clock(time))
}

#[test]
fn test_drag_select_and_resolve_overlaps() {
    let settings = GridSettings::default();
    let source = seeded_source();
    let dyn_source: Arc<dyn BookingSource> = source.clone();

    let mut loader = BookingLoader::new(dyn_source);
    loader.request(dates::friday(), settings.branch_id());
    assert!(loader.wait(TIMEOUT));
    assert_eq!(loader.state(), &LoadState::Ready);
    let day = loader.data().unwrap().clone();

    let grid = day_grid(&settings);
    let classifier = SlotClassifier::new(&day.bookings, &day.blocked);
    let guard = GridGuard {
        grid: &grid,
        classifier: &classifier,
    };
    let mut selector = GridSelector::new(court_ids(), grid.selectable_window());

    // Booked and blocked cells cannot anchor a drag
    assert_eq!(
        selector.handle(PointerEvent::Down(cell("court-1", "14:30")), &guard),
        SelectorOutcome::Ignored
    );

    // Drag from court-2 at 16:45 up and left to court-1 at 15:00
    assert_eq!(
        selector.handle(PointerEvent::Down(cell("court-2", "16:45")), &guard),
        SelectorOutcome::Started
    );
    assert_eq!(
        selector.handle(PointerEvent::Enter(cell("court-1", "15:00")), &guard),
        SelectorOutcome::Updated
    );
    let SelectorOutcome::Committed(selection) = selector.handle(PointerEvent::Up, &guard) else {
        panic!("expected a committed selection");
    };
    assert_eq!(selection.range(), TimeRange::new(clock("15:00"), clock("17:00")));
    assert_eq!(selection.selections.len(), 2);

    let resolver = OverlapResolver::new(settings.trim_policy);
    let draft = BookingDraft {
        title: "Coaching block".to_string(),
        kind: BookingKind::Class,
        ..Default::default()
    };
    let new_bookings = draft.bookings_for(&selection, dates::friday()).unwrap();
    let pending = PendingCommit::prepare(&resolver, selection, new_bookings, &day);
    assert!(pending.needs_confirmation());
    assert_eq!(
        pending.describe(),
        "2 existing bookings will be modified (1 removed entirely)."
    );

    let report = pending.commit(&resolver, source.as_ref(), &day).unwrap();
    assert_eq!(report.created.len(), 2);

    loader.reload();
    assert!(loader.wait(TIMEOUT));
    let reloaded = loader.data().unwrap();
    let classifier = SlotClassifier::new(&reloaded.bookings, &reloaded.blocked);

    match classifier.classify(&CourtId::new("court-1"), clock("14:45")) {
        SlotStatus::Confirmed { booking, placement } => {
            assert_eq!(booking.range(), TimeRange::new(clock("14:00"), clock("15:00")));
            assert!(placement.has_adjacent_bottom);
        }
        other => panic!("expected trimmed booking, got {:?}", other),
    }
    match classifier.classify(&CourtId::new("court-2"), clock("15:00")) {
        SlotStatus::Confirmed { booking, placement } => {
            assert_eq!(booking.title.as_deref(), Some("Coaching block"));
            assert!(placement.is_start);
        }
        other => panic!("expected new class, got {:?}", other),
    }
    assert!(classifier.classify(&CourtId::new("court-3"), clock("10:00")).is_free());
}

#[test]
fn test_single_click_books_one_sub_slot() {
    let settings = GridSettings::default();
    let grid = day_grid(&settings);
    let classifier = SlotClassifier::new(&[], &[]);
    let guard = GridGuard {
        grid: &grid,
        classifier: &classifier,
    };
    let mut selector = GridSelector::new(court_ids(), grid.selectable_window());

    selector.handle(PointerEvent::Down(cell("court-3", "20:15")), &guard);
    let SelectorOutcome::Committed(selection) = selector.handle(PointerEvent::Up, &guard) else {
        panic!("expected a committed selection");
    };
    assert_eq!(selection.duration_minutes(), 15);
    assert_eq!(selection.range(), TimeRange::new(clock("20:15"), clock("20:30")));
}

#[test]
fn test_split_policy_from_settings_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("court-grid.toml");
    std::fs::write(
        &path,
        r#"
trim_policy = "split"
closing_ceiling = "22:00"

[branch]
id = "main"
name = "Main club"
"#,
    )
    .unwrap();

    let settings = SettingsService::new(&path).load().unwrap();
    assert_eq!(settings.trim_policy, TrimPolicy::Split);
    assert_eq!(settings.closing_ceiling, clock("22:00"));

    let source = Arc::new(InMemoryBookingSource::new());
    source.create_booking(&branch(), booking("court-1", "14:00", "17:00")).unwrap();
    let dyn_source: Arc<dyn BookingSource> = source.clone();
    let mut loader = BookingLoader::new(dyn_source);
    loader.request(dates::friday(), settings.branch_id());
    assert!(loader.wait(TIMEOUT));
    let day = loader.data().unwrap();

    let grid = day_grid(&settings);
    assert_eq!(grid.ceiling(), clock("22:00"));
    let classifier = SlotClassifier::new(&day.bookings, &day.blocked);
    let guard = GridGuard {
        grid: &grid,
        classifier: &classifier,
    };
    let mut selector = GridSelector::new(court_ids(), grid.selectable_window());
    selector.handle(PointerEvent::Down(cell("court-2", "15:00")), &guard);
    selector.handle(PointerEvent::Enter(cell("court-1", "15:15")), &guard);
    let SelectorOutcome::Committed(selection) = selector.handle(PointerEvent::Up, &guard) else {
        panic!("expected a committed selection");
    };

    let resolver = OverlapResolver::new(settings.trim_policy);
    let new_bookings = BookingDraft::default()
        .bookings_for(&selection, dates::friday())
        .unwrap();
    let report = PendingCommit::prepare(&resolver, selection, new_bookings, day)
        .commit(&resolver, source.as_ref(), day)
        .unwrap();
    assert_eq!(report.bookings.split, 1);

    let ranges: Vec<TimeRange> = source
        .bookings_by_date(dates::friday(), &branch())
        .unwrap()
        .iter()
        .filter(|b| b.court_id == CourtId::new("court-1"))
        .map(|b| TimeRange::new(b.start, b.end))
        .collect();
    assert_eq!(
        ranges,
        vec![
            TimeRange::new(clock("14:00"), clock("15:00")),
            TimeRange::new(clock("15:00"), clock("15:30")),
            TimeRange::new(clock("15:30"), clock("17:00")),
        ]
    );
}

#[test]
fn test_closed_day_rejects_every_drag() {
    let mut settings = GridSettings::default();
    settings.closed_dates.push(dates::friday());
    let grid = day_grid(&settings);
    assert!(grid.business_hours().is_none());
    assert!(grid.selectable_window().is_none());

    let classifier = SlotClassifier::new(&[], &[]);
    let guard = GridGuard {
        grid: &grid,
        classifier: &classifier,
    };
    let mut selector = GridSelector::new(court_ids(), grid.selectable_window());
    assert_eq!(
        selector.handle(PointerEvent::Down(cell("court-1", "10:00")), &guard),
        SelectorOutcome::Ignored
    );
}

#[test]
fn test_leaving_window_discards_drag() {
    let settings = GridSettings::default();
    let grid = day_grid(&settings);
    let classifier = SlotClassifier::new(&[], &[]);
    let guard = GridGuard {
        grid: &grid,
        classifier: &classifier,
    };
    let mut selector = GridSelector::new(court_ids(), grid.selectable_window());

    selector.handle(PointerEvent::Down(cell("court-1", "10:00")), &guard);
    selector.handle(PointerEvent::Enter(cell("court-3", "11:00")), &guard);
    assert_eq!(
        selector.handle(PointerEvent::LeaveWindow, &guard),
        SelectorOutcome::Cancelled
    );
    assert_eq!(selector.handle(PointerEvent::Up, &guard), SelectorOutcome::Ignored);
    assert!(selector.selection().is_none());
}
