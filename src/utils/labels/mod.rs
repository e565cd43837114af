// Label helpers
// Human-readable text for durations, dates and selections

use chrono::NaiveDate;

use crate::models::court::Court;
use crate::models::selection::Selection;

/// "45 min", "1 h", "1 h 30 min".
pub fn duration_label(minutes: u16) -> String {
    let hours = minutes / 60;
    let rest = minutes % 60;
    match (hours, rest) {
        (0, m) => format!("{} min", m),
        (h, 0) => format!("{} h", h),
        (h, m) => format!("{} h {} min", h, m),
    }
}

pub fn date_heading(date: NaiveDate) -> String {
    date.format("%A, %B %-d, %Y").to_string()
}

/// Court names covered by a selection, in display order.
///
/// Ids without a matching court fall back to the raw id.
pub fn court_names(selection: &Selection, courts: &[Court]) -> String {
    selection
        .court_ids()
        .map(|id| {
            courts
                .iter()
                .find(|court| &court.id == id)
                .map(|court| court.name.clone())
                .unwrap_or_else(|| id.to_string())
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// One-line summary shown at the top of the booking dialog.
pub fn selection_summary(selection: &Selection, courts: &[Court]) -> String {
    format!(
        "{} · {} ({})",
        court_names(selection, courts),
        selection.range(),
        duration_label(selection.duration_minutes())
    )
}
