//! Overlap resolution for newly confirmed selections.
//!
//! When a selection is saved as a booking that supersedes what is already on
//! the grid (typically a class), every existing booking or block it overlaps
//! on the selected courts is shortened or removed so that no two intervals
//! on a court overlap afterwards.
//!
//! Resolution happens in two steps. `plan` is pure and lets the caller show
//! a confirmation prompt; `apply` mutates the list, but only if it still
//! looks exactly like the snapshot the plan was computed from.

use std::collections::HashMap;

use thiserror::Error;

use crate::models::clock::TimeRange;
use crate::models::court::CourtId;
use crate::models::occupancy::Occupancy;
use crate::models::selection::Selection;
use crate::models::settings::TrimPolicy;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("bookings changed since the overlap check, please retry")]
    StaleSnapshot,
}

/// What happens to one overlapping record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Adjustment {
    /// Record keeps its start; its end moves back to the selection start
    TrimTail { range: TimeRange },
    /// Record keeps its end; its start moves forward to the selection end
    TrimHead { range: TimeRange },
    /// Record is cut around the selection into two fragments
    Split { head: TimeRange, tail: TimeRange },
    /// Record is entirely covered by the selection
    Remove,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedAdjustment {
    pub index: usize,
    pub court_id: CourtId,
    pub original: TimeRange,
    pub adjustment: Adjustment,
}

/// Counts reported after a plan is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResolutionSummary {
    pub trimmed: usize,
    pub split: usize,
    pub removed: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionPlan {
    adjustments: Vec<PlannedAdjustment>,
    snapshot_len: usize,
}

impl ResolutionPlan {
    pub fn adjustments(&self) -> &[PlannedAdjustment] {
        &self.adjustments
    }

    pub fn is_empty(&self) -> bool {
        self.adjustments.is_empty()
    }

    /// Number of existing records the plan modifies (including removals).
    pub fn affected_count(&self) -> usize {
        self.adjustments.len()
    }

    pub fn removed_count(&self) -> usize {
        self.adjustments
            .iter()
            .filter(|planned| planned.adjustment == Adjustment::Remove)
            .count()
    }

    /// Text for the confirmation prompt shown before applying.
    pub fn describe(&self) -> String {
        let affected = self.affected_count();
        if affected == 0 {
            return "No existing bookings overlap this selection.".to_string();
        }
        let removed = self.removed_count();
        let mut message = format!(
            "{} existing booking{} will be modified",
            affected,
            if affected == 1 { "" } else { "s" }
        );
        if removed > 0 {
            message.push_str(&format!(
                " ({} removed entirely)",
                removed
            ));
        }
        message.push('.');
        message
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct OverlapResolver {
    policy: TrimPolicy,
}

impl OverlapResolver {
    pub fn new(policy: TrimPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> TrimPolicy {
        self.policy
    }

    /// Work out how `items` must change so none overlaps `selection`.
    ///
    /// Only records on courts covered by the selection are considered. With
    /// `TrimPolicy::SingleEdge` a record that starts before the selection
    /// loses everything from the selection start onwards, even when it
    /// extends past the selection end.
    pub fn plan<T: Occupancy>(&self, selection: &Selection, items: &[T]) -> ResolutionPlan {
        let mut adjustments = Vec::new();

        for (index, item) in items.iter().enumerate() {
            let Some(target) = selection.for_court(item.court_id()) else {
                continue;
            };
            let original = item.range();
            if let Some(adjustment) = self.adjust(original, target.range()) {
                adjustments.push(PlannedAdjustment {
                    index,
                    court_id: item.court_id().clone(),
                    original,
                    adjustment,
                });
            }
        }

        ResolutionPlan {
            adjustments,
            snapshot_len: items.len(),
        }
    }

    /// Apply a plan computed by `plan` against the same list.
    ///
    /// Fails with `ResolveError::StaleSnapshot`, leaving `items` untouched,
    /// when the list no longer matches what the plan saw.
    pub fn apply<T: Occupancy + Clone>(
        &self,
        plan: &ResolutionPlan,
        items: &mut Vec<T>,
    ) -> Result<ResolutionSummary, ResolveError> {
        if items.len() != plan.snapshot_len {
            log::warn!(
                "Overlap plan expected {} records, found {}",
                plan.snapshot_len,
                items.len()
            );
            return Err(ResolveError::StaleSnapshot);
        }
        for planned in &plan.adjustments {
            let current = items.get(planned.index).ok_or(ResolveError::StaleSnapshot)?;
            if current.court_id() != &planned.court_id || current.range() != planned.original {
                log::warn!(
                    "Overlap plan is stale: record {} on {} changed",
                    planned.index,
                    planned.court_id
                );
                return Err(ResolveError::StaleSnapshot);
            }
        }

        let by_index: HashMap<usize, Adjustment> = plan
            .adjustments
            .iter()
            .map(|planned| (planned.index, planned.adjustment))
            .collect();

        let mut summary = ResolutionSummary::default();
        let mut fragments = Vec::new();
        let mut resolved = Vec::with_capacity(items.len());

        for (index, mut item) in items.drain(..).enumerate() {
            match by_index.get(&index) {
                None => resolved.push(item),
                Some(Adjustment::TrimTail { range }) | Some(Adjustment::TrimHead { range }) => {
                    item.set_range(*range);
                    summary.trimmed += 1;
                    resolved.push(item);
                }
                Some(Adjustment::Split { head, tail }) => {
                    fragments.push(item.fragment(*tail));
                    item.set_range(*head);
                    summary.split += 1;
                    resolved.push(item);
                }
                Some(Adjustment::Remove) => summary.removed += 1,
            }
        }
        resolved.extend(fragments);
        *items = resolved;

        log::info!(
            "Resolved overlaps: {} trimmed, {} split, {} removed",
            summary.trimmed,
            summary.split,
            summary.removed
        );
        Ok(summary)
    }

    fn adjust(&self, existing: TimeRange, selection: TimeRange) -> Option<Adjustment> {
        if existing.is_empty() || !existing.overlaps(&selection) {
            return None;
        }

        if existing.start < selection.start {
            if self.policy == TrimPolicy::Split && existing.end > selection.end {
                return Some(Adjustment::Split {
                    head: TimeRange::new(existing.start, selection.start),
                    tail: TimeRange::new(selection.end, existing.end),
                });
            }
            return Some(Adjustment::TrimTail {
                range: TimeRange::new(existing.start, selection.start),
            });
        }

        let remaining = TimeRange::new(selection.end, existing.end);
        if remaining.is_empty() {
            Some(Adjustment::Remove)
        } else {
            Some(Adjustment::TrimHead { range: remaining })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::blocked_slot::BlockedSlot;
    use crate::models::booking::{Booking, BookingId};
    use crate::models::clock::t;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 14).unwrap()
    }

    fn booking(court: &str, start: &str, end: &str) -> Booking {
        Booking::new(CourtId::new(court), date(), t(start), t(end)).unwrap()
    }

    fn selection(courts: &[&str], start: &str, end: &str) -> Selection {
        let ids: Vec<CourtId> = courts.iter().map(|c| CourtId::new(*c)).collect();
        Selection::rectangle(&ids, TimeRange::new(t(start), t(end))).unwrap()
    }

    fn ranges(items: &[Booking]) -> Vec<String> {
        items.iter().map(|b| b.range().to_string()).collect()
    }

    #[test]
    fn test_selection_inside_booking_trims_tail() {
        let resolver = OverlapResolver::default();
        let mut bookings = vec![booking("c1", "14:00", "16:00")];
        let plan = resolver.plan(&selection(&["c1"], "15:00", "15:30"), &bookings);

        assert_eq!(plan.affected_count(), 1);
        resolver.apply(&plan, &mut bookings).unwrap();
        assert_eq!(ranges(&bookings), vec!["14:00 - 15:00"]);
    }

    #[test]
    fn test_booking_inside_selection_is_removed() {
        let resolver = OverlapResolver::default();
        let mut bookings = vec![booking("c1", "14:00", "15:00")];
        let plan = resolver.plan(&selection(&["c1"], "13:00", "16:00"), &bookings);

        assert_eq!(plan.removed_count(), 1);
        let summary = resolver.apply(&plan, &mut bookings).unwrap();
        assert_eq!(summary.removed, 1);
        assert!(bookings.is_empty());
    }

    #[test_case("09:00", "10:00", "09:30", "10:30", "09:00 - 09:30"; "overlap at the end trims the tail")]
    #[test_case("10:00", "11:00", "09:30", "10:30", "10:30 - 11:00"; "overlap at the start trims the head")]
    #[test_case("10:00", "11:00", "10:00", "10:30", "10:30 - 11:00"; "shared start trims the head")]
    #[test_case("10:00", "11:00", "10:30", "11:00", "10:00 - 10:30"; "shared end trims the tail")]
    fn test_single_edge_cases(b_start: &str, b_end: &str, s_start: &str, s_end: &str, expected: &str) {
        let resolver = OverlapResolver::default();
        let mut bookings = vec![booking("c1", b_start, b_end)];
        let plan = resolver.plan(&selection(&["c1"], s_start, s_end), &bookings);
        resolver.apply(&plan, &mut bookings).unwrap();
        assert_eq!(ranges(&bookings), vec![expected.to_string()]);
    }

    #[test]
    fn test_touching_and_other_court_bookings_are_kept() {
        let resolver = OverlapResolver::default();
        let mut bookings = vec![
            booking("c1", "09:00", "10:00"),
            booking("c1", "11:00", "12:00"),
            booking("c2", "10:00", "11:00"),
        ];
        let before = bookings.clone();
        let plan = resolver.plan(&selection(&["c1"], "10:00", "11:00"), &bookings);

        assert!(plan.is_empty());
        assert_eq!(plan.describe(), "No existing bookings overlap this selection.");
        resolver.apply(&plan, &mut bookings).unwrap();
        assert_eq!(bookings, before);
    }

    #[test]
    fn test_multi_court_selection() {
        let resolver = OverlapResolver::default();
        let mut bookings = vec![
            booking("c1", "10:00", "12:00"),
            booking("c2", "11:00", "11:30"),
            booking("c3", "10:00", "12:00"),
        ];
        let plan = resolver.plan(&selection(&["c1", "c2"], "11:00", "13:00"), &bookings);

        assert_eq!(plan.affected_count(), 2);
        assert_eq!(
            plan.describe(),
            "2 existing bookings will be modified (1 removed entirely)."
        );
        resolver.apply(&plan, &mut bookings).unwrap();
        assert_eq!(ranges(&bookings), vec!["10:00 - 11:00", "10:00 - 12:00"]);
    }

    #[test]
    fn test_split_policy_leaves_two_fragments() {
        let resolver = OverlapResolver::new(TrimPolicy::Split);
        let mut original = booking("c1", "14:00", "16:00");
        original.id = Some(BookingId::new("bk-1"));
        let mut bookings = vec![original];

        let plan = resolver.plan(&selection(&["c1"], "15:00", "15:30"), &bookings);
        assert_eq!(
            plan.adjustments()[0].adjustment,
            Adjustment::Split {
                head: TimeRange::new(t("14:00"), t("15:00")),
                tail: TimeRange::new(t("15:30"), t("16:00")),
            }
        );

        let summary = resolver.apply(&plan, &mut bookings).unwrap();
        assert_eq!(summary.split, 1);
        assert_eq!(ranges(&bookings), vec!["14:00 - 15:00", "15:30 - 16:00"]);
        assert_eq!(bookings[0].id, Some(BookingId::new("bk-1")));
        assert!(bookings[1].id.is_none());
    }

    #[test]
    fn test_split_policy_still_trims_single_edge_overlaps() {
        let resolver = OverlapResolver::new(TrimPolicy::Split);
        let mut bookings = vec![booking("c1", "14:00", "15:15")];
        let plan = resolver.plan(&selection(&["c1"], "15:00", "15:30"), &bookings);
        resolver.apply(&plan, &mut bookings).unwrap();
        assert_eq!(ranges(&bookings), vec!["14:00 - 15:00"]);
    }

    #[test]
    fn test_blocked_slots_are_resolved_too() {
        let resolver = OverlapResolver::default();
        let mut blocks = vec![BlockedSlot::new(CourtId::new("c1"), t("08:00"), t("09:00"))];
        let plan = resolver.plan(&selection(&["c1"], "08:30", "10:00"), &blocks);
        resolver.apply(&plan, &mut blocks).unwrap();
        assert_eq!(blocks[0].range(), TimeRange::new(t("08:00"), t("08:30")));
    }

    #[test]
    fn test_stale_plan_is_rejected() {
        let resolver = OverlapResolver::default();
        let mut bookings = vec![booking("c1", "14:00", "16:00")];
        let plan = resolver.plan(&selection(&["c1"], "15:00", "15:30"), &bookings);

        bookings[0].end = t("17:00");
        let untouched = bookings.clone();
        assert_eq!(
            resolver.apply(&plan, &mut bookings),
            Err(ResolveError::StaleSnapshot)
        );
        assert_eq!(bookings, untouched);

        bookings.push(booking("c2", "09:00", "10:00"));
        assert_eq!(
            resolver.apply(&plan, &mut bookings),
            Err(ResolveError::StaleSnapshot)
        );
    }

    #[test]
    fn test_no_overlaps_remain_after_apply() {
        let resolver = OverlapResolver::default();
        let mut bookings = vec![
            booking("c1", "08:00", "09:30"),
            booking("c1", "09:30", "10:15"),
            booking("c1", "10:15", "12:00"),
        ];
        let sel = selection(&["c1"], "09:00", "11:00");
        let plan = resolver.plan(&sel, &bookings);
        resolver.apply(&plan, &mut bookings).unwrap();

        assert!(bookings.iter().all(|b| !b.range().overlaps(&sel.range())));
        assert_eq!(ranges(&bookings), vec!["08:00 - 09:00", "11:00 - 12:00"]);
    }
}
