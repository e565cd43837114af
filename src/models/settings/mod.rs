// Settings module
// Grid configuration loaded from the TOML settings file

use std::collections::HashSet;

use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use super::business_hours::BusinessHours;
use super::clock::ClockTime;
use super::court::{BranchId, Court};

/// How the overlap resolver treats a booking that fully contains a new
/// selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TrimPolicy {
    /// Shrink exactly one edge of each overlapping booking
    #[default]
    SingleEdge,
    /// Leave a head and a tail fragment around the selection
    Split,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchSettings {
    pub id: BranchId,
    pub name: String,
}

/// Opening hours per weekday. A missing day means the branch is closed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyHours {
    pub monday: Option<BusinessHours>,
    pub tuesday: Option<BusinessHours>,
    pub wednesday: Option<BusinessHours>,
    pub thursday: Option<BusinessHours>,
    pub friday: Option<BusinessHours>,
    pub saturday: Option<BusinessHours>,
    pub sunday: Option<BusinessHours>,
}

impl WeeklyHours {
    pub fn for_weekday(&self, weekday: Weekday) -> Option<BusinessHours> {
        match weekday {
            Weekday::Mon => self.monday,
            Weekday::Tue => self.tuesday,
            Weekday::Wed => self.wednesday,
            Weekday::Thu => self.thursday,
            Weekday::Fri => self.friday,
            Weekday::Sat => self.saturday,
            Weekday::Sun => self.sunday,
        }
    }

    fn all(&self) -> [(Weekday, Option<BusinessHours>); 7] {
        [
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
            Weekday::Sat,
            Weekday::Sun,
        ]
        .map(|day| (day, self.for_weekday(day)))
    }
}

impl Default for WeeklyHours {
    fn default() -> Self {
        let weekday = BusinessHours::new(ClockTime::hm(8, 0), ClockTime::hm(23, 0));
        let weekend = BusinessHours::new(ClockTime::hm(9, 0), ClockTime::hm(21, 0));
        Self {
            monday: Some(weekday),
            tuesday: Some(weekday),
            wednesday: Some(weekday),
            thursday: Some(weekday),
            friday: Some(weekday),
            saturday: Some(weekend),
            sunday: Some(weekend),
        }
    }
}

/// Application settings for the booking grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridSettings {
    pub branch: Option<BranchSettings>,
    /// Hard close-of-day ceiling; drags never extend past it
    pub closing_ceiling: ClockTime,
    /// First row shown on days the branch is closed
    pub fallback_open: ClockTime,
    pub trim_policy: TrimPolicy,
    pub courts: Vec<Court>,
    pub business_hours: WeeklyHours,
    pub closed_dates: Vec<NaiveDate>,
    pub dark_mode: bool,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            branch: Some(BranchSettings {
                id: BranchId::new("main"),
                name: "Main club".to_string(),
            }),
            closing_ceiling: ClockTime::hm(23, 0),
            fallback_open: ClockTime::hm(8, 0),
            trim_policy: TrimPolicy::SingleEdge,
            courts: (1..=4)
                .map(|n| Court::new(format!("court-{}", n), format!("Court {}", n)))
                .collect(),
            business_hours: WeeklyHours::default(),
            closed_dates: Vec::new(),
            dark_mode: false,
        }
    }
}

impl GridSettings {
    pub fn branch_id(&self) -> Option<&BranchId> {
        self.branch.as_ref().map(|branch| &branch.id)
    }

    /// Validate values a hand-edited file could get wrong
    pub fn validate(&self) -> Result<(), String> {
        if !self.closing_ceiling.is_on_grid() {
            return Err(format!(
                "Closing ceiling {} must align to the 15-minute grid",
                self.closing_ceiling
            ));
        }

        for (day, hours) in self.business_hours.all() {
            if let Some(hours) = hours {
                if hours.end <= hours.start {
                    return Err(format!(
                        "Business hours for {} must end after they start",
                        day
                    ));
                }
            }
        }

        let mut seen = HashSet::new();
        for court in &self.courts {
            if !seen.insert(&court.id) {
                return Err(format!("Duplicate court id '{}'", court.id));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::clock::t;

    #[test]
    fn test_default_settings_are_valid() {
        let settings = GridSettings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.closing_ceiling, t("23:00"));
        assert_eq!(settings.courts.len(), 4);
        assert_eq!(settings.trim_policy, TrimPolicy::SingleEdge);
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        let settings: GridSettings = toml::from_str("").unwrap();
        assert_eq!(settings, GridSettings::default());
    }

    #[test]
    fn test_partial_toml_overrides() {
        let settings: GridSettings = toml::from_str(
            r#"
            closing_ceiling = "22:00"
            trim_policy = "split"

            [business_hours]
            monday = { start = "07:00", end = "22:00" }

            [[courts]]
            id = "p1"
            name = "Padel 1"
            "#,
        )
        .unwrap();

        assert_eq!(settings.closing_ceiling, t("22:00"));
        assert_eq!(settings.trim_policy, TrimPolicy::Split);
        assert_eq!(settings.courts.len(), 1);
        assert_eq!(
            settings.business_hours.for_weekday(Weekday::Mon),
            Some(BusinessHours::new(t("07:00"), t("22:00")))
        );
        // Days not listed in a present table are closed
        assert!(settings.business_hours.for_weekday(Weekday::Sun).is_none());
    }

    #[test]
    fn test_validate_rejects_off_grid_ceiling() {
        let settings = GridSettings {
            closing_ceiling: t("22:50"),
            ..GridSettings::default()
        };
        assert!(settings.validate().unwrap_err().contains("15-minute grid"));
    }

    #[test]
    fn test_validate_rejects_inverted_hours() {
        let mut settings = GridSettings::default();
        settings.business_hours.friday = Some(BusinessHours::new(t("20:00"), t("09:00")));
        assert!(settings.validate().unwrap_err().contains("Fri"));
    }

    #[test]
    fn test_validate_rejects_duplicate_courts() {
        let mut settings = GridSettings::default();
        settings.courts.push(Court::new("court-1", "Again"));
        assert!(settings.validate().unwrap_err().contains("court-1"));
    }
}
