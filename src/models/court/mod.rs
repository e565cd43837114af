// Court module
// Bookable physical resources, the horizontal axis of the booking grid

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a court as issued by the booking service.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CourtId(String);

impl CourtId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CourtId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CourtId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Identifier of the branch (club location) whose courts are on the grid.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BranchId(String);

impl BranchId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BranchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A padel/tennis court shown as one column of the grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Court {
    pub id: CourtId,
    pub name: String,
    #[serde(default)]
    pub sport: Option<String>,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl Court {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: CourtId::new(id),
            name: name.into(),
            sport: None,
            active: true,
        }
    }

    pub fn with_sport(mut self, sport: impl Into<String>) -> Self {
        self.sport = Some(sport.into());
        self
    }
}

/// Courts in display order, skipping inactive ones.
pub fn visible_courts(courts: &[Court]) -> Vec<Court> {
    courts.iter().filter(|court| court.active).cloned().collect()
}
