//! Feature lifecycle phases.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Coarse-grained lifecycle stage of a feature.
///
/// Variants are declared in progression order; `Ord` follows it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Created, nothing written yet.
    New,
    /// Specification being written.
    Spec,
    /// Implementation plan being written.
    Plan,
    /// Task graph produced, no task started yet.
    Tasks,
    /// At least one task has been started.
    Implement,
    /// Every task is done; awaiting review.
    Review,
    /// Review accepted.
    Complete,
    /// Frozen. No further mutation.
    Archived,
}

impl Phase {
    /// All phases in progression order.
    pub const ALL: [Self; 8] = [
        Self::New,
        Self::Spec,
        Self::Plan,
        Self::Tasks,
        Self::Implement,
        Self::Review,
        Self::Complete,
        Self::Archived,
    ];

    /// The phase that directly follows this one, if any.
    #[must_use]
    pub fn next(self) -> Option<Self> {
        Self::ALL.iter().skip_while(|p| **p != self).nth(1).copied()
    }

    /// `complete` and `archived` accept no further forward progress.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Complete | Self::Archived)
    }

    /// Whether task statuses may change while the feature is in this phase.
    #[must_use]
    pub fn allows_task_mutation(self) -> bool {
        matches!(self, Self::Tasks | Self::Implement)
    }

    /// Lowercase name as it appears in the state document.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Spec => "spec",
            Self::Plan => "plan",
            Self::Tasks => "tasks",
            Self::Implement => "implement",
            Self::Review => "review",
            Self::Complete => "complete",
            Self::Archived => "archived",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Phase {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| {
                let names: Vec<&str> = Self::ALL.iter().map(|p| p.as_str()).collect();
                format!("unknown phase '{s}' (expected one of: {})", names.join(", "))
            })
    }
}
