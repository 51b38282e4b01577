//! Task identifier with natural ordering.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a task, unique within its feature.
///
/// Ordering is natural rather than lexicographic: the alphabetic prefix is
/// compared first, then the trailing number by value, so `T2 < T10`. Ties
/// fall back to the raw string, which keeps `T01` and `T1` distinct.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    /// Wraps a raw identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn split(&self) -> (&str, &str) {
        let digits = self.0.bytes().rev().take_while(u8::is_ascii_digit).count();
        self.0.split_at(self.0.len() - digits)
    }
}

impl Ord for TaskId {
    fn cmp(&self, other: &Self) -> Ordering {
        let (prefix_a, num_a) = self.split();
        let (prefix_b, num_b) = other.split();
        let trimmed_a = num_a.trim_start_matches('0');
        let trimmed_b = num_b.trim_start_matches('0');

        prefix_a
            .cmp(prefix_b)
            .then_with(|| num_a.is_empty().cmp(&num_b.is_empty()).reverse())
            .then_with(|| trimmed_a.len().cmp(&trimmed_b.len()))
            .then_with(|| trimmed_a.cmp(trimmed_b))
            .then_with(|| self.0.cmp(&other.0))
    }
}

impl PartialOrd for TaskId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TaskId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for TaskId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(ids: &[&str]) -> Vec<String> {
        let mut ids: Vec<TaskId> = ids.iter().map(|s| TaskId::from(*s)).collect();
        ids.sort();
        ids.into_iter().map(|id| id.to_string()).collect()
    }

    #[test]
    fn numeric_suffix_compares_by_value() {
        assert_eq!(sorted(&["T10", "T2", "T1"]), vec!["T1", "T2", "T10"]);
    }

    #[test]
    fn zero_padded_ids_sort_naturally() {
        assert_eq!(sorted(&["T003", "T001", "T002"]), vec!["T001", "T002", "T003"]);
    }

    #[test]
    fn prefix_dominates_number() {
        assert_eq!(sorted(&["b1", "a2", "a10"]), vec!["a2", "a10", "b1"]);
    }

    #[test]
    fn bare_prefix_sorts_before_numbered() {
        assert_eq!(sorted(&["setup1", "setup"]), vec!["setup", "setup1"]);
    }

    #[test]
    fn padding_breaks_ties_deterministically() {
        assert!(TaskId::from("T01") != TaskId::from("T1"));
        assert_eq!(sorted(&["T1", "T01"]), vec!["T01", "T1"]);
    }
}
