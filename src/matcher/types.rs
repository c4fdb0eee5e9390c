//! Core type definitions for metric name matching.

use crate::error::Result;
use crate::names::NameSet;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// How include/exclude entries are compared against a metric name.
///
/// Chosen once per filter and fixed for its lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// Entries are literal names; a metric matches on full, case-sensitive equality.
    #[default]
    Exact,
    /// Entries are regular expressions that must match the entire metric name.
    Pattern,
}

impl MatchMode {
    /// Map the reporter's `useRegexFilters` flag onto a mode.
    pub fn from_regex_flag(use_regex_filters: bool) -> Self {
        if use_regex_filters {
            Self::Pattern
        } else {
            Self::Exact
        }
    }
}

/// Answers whether any entry of a name set matches a candidate metric name.
///
/// Implementations are shared across reporter threads and must be callable
/// concurrently without external locking. Any internal caching must not be
/// observable other than through latency.
///
/// # Example
/// ```rust
/// use metric_filter::{ExactMatch, MatchingStrategy, NameSet};
///
/// let names = NameSet::from(vec!["jvm.memory"]);
/// assert!(ExactMatch.contains_match(&names, "jvm.memory")?);
/// assert!(!ExactMatch.contains_match(&names, "jvm.memory.heap")?);
/// # Ok::<(), metric_filter::FilterError>(())
/// ```
pub trait MatchingStrategy: Debug + Send + Sync {
    /// True iff at least one element of `patterns` matches `candidate`.
    ///
    /// Fails only when an entry cannot be interpreted under this strategy,
    /// i.e. a malformed regular expression in pattern mode.
    fn contains_match(&self, patterns: &NameSet, candidate: &str) -> Result<bool>;

    /// Check up front that every entry of `patterns` is usable.
    fn validate(&self, _patterns: &NameSet) -> Result<()> {
        Ok(())
    }

    fn mode(&self) -> MatchMode;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_from_regex_flag() {
        assert_eq!(MatchMode::from_regex_flag(true), MatchMode::Pattern);
        assert_eq!(MatchMode::from_regex_flag(false), MatchMode::Exact);
        assert_eq!(MatchMode::default(), MatchMode::Exact);
    }

    #[test]
    fn test_mode_serde_names() {
        let mode: MatchMode = serde_yaml::from_str("pattern").unwrap();
        assert_eq!(mode, MatchMode::Pattern);
        assert_eq!(serde_json::to_string(&MatchMode::Exact).unwrap(), "\"exact\"");
    }

    #[test]
    fn test_strategy_objects_are_send_sync() {
        fn assert_send_sync<T: Send + Sync + ?Sized>() {}
        assert_send_sync::<dyn MatchingStrategy>();
    }
}
