//! Literal name matching.

use crate::error::Result;
use crate::matcher::types::{MatchMode, MatchingStrategy};
use crate::names::NameSet;

/// Set membership: a metric matches iff its name is an element of the set.
///
/// Case-sensitive with no normalization, so `jvm.memory` does not match
/// `JVM.memory` or `jvm.memory.heap`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExactMatch;

impl MatchingStrategy for ExactMatch {
    fn contains_match(&self, patterns: &NameSet, candidate: &str) -> Result<bool> {
        Ok(patterns.contains(candidate))
    }

    fn mode(&self) -> MatchMode {
        MatchMode::Exact
    }
}
