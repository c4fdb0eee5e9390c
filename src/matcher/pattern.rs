//! Regular expression matching backed by a [`PatternCache`].

use crate::error::Result;
use crate::matcher::cache::PatternCache;
use crate::matcher::types::{MatchMode, MatchingStrategy};
use crate::names::NameSet;
use std::sync::Arc;

/// Treats every entry as a regular expression that must match the whole name.
///
/// `jvm\..*` matches `jvm.memory` but not `other.jvm.memory`. Compiled
/// patterns come from the strategy's own cache, which is created with the
/// strategy (or injected) and lives exactly as long as it.
///
/// A malformed entry is a configuration error: it is returned from
/// [`contains_match`](MatchingStrategy::contains_match) the first time it is
/// evaluated rather than being treated as a non-match.
#[derive(Debug, Clone, Default)]
pub struct PatternMatch {
    cache: Arc<PatternCache>,
}

impl PatternMatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cache(cache: Arc<PatternCache>) -> Self {
        Self { cache }
    }

    pub fn cache(&self) -> &Arc<PatternCache> {
        &self.cache
    }
}

impl MatchingStrategy for PatternMatch {
    fn contains_match(&self, patterns: &NameSet, candidate: &str) -> Result<bool> {
        for pattern in patterns.iter() {
            if self.cache.get_pattern(pattern)?.is_match(candidate) {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn validate(&self, patterns: &NameSet) -> Result<()> {
        self.cache.precompile(patterns.iter())
    }

    fn mode(&self) -> MatchMode {
        MatchMode::Pattern
    }
}
