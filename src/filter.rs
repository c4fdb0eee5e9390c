//! Include/exclude decision policy for metric reporters.
//!
//! Filtering works in three ways:
//!
//! | includes | excludes | a metric is reported when |
//! |----------|----------|---------------------------|
//! | set      | empty    | it matches `includes` |
//! | empty    | set      | it does not match `excludes` |
//! | set      | set      | it matches `includes` **or** does not match `excludes` |
//! | empty    | empty    | always |
//!
//! In the mixed case a metric is only suppressed when it matches `excludes`
//! and fails `includes`. That is not the same as "includes override excludes
//! on overlap": a name matching neither list is still reported.

use crate::error::Result;
use crate::matcher::{strategy_for, MatchMode, MatchingStrategy};
use crate::names::NameSet;
use rayon::prelude::*;
use std::sync::Arc;
use tracing::trace;

/// Decides per metric name whether it should be emitted to a reporter's sink.
///
/// Holds the include/exclude sets and the matching strategy chosen for them.
/// Evaluation keeps no state between calls, and a filter can be shared across
/// threads; clones share the same sets and strategy (and so the same pattern
/// cache).
///
/// # Example
/// ```rust
/// use metric_filter::{MatchMode, MetricFilter, NameSet};
///
/// let filter = MetricFilter::new(
///     NameSet::from(vec!["a.*"]),
///     NameSet::from(vec![".*"]),
///     MatchMode::Pattern,
/// );
///
/// assert!(filter.should_report("abc")?);
/// assert!(!filter.should_report("xyz")?);
/// # Ok::<(), metric_filter::FilterError>(())
/// ```
#[derive(Debug, Clone)]
pub struct MetricFilter {
    includes: NameSet,
    excludes: NameSet,
    strategy: Arc<dyn MatchingStrategy>,
}

impl MetricFilter {
    /// Create a filter with a fresh strategy for `mode`.
    pub fn new(includes: NameSet, excludes: NameSet, mode: MatchMode) -> Self {
        Self::with_strategy(includes, excludes, strategy_for(mode))
    }

    /// Create a filter around an existing strategy, e.g. to share one pattern
    /// cache between several reporters.
    pub fn with_strategy(
        includes: NameSet,
        excludes: NameSet,
        strategy: Arc<dyn MatchingStrategy>,
    ) -> Self {
        Self {
            includes,
            excludes,
            strategy,
        }
    }

    /// A filter that reports everything.
    pub fn allow_all() -> Self {
        Self::new(NameSet::new(), NameSet::new(), MatchMode::Exact)
    }

    pub fn includes(&self) -> &NameSet {
        &self.includes
    }

    pub fn excludes(&self) -> &NameSet {
        &self.excludes
    }

    pub fn mode(&self) -> MatchMode {
        self.strategy.mode()
    }

    /// Whether the metric called `name` should be reported.
    ///
    /// Fails only if a configured pattern is malformed (pattern mode).
    pub fn should_report(&self, name: &str) -> Result<bool> {
        let use_includes = !self.includes.is_empty();
        let use_excludes = !self.excludes.is_empty();

        let report = match (use_includes, use_excludes) {
            (true, true) => {
                self.strategy.contains_match(&self.includes, name)?
                    || !self.strategy.contains_match(&self.excludes, name)?
            }
            (true, false) => self.strategy.contains_match(&self.includes, name)?,
            (false, true) => !self.strategy.contains_match(&self.excludes, name)?,
            (false, false) => true,
        };

        trace!(metric = name, report, "evaluated metric filter");
        Ok(report)
    }

    /// Compile every configured pattern now instead of on first use.
    ///
    /// Lets a reporter reject a bad configuration at startup. Does nothing in
    /// exact mode.
    pub fn validate(&self) -> Result<()> {
        self.strategy.validate(&self.includes)?;
        self.strategy.validate(&self.excludes)
    }

    /// Keep the names that should be reported, preserving their order.
    pub fn select<'a, I>(&self, names: I) -> Result<Vec<&'a str>>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut selected = Vec::new();
        for name in names {
            if self.should_report(name)? {
                selected.push(name);
            }
        }
        Ok(selected)
    }

    /// Evaluate a whole registry's worth of names in parallel.
    ///
    /// The result at index `i` is the decision for `names[i]`.
    pub fn par_should_report(&self, names: &[&str]) -> Result<Vec<bool>> {
        names
            .par_iter()
            .map(|name| self.should_report(name))
            .collect()
    }
}

impl Default for MetricFilter {
    fn default() -> Self {
        Self::allow_all()
    }
}
