//! Matching strategies for include/exclude name sets.
//!
//! ## Strategies
//!
//! - [`ExactMatch`] - literal set membership
//! - [`PatternMatch`] - anchored regular expressions, compiled through a
//!   per-strategy [`PatternCache`] with write-time expiry
//!
//! Both implement [`MatchingStrategy`]; [`strategy_for`] picks one from a
//! [`MatchMode`].
//!
//! ## Example Usage
//!
//! ```rust
//! use metric_filter::matcher::{strategy_for, MatchMode};
//! use metric_filter::NameSet;
//!
//! let strategy = strategy_for(MatchMode::Pattern);
//! let patterns = NameSet::from(vec!["jvm\\..*"]);
//!
//! assert!(strategy.contains_match(&patterns, "jvm.memory")?);
//! assert!(!strategy.contains_match(&patterns, "other.jvm.memory")?);
//! # Ok::<(), metric_filter::FilterError>(())
//! ```

pub mod cache;
pub mod exact;
pub mod pattern;
pub mod types;

use std::sync::Arc;

pub use cache::{CacheConfig, CacheStats, PatternCache, DEFAULT_PATTERN_TTL};
pub use exact::ExactMatch;
pub use pattern::PatternMatch;
pub use types::{MatchMode, MatchingStrategy};

/// Build the strategy for `mode`.
///
/// Pattern mode gets a fresh cache owned by the returned strategy.
pub fn strategy_for(mode: MatchMode) -> Arc<dyn MatchingStrategy> {
    match mode {
        MatchMode::Exact => Arc::new(ExactMatch),
        MatchMode::Pattern => Arc::new(PatternMatch::new()),
    }
}
