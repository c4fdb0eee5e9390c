//! # Metric Filter
//!
//! Decides, for every metric a reporter is about to emit, whether it should be
//! reported or suppressed based on operator-configured include and exclude
//! name lists.
//!
//! Entries are either literal names ([`MatchMode::Exact`]) or regular
//! expressions that must match the entire metric name ([`MatchMode::Pattern`]).
//! Compiled expressions are cached per strategy and recompiled an hour after
//! they were written, so evaluation stays cheap on every reporting tick.
//!
//! ## Quick Start
//!
//! ```rust
//! use metric_filter::{MatchMode, MetricFilter, NameSet};
//!
//! let filter = MetricFilter::new(
//!     NameSet::new(),
//!     NameSet::from(vec!["jvm\\..*"]),
//!     MatchMode::Pattern,
//! );
//!
//! assert!(!filter.should_report("jvm.memory")?);
//! assert!(filter.should_report("other.jvm.memory")?);
//! # Ok::<(), metric_filter::FilterError>(())
//! ```
//!
//! ### From reporter configuration
//!
//! ```rust
//! use metric_filter::ReporterConfig;
//!
//! let config = ReporterConfig::from_yaml_str(
//!     r#"
//! includes: [jvm.memory]
//! excludes: [jvm.memory, jvm.threads]
//! "#,
//! )?;
//!
//! let filter = config.filter();
//! let reported = filter.select(["jvm.memory", "jvm.threads", "http.requests"])?;
//! assert_eq!(reported, vec!["jvm.memory", "http.requests"]);
//! # Ok::<(), metric_filter::FilterError>(())
//! ```

pub mod config;
pub mod error;
pub mod filter;
pub mod matcher;
pub mod names;

pub use config::{ReporterConfig, TimeUnit};
pub use error::{FilterError, Result};
pub use filter::MetricFilter;
pub use matcher::{
    strategy_for, CacheConfig, CacheStats, ExactMatch, MatchMode, MatchingStrategy, PatternCache,
    PatternMatch, DEFAULT_PATTERN_TTL,
};
pub use names::NameSet;
