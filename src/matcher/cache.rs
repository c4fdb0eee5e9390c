//! Time-expiring regex compilation cache for pattern-mode matching.
//!
//! Each [`PatternMatch`](super::PatternMatch) strategy owns one of these, so
//! pattern strings are compiled once and reused across reporting ticks instead
//! of being recompiled on every evaluation.

use crate::error::{FilterError, Result};
use regex_automata::meta::Regex;
use regex_syntax::hir::{Hir, Look};
use std::collections::HashMap;
use std::fmt::Display;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::{Duration, Instant};
use tracing::{debug, trace, warn};

/// How long a compiled pattern stays valid after it was written.
pub const DEFAULT_PATTERN_TTL: Duration = Duration::from_secs(60 * 60);

/// Regex cache keyed by the raw pattern string.
///
/// # Thread Safety
/// Lookups take a read lock; compilation happens outside any lock and the
/// result is inserted under a short write lock. Two threads missing on the
/// same pattern may both compile it, in which case the last insert wins.
/// Both compiled forms are equivalent, so callers cannot observe the race.
///
/// # Expiry
/// Entries expire a fixed TTL after they were *written*, not after their last
/// access. An expired entry is recompiled transparently on its next lookup,
/// and every compilation also drops whatever else has expired so patterns
/// that are never looked up again do not linger.
#[derive(Debug)]
pub struct PatternCache {
    storage: RwLock<HashMap<String, CachedPattern>>,
    counters: CacheCounters,
    config: CacheConfig,
}

#[derive(Debug, Clone)]
struct CachedPattern {
    regex: Arc<Regex>,
    written_at: Instant,
}

/// Cache configuration parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheConfig {
    /// Time after insertion at which an entry is considered stale.
    pub ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: DEFAULT_PATTERN_TTL,
        }
    }
}

#[derive(Debug, Default)]
struct CacheCounters {
    lookups: AtomicUsize,
    hits: AtomicUsize,
    misses: AtomicUsize,
    compilations: AtomicUsize,
    expirations: AtomicUsize,
}

/// Snapshot of cache activity.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CacheStats {
    /// Total cache lookups
    pub lookups: usize,

    /// Lookups answered from a fresh entry
    pub hits: usize,

    /// Lookups that had to compile, including expired entries
    pub misses: usize,

    /// Successful pattern compilations
    pub compilations: usize,

    /// Lookups that found an entry past its TTL
    pub expirations: usize,
}

impl PatternCache {
    /// Create a cache with the default one hour TTL.
    pub fn new() -> Self {
        Self::with_config(CacheConfig::default())
    }

    pub fn with_config(config: CacheConfig) -> Self {
        Self {
            storage: RwLock::new(HashMap::new()),
            counters: CacheCounters::default(),
            config,
        }
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self::with_config(CacheConfig { ttl })
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Get the compiled, fully anchored form of `pattern`, compiling it on a
    /// miss or when the cached entry has expired.
    pub fn get_pattern(&self, pattern: &str) -> Result<Arc<Regex>> {
        self.get_pattern_at(pattern, Instant::now())
    }

    pub(crate) fn get_pattern_at(&self, pattern: &str, now: Instant) -> Result<Arc<Regex>> {
        self.counters.lookups.fetch_add(1, Ordering::Relaxed);

        {
            let storage = self.storage.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(cached) = storage.get(pattern) {
                if !self.is_expired(cached, now) {
                    self.counters.hits.fetch_add(1, Ordering::Relaxed);
                    trace!(pattern, "pattern cache hit");
                    return Ok(cached.regex.clone());
                }
                self.counters.expirations.fetch_add(1, Ordering::Relaxed);
                debug!(pattern, "cached pattern expired, recompiling");
            }
        }

        self.counters.misses.fetch_add(1, Ordering::Relaxed);
        self.compile_and_cache(pattern, now)
    }

    fn compile_and_cache(&self, pattern: &str, now: Instant) -> Result<Arc<Regex>> {
        let regex = Arc::new(compile_anchored(pattern)?);
        self.counters.compilations.fetch_add(1, Ordering::Relaxed);
        debug!(pattern, "compiled metric name pattern");

        let mut storage = self.storage.write().unwrap_or_else(PoisonError::into_inner);
        let purged = self.drop_expired(&mut storage, now);
        if purged > 0 {
            debug!(purged, "dropped expired patterns");
        }
        storage.insert(
            pattern.to_string(),
            CachedPattern {
                regex: regex.clone(),
                written_at: now,
            },
        );

        Ok(regex)
    }

    fn is_expired(&self, cached: &CachedPattern, now: Instant) -> bool {
        now.saturating_duration_since(cached.written_at) >= self.config.ttl
    }

    fn drop_expired(&self, storage: &mut HashMap<String, CachedPattern>, now: Instant) -> usize {
        let before = storage.len();
        storage.retain(|_, cached| !self.is_expired(cached, now));
        before - storage.len()
    }

    /// Compile a set of patterns ahead of the first evaluation.
    ///
    /// Stops at the first malformed pattern and returns its error.
    pub fn precompile<'a, I>(&self, patterns: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a str>,
    {
        for pattern in patterns {
            self.get_pattern(pattern)?;
        }
        Ok(())
    }

    /// Drop every entry that has outlived the TTL. Returns the number removed.
    pub fn purge_expired(&self) -> usize {
        self.purge_expired_at(Instant::now())
    }

    pub(crate) fn purge_expired_at(&self, now: Instant) -> usize {
        let mut storage = self.storage.write().unwrap_or_else(PoisonError::into_inner);
        self.drop_expired(&mut storage, now)
    }

    /// Get cache statistics for monitoring.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            lookups: self.counters.lookups.load(Ordering::Relaxed),
            hits: self.counters.hits.load(Ordering::Relaxed),
            misses: self.counters.misses.load(Ordering::Relaxed),
            compilations: self.counters.compilations.load(Ordering::Relaxed),
            expirations: self.counters.expirations.load(Ordering::Relaxed),
        }
    }

    pub fn hit_ratio(&self) -> f64 {
        let stats = self.stats();
        if stats.lookups == 0 {
            return 0.0;
        }
        stats.hits as f64 / stats.lookups as f64
    }

    /// Number of cached entries, expired ones included until the next purge
    /// or compilation.
    pub fn size(&self) -> usize {
        self.storage
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn clear(&self) {
        self.storage
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl Default for PatternCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Compile `pattern` so that it only matches an entire name.
///
/// Anchors are added to the parsed syntax tree rather than to the pattern
/// text, so inline flags and `(?x)` comments keep their meaning.
fn compile_anchored(pattern: &str) -> Result<Regex> {
    let hir = regex_syntax::Parser::new()
        .parse(pattern)
        .map_err(|err| invalid_pattern(pattern, err))?;
    let anchored = Hir::concat(vec![Hir::look(Look::Start), hir, Hir::look(Look::End)]);

    Regex::builder()
        .build_from_hir(&anchored)
        .map_err(|err| invalid_pattern(pattern, err))
}

fn invalid_pattern(pattern: &str, err: impl Display) -> FilterError {
    warn!(pattern, error = %err, "rejecting malformed metric name pattern");
    FilterError::InvalidPattern {
        pattern: pattern.to_string(),
        reason: err.to_string(),
    }
}
