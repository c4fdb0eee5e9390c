//! Reporter configuration that feeds the metric filter.
//!
//! Mirrors the options a scheduled metrics reporter accepts: output units for
//! durations and rates, the include/exclude name lists, whether those lists are
//! regular expressions, and an optional reporting frequency.
//!
//! | Key               | Default          | Description |
//! |-------------------|------------------|-------------|
//! | `durationUnit`    | `milliseconds`   | Unit durations are reported in |
//! | `rateUnit`        | `seconds`        | Unit rates are reported per |
//! | `excludes`        | none             | Metrics to leave out of reports, by name |
//! | `includes`        | all              | Metrics to report, by name |
//! | `useRegexFilters` | `false`          | Treat `includes`/`excludes` as regular expressions |
//! | `frequency`       | metrics default  | How often to report, e.g. `1s`, `500ms` |
//!
//! `frequency` accepts the compact forms (`10s`, `1m 30s`) as well as spelled
//! out units such as `500 milliseconds`, `10 seconds` or `1 minute`.
//!
//! # Examples
//!
//! ```rust
//! use metric_filter::ReporterConfig;
//!
//! let config = ReporterConfig::from_yaml_str(
//!     r#"
//! includes: ["jvm\\..*"]
//! excludes: [".*"]
//! useRegexFilters: true
//! frequency: 10s
//! "#,
//! )?;
//!
//! let filter = config.filter();
//! assert!(filter.should_report("jvm.memory")?);
//! assert!(!filter.should_report("http.requests")?);
//! # Ok::<(), metric_filter::FilterError>(())
//! ```

use crate::error::{FilterError, Result};
use crate::filter::MetricFilter;
use crate::matcher::{ExactMatch, MatchMode, MatchingStrategy, PatternMatch};
use crate::names::NameSet;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Time unit used when rendering durations and rates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    #[serde(alias = "NANOSECONDS")]
    Nanoseconds,
    #[serde(alias = "MICROSECONDS")]
    Microseconds,
    #[serde(alias = "MILLISECONDS")]
    Milliseconds,
    #[serde(alias = "SECONDS")]
    Seconds,
    #[serde(alias = "MINUTES")]
    Minutes,
    #[serde(alias = "HOURS")]
    Hours,
    #[serde(alias = "DAYS")]
    Days,
}

impl TimeUnit {
    /// Length of one unit.
    pub fn as_duration(self) -> Duration {
        match self {
            Self::Nanoseconds => Duration::from_nanos(1),
            Self::Microseconds => Duration::from_micros(1),
            Self::Milliseconds => Duration::from_millis(1),
            Self::Seconds => Duration::from_secs(1),
            Self::Minutes => Duration::from_secs(60),
            Self::Hours => Duration::from_secs(60 * 60),
            Self::Days => Duration::from_secs(24 * 60 * 60),
        }
    }
}

/// Options common to every scheduled reporter.
///
/// The configuration owns one pattern-matching strategy, so all filters
/// obtained from it (and from its clones) share a single compiled-pattern
/// cache.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReporterConfig {
    /// Unit durations are reported in.
    pub duration_unit: TimeUnit,

    /// Unit rates are reported per.
    pub rate_unit: TimeUnit,

    /// Metrics to exclude from reports, by name.
    pub excludes: NameSet,

    /// Metrics to include in reports, by name.
    pub includes: NameSet,

    /// Reporting frequency. `None` defers to the surrounding metrics default.
    #[serde(
        serialize_with = "serialize_frequency",
        deserialize_with = "deserialize_frequency"
    )]
    pub frequency: Option<Duration>,

    /// Treat `includes` and `excludes` as regular expressions.
    pub use_regex_filters: bool,

    #[serde(skip)]
    pattern_strategy: Arc<PatternMatch>,
}

impl Default for ReporterConfig {
    fn default() -> Self {
        Self {
            duration_unit: TimeUnit::Milliseconds,
            rate_unit: TimeUnit::Seconds,
            excludes: NameSet::new(),
            includes: NameSet::new(),
            frequency: None,
            use_regex_filters: false,
            pattern_strategy: Arc::default(),
        }
    }
}

impl ReporterConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.log_loaded();
        Ok(config)
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.log_loaded();
        Ok(config)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        debug!(path = %path.as_ref().display(), "loading reporter configuration");
        Self::from_yaml_str(&contents)
    }

    fn log_loaded(&self) {
        debug!(
            includes = self.includes.len(),
            excludes = self.excludes.len(),
            use_regex_filters = self.use_regex_filters,
            "loaded reporter configuration"
        );
    }

    pub fn match_mode(&self) -> MatchMode {
        MatchMode::from_regex_flag(self.use_regex_filters)
    }

    /// Build the filter selecting metrics by the configured includes/excludes.
    ///
    /// See [`crate::filter`] for the decision table.
    pub fn filter(&self) -> MetricFilter {
        let strategy: Arc<dyn MatchingStrategy> = match self.match_mode() {
            MatchMode::Exact => Arc::new(ExactMatch),
            MatchMode::Pattern => self.pattern_strategy.clone(),
        };
        MetricFilter::with_strategy(self.includes.clone(), self.excludes.clone(), strategy)
    }

    /// Reject settings a reporter cannot run with: a zero frequency, or a
    /// malformed pattern when regex filters are enabled.
    pub fn validate(&self) -> Result<()> {
        if self.frequency == Some(Duration::ZERO) {
            return Err(FilterError::InvalidConfig(
                "frequency must be greater than zero".to_string(),
            ));
        }
        self.filter().validate()
    }

    pub fn with_includes(mut self, includes: impl Into<NameSet>) -> Self {
        self.includes = includes.into();
        self
    }

    pub fn with_excludes(mut self, excludes: impl Into<NameSet>) -> Self {
        self.excludes = excludes.into();
        self
    }

    pub fn with_regex_filters(mut self, enable: bool) -> Self {
        self.use_regex_filters = enable;
        self
    }

    pub fn with_frequency(mut self, frequency: Duration) -> Self {
        self.frequency = Some(frequency);
        self
    }

    pub fn with_duration_unit(mut self, unit: TimeUnit) -> Self {
        self.duration_unit = unit;
        self
    }

    pub fn with_rate_unit(mut self, unit: TimeUnit) -> Self {
        self.rate_unit = unit;
        self
    }
}

fn serialize_frequency<S: Serializer>(
    frequency: &Option<Duration>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    match frequency {
        Some(duration) => {
            serializer.serialize_some(&humantime::format_duration(*duration).to_string())
        }
        None => serializer.serialize_none(),
    }
}

fn deserialize_frequency<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Option<Duration>, D::Error> {
    let raw: Option<String> = Option::deserialize(deserializer)?;
    raw.map(|s| {
        parse_frequency(&s)
            .map_err(|e| serde::de::Error::custom(format!("invalid frequency '{s}': {e}")))
    })
    .transpose()
}

/// Parse a duration string, mapping the long sub-second unit names humantime
/// does not know onto its abbreviations.
fn parse_frequency(raw: &str) -> std::result::Result<Duration, humantime::DurationError> {
    let raw = raw.trim();
    let split = raw
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(raw.len());
    let (count, unit) = raw.split_at(split);
    let unit = match unit.trim() {
        "nanosecond" | "nanoseconds" => "ns",
        "microsecond" | "microseconds" => "us",
        "millisecond" | "milliseconds" => "ms",
        _ => return humantime::parse_duration(raw),
    };
    humantime::parse_duration(&format!("{count}{unit}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ReporterConfig::default();
        assert_eq!(config.duration_unit, TimeUnit::Milliseconds);
        assert_eq!(config.rate_unit, TimeUnit::Seconds);
        assert!(config.includes.is_empty());
        assert!(config.excludes.is_empty());
        assert_eq!(config.frequency, None);
        assert!(!config.use_regex_filters);
        assert_eq!(config.match_mode(), MatchMode::Exact);
    }

    #[test]
    fn test_builder_pattern() {
        let config = ReporterConfig::new()
            .with_includes(vec!["a.*"])
            .with_excludes(vec!["b.*"])
            .with_regex_filters(true)
            .with_frequency(Duration::from_secs(5))
            .with_duration_unit(TimeUnit::Seconds)
            .with_rate_unit(TimeUnit::Minutes);

        assert!(config.includes.contains("a.*"));
        assert!(config.excludes.contains("b.*"));
        assert_eq!(config.match_mode(), MatchMode::Pattern);
        assert_eq!(config.frequency, Some(Duration::from_secs(5)));
        assert_eq!(config.duration_unit, TimeUnit::Seconds);
        assert_eq!(config.rate_unit, TimeUnit::Minutes);
    }

    #[test]
    fn test_yaml_parsing() {
        let config = ReporterConfig::from_yaml_str(
            r#"
durationUnit: seconds
rateUnit: MINUTES
includes: [jvm.memory, jvm.threads]
excludes: ~
frequency: 500ms
"#,
        )
        .unwrap();

        assert_eq!(config.duration_unit, TimeUnit::Seconds);
        assert_eq!(config.rate_unit, TimeUnit::Minutes);
        assert_eq!(config.includes.len(), 2);
        assert!(config.excludes.is_empty());
        assert_eq!(config.frequency, Some(Duration::from_millis(500)));
        assert!(!config.use_regex_filters);
    }

    #[test]
    fn test_json_parsing() {
        let config = ReporterConfig::from_json_str(
            r#"{"excludes": ["a.b"], "useRegexFilters": true, "frequency": "1m"}"#,
        )
        .unwrap();
        assert!(config.use_regex_filters);
        assert_eq!(config.frequency, Some(Duration::from_secs(60)));
        assert_eq!(config.duration_unit, TimeUnit::Milliseconds);
    }

    #[test]
    fn test_invalid_frequency_rejected() {
        let err = ReporterConfig::from_yaml_str("frequency: soon").unwrap_err();
        assert!(matches!(err, FilterError::YamlError(ref msg) if msg.contains("soon")));
    }

    #[test]
    fn test_spelled_out_frequency_units() {
        let cases = [
            ("500 milliseconds", Duration::from_millis(500)),
            ("1 millisecond", Duration::from_millis(1)),
            ("250 microseconds", Duration::from_micros(250)),
            ("10 nanoseconds", Duration::from_nanos(10)),
            ("1 second", Duration::from_secs(1)),
            ("10 seconds", Duration::from_secs(10)),
            ("1 minute", Duration::from_secs(60)),
            ("2 hours", Duration::from_secs(7200)),
            ("1m 30s", Duration::from_secs(90)),
        ];

        for (raw, expected) in cases {
            let config = ReporterConfig::from_yaml_str(&format!("frequency: {raw}")).unwrap();
            assert_eq!(config.frequency, Some(expected), "frequency {raw}");
        }

        assert!(ReporterConfig::from_yaml_str("frequency: milliseconds").is_err());
    }

    #[test]
    fn test_unknown_time_unit_rejected() {
        assert!(ReporterConfig::from_yaml_str("rateUnit: fortnights").is_err());
    }

    #[test]
    fn test_frequency_round_trip() {
        let config = ReporterConfig::new().with_frequency(Duration::from_secs(90));
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains(r#""frequency":"1m 30s""#));

        let parsed = ReporterConfig::from_json_str(&json).unwrap();
        assert_eq!(parsed.frequency, Some(Duration::from_secs(90)));
    }

    #[test]
    fn test_filters_share_pattern_cache() {
        let config = ReporterConfig::new()
            .with_includes(vec!["jvm\\..*"])
            .with_regex_filters(true);

        let first = config.filter();
        let second = config.clone().filter();
        assert!(first.should_report("jvm.memory").unwrap());
        assert!(second.should_report("jvm.threads").unwrap());

        assert_eq!(config.pattern_strategy.cache().stats().compilations, 1);
    }

    #[test]
    fn test_exact_mode_filter() {
        let config = ReporterConfig::new().with_includes(vec!["jvm\\..*"]);
        let filter = config.filter();
        assert_eq!(filter.mode(), MatchMode::Exact);
        assert!(!filter.should_report("jvm.memory").unwrap());
        assert!(filter.should_report("jvm\\..*").unwrap());
    }

    #[test]
    fn test_validate() {
        assert!(ReporterConfig::new().validate().is_ok());

        let zero = ReporterConfig::new().with_frequency(Duration::ZERO);
        assert!(matches!(
            zero.validate(),
            Err(FilterError::InvalidConfig(_))
        ));

        let bad_pattern = ReporterConfig::new()
            .with_excludes(vec!["jvm.("])
            .with_regex_filters(true);
        assert!(matches!(
            bad_pattern.validate(),
            Err(FilterError::InvalidPattern { .. })
        ));
    }

    #[test]
    fn test_time_unit_durations() {
        assert_eq!(TimeUnit::Milliseconds.as_duration(), Duration::from_millis(1));
        assert_eq!(TimeUnit::Days.as_duration(), Duration::from_secs(86_400));
    }
}
