//! Error types for the metric filter crate.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, FilterError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FilterError {
    /// A configured include/exclude entry is not a valid regular expression.
    #[error("Invalid regex pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },
    #[error("Invalid reporter configuration: {0}")]
    InvalidConfig(String),
    #[error("YAML parsing error: {0}")]
    YamlError(String),
    #[error("JSON parsing error: {0}")]
    JsonError(String),
    #[error("IO error: {0}")]
    IoError(String),
}

impl FilterError {
    /// The offending pattern text, when the error came from pattern compilation.
    pub fn pattern(&self) -> Option<&str> {
        match self {
            FilterError::InvalidPattern { pattern, .. } => Some(pattern),
            _ => None,
        }
    }
}

impl From<std::io::Error> for FilterError {
    fn from(err: std::io::Error) -> Self {
        FilterError::IoError(err.to_string())
    }
}

impl From<serde_yaml::Error> for FilterError {
    fn from(err: serde_yaml::Error) -> Self {
        FilterError::YamlError(err.to_string())
    }
}

impl From<serde_json::Error> for FilterError {
    fn from(err: serde_json::Error) -> Self {
        FilterError::JsonError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_invalid_pattern_display() {
        let error = FilterError::InvalidPattern {
            pattern: "jvm.(".to_string(),
            reason: "unclosed group".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid regex pattern 'jvm.(': unclosed group"
        );
        assert_eq!(error.pattern(), Some("jvm.("));
        assert!(error.source().is_none());
    }

    #[test]
    fn test_invalid_config_display() {
        let error = FilterError::InvalidConfig("bad frequency".to_string());
        assert_eq!(
            error.to_string(),
            "Invalid reporter configuration: bad frequency"
        );
        assert_eq!(error.pattern(), None);
    }

    #[test]
    fn test_from_io_error() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let filter_error: FilterError = io_error.into();

        match filter_error {
            FilterError::IoError(msg) => assert!(msg.contains("file not found")),
            _ => panic!("Expected IoError variant"),
        }
    }

    #[test]
    fn test_from_yaml_and_json_errors() {
        let yaml_err = serde_yaml::from_str::<serde_yaml::Value>("invalid: yaml: [").unwrap_err();
        assert!(matches!(
            FilterError::from(yaml_err),
            FilterError::YamlError(_)
        ));

        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        assert!(matches!(
            FilterError::from(json_err),
            FilterError::JsonError(_)
        ));
    }

    #[test]
    fn test_error_equality_and_clone() {
        let error1 = FilterError::InvalidConfig("test".to_string());
        let error2 = error1.clone();
        let error3 = FilterError::YamlError("test".to_string());

        assert_eq!(error1, error2);
        assert_ne!(error1, error3);
    }
}
