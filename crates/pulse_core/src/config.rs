//! Analysis configuration.
//!
//! # Responsibility
//! - Hold the tunables shared by normalization, blind spot detection and the
//!   dashboard projection.
//! - Load and validate overrides supplied as JSON by the host application.
//!
//! # Invariants
//! - Every field has a default, so a partial JSON object is a valid override.
//! - A config is validated before any service uses it.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Default root group label.
pub const DEFAULT_COLLECTION_LABEL: &str = "News Collection";
/// Default separator between id path segments.
pub const DEFAULT_ID_SEPARATOR: &str = "/";
/// Default layout weight for synthesized summaries.
pub const DEFAULT_SUMMARY_WEIGHT: f64 = 100.0;
/// Substitute for relevancy scores that are present but unusable.
pub const DEFAULT_NEUTRAL_RELEVANCY: f64 = 50.0;
/// Default low-coverage threshold, in percentage points.
pub const DEFAULT_BLIND_SPOT_THRESHOLD: f64 = 50.0;

/// Characters reserved by id segment escaping.
const RESERVED_SEPARATOR_CHARS: &[char] = &['%', '@'];

/// Tunables for one analysis session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisConfig {
    /// Name of the synthesized root group.
    pub collection_label: String,
    /// Separator used between id path segments.
    pub id_separator: String,
    /// Fixed layout weight for summaries.
    pub summary_weight: f64,
    pub neutral_relevancy: f64,
    /// Groups below this read percentage are reported as blind spots.
    pub blind_spot_threshold: f64,
    pub unread_preview_limit: usize,
    pub completely_unread_preview_limit: usize,
    pub blind_spot_preview_limit: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            collection_label: DEFAULT_COLLECTION_LABEL.to_string(),
            id_separator: DEFAULT_ID_SEPARATOR.to_string(),
            summary_weight: DEFAULT_SUMMARY_WEIGHT,
            neutral_relevancy: DEFAULT_NEUTRAL_RELEVANCY,
            blind_spot_threshold: DEFAULT_BLIND_SPOT_THRESHOLD,
            unread_preview_limit: 5,
            completely_unread_preview_limit: 3,
            blind_spot_preview_limit: 3,
        }
    }
}

impl AnalysisConfig {
    /// Parses a JSON override object and validates the result.
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(raw).map_err(|err| ConfigError::InvalidJson(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates value ranges and reserved characters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.collection_label.trim().is_empty() {
            return Err(ConfigError::BlankCollectionLabel);
        }
        if self.id_separator.is_empty() {
            return Err(ConfigError::BlankIdSeparator);
        }
        if let Some(ch) = self
            .id_separator
            .chars()
            .find(|ch| RESERVED_SEPARATOR_CHARS.contains(ch))
        {
            return Err(ConfigError::ReservedSeparatorChar(ch));
        }
        if !self.summary_weight.is_finite() || self.summary_weight < 0.0 {
            return Err(ConfigError::InvalidWeight {
                field: "summary_weight",
                value: self.summary_weight,
            });
        }
        if !self.neutral_relevancy.is_finite() {
            return Err(ConfigError::InvalidWeight {
                field: "neutral_relevancy",
                value: self.neutral_relevancy,
            });
        }
        if !(0.0..=100.0).contains(&self.blind_spot_threshold) {
            return Err(ConfigError::ThresholdOutOfRange(self.blind_spot_threshold));
        }
        Ok(())
    }
}

/// Configuration load/validation errors.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    InvalidJson(String),
    BlankCollectionLabel,
    BlankIdSeparator,
    /// Separator contains a character reserved by id escaping.
    ReservedSeparatorChar(char),
    InvalidWeight { field: &'static str, value: f64 },
    ThresholdOutOfRange(f64),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidJson(message) => write!(f, "invalid analysis config json: {message}"),
            Self::BlankCollectionLabel => write!(f, "collection_label must not be blank"),
            Self::BlankIdSeparator => write!(f, "id_separator must not be empty"),
            Self::ReservedSeparatorChar(ch) => {
                write!(f, "id_separator must not contain reserved character `{ch}`")
            }
            Self::InvalidWeight { field, value } => {
                write!(f, "{field} must be a finite non-negative number, got {value}")
            }
            Self::ThresholdOutOfRange(value) => {
                write!(f, "blind_spot_threshold must be within 0..=100, got {value}")
            }
        }
    }
}

impl Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::{AnalysisConfig, ConfigError, DEFAULT_COLLECTION_LABEL};

    #[test]
    fn default_config_is_valid() {
        let config = AnalysisConfig::default();
        config.validate().expect("defaults should validate");
        assert_eq!(config.collection_label, DEFAULT_COLLECTION_LABEL);
        assert_eq!(config.blind_spot_threshold, 50.0);
    }

    #[test]
    fn partial_json_keeps_remaining_defaults() {
        let config = AnalysisConfig::from_json_str(r#"{"blind_spot_threshold": 30}"#)
            .expect("partial override should parse");
        assert_eq!(config.blind_spot_threshold, 30.0);
        assert_eq!(config.id_separator, "/");
        assert_eq!(config.unread_preview_limit, 5);
    }

    #[test]
    fn rejects_unknown_fields() {
        let err = AnalysisConfig::from_json_str(r#"{"threshold": 30}"#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidJson(_)));
    }

    #[test]
    fn rejects_threshold_out_of_range() {
        let err = AnalysisConfig::from_json_str(r#"{"blind_spot_threshold": 120}"#).unwrap_err();
        assert_eq!(err, ConfigError::ThresholdOutOfRange(120.0));
    }

    #[test]
    fn rejects_reserved_separator() {
        let config = AnalysisConfig {
            id_separator: "@".to_string(),
            ..AnalysisConfig::default()
        };
        assert_eq!(
            config.validate().unwrap_err(),
            ConfigError::ReservedSeparatorChar('@')
        );
    }

    #[test]
    fn rejects_blank_label() {
        let config = AnalysisConfig {
            collection_label: "  ".to_string(),
            ..AnalysisConfig::default()
        };
        assert_eq!(
            config.validate().unwrap_err(),
            ConfigError::BlankCollectionLabel
        );
    }
}
