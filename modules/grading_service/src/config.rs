//! Configuration for grading service module

use serde::{Deserialize, Serialize};

/// Grading service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Recognized exam periods, in reporting order
    #[serde(default = "default_exam_periods")]
    pub exam_periods: Vec<String>,

    /// Maximum number of entries accepted in one bulk submission
    #[serde(default = "default_max_batch_entries")]
    pub max_batch_entries: usize,

    /// Total-possible score used when an entry does not declare one
    #[serde(default = "default_total_possible")]
    pub default_total_possible: f64,

    /// Upper bound for a declared total-possible score
    #[serde(default = "default_max_total_possible")]
    pub max_total_possible: f64,

    /// Maximum remarks length in characters
    #[serde(default = "default_max_remarks_len")]
    pub max_remarks_len: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            exam_periods: default_exam_periods(),
            max_batch_entries: default_max_batch_entries(),
            default_total_possible: default_total_possible(),
            max_total_possible: default_max_total_possible(),
            max_remarks_len: default_max_remarks_len(),
        }
    }
}

/// Rejected configuration values
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("at least one exam period must be configured")]
    NoExamPeriods,

    #[error("exam period configured twice: {0}")]
    DuplicateExamPeriod(String),

    #[error("max_batch_entries must be greater than zero")]
    ZeroBatchSize,

    #[error("invalid total-possible bounds: default {default}, max {max}")]
    TotalPossibleBounds { default: f64, max: f64 },
}

impl Config {
    /// Check invariants serde defaults cannot express
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.exam_periods.iter().all(|p| p.trim().is_empty()) {
            return Err(ConfigError::NoExamPeriods);
        }

        let mut seen: Vec<String> = Vec::with_capacity(self.exam_periods.len());
        for period in &self.exam_periods {
            let folded = period.trim().to_lowercase();
            if seen.contains(&folded) {
                return Err(ConfigError::DuplicateExamPeriod(period.clone()));
            }
            seen.push(folded);
        }

        if self.max_batch_entries == 0 {
            return Err(ConfigError::ZeroBatchSize);
        }

        let bounds_ok = self.default_total_possible.is_finite()
            && self.max_total_possible.is_finite()
            && self.default_total_possible > 0.0
            && self.default_total_possible <= self.max_total_possible;
        if !bounds_ok {
            return Err(ConfigError::TotalPossibleBounds {
                default: self.default_total_possible,
                max: self.max_total_possible,
            });
        }

        Ok(())
    }
}

fn default_exam_periods() -> Vec<String> {
    vec![
        "Term 1".to_string(),
        "Term 2".to_string(),
        "Term 3".to_string(),
    ]
}

fn default_max_batch_entries() -> usize {
    500
}

fn default_total_possible() -> f64 {
    100.0
}

fn default_max_total_possible() -> f64 {
    1000.0
}

fn default_max_remarks_len() -> usize {
    500
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(Config::default().validate(), Ok(()));
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let cfg: Config =
            serde_json::from_value(serde_json::json!({ "max_batch_entries": 40 })).unwrap();
        assert_eq!(cfg.max_batch_entries, 40);
        assert_eq!(cfg.exam_periods, default_exam_periods());
        assert_eq!(cfg.default_total_possible, 100.0);
    }

    #[test]
    fn test_unknown_fields_rejected() {
        let parsed = serde_json::from_value::<Config>(serde_json::json!({ "grade_scale": "x" }));
        assert!(parsed.is_err());
    }

    #[test]
    fn test_duplicate_periods_rejected() {
        let cfg = Config {
            exam_periods: vec!["Term 1".into(), "term 1 ".into()],
            ..Config::default()
        };
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::DuplicateExamPeriod("term 1 ".into()))
        );
    }

    #[test]
    fn test_bad_bounds_rejected() {
        let cfg = Config {
            default_total_possible: 0.0,
            ..Config::default()
        };
        assert!(cfg.validate().is_err());

        let cfg = Config {
            max_batch_entries: 0,
            ..Config::default()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::ZeroBatchSize));
    }
}
