//! Score-to-grade banding
//!
//! The single authoritative mapping from a percentage score to a letter
//! grade. The preview endpoint and every write path go through here.

use crate::contract::{Grade, GradingError};

/// Lower bounds, checked top-down. Each bound is inclusive.
const BANDS: [(f64, Grade); 4] = [
    (75.0, Grade::A),
    (65.0, Grade::B),
    (55.0, Grade::C),
    (35.0, Grade::S),
];

/// Map a score in [0, 100] to its grade band
pub fn grade_for_score(score: f64) -> Result<Grade, GradingError> {
    if !score.is_finite() {
        return Err(GradingError::InvalidScore {
            reason: "score is not a number".to_string(),
        });
    }
    if !(0.0..=100.0).contains(&score) {
        return Err(GradingError::InvalidScore {
            reason: format!("score {} is outside 0-100", score),
        });
    }

    Ok(BANDS
        .iter()
        .find(|(lower, _)| score >= *lower)
        .map(|(_, grade)| *grade)
        .unwrap_or(Grade::F))
}

/// Grade a score out of `total_possible` by its percentage
pub fn grade_for_fraction(score: f64, total_possible: f64) -> Result<Grade, GradingError> {
    if !total_possible.is_finite() || total_possible <= 0.0 {
        return Err(GradingError::InvalidScore {
            reason: format!("total possible {} must be greater than zero", total_possible),
        });
    }
    if total_possible == 100.0 {
        return grade_for_score(score);
    }
    grade_for_score(score * 100.0 / total_possible)
}
