//! Validation and normalization of mark entries

use crate::config::Config;
use crate::contract::{Grade, GradingError, RawScore, Role, User};

use super::grade::grade_for_fraction;

/// Entry fields shared by the single and bulk submission paths
#[derive(Debug, Clone, Copy)]
pub struct EntryFields<'a> {
    pub subject: &'a str,
    pub class_label: &'a str,
    pub exam_period: &'a str,
    pub score: &'a RawScore,
    pub total_possible: Option<f64>,
    pub remarks: Option<&'a str>,
}

/// A fully validated entry, ready to be written
#[derive(Debug, Clone, PartialEq)]
pub struct MarkDraft {
    pub subject: String,
    pub class_label: String,
    pub exam_period: String,
    pub score: f64,
    pub total_possible: f64,
    pub grade: Grade,
    pub remarks: Option<String>,
}

/// Validate one entry against the resolved student and the configuration
pub fn validate_entry(
    config: &Config,
    student: &User,
    fields: EntryFields<'_>,
) -> Result<MarkDraft, GradingError> {
    let class_label = ensure_class_matches(student, fields.class_label)?;
    let exam_period = canonical_exam_period(fields.exam_period, &config.exam_periods)?;
    let subject = normalize_subject(fields.subject)?;
    let total_possible = resolve_total_possible(fields.total_possible, config)?;
    let score = parse_score(fields.score)?;
    check_score_range(score, total_possible)?;
    let grade = grade_for_fraction(score, total_possible)?;
    let remarks = normalize_remarks(fields.remarks, config.max_remarks_len)?;

    Ok(MarkDraft {
        subject,
        class_label,
        exam_period,
        score,
        total_possible,
        grade,
        remarks,
    })
}

/// A mark may only reference an active user with the student role
pub fn ensure_gradeable_student(user: &User) -> Result<(), GradingError> {
    if user.role != Role::Student {
        return Err(GradingError::InvalidStudent {
            reason: format!("user {} has role '{}', not student", user.id, user.role),
        });
    }
    if !user.active {
        return Err(GradingError::InvalidStudent {
            reason: format!("student '{}' is inactive", user.display_name),
        });
    }
    Ok(())
}

/// Returns the student's class label when it equals the declared one
pub fn ensure_class_matches(student: &User, declared: &str) -> Result<String, GradingError> {
    let declared = normalize_class(declared);
    if declared.is_empty() {
        return Err(GradingError::Validation {
            message: "class is required".to_string(),
        });
    }

    match student.class_label.as_deref().map(normalize_class) {
        Some(recorded) if recorded == declared => Ok(recorded),
        Some(recorded) => Err(GradingError::ClassMismatch {
            expected: recorded,
            actual: declared,
        }),
        None => Err(GradingError::ClassMismatch {
            expected: "(none)".to_string(),
            actual: declared,
        }),
    }
}

pub fn normalize_class(class_label: &str) -> String {
    class_label.trim().to_string()
}

/// Trim, collapse inner whitespace and upper-case a subject label
pub fn normalize_subject(subject: &str) -> Result<String, GradingError> {
    let normalized = subject
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase();
    if normalized.is_empty() {
        return Err(GradingError::Validation {
            message: "subject is required".to_string(),
        });
    }
    Ok(normalized)
}

/// Match an exam period case-insensitively and return the configured spelling
pub fn canonical_exam_period(
    exam_period: &str,
    recognized: &[String],
) -> Result<String, GradingError> {
    let wanted = exam_period.trim();
    recognized
        .iter()
        .find(|p| p.trim().eq_ignore_ascii_case(wanted))
        .map(|p| p.trim().to_string())
        .ok_or_else(|| GradingError::InvalidExamPeriod {
            exam_period: exam_period.to_string(),
        })
}

/// Parse a raw score. Numeric strings are accepted; anything else is rejected.
pub fn parse_score(score: &RawScore) -> Result<f64, GradingError> {
    let value = match score {
        RawScore::Number(n) => *n,
        RawScore::Text(text) => {
            text.trim()
                .parse::<f64>()
                .map_err(|_| GradingError::InvalidScore {
                    reason: format!("'{}' is not a number", text),
                })?
        }
        RawScore::Missing => {
            return Err(GradingError::InvalidScore {
                reason: "score is required".to_string(),
            })
        }
        RawScore::Unsupported(shape) => {
            return Err(GradingError::InvalidScore {
                reason: format!("{} is not a number", shape),
            })
        }
    };

    if !value.is_finite() {
        return Err(GradingError::InvalidScore {
            reason: "score is not a finite number".to_string(),
        });
    }
    Ok(value)
}

pub fn check_score_range(score: f64, total_possible: f64) -> Result<(), GradingError> {
    if score < 0.0 || score > total_possible {
        return Err(GradingError::InvalidScore {
            reason: format!("score {} is outside 0-{}", score, total_possible),
        });
    }
    Ok(())
}

pub fn resolve_total_possible(declared: Option<f64>, config: &Config) -> Result<f64, GradingError> {
    let total = declared.unwrap_or(config.default_total_possible);
    if !total.is_finite() || total <= 0.0 {
        return Err(GradingError::InvalidScore {
            reason: format!("total possible {} must be greater than zero", total),
        });
    }
    if total > config.max_total_possible {
        return Err(GradingError::InvalidScore {
            reason: format!(
                "total possible {} exceeds the maximum of {}",
                total, config.max_total_possible
            ),
        });
    }
    Ok(total)
}

/// Blank remarks are dropped; long ones rejected
pub fn normalize_remarks(
    remarks: Option<&str>,
    max_len: usize,
) -> Result<Option<String>, GradingError> {
    let Some(text) = remarks.map(str::trim).filter(|r| !r.is_empty()) else {
        return Ok(None);
    };
    if text.chars().count() > max_len {
        return Err(GradingError::Validation {
            message: format!("remarks exceed {} characters", max_len),
        });
    }
    Ok(Some(text.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn student(class_label: Option<&str>) -> User {
        User {
            id: Uuid::new_v4(),
            display_name: "Nimal Perera".to_string(),
            admission_number: Some("1001".to_string()),
            class_label: class_label.map(str::to_string),
            role: Role::Student,
            active: true,
            created_at: chrono::Utc::now(),
        }
    }

    fn fields<'a>(score: &'a RawScore) -> EntryFields<'a> {
        EntryFields {
            subject: " maths ",
            class_label: "10A",
            exam_period: "term 1",
            score,
            total_possible: None,
            remarks: Some("  "),
        }
    }

    #[test]
    fn test_validate_entry_normalizes_fields() {
        let score = RawScore::from(82.0);
        let draft = validate_entry(&Config::default(), &student(Some("10A")), fields(&score))
            .unwrap();

        assert_eq!(draft.subject, "MATHS");
        assert_eq!(draft.exam_period, "Term 1");
        assert_eq!(draft.class_label, "10A");
        assert_eq!(draft.total_possible, 100.0);
        assert_eq!(draft.grade, Grade::A);
        assert_eq!(draft.remarks, None);
    }

    #[test]
    fn test_parse_score_accepts_numeric_text() {
        assert_eq!(parse_score(&RawScore::from(" 67.5 ")), Ok(67.5));
        assert_eq!(parse_score(&RawScore::from(40)), Ok(40.0));
    }

    #[test]
    fn test_parse_score_rejects_non_numeric() {
        for raw in [
            RawScore::from("abc"),
            RawScore::from(""),
            RawScore::Missing,
            RawScore::Unsupported("true".to_string()),
            RawScore::Number(f64::NAN),
            RawScore::from("inf"),
        ] {
            assert!(
                matches!(parse_score(&raw), Err(GradingError::InvalidScore { .. })),
                "{:?} should be rejected",
                raw
            );
        }
    }

    #[test]
    fn test_score_range() {
        assert!(check_score_range(0.0, 100.0).is_ok());
        assert!(check_score_range(100.0, 100.0).is_ok());
        assert!(check_score_range(150.0, 100.0).is_err());
        assert!(check_score_range(-1.0, 100.0).is_err());
        assert!(check_score_range(45.0, 50.0).is_ok());
    }

    #[test]
    fn test_total_possible_bounds() {
        let cfg = Config::default();
        assert_eq!(resolve_total_possible(None, &cfg), Ok(100.0));
        assert_eq!(resolve_total_possible(Some(50.0), &cfg), Ok(50.0));
        assert!(resolve_total_possible(Some(0.0), &cfg).is_err());
        assert!(resolve_total_possible(Some(-5.0), &cfg).is_err());
        assert!(resolve_total_possible(Some(5000.0), &cfg).is_err());
    }

    #[test]
    fn test_exam_period_must_be_recognized() {
        let periods = Config::default().exam_periods;
        assert_eq!(canonical_exam_period(" TERM 2", &periods), Ok("Term 2".to_string()));
        assert_eq!(
            canonical_exam_period("Midterm", &periods),
            Err(GradingError::InvalidExamPeriod {
                exam_period: "Midterm".to_string()
            })
        );
    }

    #[test]
    fn test_class_mismatch() {
        let result = ensure_class_matches(&student(Some("10A")), "10B");
        assert_eq!(
            result,
            Err(GradingError::ClassMismatch {
                expected: "10A".to_string(),
                actual: "10B".to_string()
            })
        );
        assert!(ensure_class_matches(&student(None), "10A").is_err());
        assert!(matches!(
            ensure_class_matches(&student(Some("10A")), "  "),
            Err(GradingError::Validation { .. })
        ));
    }

    #[test]
    fn test_gradeable_student() {
        let mut user = student(Some("10A"));
        assert!(ensure_gradeable_student(&user).is_ok());

        user.active = false;
        assert!(matches!(
            ensure_gradeable_student(&user),
            Err(GradingError::InvalidStudent { .. })
        ));

        user.active = true;
        user.role = Role::Staff;
        assert!(ensure_gradeable_student(&user).is_err());
    }

    #[test]
    fn test_subject_and_remarks() {
        assert_eq!(normalize_subject("combined   maths"), Ok("COMBINED MATHS".to_string()));
        assert!(normalize_subject("   ").is_err());
        assert_eq!(normalize_remarks(Some(" good "), 10), Ok(Some("good".to_string())));
        assert!(normalize_remarks(Some("far too long"), 5).is_err());
    }
}
