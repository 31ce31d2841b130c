//! Contract error types for grading service
//!
//! These errors are transport-agnostic and used for inter-module communication.

/// Grading service domain errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GradingError {
    /// Student reference does not resolve, is not a student, or is inactive
    InvalidStudent {
        /// Why the reference was rejected
        reason: String,
    },
    /// Declared class differs from the student's recorded class
    ClassMismatch {
        /// Class recorded on the student
        expected: String,
        /// Class declared by the submission
        actual: String,
    },
    /// Score is non-numeric or out of range
    InvalidScore {
        /// Why the score was rejected
        reason: String,
    },
    /// Exam period is not one of the configured terms
    InvalidExamPeriod {
        /// Submitted exam period
        exam_period: String,
    },
    /// Malformed request or entry
    Validation {
        /// Validation error message
        message: String,
    },
    /// Store reported a unique-key violation despite upsert semantics
    DuplicateKeyConflict {
        /// Natural key that collided
        key: String,
    },
    /// Caller is not allowed to perform the operation
    Unauthorized {
        /// Why the caller was rejected
        reason: String,
    },
    /// Mark or user not found
    NotFound {
        /// Resource type (mark, student)
        resource: String,
        /// Resource identifier
        id: String,
    },
    /// Internal error
    Internal,
}

impl GradingError {
    /// Errors that abort a whole call rather than a single bulk row
    pub fn is_call_level(&self) -> bool {
        matches!(
            self,
            Self::Internal | Self::DuplicateKeyConflict { .. } | Self::Unauthorized { .. }
        )
    }
}

impl std::fmt::Display for GradingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidStudent { reason } => {
                write!(f, "Invalid student: {}", reason)
            }
            Self::ClassMismatch { expected, actual } => {
                write!(
                    f,
                    "Class mismatch: student is in class '{}', entry declares '{}'",
                    expected, actual
                )
            }
            Self::InvalidScore { reason } => {
                write!(f, "Invalid score: {}", reason)
            }
            Self::InvalidExamPeriod { exam_period } => {
                write!(f, "Invalid exam period: '{}'", exam_period)
            }
            Self::Validation { message } => {
                write!(f, "Validation error: {}", message)
            }
            Self::DuplicateKeyConflict { key } => {
                write!(f, "Duplicate key conflict: {}", key)
            }
            Self::Unauthorized { reason } => {
                write!(f, "Unauthorized: {}", reason)
            }
            Self::NotFound { resource, id } => {
                write!(f, "{} not found: {}", resource, id)
            }
            Self::Internal => {
                write!(f, "Internal error")
            }
        }
    }
}

impl std::error::Error for GradingError {}
