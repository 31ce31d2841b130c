//! Contract models for grading service
//!
//! These models are transport-agnostic and used for inter-module communication.
//! NO serde derives - these are pure domain models.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Role tag carried by every user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Student,
    Staff,
    Admin,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Staff => "staff",
            Role::Admin => "admin",
        }
    }

    /// Parse a role tag, ignoring case and surrounding whitespace
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "student" => Some(Role::Student),
            "staff" | "teacher" => Some(Role::Staff),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }

    /// Whether this role may create, update or delete marks
    pub fn can_grade(self) -> bool {
        matches!(self, Role::Staff | Role::Admin)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolved identity of the caller, supplied by the access-control layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallerContext {
    pub caller_id: Uuid,
    pub role: Role,
}

impl CallerContext {
    pub fn new(caller_id: Uuid, role: Role) -> Self {
        Self { caller_id, role }
    }

    pub fn student(caller_id: Uuid) -> Self {
        Self::new(caller_id, Role::Student)
    }

    pub fn staff(caller_id: Uuid) -> Self {
        Self::new(caller_id, Role::Staff)
    }

    pub fn admin(caller_id: Uuid) -> Self {
        Self::new(caller_id, Role::Admin)
    }
}

/// A user as seen by the grading engine
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: Uuid,
    pub display_name: String,
    /// Admission number, unique within a class
    pub admission_number: Option<String>,
    pub class_label: Option<String>,
    pub role: Role,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

/// Ordinal letter grade derived from a score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Grade {
    A,
    B,
    C,
    S,
    F,
}

impl Grade {
    pub const ALL: [Grade; 5] = [Grade::A, Grade::B, Grade::C, Grade::S, Grade::F];

    pub fn as_str(self) -> &'static str {
        match self {
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::S => "S",
            Grade::F => "F",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "A" | "a" => Some(Grade::A),
            "B" | "b" => Some(Grade::B),
            "C" | "c" => Some(Grade::C),
            "S" | "s" => Some(Grade::S),
            "F" | "f" => Some(Grade::F),
            _ => None,
        }
    }
}

impl std::fmt::Display for Grade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Persisted mark, unique on (student_id, subject, exam_period)
#[derive(Debug, Clone, PartialEq)]
pub struct Mark {
    pub id: Uuid,
    pub student_id: Uuid,
    /// Trimmed, upper-cased subject label
    pub subject: String,
    pub class_label: String,
    /// Canonical spelling from the configured exam periods
    pub exam_period: String,
    pub score: f64,
    pub total_possible: f64,
    pub grade: Grade,
    pub remarks: Option<String>,
    /// Staff member who last wrote this mark
    pub marked_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Mark enriched with student and marking-staff display fields
#[derive(Debug, Clone, PartialEq)]
pub struct MarkRecord {
    pub mark: Mark,
    pub student_name: Option<String>,
    pub admission_number: Option<String>,
    pub student_class: Option<String>,
    pub marked_by_name: Option<String>,
}

/// Score as received from a client, before validation
#[derive(Debug, Clone, PartialEq)]
pub enum RawScore {
    Number(f64),
    Text(String),
    Missing,
    /// Any other JSON shape (bool, array, object), kept for the error message
    Unsupported(String),
}

impl From<f64> for RawScore {
    fn from(value: f64) -> Self {
        RawScore::Number(value)
    }
}

impl From<i64> for RawScore {
    fn from(value: i64) -> Self {
        RawScore::Number(value as f64)
    }
}

impl From<&str> for RawScore {
    fn from(value: &str) -> Self {
        RawScore::Text(value.to_string())
    }
}

/// Single mark submission against a resolved student id
#[derive(Debug, Clone, PartialEq)]
pub struct NewMark {
    pub student_id: Uuid,
    pub subject: String,
    pub class_label: String,
    pub exam_period: String,
    pub score: RawScore,
    pub total_possible: Option<f64>,
    pub remarks: Option<String>,
}

/// One row of a bulk submission, identified by human-entered fields
#[derive(Debug, Clone, PartialEq)]
pub struct RawMarkEntry {
    pub student_name: String,
    pub admission_number: Option<String>,
    /// Fallback identifier used when no admission number is given
    pub student_id: Option<String>,
    pub subject: String,
    pub class_label: String,
    pub exam_period: String,
    pub score: RawScore,
    pub total_possible: Option<f64>,
    pub remarks: Option<String>,
    /// Set when the row could not be read off the wire; the row is rejected with this reason
    pub malformed: Option<String>,
}

/// Failure ledger entry for one bulk row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryFailure {
    /// Position of the row in the submitted batch
    pub index: usize,
    pub subject: String,
    pub reason: String,
}

/// Result of a bulk submission
#[derive(Debug, Clone, PartialEq)]
pub struct BulkOutcome {
    /// True only when every row was persisted
    pub success: bool,
    pub marks: Vec<MarkRecord>,
    pub failures: Vec<EntryFailure>,
}

/// Optional filters for listing marks
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarkFilter {
    pub student_id: Option<Uuid>,
    pub class_label: Option<String>,
    pub subject: Option<String>,
    pub exam_period: Option<String>,
}

/// Count of marks per grade band
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GradeHistogram {
    pub a: usize,
    pub b: usize,
    pub c: usize,
    pub s: usize,
    pub f: usize,
}

impl GradeHistogram {
    pub fn record(&mut self, grade: Grade) {
        match grade {
            Grade::A => self.a += 1,
            Grade::B => self.b += 1,
            Grade::C => self.c += 1,
            Grade::S => self.s += 1,
            Grade::F => self.f += 1,
        }
    }

    pub fn count(&self, grade: Grade) -> usize {
        match grade {
            Grade::A => self.a,
            Grade::B => self.b,
            Grade::C => self.c,
            Grade::S => self.s,
            Grade::F => self.f,
        }
    }

    pub fn total(&self) -> usize {
        self.a + self.b + self.c + self.s + self.f
    }
}

/// Totals over a set of marks
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportSummary {
    /// Sum of raw scores
    pub total_score: f64,
    /// Sum of the totals those scores were out of
    pub total_possible: f64,
    pub subject_count: usize,
    /// Mean of the per-mark percentages; zero when there are no marks
    pub average_score: f64,
    pub grade_counts: GradeHistogram,
}

/// Summary for one exam period
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodSummary {
    pub exam_period: String,
    pub summary: ReportSummary,
}

/// Per-period and overall report for one student
#[derive(Debug, Clone, PartialEq)]
pub struct StudentReport {
    pub student_id: Uuid,
    pub student_name: String,
    pub class_label: Option<String>,
    pub periods: Vec<PeriodSummary>,
    pub overall: ReportSummary,
}
