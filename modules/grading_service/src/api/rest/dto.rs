//! REST DTOs with serde derives for HTTP API

use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

// ===== Mark DTOs =====

/// Mark response DTO, enriched with student and marking-staff names
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MarkDto {
    pub id: Uuid,

    pub student_id: Uuid,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub admission_number: Option<String>,

    #[schema(example = "MATH")]
    pub subject: String,

    /// Class label recorded on the mark
    #[serde(rename = "class")]
    #[schema(example = "10A")]
    pub class_label: String,

    #[schema(example = "Term 1")]
    pub exam_period: String,

    pub score: f64,

    pub total_possible: f64,

    /// Derived letter grade (A, B, C, S, F)
    #[schema(example = "A")]
    pub grade: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,

    pub marked_by: Uuid,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub marked_by_name: Option<String>,

    pub created_at: chrono::DateTime<chrono::Utc>,

    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// Single mark submission. A `grade` field, if sent, is ignored.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitMarkRequest {
    pub student_id: Uuid,

    pub subject: String,

    #[serde(rename = "class")]
    pub class_label: String,

    pub exam_period: String,

    /// Number or numeric string
    #[serde(default)]
    #[schema(value_type = Object)]
    pub score: serde_json::Value,

    /// Defaults to 100
    #[serde(default)]
    pub total_possible: Option<f64>,

    #[serde(default)]
    pub remarks: Option<String>,
}

/// One row of a bulk submission.
///
/// Missing fields default to empty. Rows are decoded one at a time (see
/// `mapper::bulk_entry`), so a wrongly typed field fails only its own row.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BulkMarkEntryDto {
    #[serde(default)]
    pub student_name: String,

    #[serde(default, deserialize_with = "lenient_string")]
    pub admission_number: Option<String>,

    /// Used when no admission number is given
    #[serde(default, deserialize_with = "lenient_string")]
    pub student_id: Option<String>,

    #[serde(default)]
    pub subject: String,

    #[serde(default, rename = "class")]
    pub class_label: String,

    #[serde(default)]
    pub exam_period: String,

    /// Number or numeric string
    #[serde(default)]
    #[schema(value_type = Object)]
    pub score: serde_json::Value,

    #[serde(default)]
    pub total_possible: Option<f64>,

    #[serde(default)]
    pub remarks: Option<String>,
}

/// Accept a string or a number (admission numbers often arrive as numbers)
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) => Some(s),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

/// Failure ledger entry
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BulkErrorDto {
    /// Position of the row in the submitted array
    pub index: usize,

    pub subject: String,

    pub error: String,
}

/// Bulk submission response.
///
/// `errors` is present only when at least one row failed; `data` always
/// lists the rows that were stored.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BulkSubmitResponse {
    pub success: bool,

    pub data: Vec<MarkDto>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<BulkErrorDto>>,
}

/// List of marks
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MarksListResponse {
    pub items: Vec<MarkDto>,

    pub total: usize,
}

// ===== Report DTOs =====

/// Count of marks per grade band
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct GradeCountsDto {
    #[serde(rename = "A")]
    pub a: usize,
    #[serde(rename = "B")]
    pub b: usize,
    #[serde(rename = "C")]
    pub c: usize,
    #[serde(rename = "S")]
    pub s: usize,
    #[serde(rename = "F")]
    pub f: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummaryDto {
    pub total_score: f64,
    pub total_possible: f64,
    pub subject_count: usize,
    /// Mean percentage across the marks
    pub average_score: f64,
    pub grade_counts: GradeCountsDto,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PeriodSummaryDto {
    pub exam_period: String,
    pub summary: ReportSummaryDto,
}

/// Student report response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StudentReportDto {
    pub student_id: Uuid,

    pub student_name: String,

    #[serde(rename = "class", skip_serializing_if = "Option::is_none")]
    pub class_label: Option<String>,

    pub periods: Vec<PeriodSummaryDto>,

    pub overall: ReportSummaryDto,
}

// ===== Grade preview DTOs =====

#[derive(Debug, Clone, Deserialize)]
pub struct GradePreviewQuery {
    pub score: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct GradePreviewResponse {
    pub score: f64,

    #[schema(example = "B")]
    pub grade: String,
}

/// Configured exam periods
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ExamPeriodsResponse {
    pub items: Vec<String>,
}

// Note: Conversion implementations live in mapper.rs
