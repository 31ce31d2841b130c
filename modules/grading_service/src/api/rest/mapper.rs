//! Mapper implementations for converting between DTOs and contract models
//!
//! This module contains all From/Into implementations for bidirectional
//! conversion between REST DTOs and transport-agnostic contract models.

use super::dto::*;
use crate::contract;

// ===== Score conversion =====

/// Keep the JSON shape of a score so validation can report it per entry
pub fn raw_score(value: serde_json::Value) -> contract::RawScore {
    match value {
        serde_json::Value::Null => contract::RawScore::Missing,
        serde_json::Value::Number(n) => match n.as_f64() {
            Some(f) => contract::RawScore::Number(f),
            None => contract::RawScore::Unsupported(n.to_string()),
        },
        serde_json::Value::String(s) => contract::RawScore::Text(s),
        other => contract::RawScore::Unsupported(other.to_string()),
    }
}

// ===== Submission conversions =====

impl From<SubmitMarkRequest> for contract::NewMark {
    fn from(req: SubmitMarkRequest) -> Self {
        Self {
            student_id: req.student_id,
            subject: req.subject,
            class_label: req.class_label,
            exam_period: req.exam_period,
            score: raw_score(req.score),
            total_possible: req.total_possible,
            remarks: req.remarks,
        }
    }
}

impl From<BulkMarkEntryDto> for contract::RawMarkEntry {
    fn from(dto: BulkMarkEntryDto) -> Self {
        Self {
            student_name: dto.student_name,
            admission_number: dto.admission_number,
            student_id: dto.student_id,
            subject: dto.subject,
            class_label: dto.class_label,
            exam_period: dto.exam_period,
            score: raw_score(dto.score),
            total_possible: dto.total_possible,
            remarks: dto.remarks,
            malformed: None,
        }
    }
}

/// Decode one bulk row. A row serde cannot read becomes an entry carrying
/// the decode error, which the service reports in the failure ledger.
pub fn bulk_entry(value: serde_json::Value) -> contract::RawMarkEntry {
    let subject = value
        .get("subject")
        .and_then(serde_json::Value::as_str)
        .unwrap_or_default()
        .to_string();

    match serde_json::from_value::<BulkMarkEntryDto>(value) {
        Ok(dto) => dto.into(),
        Err(e) => contract::RawMarkEntry {
            student_name: String::new(),
            admission_number: None,
            student_id: None,
            subject,
            class_label: String::new(),
            exam_period: String::new(),
            score: contract::RawScore::Missing,
            total_possible: None,
            remarks: None,
            malformed: Some(e.to_string()),
        },
    }
}

// ===== Mark conversions =====

impl From<contract::MarkRecord> for MarkDto {
    fn from(record: contract::MarkRecord) -> Self {
        let mark = record.mark;
        Self {
            id: mark.id,
            student_id: mark.student_id,
            student_name: record.student_name,
            admission_number: record.admission_number,
            subject: mark.subject,
            class_label: mark.class_label,
            exam_period: mark.exam_period,
            score: mark.score,
            total_possible: mark.total_possible,
            grade: mark.grade.to_string(),
            remarks: mark.remarks,
            marked_by: mark.marked_by,
            marked_by_name: record.marked_by_name,
            created_at: mark.created_at,
            updated_at: mark.updated_at,
        }
    }
}

impl From<contract::EntryFailure> for BulkErrorDto {
    fn from(failure: contract::EntryFailure) -> Self {
        Self {
            index: failure.index,
            subject: failure.subject,
            error: failure.reason,
        }
    }
}

impl From<contract::BulkOutcome> for BulkSubmitResponse {
    fn from(outcome: contract::BulkOutcome) -> Self {
        let errors = if outcome.failures.is_empty() {
            None
        } else {
            Some(outcome.failures.into_iter().map(Into::into).collect())
        };

        Self {
            success: outcome.success,
            data: outcome.marks.into_iter().map(Into::into).collect(),
            errors,
        }
    }
}

// ===== Report conversions =====

impl From<contract::GradeHistogram> for GradeCountsDto {
    fn from(h: contract::GradeHistogram) -> Self {
        Self {
            a: h.a,
            b: h.b,
            c: h.c,
            s: h.s,
            f: h.f,
        }
    }
}

impl From<contract::ReportSummary> for ReportSummaryDto {
    fn from(summary: contract::ReportSummary) -> Self {
        Self {
            total_score: summary.total_score,
            total_possible: summary.total_possible,
            subject_count: summary.subject_count,
            average_score: summary.average_score,
            grade_counts: summary.grade_counts.into(),
        }
    }
}

impl From<contract::StudentReport> for StudentReportDto {
    fn from(report: contract::StudentReport) -> Self {
        Self {
            student_id: report.student_id,
            student_name: report.student_name,
            class_label: report.class_label,
            periods: report
                .periods
                .into_iter()
                .map(|p| PeriodSummaryDto {
                    exam_period: p.exam_period,
                    summary: p.summary.into(),
                })
                .collect(),
            overall: report.overall.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_raw_score_keeps_shape() {
        assert_eq!(raw_score(json!(82)), contract::RawScore::Number(82.0));
        assert_eq!(raw_score(json!("82")), contract::RawScore::Text("82".into()));
        assert_eq!(raw_score(json!(null)), contract::RawScore::Missing);
        assert_eq!(
            raw_score(json!(true)),
            contract::RawScore::Unsupported("true".into())
        );
    }

    #[test]
    fn test_bulk_entry_parses_camel_case_and_numeric_admission() {
        let dto: BulkMarkEntryDto = serde_json::from_value(json!({
            "studentName": "Ayesha",
            "admissionNumber": 1042,
            "subject": "Math",
            "class": "10A",
            "examPeriod": "Term 1",
            "score": "77",
            "grade": "F"
        }))
        .unwrap();

        let entry: contract::RawMarkEntry = dto.into();
        assert_eq!(entry.admission_number.as_deref(), Some("1042"));
        assert_eq!(entry.class_label, "10A");
        assert_eq!(entry.score, contract::RawScore::Text("77".into()));
        assert_eq!(entry.total_possible, None);
    }

    #[test]
    fn test_wrongly_typed_row_is_kept_as_malformed() {
        let entry = bulk_entry(json!({
            "studentName": "Ayesha",
            "subject": "Math",
            "totalPossible": "50"
        }));
        assert_eq!(entry.subject, "Math");
        let reason = entry.malformed.unwrap();
        assert!(reason.contains("invalid type"), "{}", reason);

        let entry = bulk_entry(json!({ "subject": 7 }));
        assert_eq!(entry.subject, "");
        assert!(entry.malformed.is_some());

        let entry = bulk_entry(json!({ "subject": "Art", "score": 40 }));
        assert_eq!(entry.malformed, None);
        assert_eq!(entry.score, contract::RawScore::Number(40.0));
    }

    #[test]
    fn test_bulk_response_omits_errors_on_success() {
        let outcome = contract::BulkOutcome {
            success: true,
            marks: vec![],
            failures: vec![],
        };
        let value = serde_json::to_value(BulkSubmitResponse::from(outcome)).unwrap();
        assert_eq!(value, json!({ "success": true, "data": [] }));
    }
}
