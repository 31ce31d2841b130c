//! HTTP request handlers - thin layer that delegates to domain service

use crate::contract::{MarkFilter, RawScore};
use crate::domain::{validation, Service};
use super::{
    auth::Caller,
    dto::*,
    error::{map_domain_error, Problem},
    mapper,
};
use axum::{
    extract::{Path, Query},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

// ===== Mark Handlers =====

/// Submit or overwrite one mark
pub async fn submit_mark(
    service: Arc<Service>,
    Caller(ctx): Caller,
    Json(req): Json<SubmitMarkRequest>,
) -> Result<Json<MarkDto>, Problem> {
    let record = service
        .submit_mark(&ctx, req.into())
        .await
        .map_err(map_domain_error)?;

    Ok(Json(record.into()))
}

/// Submit a batch of marks.
///
/// 200 when every row was stored, 207 when the ledger is non-empty.
pub async fn submit_marks_bulk(
    service: Arc<Service>,
    Caller(ctx): Caller,
    Json(rows): Json<Vec<serde_json::Value>>,
) -> Result<(StatusCode, Json<BulkSubmitResponse>), Problem> {
    let entries = rows.into_iter().map(mapper::bulk_entry).collect();
    let outcome = service
        .submit_marks_bulk(&ctx, entries)
        .await
        .map_err(map_domain_error)?;

    let status = if outcome.success {
        StatusCode::OK
    } else {
        StatusCode::MULTI_STATUS
    };
    Ok((status, Json(outcome.into())))
}

/// Query parameters for listing marks
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListMarksQuery {
    pub student_id: Option<Uuid>,
    #[serde(rename = "class")]
    pub class_label: Option<String>,
    pub subject: Option<String>,
    pub exam_period: Option<String>,
}

/// List marks with optional filters
pub async fn list_marks(
    service: Arc<Service>,
    Caller(ctx): Caller,
    Query(query): Query<ListMarksQuery>,
) -> Result<Json<MarksListResponse>, Problem> {
    let filter = MarkFilter {
        student_id: query.student_id,
        class_label: query.class_label,
        subject: query.subject,
        exam_period: query.exam_period,
    };

    let records = service
        .list_marks(&ctx, filter)
        .await
        .map_err(map_domain_error)?;

    let items: Vec<MarkDto> = records.into_iter().map(Into::into).collect();
    let total = items.len();

    Ok(Json(MarksListResponse { items, total }))
}

/// Get a specific mark
pub async fn get_mark(
    service: Arc<Service>,
    Caller(ctx): Caller,
    Path(mark_id): Path<Uuid>,
) -> Result<Json<MarkDto>, Problem> {
    let record = service
        .get_mark(&ctx, mark_id)
        .await
        .map_err(map_domain_error)?;

    Ok(Json(record.into()))
}

/// Delete a mark
pub async fn delete_mark(
    service: Arc<Service>,
    Caller(ctx): Caller,
    Path(mark_id): Path<Uuid>,
) -> Result<StatusCode, Problem> {
    service
        .delete_mark(&ctx, mark_id)
        .await
        .map_err(map_domain_error)?;

    Ok(StatusCode::NO_CONTENT)
}

// ===== Report Handlers =====

/// Per-period and overall report for a student
pub async fn student_report(
    service: Arc<Service>,
    Caller(ctx): Caller,
    Path(student_id): Path<Uuid>,
) -> Result<Json<StudentReportDto>, Problem> {
    let report = service
        .student_report(&ctx, student_id)
        .await
        .map_err(map_domain_error)?;

    Ok(Json(report.into()))
}

// ===== Grade Handlers =====

/// Grade a score would receive; nothing is stored
pub async fn preview_grade(
    service: Arc<Service>,
    Query(query): Query<GradePreviewQuery>,
) -> Result<Json<GradePreviewResponse>, Problem> {
    let score = validation::parse_score(&RawScore::Text(query.score)).map_err(map_domain_error)?;
    let grade = service.preview_grade(score).map_err(map_domain_error)?;

    Ok(Json(GradePreviewResponse {
        score,
        grade: grade.to_string(),
    }))
}

/// List configured exam periods
pub async fn list_exam_periods(service: Arc<Service>) -> Json<ExamPeriodsResponse> {
    Json(ExamPeriodsResponse {
        items: service.exam_periods().to_vec(),
    })
}
