//! Route registration and OpenAPI document

use crate::domain::Service;
use super::{auth::Caller, dto::*, error::Problem, handlers};
use axum::{
    extract::{Path, Query},
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use std::sync::Arc;
use utoipa::OpenApi;
use uuid::Uuid;

/// Schemas exposed by the grading API
#[derive(OpenApi)]
#[openapi(
    info(title = "Grading Service", description = "Mark submission, grade banding and reports"),
    components(schemas(
        MarkDto,
        SubmitMarkRequest,
        BulkMarkEntryDto,
        BulkErrorDto,
        BulkSubmitResponse,
        MarksListResponse,
        GradeCountsDto,
        ReportSummaryDto,
        PeriodSummaryDto,
        StudentReportDto,
        GradePreviewResponse,
        ExamPeriodsResponse,
    ))
)]
pub struct ApiDoc;

/// Register all REST routes
pub fn register_routes(router: Router, service: Arc<Service>) -> anyhow::Result<Router> {
    let router = router
        // Marks
        .route("/marks", post(submit_mark_handler).get(list_marks_handler))
        .route("/marks/bulk", post(submit_marks_bulk_handler))
        .route("/marks/{id}", get(get_mark_handler).delete(delete_mark_handler))
        // Reports
        .route("/students/{id}/report", get(student_report_handler))
        // Grades
        .route("/grades/preview", get(preview_grade_handler))
        .route("/exam-periods", get(exam_periods_handler))
        .route("/openapi.json", get(openapi_handler))
        // Add service as extension for handlers
        .layer(Extension(service));

    Ok(router)
}

// ===== Handler wrappers that extract service from Extension =====

async fn submit_mark_handler(
    Extension(service): Extension<Arc<Service>>,
    caller: Caller,
    json: Json<SubmitMarkRequest>,
) -> Result<Json<MarkDto>, Problem> {
    handlers::submit_mark(service, caller, json).await
}

async fn submit_marks_bulk_handler(
    Extension(service): Extension<Arc<Service>>,
    caller: Caller,
    json: Json<Vec<serde_json::Value>>,
) -> Result<(StatusCode, Json<BulkSubmitResponse>), Problem> {
    handlers::submit_marks_bulk(service, caller, json).await
}

async fn list_marks_handler(
    Extension(service): Extension<Arc<Service>>,
    caller: Caller,
    query: Query<handlers::ListMarksQuery>,
) -> Result<Json<MarksListResponse>, Problem> {
    handlers::list_marks(service, caller, query).await
}

async fn get_mark_handler(
    Extension(service): Extension<Arc<Service>>,
    caller: Caller,
    path: Path<Uuid>,
) -> Result<Json<MarkDto>, Problem> {
    handlers::get_mark(service, caller, path).await
}

async fn delete_mark_handler(
    Extension(service): Extension<Arc<Service>>,
    caller: Caller,
    path: Path<Uuid>,
) -> Result<StatusCode, Problem> {
    handlers::delete_mark(service, caller, path).await
}

async fn student_report_handler(
    Extension(service): Extension<Arc<Service>>,
    caller: Caller,
    path: Path<Uuid>,
) -> Result<Json<StudentReportDto>, Problem> {
    handlers::student_report(service, caller, path).await
}

async fn preview_grade_handler(
    Extension(service): Extension<Arc<Service>>,
    query: Query<GradePreviewQuery>,
) -> Result<Json<GradePreviewResponse>, Problem> {
    handlers::preview_grade(service, query).await
}

async fn exam_periods_handler(
    Extension(service): Extension<Arc<Service>>,
) -> Json<ExamPeriodsResponse> {
    handlers::list_exam_periods(service).await
}

async fn openapi_handler() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
