//! Native client implementation - wraps domain service for in-process calls

use crate::contract::{
    BulkOutcome, CallerContext, Grade, GradingApi, GradingError, MarkFilter, MarkRecord, NewMark,
    RawMarkEntry, StudentReport,
};
use crate::domain::Service;
use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

/// Native client implementation that directly calls the domain service
///
/// This client is used for in-process communication without HTTP overhead.
#[derive(Clone)]
pub struct NativeClient {
    service: Arc<Service>,
}

impl NativeClient {
    /// Create a new native client
    pub fn new(service: Arc<Service>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl GradingApi for NativeClient {
    async fn submit_mark(
        &self,
        ctx: &CallerContext,
        new_mark: NewMark,
    ) -> Result<MarkRecord, GradingError> {
        self.service.submit_mark(ctx, new_mark).await
    }

    async fn submit_marks_bulk(
        &self,
        ctx: &CallerContext,
        entries: Vec<RawMarkEntry>,
    ) -> Result<BulkOutcome, GradingError> {
        self.service.submit_marks_bulk(ctx, entries).await
    }

    async fn get_mark(
        &self,
        ctx: &CallerContext,
        mark_id: Uuid,
    ) -> Result<MarkRecord, GradingError> {
        self.service.get_mark(ctx, mark_id).await
    }

    async fn list_marks(
        &self,
        ctx: &CallerContext,
        filter: MarkFilter,
    ) -> Result<Vec<MarkRecord>, GradingError> {
        self.service.list_marks(ctx, filter).await
    }

    async fn student_report(
        &self,
        ctx: &CallerContext,
        student_id: Uuid,
    ) -> Result<StudentReport, GradingError> {
        self.service.student_report(ctx, student_id).await
    }

    async fn delete_mark(&self, ctx: &CallerContext, mark_id: Uuid) -> Result<(), GradingError> {
        self.service.delete_mark(ctx, mark_id).await
    }

    fn preview_grade(&self, score: f64) -> Result<Grade, GradingError> {
        self.service.preview_grade(score)
    }
}
