//! Native client trait for inter-module communication
//!
//! This trait defines the API that other modules use to interact with the grading service.
//! NO HTTP - direct function calls for performance.

use super::{
    error::GradingError,
    model::{
        BulkOutcome, CallerContext, Grade, MarkFilter, MarkRecord, NewMark, RawMarkEntry,
        StudentReport,
    },
};
use async_trait::async_trait;
use uuid::Uuid;

/// Grading service API for inter-module communication
#[async_trait]
pub trait GradingApi: Send + Sync {
    // ===== Submission =====

    /// Create or overwrite one mark
    async fn submit_mark(
        &self,
        ctx: &CallerContext,
        new_mark: NewMark,
    ) -> Result<MarkRecord, GradingError>;

    /// Apply a batch of raw entries, continuing past per-row failures
    async fn submit_marks_bulk(
        &self,
        ctx: &CallerContext,
        entries: Vec<RawMarkEntry>,
    ) -> Result<BulkOutcome, GradingError>;

    // ===== Queries =====

    /// Get a mark by id
    async fn get_mark(&self, ctx: &CallerContext, mark_id: Uuid)
        -> Result<MarkRecord, GradingError>;

    /// List marks matching a filter
    async fn list_marks(
        &self,
        ctx: &CallerContext,
        filter: MarkFilter,
    ) -> Result<Vec<MarkRecord>, GradingError>;

    /// Per-period and overall report for a student
    async fn student_report(
        &self,
        ctx: &CallerContext,
        student_id: Uuid,
    ) -> Result<StudentReport, GradingError>;

    // ===== Mutation =====

    /// Delete a mark (marking staff or admin only)
    async fn delete_mark(&self, ctx: &CallerContext, mark_id: Uuid) -> Result<(), GradingError>;

    // ===== Grade banding =====

    /// Grade a score would receive, without persisting anything
    fn preview_grade(&self, score: f64) -> Result<Grade, GradingError>;
}
