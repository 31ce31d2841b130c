//! Audit events for marks
//!
//! Every mark write and delete produces one event. The default publisher
//! emits them as structured tracing records under the `grading::audit`
//! target; notification fan-out is handled elsewhere.

use crate::contract::model::Mark;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Domain event types for marks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum MarkEvent {
    /// Mark was created or overwritten
    MarkUpserted(MarkUpsertedEvent),
    /// Mark was deleted
    MarkDeleted(MarkDeletedEvent),
}

/// Event data for mark upsert
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkUpsertedEvent {
    pub mark_id: Uuid,
    pub student_id: Uuid,
    pub subject: String,
    pub exam_period: String,
    pub score: f64,
    pub grade: String,
    /// Whether this write created the mark
    pub is_new: bool,
    pub timestamp: DateTime<Utc>,
    /// Staff member who performed the write
    pub actor_id: Uuid,
}

/// Event data for mark deletion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkDeletedEvent {
    pub mark_id: Uuid,
    pub student_id: Uuid,
    pub subject: String,
    pub exam_period: String,
    pub timestamp: DateTime<Utc>,
    pub actor_id: Uuid,
}

/// Event publisher trait for publishing domain events
#[async_trait::async_trait]
pub trait EventPublisher: Send + Sync {
    /// Publish an audit event
    async fn publish_audit(&self, event: MarkEvent) -> anyhow::Result<()>;
}

/// No-op event publisher for testing or when events are disabled
pub struct NoOpEventPublisher;

#[async_trait::async_trait]
impl EventPublisher for NoOpEventPublisher {
    async fn publish_audit(&self, _event: MarkEvent) -> anyhow::Result<()> {
        Ok(())
    }
}

/// Writes each event as one JSON-encoded tracing record
pub struct TracingEventPublisher;

#[async_trait::async_trait]
impl EventPublisher for TracingEventPublisher {
    async fn publish_audit(&self, event: MarkEvent) -> anyhow::Result<()> {
        let payload = serde_json::to_string(&event)?;
        tracing::info!(target: "grading::audit", event = %payload, "mark audit event");
        Ok(())
    }
}

impl MarkEvent {
    /// Create a new MarkUpserted event
    pub fn upserted(mark: &Mark, is_new: bool, actor_id: Uuid) -> Self {
        MarkEvent::MarkUpserted(MarkUpsertedEvent {
            mark_id: mark.id,
            student_id: mark.student_id,
            subject: mark.subject.clone(),
            exam_period: mark.exam_period.clone(),
            score: mark.score,
            grade: mark.grade.to_string(),
            is_new,
            timestamp: Utc::now(),
            actor_id,
        })
    }

    /// Create a new MarkDeleted event
    pub fn deleted(mark: &Mark, actor_id: Uuid) -> Self {
        MarkEvent::MarkDeleted(MarkDeletedEvent {
            mark_id: mark.id,
            student_id: mark.student_id,
            subject: mark.subject.clone(),
            exam_period: mark.exam_period.clone(),
            timestamp: Utc::now(),
            actor_id,
        })
    }
}
