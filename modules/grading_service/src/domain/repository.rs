//! Repository traits for data access
//!
//! These traits define the interface for data access operations.
//! Implementations are in infra/storage/repositories.rs

use crate::contract::{Mark, MarkFilter, User};
use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

/// Unique-key violation reported by a store.
///
/// Repositories wrap this in `anyhow::Error` so callers can tell a lost
/// upsert race apart from other failures.
#[derive(Debug, thiserror::Error)]
#[error("duplicate key: {key}")]
pub struct DuplicateKey {
    pub key: String,
}

/// Whether a repository error is a unique-key violation
pub fn is_duplicate_key(error: &anyhow::Error) -> bool {
    error.downcast_ref::<DuplicateKey>().is_some()
}

/// Read access to users (students, staff, admins)
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by id
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>>;

    /// Find every user with the student role carrying this admission number
    async fn find_students_by_admission_number(&self, admission_number: &str)
        -> Result<Vec<User>>;

    /// Create a user
    async fn create(&self, user: &User) -> Result<User>;
}

/// Repository for marks
#[async_trait]
pub trait MarkRepository: Send + Sync {
    /// Create or overwrite the mark with the same (student, subject, exam period).
    ///
    /// Returns the stored row; on overwrite it keeps the existing id and
    /// creation time.
    async fn upsert(&self, mark: &Mark) -> Result<Mark>;

    /// Find a mark by id
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Mark>>;

    /// Find a mark by its natural key
    async fn find_by_key(
        &self,
        student_id: Uuid,
        subject: &str,
        exam_period: &str,
    ) -> Result<Option<Mark>>;

    /// All marks of one student
    async fn find_by_student(&self, student_id: Uuid) -> Result<Vec<Mark>>;

    /// Marks matching every set filter field
    async fn find(&self, filter: &MarkFilter) -> Result<Vec<Mark>>;

    /// Delete a mark, returning whether a row was removed
    async fn delete(&self, id: Uuid) -> Result<bool>;
}
