//! Domain service - business logic orchestration

use crate::config::Config;
use crate::contract::{
    BulkOutcome, CallerContext, EntryFailure, Grade, GradingError, Mark, MarkFilter, MarkRecord,
    NewMark, RawMarkEntry, Role, StudentReport, User,
};
use super::events::{EventPublisher, MarkEvent};
use super::grade::grade_for_score;
use super::report::build_report;
use super::repository::{is_duplicate_key, MarkRepository, UserRepository};
use super::validation::{self, EntryFields, MarkDraft};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

/// Domain service for mark submission and reporting
pub struct Service {
    users: Arc<dyn UserRepository>,
    marks: Arc<dyn MarkRepository>,
    event_publisher: Arc<dyn EventPublisher>,
    config: Config,
}

impl Service {
    /// Create a new service instance
    pub fn new(
        users: Arc<dyn UserRepository>,
        marks: Arc<dyn MarkRepository>,
        event_publisher: Arc<dyn EventPublisher>,
        config: Config,
    ) -> Self {
        Self {
            users,
            marks,
            event_publisher,
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    // ===== Submission =====

    /// Validate and upsert one mark for an already-resolved student id
    pub async fn submit_mark(
        &self,
        ctx: &CallerContext,
        new_mark: NewMark,
    ) -> Result<MarkRecord, GradingError> {
        require_grader(ctx)?;

        let student = self
            .users
            .find_by_id(new_mark.student_id)
            .await
            .map_err(store_error)?
            .ok_or_else(|| GradingError::InvalidStudent {
                reason: format!("student not found: {}", new_mark.student_id),
            })?;
        validation::ensure_gradeable_student(&student)?;

        let draft = validation::validate_entry(
            &self.config,
            &student,
            EntryFields {
                subject: &new_mark.subject,
                class_label: &new_mark.class_label,
                exam_period: &new_mark.exam_period,
                score: &new_mark.score,
                total_possible: new_mark.total_possible,
                remarks: new_mark.remarks.as_deref(),
            },
        )?;

        let mark = self.persist(ctx, &student, draft).await?;
        let marked_by_name = self.display_name_of(mark.marked_by).await?;

        tracing::info!(
            mark_id = %mark.id,
            student_id = %student.id,
            subject = %mark.subject,
            exam_period = %mark.exam_period,
            grade = %mark.grade,
            "mark submitted"
        );
        Ok(enrich(mark, &student, marked_by_name))
    }

    /// Apply a batch of raw entries in input order.
    ///
    /// Per-row validation and resolution failures go to the ledger and the
    /// batch continues. Authorization and store failures abort the call;
    /// rows written before a store failure stay written.
    pub async fn submit_marks_bulk(
        &self,
        ctx: &CallerContext,
        entries: Vec<RawMarkEntry>,
    ) -> Result<BulkOutcome, GradingError> {
        require_grader(ctx)?;

        if entries.is_empty() {
            return Err(GradingError::Validation {
                message: "batch contains no entries".to_string(),
            });
        }
        if entries.len() > self.config.max_batch_entries {
            return Err(GradingError::Validation {
                message: format!(
                    "batch of {} entries exceeds the limit of {}",
                    entries.len(),
                    self.config.max_batch_entries
                ),
            });
        }

        let marked_by_name = self.display_name_of(ctx.caller_id).await?;
        let total = entries.len();
        let mut marks = Vec::with_capacity(total);
        let mut failures = Vec::new();

        for (index, entry) in entries.iter().enumerate() {
            match self.grade_entry(ctx, entry).await {
                Ok((mark, student)) => {
                    tracing::debug!(index, mark_id = %mark.id, "bulk entry stored");
                    marks.push(enrich(mark, &student, marked_by_name.clone()));
                }
                Err(err) if err.is_call_level() => {
                    tracing::error!(
                        index,
                        stored = marks.len(),
                        error = %err,
                        "bulk submission aborted"
                    );
                    return Err(err);
                }
                Err(err) => {
                    tracing::warn!(
                        index,
                        subject = %entry.subject,
                        student = %entry.student_name,
                        error = %err,
                        "bulk entry rejected"
                    );
                    failures.push(EntryFailure {
                        index,
                        subject: entry.subject.trim().to_string(),
                        reason: err.to_string(),
                    });
                }
            }
        }

        tracing::info!(
            total,
            stored = marks.len(),
            failed = failures.len(),
            caller = %ctx.caller_id,
            "bulk submission processed"
        );

        Ok(BulkOutcome {
            success: failures.is_empty(),
            marks,
            failures,
        })
    }

    // ===== Queries =====

    /// Get one mark. Students may only read their own.
    pub async fn get_mark(
        &self,
        ctx: &CallerContext,
        mark_id: Uuid,
    ) -> Result<MarkRecord, GradingError> {
        let mark = self.load_mark(mark_id).await?;
        if ctx.role == Role::Student && mark.student_id != ctx.caller_id {
            return Err(GradingError::Unauthorized {
                reason: "students may only view their own marks".to_string(),
            });
        }

        let mut names = HashMap::new();
        self.enrich_cached(mark, &mut names).await
    }

    /// List marks. Student callers are restricted to their own marks.
    pub async fn list_marks(
        &self,
        ctx: &CallerContext,
        mut filter: MarkFilter,
    ) -> Result<Vec<MarkRecord>, GradingError> {
        if ctx.role == Role::Student {
            match filter.student_id {
                Some(id) if id != ctx.caller_id => {
                    return Err(GradingError::Unauthorized {
                        reason: "students may only view their own marks".to_string(),
                    });
                }
                _ => filter.student_id = Some(ctx.caller_id),
            }
        }

        if let Some(subject) = filter.subject.take() {
            filter.subject = Some(validation::normalize_subject(&subject)?);
        }
        if let Some(period) = filter.exam_period.take() {
            filter.exam_period = Some(validation::canonical_exam_period(
                &period,
                &self.config.exam_periods,
            )?);
        }
        if let Some(class_label) = filter.class_label.take() {
            filter.class_label = Some(validation::normalize_class(&class_label));
        }

        let found = self.marks.find(&filter).await.map_err(store_error)?;

        let mut users = HashMap::new();
        let mut records = Vec::with_capacity(found.len());
        for mark in found {
            records.push(self.enrich_cached(mark, &mut users).await?);
        }
        Ok(records)
    }

    /// Per-period and overall summaries for one student
    pub async fn student_report(
        &self,
        ctx: &CallerContext,
        student_id: Uuid,
    ) -> Result<StudentReport, GradingError> {
        if ctx.role == Role::Student && ctx.caller_id != student_id {
            return Err(GradingError::Unauthorized {
                reason: "students may only view their own report".to_string(),
            });
        }

        let student = self
            .users
            .find_by_id(student_id)
            .await
            .map_err(store_error)?
            .ok_or_else(|| GradingError::NotFound {
                resource: "student".to_string(),
                id: student_id.to_string(),
            })?;
        if student.role != Role::Student {
            return Err(GradingError::InvalidStudent {
                reason: format!("user {} has role '{}', not student", student.id, student.role),
            });
        }

        let marks = self
            .marks
            .find_by_student(student_id)
            .await
            .map_err(store_error)?;

        Ok(build_report(&student, &marks, &self.config.exam_periods))
    }

    // ===== Mutation =====

    /// Delete a mark. Only the staff member who wrote it or an admin may.
    pub async fn delete_mark(&self, ctx: &CallerContext, mark_id: Uuid) -> Result<(), GradingError> {
        require_grader(ctx)?;

        let mark = self.load_mark(mark_id).await?;
        if ctx.role != Role::Admin && mark.marked_by != ctx.caller_id {
            return Err(GradingError::Unauthorized {
                reason: "only the marking staff member or an admin may delete this mark"
                    .to_string(),
            });
        }

        let removed = self.marks.delete(mark_id).await.map_err(store_error)?;
        if !removed {
            return Err(GradingError::NotFound {
                resource: "mark".to_string(),
                id: mark_id.to_string(),
            });
        }

        self.publish(MarkEvent::deleted(&mark, ctx.caller_id)).await;
        tracing::info!(mark_id = %mark_id, caller = %ctx.caller_id, "mark deleted");
        Ok(())
    }

    // ===== Grade banding =====

    /// Grade for a score out of 100, without touching storage
    pub fn preview_grade(&self, score: f64) -> Result<Grade, GradingError> {
        grade_for_score(score)
    }

    pub fn exam_periods(&self) -> &[String] {
        &self.config.exam_periods
    }

    // ===== Helper Methods =====

    /// Resolve, validate and store one bulk row
    async fn grade_entry(
        &self,
        ctx: &CallerContext,
        entry: &RawMarkEntry,
    ) -> Result<(Mark, User), GradingError> {
        if let Some(reason) = &entry.malformed {
            return Err(GradingError::Validation {
                message: format!("malformed entry: {}", reason),
            });
        }

        let student = self.resolve_entry_student(entry).await?;
        let draft = validation::validate_entry(
            &self.config,
            &student,
            EntryFields {
                subject: &entry.subject,
                class_label: &entry.class_label,
                exam_period: &entry.exam_period,
                score: &entry.score,
                total_possible: entry.total_possible,
                remarks: entry.remarks.as_deref(),
            },
        )?;
        let mark = self.persist(ctx, &student, draft).await?;
        Ok((mark, student))
    }

    /// Resolve a bulk row's student by admission number, falling back to the id
    /// when the number is absent or matches nobody
    async fn resolve_entry_student(&self, entry: &RawMarkEntry) -> Result<User, GradingError> {
        let admission_number = entry
            .admission_number
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty());

        let fallback_id = entry
            .student_id
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty());

        let mut by_admission = None;
        if let Some(number) = admission_number {
            let mut candidates = self
                .users
                .find_students_by_admission_number(number)
                .await
                .map_err(store_error)?;
            if !candidates.is_empty() {
                // Admission numbers are only unique per class
                let declared = validation::normalize_class(&entry.class_label);
                let pick = candidates
                    .iter()
                    .position(|u| {
                        u.class_label
                            .as_deref()
                            .is_some_and(|c| validation::normalize_class(c) == declared)
                    })
                    .unwrap_or(0);
                by_admission = Some(candidates.swap_remove(pick));
            }
        }

        let student = match (by_admission, fallback_id, admission_number) {
            (Some(student), _, _) => student,
            (None, Some(raw_id), _) => {
                let id = Uuid::parse_str(raw_id).map_err(|_| GradingError::InvalidStudent {
                    reason: format!("'{}' is not a valid student id", raw_id),
                })?;
                self.users
                    .find_by_id(id)
                    .await
                    .map_err(store_error)?
                    .ok_or_else(|| GradingError::InvalidStudent {
                        reason: format!(
                            "student not found: '{}' ({})",
                            entry.student_name.trim(),
                            id
                        ),
                    })?
            }
            (None, None, Some(number)) => {
                return Err(GradingError::InvalidStudent {
                    reason: format!(
                        "student not found: '{}' (admission number {})",
                        entry.student_name.trim(),
                        number
                    ),
                });
            }
            (None, None, None) => {
                return Err(GradingError::InvalidStudent {
                    reason: "entry has neither an admission number nor a student id".to_string(),
                });
            }
        };

        validation::ensure_gradeable_student(&student)?;

        let declared_name = entry.student_name.trim();
        if !declared_name.is_empty() && !declared_name.eq_ignore_ascii_case(&student.display_name) {
            tracing::debug!(
                student_id = %student.id,
                declared = %declared_name,
                recorded = %student.display_name,
                "student name differs from record"
            );
        }

        Ok(student)
    }

    /// Upsert a validated draft, retrying once if a concurrent insert wins the key
    async fn persist(
        &self,
        ctx: &CallerContext,
        student: &User,
        draft: MarkDraft,
    ) -> Result<Mark, GradingError> {
        let now = chrono::Utc::now();
        let candidate = Mark {
            id: Uuid::new_v4(),
            student_id: student.id,
            subject: draft.subject,
            class_label: draft.class_label,
            exam_period: draft.exam_period,
            score: draft.score,
            total_possible: draft.total_possible,
            grade: draft.grade,
            remarks: draft.remarks,
            marked_by: ctx.caller_id,
            created_at: now,
            updated_at: now,
        };

        let stored = match self.marks.upsert(&candidate).await {
            Ok(stored) => stored,
            Err(e) if is_duplicate_key(&e) => {
                tracing::warn!(
                    student_id = %candidate.student_id,
                    subject = %candidate.subject,
                    exam_period = %candidate.exam_period,
                    "upsert lost a race, retrying"
                );
                self.marks.upsert(&candidate).await.map_err(|e| {
                    if is_duplicate_key(&e) {
                        GradingError::DuplicateKeyConflict {
                            key: format!(
                                "{}/{}/{}",
                                candidate.student_id, candidate.subject, candidate.exam_period
                            ),
                        }
                    } else {
                        store_error(e)
                    }
                })?
            }
            Err(e) => return Err(store_error(e)),
        };

        let is_new = stored.id == candidate.id;
        self.publish(MarkEvent::upserted(&stored, is_new, ctx.caller_id))
            .await;
        Ok(stored)
    }

    async fn load_mark(&self, mark_id: Uuid) -> Result<Mark, GradingError> {
        self.marks
            .find_by_id(mark_id)
            .await
            .map_err(store_error)?
            .ok_or_else(|| GradingError::NotFound {
                resource: "mark".to_string(),
                id: mark_id.to_string(),
            })
    }

    async fn display_name_of(&self, user_id: Uuid) -> Result<Option<String>, GradingError> {
        Ok(self
            .users
            .find_by_id(user_id)
            .await
            .map_err(store_error)?
            .map(|u| u.display_name))
    }

    /// Enrich a mark, looking each user up at most once per call
    async fn enrich_cached(
        &self,
        mark: Mark,
        users: &mut HashMap<Uuid, Option<User>>,
    ) -> Result<MarkRecord, GradingError> {
        for id in [mark.student_id, mark.marked_by] {
            if !users.contains_key(&id) {
                let user = self.users.find_by_id(id).await.map_err(store_error)?;
                users.insert(id, user);
            }
        }

        let student = users.get(&mark.student_id).cloned().flatten();
        let marked_by_name = users
            .get(&mark.marked_by)
            .and_then(|u| u.as_ref())
            .map(|u| u.display_name.clone());

        Ok(MarkRecord {
            student_name: student.as_ref().map(|s| s.display_name.clone()),
            admission_number: student.as_ref().and_then(|s| s.admission_number.clone()),
            student_class: student.and_then(|s| s.class_label),
            marked_by_name,
            mark,
        })
    }

    async fn publish(&self, event: MarkEvent) {
        if let Err(e) = self.event_publisher.publish_audit(event).await {
            // Log error but don't fail the operation
            tracing::warn!(error = %e, "failed to publish mark audit event");
        }
    }
}

fn require_grader(ctx: &CallerContext) -> Result<(), GradingError> {
    if ctx.role.can_grade() {
        Ok(())
    } else {
        Err(GradingError::Unauthorized {
            reason: format!("role '{}' may not modify marks", ctx.role),
        })
    }
}

fn store_error(error: anyhow::Error) -> GradingError {
    tracing::error!(error = ?error, "mark store failure");
    GradingError::Internal
}

fn enrich(mark: Mark, student: &User, marked_by_name: Option<String>) -> MarkRecord {
    MarkRecord {
        mark,
        student_name: Some(student.display_name.clone()),
        admission_number: student.admission_number.clone(),
        student_class: student.class_label.clone(),
        marked_by_name,
    }
}
