//! Common test utilities: in-memory repositories and a class roster
#![allow(dead_code)]

use async_trait::async_trait;
use grading_service::config::Config;
use grading_service::contract::*;
use grading_service::domain::repository::{DuplicateKey, MarkRepository, UserRepository};
use grading_service::domain::{EventPublisher, MarkEvent, Service};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use uuid::Uuid;

pub fn print_test_header(test_name: &str, purpose: &[&str]) {
    println!("\n🧪 TEST: {}", test_name);
    if let Some(first) = purpose.first() {
        println!("📋 PURPOSE: {}", first);
    }
    for line in purpose.iter().skip(1) {
        println!("   {}", line);
    }
}

// ===== Mock repositories =====

#[derive(Clone, Default)]
pub struct MockUserRepo {
    data: Arc<RwLock<HashMap<Uuid, User>>>,
}

impl MockUserRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, user: User) {
        self.data.write().insert(user.id, user);
    }
}

#[async_trait]
impl UserRepository for MockUserRepo {
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>> {
        Ok(self.data.read().get(&id).cloned())
    }

    async fn find_students_by_admission_number(
        &self,
        admission_number: &str,
    ) -> anyhow::Result<Vec<User>> {
        let mut found: Vec<User> = self
            .data
            .read()
            .values()
            .filter(|u| {
                u.role == Role::Student && u.admission_number.as_deref() == Some(admission_number)
            })
            .cloned()
            .collect();
        found.sort_by_key(|u| u.created_at);
        Ok(found)
    }

    async fn create(&self, user: &User) -> anyhow::Result<User> {
        self.insert(user.clone());
        Ok(user.clone())
    }
}

/// Mark store keyed on id, enforcing the (student, subject, period) key
#[derive(Clone, Default)]
pub struct MockMarkRepo {
    data: Arc<RwLock<HashMap<Uuid, Mark>>>,
    upserts: Arc<AtomicUsize>,
    fail_from_upsert: Arc<RwLock<Option<usize>>>,
    lose_next_race: Arc<AtomicBool>,
}

impl MockMarkRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> usize {
        self.data.read().len()
    }

    pub fn all(&self) -> Vec<Mark> {
        self.data.read().values().cloned().collect()
    }

    /// Upsert calls made so far, including failed ones
    pub fn upsert_calls(&self) -> usize {
        self.upserts.load(Ordering::SeqCst)
    }

    /// Fail every upsert from the `n`-th call on (1-based)
    pub fn fail_from_upsert(&self, n: usize) {
        *self.fail_from_upsert.write() = Some(n);
    }

    /// Report a unique-key violation on the next upsert only
    pub fn lose_next_race(&self) {
        self.lose_next_race.store(true, Ordering::SeqCst);
    }

    fn matches_key(mark: &Mark, student_id: Uuid, subject: &str, exam_period: &str) -> bool {
        mark.student_id == student_id && mark.subject == subject && mark.exam_period == exam_period
    }
}

#[async_trait]
impl MarkRepository for MockMarkRepo {
    async fn upsert(&self, mark: &Mark) -> anyhow::Result<Mark> {
        let call = self.upserts.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(n) = *self.fail_from_upsert.read() {
            if call >= n {
                anyhow::bail!("connection reset by peer");
            }
        }
        if self.lose_next_race.swap(false, Ordering::SeqCst) {
            return Err(DuplicateKey {
                key: format!("{}/{}/{}", mark.student_id, mark.subject, mark.exam_period),
            }
            .into());
        }

        let mut data = self.data.write();
        let existing = data
            .values()
            .find(|m| Self::matches_key(m, mark.student_id, &mark.subject, &mark.exam_period))
            .cloned();

        let stored = match existing {
            Some(prev) => Mark {
                id: prev.id,
                created_at: prev.created_at,
                ..mark.clone()
            },
            None => mark.clone(),
        };
        data.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Mark>> {
        Ok(self.data.read().get(&id).cloned())
    }

    async fn find_by_key(
        &self,
        student_id: Uuid,
        subject: &str,
        exam_period: &str,
    ) -> anyhow::Result<Option<Mark>> {
        Ok(self
            .data
            .read()
            .values()
            .find(|m| Self::matches_key(m, student_id, subject, exam_period))
            .cloned())
    }

    async fn find_by_student(&self, student_id: Uuid) -> anyhow::Result<Vec<Mark>> {
        Ok(self
            .data
            .read()
            .values()
            .filter(|m| m.student_id == student_id)
            .cloned()
            .collect())
    }

    async fn find(&self, filter: &MarkFilter) -> anyhow::Result<Vec<Mark>> {
        let mut found: Vec<Mark> = self
            .data
            .read()
            .values()
            .filter(|m| filter.student_id.is_none_or(|id| m.student_id == id))
            .filter(|m| filter.class_label.as_deref().is_none_or(|c| m.class_label == c))
            .filter(|m| filter.subject.as_deref().is_none_or(|s| m.subject == s))
            .filter(|m| filter.exam_period.as_deref().is_none_or(|p| m.exam_period == p))
            .cloned()
            .collect();
        found.sort_by(|a, b| {
            (a.exam_period.as_str(), a.subject.as_str())
                .cmp(&(b.exam_period.as_str(), b.subject.as_str()))
        });
        Ok(found)
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<bool> {
        Ok(self.data.write().remove(&id).is_some())
    }
}

/// Publisher that keeps every event for assertions
#[derive(Clone, Default)]
pub struct RecordingPublisher {
    events: Arc<RwLock<Vec<MarkEvent>>>,
}

impl RecordingPublisher {
    pub fn events(&self) -> Vec<MarkEvent> {
        self.events.read().clone()
    }
}

#[async_trait]
impl EventPublisher for RecordingPublisher {
    async fn publish_audit(&self, event: MarkEvent) -> anyhow::Result<()> {
        self.events.write().push(event);
        Ok(())
    }
}

// ===== Roster fixture =====

/// Staff, an admin and a handful of students across two classes.
///
/// Admission number 1042 exists in both 10A and 10B.
#[derive(Debug, Clone)]
pub struct Roster {
    pub teacher: User,
    pub other_teacher: User,
    pub admin: User,
    pub ayesha: User,
    pub brian: User,
    pub chidi: User,
    pub dora_inactive: User,
}

fn user(name: &str, role: Role, class_label: Option<&str>, admission: Option<&str>) -> User {
    User {
        id: Uuid::new_v4(),
        display_name: name.to_string(),
        admission_number: admission.map(str::to_string),
        class_label: class_label.map(str::to_string),
        role,
        active: true,
        created_at: chrono::Utc::now(),
    }
}

impl Roster {
    pub fn new() -> Self {
        let mut dora = user("Dora Mensah", Role::Student, Some("10A"), Some("1044"));
        dora.active = false;
        Self {
            teacher: user("Mr. Okafor", Role::Staff, None, None),
            other_teacher: user("Ms. Lindqvist", Role::Staff, None, None),
            admin: user("Principal Reyes", Role::Admin, None, None),
            ayesha: user("Ayesha Khan", Role::Student, Some("10A"), Some("1042")),
            brian: user("Brian Otieno", Role::Student, Some("10A"), Some("1043")),
            chidi: user("Chidi Eze", Role::Student, Some("10B"), Some("1042")),
            dora_inactive: dora,
        }
    }

    pub fn all(&self) -> Vec<User> {
        vec![
            self.teacher.clone(),
            self.other_teacher.clone(),
            self.admin.clone(),
            self.ayesha.clone(),
            self.brian.clone(),
            self.chidi.clone(),
            self.dora_inactive.clone(),
        ]
    }

    pub fn teacher_ctx(&self) -> CallerContext {
        CallerContext::staff(self.teacher.id)
    }

    pub fn admin_ctx(&self) -> CallerContext {
        CallerContext::admin(self.admin.id)
    }
}

impl Default for Roster {
    fn default() -> Self {
        Self::new()
    }
}

/// Service wired to in-memory repositories seeded with a roster
pub struct Harness {
    pub service: Arc<Service>,
    pub users: MockUserRepo,
    pub marks: MockMarkRepo,
    pub events: RecordingPublisher,
    pub roster: Roster,
}

pub fn harness() -> Harness {
    harness_with(Config::default())
}

pub fn harness_with(config: Config) -> Harness {
    let roster = Roster::new();
    let users = MockUserRepo::new();
    for u in roster.all() {
        users.insert(u);
    }
    let marks = MockMarkRepo::new();
    let events = RecordingPublisher::default();

    let service = Arc::new(Service::new(
        Arc::new(users.clone()),
        Arc::new(marks.clone()),
        Arc::new(events.clone()),
        config,
    ));

    Harness {
        service,
        users,
        marks,
        events,
        roster,
    }
}

pub fn new_mark(student: &User, subject: &str, score: impl Into<RawScore>) -> NewMark {
    NewMark {
        student_id: student.id,
        subject: subject.to_string(),
        class_label: student.class_label.clone().unwrap_or_default(),
        exam_period: "Term 1".to_string(),
        score: score.into(),
        total_possible: None,
        remarks: None,
    }
}

pub fn bulk_row(student: &User, subject: &str, score: impl Into<RawScore>) -> RawMarkEntry {
    RawMarkEntry {
        student_name: student.display_name.clone(),
        admission_number: student.admission_number.clone(),
        student_id: None,
        subject: subject.to_string(),
        class_label: student.class_label.clone().unwrap_or_default(),
        exam_period: "Term 1".to_string(),
        score: score.into(),
        total_possible: None,
        remarks: None,
        malformed: None,
    }
}
