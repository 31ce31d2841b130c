//! SeaORM repository implementations

use crate::contract::{Mark, MarkFilter, Role, User};
use crate::domain::repository::{DuplicateKey, MarkRepository, UserRepository};
use anyhow::Result;
use async_trait::async_trait;
use sea_orm::{
    sea_query::OnConflict, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, SqlErr,
};
use std::sync::Arc;
use uuid::Uuid;

use super::entity;

/// Turn unique-constraint violations into `DuplicateKey`
fn map_db_error(err: DbErr, key: impl FnOnce() -> String) -> anyhow::Error {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => anyhow::Error::new(DuplicateKey { key: key() }),
        _ => anyhow::Error::new(err),
    }
}

// ===== Marks Repository =====

pub struct SeaOrmMarkRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmMarkRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl MarkRepository for SeaOrmMarkRepository {
    async fn upsert(&self, mark: &Mark) -> Result<Mark> {
        let active: entity::ActiveModel = mark.into();

        // id and created_at of an existing row are kept
        let on_conflict = OnConflict::columns([
            entity::Column::StudentId,
            entity::Column::Subject,
            entity::Column::ExamPeriod,
        ])
        .update_columns([
            entity::Column::ClassLabel,
            entity::Column::Score,
            entity::Column::TotalPossible,
            entity::Column::Grade,
            entity::Column::Remarks,
            entity::Column::MarkedBy,
            entity::Column::UpdatedAt,
        ])
        .to_owned();

        let key = || format!("{}/{}/{}", mark.student_id, mark.subject, mark.exam_period);

        entity::Entity::insert(active)
            .on_conflict(on_conflict)
            .exec_without_returning(&*self.db)
            .await
            .map_err(|e| map_db_error(e, key))?;

        self.find_by_key(mark.student_id, &mark.subject, &mark.exam_period)
            .await?
            .ok_or_else(|| anyhow::anyhow!("mark {} missing after upsert", key()))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Mark>> {
        entity::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .map(Mark::try_from)
            .transpose()
    }

    async fn find_by_key(
        &self,
        student_id: Uuid,
        subject: &str,
        exam_period: &str,
    ) -> Result<Option<Mark>> {
        entity::Entity::find()
            .filter(entity::Column::StudentId.eq(student_id))
            .filter(entity::Column::Subject.eq(subject))
            .filter(entity::Column::ExamPeriod.eq(exam_period))
            .one(&*self.db)
            .await?
            .map(Mark::try_from)
            .transpose()
    }

    async fn find_by_student(&self, student_id: Uuid) -> Result<Vec<Mark>> {
        let results = entity::Entity::find()
            .filter(entity::Column::StudentId.eq(student_id))
            .order_by_asc(entity::Column::ExamPeriod)
            .order_by_asc(entity::Column::Subject)
            .all(&*self.db)
            .await?;

        results.into_iter().map(Mark::try_from).collect()
    }

    async fn find(&self, filter: &MarkFilter) -> Result<Vec<Mark>> {
        let mut query = entity::Entity::find();

        if let Some(student_id) = filter.student_id {
            query = query.filter(entity::Column::StudentId.eq(student_id));
        }
        if let Some(class_label) = &filter.class_label {
            query = query.filter(entity::Column::ClassLabel.eq(class_label.as_str()));
        }
        if let Some(subject) = &filter.subject {
            query = query.filter(entity::Column::Subject.eq(subject.as_str()));
        }
        if let Some(exam_period) = &filter.exam_period {
            query = query.filter(entity::Column::ExamPeriod.eq(exam_period.as_str()));
        }

        let results = query
            .order_by_asc(entity::Column::ExamPeriod)
            .order_by_asc(entity::Column::Subject)
            .order_by_asc(entity::Column::StudentId)
            .all(&*self.db)
            .await?;

        results.into_iter().map(Mark::try_from).collect()
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = entity::Entity::delete_by_id(id).exec(&*self.db).await?;
        Ok(result.rows_affected > 0)
    }
}

// ===== Users Repository =====

pub struct SeaOrmUserRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmUserRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for SeaOrmUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        entity::user::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .map(User::try_from)
            .transpose()
    }

    async fn find_students_by_admission_number(
        &self,
        admission_number: &str,
    ) -> Result<Vec<User>> {
        let results = entity::user::Entity::find()
            .filter(entity::user::Column::AdmissionNumber.eq(admission_number))
            .filter(entity::user::Column::Role.eq(Role::Student.as_str()))
            .order_by_asc(entity::user::Column::ClassLabel)
            .all(&*self.db)
            .await?;

        results.into_iter().map(User::try_from).collect()
    }

    async fn create(&self, user: &User) -> Result<User> {
        let active: entity::user::ActiveModel = user.into();

        let key = || {
            format!(
                "{}/{}",
                user.class_label.as_deref().unwrap_or("-"),
                user.admission_number.as_deref().unwrap_or("-")
            )
        };

        entity::user::Entity::insert(active)
            .exec_without_returning(&*self.db)
            .await
            .map_err(|e| map_db_error(e, key))?;

        self.find_by_id(user.id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("user {} missing after insert", user.id))
    }
}
