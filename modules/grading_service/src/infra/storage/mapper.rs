//! Entity to model mappers
//!
//! Conversions between SeaORM entities and contract models

use crate::contract::{Grade, Mark, Role, User};
use super::entity;

// ===== Mark Conversions =====

impl TryFrom<entity::Model> for Mark {
    type Error = anyhow::Error;

    fn try_from(entity: entity::Model) -> Result<Self, Self::Error> {
        let grade = Grade::parse(&entity.grade)
            .ok_or_else(|| anyhow::anyhow!("unknown grade '{}' on mark {}", entity.grade, entity.id))?;

        Ok(Self {
            id: entity.id,
            student_id: entity.student_id,
            subject: entity.subject,
            class_label: entity.class_label,
            exam_period: entity.exam_period,
            score: entity.score,
            total_possible: entity.total_possible,
            grade,
            remarks: entity.remarks,
            marked_by: entity.marked_by,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        })
    }
}

impl From<&Mark> for entity::ActiveModel {
    fn from(model: &Mark) -> Self {
        use sea_orm::ActiveValue::*;

        Self {
            id: Set(model.id),
            student_id: Set(model.student_id),
            subject: Set(model.subject.clone()),
            class_label: Set(model.class_label.clone()),
            exam_period: Set(model.exam_period.clone()),
            score: Set(model.score),
            total_possible: Set(model.total_possible),
            grade: Set(model.grade.as_str().to_string()),
            remarks: Set(model.remarks.clone()),
            marked_by: Set(model.marked_by),
            created_at: Set(model.created_at),
            updated_at: Set(model.updated_at),
        }
    }
}

// ===== User Conversions =====

impl TryFrom<entity::user::Model> for User {
    type Error = anyhow::Error;

    fn try_from(entity: entity::user::Model) -> Result<Self, Self::Error> {
        let role = Role::parse(&entity.role)
            .ok_or_else(|| anyhow::anyhow!("unknown role '{}' on user {}", entity.role, entity.id))?;

        Ok(Self {
            id: entity.id,
            display_name: entity.display_name,
            admission_number: entity.admission_number,
            class_label: entity.class_label,
            role,
            active: entity.active,
            created_at: entity.created_at,
        })
    }
}

impl From<&User> for entity::user::ActiveModel {
    fn from(model: &User) -> Self {
        use sea_orm::ActiveValue::*;

        Self {
            id: Set(model.id),
            display_name: Set(model.display_name.clone()),
            admission_number: Set(model.admission_number.clone()),
            class_label: Set(model.class_label.clone()),
            role: Set(model.role.as_str().to_string()),
            active: Set(model.active),
            created_at: Set(model.created_at),
        }
    }
}
