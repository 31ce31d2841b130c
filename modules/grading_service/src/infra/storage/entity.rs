//! SeaORM entities for database tables

use sea_orm::entity::prelude::*;

/// Marks table entity
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "marks")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Student the mark belongs to (unique together with subject and exam_period)
    pub student_id: Uuid,

    pub subject: String,

    pub class_label: String,

    pub exam_period: String,

    pub score: f64,

    pub total_possible: f64,

    /// Letter grade, always derived from score
    pub grade: String,

    #[sea_orm(column_type = "Text", nullable)]
    pub remarks: Option<String>,

    /// Staff member who last wrote the mark
    pub marked_by: Uuid,

    pub created_at: DateTimeUtc,

    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Foreign key to users
    #[sea_orm(
        belongs_to = "user::Entity",
        from = "Column::StudentId",
        to = "user::Column::Id"
    )]
    Student,
}

impl Related<user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Users module
pub mod user {
    use sea_orm::entity::prelude::*;

    /// Users table entity (students, staff, admins)
    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
    #[sea_orm(table_name = "users")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: Uuid,

        pub display_name: String,

        /// Unique per class
        pub admission_number: Option<String>,

        pub class_label: Option<String>,

        /// student | staff | admin
        pub role: String,

        pub active: bool,

        pub created_at: DateTimeUtc,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        /// One-to-many relationship with marks
        #[sea_orm(has_many = "super::Entity")]
        Marks,
    }

    impl Related<super::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Marks.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}
