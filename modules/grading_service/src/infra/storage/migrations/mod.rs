//! Database migrations for grading service

use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_users::Migration),
            Box::new(m20250301_000002_create_marks::Migration),
        ]
    }
}

mod m20250301_000001_create_users {
    use super::*;

    #[derive(DeriveMigrationName)]
    pub struct Migration;

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Users::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Users::Id).uuid().not_null().primary_key())
                        .col(ColumnDef::new(Users::DisplayName).string().not_null())
                        .col(ColumnDef::new(Users::AdmissionNumber).string())
                        .col(ColumnDef::new(Users::ClassLabel).string())
                        .col(ColumnDef::new(Users::Role).string_len(16).not_null())
                        .col(
                            ColumnDef::new(Users::Active)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(
                            ColumnDef::new(Users::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null()
                                .default(Expr::current_timestamp()),
                        )
                        .to_owned(),
                )
                .await?;

            // Admission numbers are unique within a class
            manager
                .create_index(
                    Index::create()
                        .name("uq_users_class_admission_number")
                        .table(Users::Table)
                        .col(Users::ClassLabel)
                        .col(Users::AdmissionNumber)
                        .unique()
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_users_admission_number")
                        .table(Users::Table)
                        .col(Users::AdmissionNumber)
                        .to_owned(),
                )
                .await?;

            Ok(())
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Users::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Users {
        Table,
        Id,
        DisplayName,
        AdmissionNumber,
        ClassLabel,
        Role,
        Active,
        CreatedAt,
    }
}

mod m20250301_000002_create_marks {
    use super::*;

    #[derive(DeriveMigrationName)]
    pub struct Migration;

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Marks::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Marks::Id).uuid().not_null().primary_key())
                        .col(ColumnDef::new(Marks::StudentId).uuid().not_null())
                        .col(ColumnDef::new(Marks::Subject).string().not_null())
                        .col(ColumnDef::new(Marks::ClassLabel).string().not_null())
                        .col(ColumnDef::new(Marks::ExamPeriod).string().not_null())
                        .col(ColumnDef::new(Marks::Score).double().not_null())
                        .col(
                            ColumnDef::new(Marks::TotalPossible)
                                .double()
                                .not_null()
                                .default(100.0),
                        )
                        .col(ColumnDef::new(Marks::Grade).string_len(1).not_null())
                        .col(ColumnDef::new(Marks::Remarks).text())
                        .col(ColumnDef::new(Marks::MarkedBy).uuid().not_null())
                        .col(
                            ColumnDef::new(Marks::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null()
                                .default(Expr::current_timestamp()),
                        )
                        .col(
                            ColumnDef::new(Marks::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null()
                                .default(Expr::current_timestamp()),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_marks_student")
                                .from(Marks::Table, Marks::StudentId)
                                .to(Users::Table, Users::Id)
                                .on_delete(ForeignKeyAction::Restrict)
                                .on_update(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            // Natural key; the upsert conflict target
            manager
                .create_index(
                    Index::create()
                        .name("uq_marks_student_subject_period")
                        .table(Marks::Table)
                        .col(Marks::StudentId)
                        .col(Marks::Subject)
                        .col(Marks::ExamPeriod)
                        .unique()
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_marks_class_period")
                        .table(Marks::Table)
                        .col(Marks::ClassLabel)
                        .col(Marks::ExamPeriod)
                        .to_owned(),
                )
                .await?;

            Ok(())
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Marks::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Marks {
        Table,
        Id,
        StudentId,
        Subject,
        ClassLabel,
        ExamPeriod,
        Score,
        TotalPossible,
        Grade,
        Remarks,
        MarkedBy,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    enum Users {
        Table,
        Id,
    }
}
