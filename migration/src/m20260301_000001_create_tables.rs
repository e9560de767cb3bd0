use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 创建测评模板表
        manager
            .create_table(
                Table::create()
                    .table(AssessmentTemplates::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AssessmentTemplates::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(AssessmentTemplates::Title)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AssessmentTemplates::Description)
                            .text()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(AssessmentTemplates::Topic)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AssessmentTemplates::DifficultyLevel)
                            .string()
                            .not_null()
                            .default("medium"),
                    )
                    .col(
                        ColumnDef::new(AssessmentTemplates::TotalQuestions)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(AssessmentTemplates::IsPublished)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(AssessmentTemplates::CreatedBy)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AssessmentTemplates::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AssessmentTemplates::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建题目表
        manager
            .create_table(
                Table::create()
                    .table(Questions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Questions::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Questions::AssessmentTemplateId)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Questions::QuestionText).text().not_null())
                    .col(
                        ColumnDef::new(Questions::QuestionType)
                            .string()
                            .not_null()
                            .default("essay"),
                    )
                    .col(ColumnDef::new(Questions::Marks).integer().not_null())
                    .col(ColumnDef::new(Questions::OrderIndex).integer().not_null())
                    .col(
                        ColumnDef::new(Questions::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Questions::Table, Questions::AssessmentTemplateId)
                            .to(AssessmentTemplates::Table, AssessmentTemplates::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建作业表
        manager
            .create_table(
                Table::create()
                    .table(Assignments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Assignments::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Assignments::Title).string().not_null())
                    .col(ColumnDef::new(Assignments::Description).text().null())
                    .col(
                        ColumnDef::new(Assignments::MaxScore)
                            .integer()
                            .not_null()
                            .default(100),
                    )
                    .col(ColumnDef::new(Assignments::TotalMarks).integer().null())
                    .col(ColumnDef::new(Assignments::TemplateId).string().null())
                    .col(ColumnDef::new(Assignments::CreatedBy).string().not_null())
                    .col(
                        ColumnDef::new(Assignments::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Assignments::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Assignments::Table, Assignments::TemplateId)
                            .to(AssessmentTemplates::Table, AssessmentTemplates::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建提交表
        manager
            .create_table(
                Table::create()
                    .table(Submissions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Submissions::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Submissions::AssignmentId)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Submissions::StudentId).string().not_null())
                    .col(
                        ColumnDef::new(Submissions::StudentName)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Submissions::FilePath).text().null())
                    .col(ColumnDef::new(Submissions::FileName).string().null())
                    .col(ColumnDef::new(Submissions::FileType).string().null())
                    .col(
                        ColumnDef::new(Submissions::SubmissionDate)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Submissions::Status)
                            .string()
                            .not_null()
                            .default("submitted"),
                    )
                    .col(
                        ColumnDef::new(Submissions::CurrentEvaluationId)
                            .string()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Submissions::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Submissions::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Submissions::Table, Submissions::AssignmentId)
                            .to(Assignments::Table, Assignments::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建评测表（同一提交可有多条评测记录）
        manager
            .create_table(
                Table::create()
                    .table(Evaluations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Evaluations::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Evaluations::SubmissionId)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Evaluations::Score).integer().not_null())
                    .col(ColumnDef::new(Evaluations::MaxScore).integer().not_null())
                    .col(
                        ColumnDef::new(Evaluations::EvaluationType)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Evaluations::AiFeedback).text().null())
                    .col(ColumnDef::new(Evaluations::ManualRemarks).text().null())
                    .col(ColumnDef::new(Evaluations::EvaluatorId).string().null())
                    .col(
                        ColumnDef::new(Evaluations::IsPublished)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Evaluations::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Evaluations::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Evaluations::Table, Evaluations::SubmissionId)
                            .to(Submissions::Table, Submissions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建索引
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_questions_template_id")
                    .table(Questions::Table)
                    .col(Questions::AssessmentTemplateId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_submissions_assignment_id")
                    .table(Submissions::Table)
                    .col(Submissions::AssignmentId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_submissions_status")
                    .table(Submissions::Table)
                    .col(Submissions::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_evaluations_submission_id")
                    .table(Evaluations::Table)
                    .col(Evaluations::SubmissionId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 按照创建的相反顺序删除
        manager
            .drop_table(Table::drop().table(Evaluations::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Submissions::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Assignments::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Questions::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(AssessmentTemplates::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum AssessmentTemplates {
    Table,
    Id,
    Title,
    Description,
    Topic,
    DifficultyLevel,
    TotalQuestions,
    IsPublished,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Questions {
    Table,
    Id,
    AssessmentTemplateId,
    QuestionText,
    QuestionType,
    Marks,
    OrderIndex,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Assignments {
    Table,
    Id,
    Title,
    Description,
    MaxScore,
    TotalMarks,
    TemplateId,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Submissions {
    Table,
    Id,
    AssignmentId,
    StudentId,
    StudentName,
    FilePath,
    FileName,
    FileType,
    SubmissionDate,
    Status,
    CurrentEvaluationId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Evaluations {
    Table,
    Id,
    SubmissionId,
    Score,
    MaxScore,
    EvaluationType,
    AiFeedback,
    ManualRemarks,
    EvaluatorId,
    IsPublished,
    CreatedAt,
    UpdatedAt,
}
