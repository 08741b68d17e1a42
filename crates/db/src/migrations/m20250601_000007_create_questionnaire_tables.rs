//! Create questionnaire and questionnaire-question link tables migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Questionnaire::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Questionnaire::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Questionnaire::Title)
                            .string_len(256)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Questionnaire::Description).text().null())
                    .col(
                        ColumnDef::new(Questionnaire::Slug)
                            .string_len(128)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Questionnaire::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Questionnaire::AllowRepeatResponses)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Questionnaire::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_questionnaire_slug")
                    .table(Questionnaire::Table)
                    .col(Questionnaire::Slug)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(QuestionnaireQuestion::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(QuestionnaireQuestion::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(QuestionnaireQuestion::QuestionnaireId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(QuestionnaireQuestion::QuestionId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(QuestionnaireQuestion::DisplayOrder)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(QuestionnaireQuestion::IsRequired)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_questionnaire_question_questionnaire")
                            .from(
                                QuestionnaireQuestion::Table,
                                QuestionnaireQuestion::QuestionnaireId,
                            )
                            .to(Questionnaire::Table, Questionnaire::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_questionnaire_question_question")
                            .from(
                                QuestionnaireQuestion::Table,
                                QuestionnaireQuestion::QuestionId,
                            )
                            .to(Question::Table, Question::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique: a question appears at most once per questionnaire
        manager
            .create_index(
                Index::create()
                    .name("idx_questionnaire_question_pair")
                    .table(QuestionnaireQuestion::Table)
                    .col(QuestionnaireQuestion::QuestionnaireId)
                    .col(QuestionnaireQuestion::QuestionId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Index: question_id (reverse lookups for duplicate policy)
        manager
            .create_index(
                Index::create()
                    .name("idx_questionnaire_question_question_id")
                    .table(QuestionnaireQuestion::Table)
                    .col(QuestionnaireQuestion::QuestionId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .table(QuestionnaireQuestion::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().table(Questionnaire::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Questionnaire {
    Table,
    Id,
    Title,
    Description,
    Slug,
    IsActive,
    AllowRepeatResponses,
    CreatedAt,
}

#[derive(Iden)]
enum QuestionnaireQuestion {
    Table,
    Id,
    QuestionnaireId,
    QuestionId,
    DisplayOrder,
    IsRequired,
}

#[derive(Iden)]
enum Question {
    Table,
    Id,
}
