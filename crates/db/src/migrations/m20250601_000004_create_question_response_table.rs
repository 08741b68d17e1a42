//! Create question response table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(QuestionResponse::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(QuestionResponse::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(QuestionResponse::QuestionId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(QuestionResponse::UserId)
                            .string_len(32)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(QuestionResponse::VoterTokenId)
                            .string_len(32)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(QuestionResponse::ResponseData)
                            .json_binary()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(QuestionResponse::IpAddress)
                            .string_len(64)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(QuestionResponse::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_question_response_question")
                            .from(QuestionResponse::Table, QuestionResponse::QuestionId)
                            .to(Question::Table, Question::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_question_response_user")
                            .from(QuestionResponse::Table, QuestionResponse::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_question_response_voter_token")
                            .from(QuestionResponse::Table, QuestionResponse::VoterTokenId)
                            .to(VoterToken::Table, VoterToken::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Exactly one identity column must be populated.
        manager
            .get_connection()
            .execute_unprepared(
                "ALTER TABLE question_response \
                 ADD CONSTRAINT chk_question_response_identity \
                 CHECK ((user_id IS NULL) <> (voter_token_id IS NULL))",
            )
            .await?;

        // Index: question_id (duplicate checks and per-question listings)
        manager
            .create_index(
                Index::create()
                    .name("idx_question_response_question_id")
                    .table(QuestionResponse::Table)
                    .col(QuestionResponse::QuestionId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_question_response_user_id")
                    .table(QuestionResponse::Table)
                    .col(QuestionResponse::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_question_response_voter_token_id")
                    .table(QuestionResponse::Table)
                    .col(QuestionResponse::VoterTokenId)
                    .to_owned(),
            )
            .await?;

        // Index: created_at (analytics range scans)
        manager
            .create_index(
                Index::create()
                    .name("idx_question_response_created_at")
                    .table(QuestionResponse::Table)
                    .col(QuestionResponse::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(QuestionResponse::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum QuestionResponse {
    Table,
    Id,
    QuestionId,
    UserId,
    VoterTokenId,
    ResponseData,
    IpAddress,
    CreatedAt,
}

#[derive(Iden)]
enum Question {
    Table,
    Id,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}

#[derive(Iden)]
enum VoterToken {
    Table,
    Id,
}
