//! Create engagement stats table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(EngagementStats::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(EngagementStats::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(EngagementStats::UserId)
                            .string_len(32)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(EngagementStats::VoterTokenId)
                            .string_len(32)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(EngagementStats::CurrentStreak)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(EngagementStats::LongestStreak)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(EngagementStats::TotalVotes)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(EngagementStats::TotalXp)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(EngagementStats::LastActivity)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_engagement_stats_user")
                            .from(EngagementStats::Table, EngagementStats::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_engagement_stats_voter_token")
                            .from(EngagementStats::Table, EngagementStats::VoterTokenId)
                            .to(VoterToken::Table, VoterToken::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One stats row per identity. NULLs are distinct in Postgres unique
        // indexes, so the voter/user split needs no partial index.
        manager
            .create_index(
                Index::create()
                    .name("idx_engagement_stats_user_id")
                    .table(EngagementStats::Table)
                    .col(EngagementStats::UserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_engagement_stats_voter_token_id")
                    .table(EngagementStats::Table)
                    .col(EngagementStats::VoterTokenId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(EngagementStats::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum EngagementStats {
    Table,
    Id,
    UserId,
    VoterTokenId,
    CurrentStreak,
    LongestStreak,
    TotalVotes,
    TotalXp,
    LastActivity,
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
