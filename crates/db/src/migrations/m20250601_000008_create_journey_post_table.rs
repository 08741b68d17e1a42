//! Create journey post table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(JourneyPost::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(JourneyPost::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(JourneyPost::AuthorId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(ColumnDef::new(JourneyPost::Title).string_len(256).not_null())
                    .col(ColumnDef::new(JourneyPost::Slug).string_len(128).not_null())
                    .col(ColumnDef::new(JourneyPost::Body).text().not_null())
                    .col(ColumnDef::new(JourneyPost::Tags).json_binary().not_null())
                    .col(
                        ColumnDef::new(JourneyPost::IsPublished)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(JourneyPost::PublishedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(JourneyPost::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(JourneyPost::UpdatedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_journey_post_author")
                            .from(JourneyPost::Table, JourneyPost::AuthorId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_journey_post_slug")
                    .table(JourneyPost::Table)
                    .col(JourneyPost::Slug)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Index: (is_published, published_at) for the public feed
        manager
            .create_index(
                Index::create()
                    .name("idx_journey_post_published")
                    .table(JourneyPost::Table)
                    .col(JourneyPost::IsPublished)
                    .col(JourneyPost::PublishedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(JourneyPost::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum JourneyPost {
    Table,
    Id,
    AuthorId,
    Title,
    Slug,
    Body,
    Tags,
    IsPublished,
    PublishedAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}
