//! Create `post` table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Post::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Post::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Post::Author).string_len(50).not_null())
                    .col(ColumnDef::new(Post::Content).text())
                    .col(ColumnDef::new(Post::MediaType).string_len(10))
                    .col(ColumnDef::new(Post::MediaPath).string_len(255))
                    .col(
                        ColumnDef::new(Post::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Post::Date).date().not_null())
                    .to_owned(),
            )
            .await?;

        // Index: (date, created_at) for the day feed
        manager
            .create_index(
                Index::create()
                    .name("idx_post_date_created_at")
                    .table(Post::Table)
                    .col(Post::Date)
                    .col(Post::CreatedAt)
                    .to_owned(),
            )
            .await?;

        // Index: author (rename cascade)
        manager
            .create_index(
                Index::create()
                    .name("idx_post_author")
                    .table(Post::Table)
                    .col(Post::Author)
                    .to_owned(),
            )
            .await?;

        // Unique index: media_path (generated file names)
        manager
            .create_index(
                Index::create()
                    .name("idx_post_media_path")
                    .table(Post::Table)
                    .col(Post::MediaPath)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Post::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Post {
    Table,
    Id,
    Author,
    Content,
    MediaType,
    MediaPath,
    CreatedAt,
    Date,
}
