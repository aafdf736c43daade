use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Serves the per-user history listing ordered by watch date; the
        // unique record index has content_id between user_id and
        // watched_at, so it cannot.
        manager
            .create_index(
                Index::create()
                    .name("idx_view_history_user_watched")
                    .table(ViewHistory::Table)
                    .col(ViewHistory::UserId)
                    .col(ViewHistory::WatchedAt)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_view_history_user_watched")
                    .table(ViewHistory::Table)
                    .to_owned(),
            )
            .await
    }
}

#[derive(DeriveIden)]
enum ViewHistory {
    Table,
    UserId,
    WatchedAt,
}
