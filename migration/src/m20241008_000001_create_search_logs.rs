use sea_orm_migration::{prelude::*, schema::*};

const SEARCH_TERM_INDEX: &str = "idx_search_logs_search_term";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // The catalog may already carry a search_logs table from an earlier deployment.
        manager
            .create_table(
                Table::create()
                    .table(SearchLogs::Table)
                    .if_not_exists()
                    .col(pk_auto(SearchLogs::Id))
                    .col(string_len(SearchLogs::SearchTerm, 255))
                    .col(string_len(SearchLogs::SearchType, 50))
                    .col(timestamp(SearchLogs::SearchTime).default(Expr::current_timestamp()))
                    .to_owned(),
            )
            .await?;

        // MySQL has no CREATE INDEX IF NOT EXISTS.
        if !manager.has_index("search_logs", SEARCH_TERM_INDEX).await? {
            manager
                .create_index(
                    Index::create()
                        .name(SEARCH_TERM_INDEX)
                        .table(SearchLogs::Table)
                        .col(SearchLogs::SearchTerm)
                        .to_owned(),
                )
                .await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(SearchLogs::Table).to_owned()).await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum SearchLogs {
    Table,
    Id,
    SearchTerm,
    SearchType,
    SearchTime,
}
