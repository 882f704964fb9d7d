mod common;

use common::{empty_catalog, sqlite_config};
use filmsearch::{CatalogError, CatalogSearch, Config, db, models::RecordPolicy};
use sea_orm::{ConnectionTrait, DbBackend, Statement};

async fn search_log_tables(catalog: &CatalogSearch) -> i64 {
    let row = catalog
        .db()
        .query_one(Statement::from_string(
            DbBackend::Sqlite,
            "SELECT COUNT(*) AS n FROM sqlite_master WHERE type = 'table' AND name = 'search_logs'"
                .to_string(),
        ))
        .await
        .unwrap()
        .unwrap();
    row.try_get("", "n").unwrap()
}

#[tokio::test]
async fn ensure_schema_is_idempotent() {
    let catalog = empty_catalog().await;

    catalog.ensure_schema().await.unwrap();
    catalog.ensure_schema().await.unwrap();

    assert_eq!(search_log_tables(&catalog).await, 1);
    assert_eq!(catalog.logged_searches().await.unwrap(), 0);
}

#[tokio::test]
async fn adopts_search_log_created_outside_migrations() {
    let dir = tempfile::tempdir().unwrap();
    let config = sqlite_config(&dir, RecordPolicy::Always);

    let conn = db::connect(&config).await.unwrap();
    for sql in [
        "CREATE TABLE search_logs (id INTEGER PRIMARY KEY AUTOINCREMENT, \
         search_term VARCHAR(255) NOT NULL, search_type VARCHAR(50) NOT NULL, \
         search_time TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP)",
        "CREATE INDEX idx_search_logs_search_term ON search_logs (search_term)",
        "INSERT INTO search_logs (search_term, search_type) VALUES ('love', 'keyword')",
    ] {
        conn.execute(Statement::from_string(DbBackend::Sqlite, sql.to_string())).await.unwrap();
    }
    conn.close().await.unwrap();

    let catalog = CatalogSearch::open(&config).await.unwrap();
    catalog.ensure_schema().await.unwrap();
    assert_eq!(search_log_tables(&catalog).await, 1);
    assert_eq!(catalog.logged_searches().await.unwrap(), 1);
}

#[tokio::test]
async fn reopening_keeps_existing_entries() {
    let dir = tempfile::tempdir().unwrap();
    let config = sqlite_config(&dir, RecordPolicy::Always);

    let catalog = CatalogSearch::open(&config).await.unwrap();
    catalog.record_search("love", filmsearch::models::SearchKind::Keyword).await;
    catalog.close().await.unwrap();

    let catalog = CatalogSearch::open(&config).await.unwrap();
    assert_eq!(catalog.logged_searches().await.unwrap(), 1);
}

#[tokio::test]
async fn schema_failure_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let writable = sqlite_config(&dir, RecordPolicy::Always);
    db::connect(&writable).await.unwrap().close().await.unwrap();

    let read_only = Config {
        database_url: writable.database_url.replace("mode=rwc", "mode=ro"),
        ..writable
    };
    let err = CatalogSearch::open(&read_only).await.err().unwrap();
    assert!(matches!(err, CatalogError::Schema(_)), "unexpected error: {err}");
}

#[tokio::test]
async fn unreachable_store_is_a_connection_error() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config {
        database_url: format!(
            "sqlite://{}?mode=ro",
            dir.path().join("missing").join("catalog.db").display()
        ),
        max_connections: 1,
        record_policy: RecordPolicy::Always,
    };

    let err = CatalogSearch::open(&config).await.err().unwrap();
    assert!(matches!(err, CatalogError::Connection { .. }), "unexpected error: {err}");
}
