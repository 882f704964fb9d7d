use std::time::Duration;

use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};

use crate::{
    config::{Config, redact_url},
    error::{CatalogError, CatalogResult},
};

pub async fn connect(config: &Config) -> CatalogResult<DatabaseConnection> {
    let mut options = ConnectOptions::new(config.database_url.clone());
    options
        .max_connections(config.max_connections)
        .min_connections(1)
        .connect_timeout(Duration::from_secs(10))
        .sqlx_logging(false);

    let db = Database::connect(options).await.map_err(|source| CatalogError::Connection {
        url: redact_url(&config.database_url),
        source,
    })?;

    tracing::info!(url = %redact_url(&config.database_url), "connected to catalog");
    Ok(db)
}

/// Creates the search log relation if it is missing. Safe to call on every start.
pub async fn ensure_schema(db: &DatabaseConnection) -> CatalogResult<()> {
    Migrator::up(db, None).await.map_err(CatalogError::Schema)?;
    tracing::debug!("search log schema ready");
    Ok(())
}
