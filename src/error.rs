use sea_orm::DbErr;

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("cannot connect to {url}: {source}")]
    Connection {
        url: String,
        #[source]
        source: DbErr,
    },

    #[error("cannot prepare the search log: {0}")]
    Schema(#[source] DbErr),

    #[error("{operation} failed: {source}")]
    Query {
        operation: &'static str,
        #[source]
        source: DbErr,
    },
}

impl CatalogError {
    pub fn query(operation: &'static str) -> impl FnOnce(DbErr) -> Self {
        move |source| Self::Query { operation, source }
    }
}

pub type CatalogResult<T> = Result<T, CatalogError>;
