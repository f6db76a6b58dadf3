use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database handle lock poisoned")]
    Poisoned,

    #[cfg(feature = "duckdb")]
    #[error("duckdb error: {0}")]
    DuckDb(#[from] ::duckdb::Error),
}
