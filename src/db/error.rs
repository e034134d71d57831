use std::path::PathBuf;

use rusqlite::Error as SqlError;
use thiserror::Error;

/// Faults while reading the card store. A card that does not exist is not a
/// fault; lookups report that as `Ok(None)`.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to open card store at {}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: SqlError,
    },
    #[error("card store does not match the expected TLACardList layout")]
    Schema(#[source] SqlError),
    #[error("card store query failed")]
    Query(#[source] SqlError),
}

impl StoreError {
    /// Sort a query-time SQLite error into a schema mismatch or a plain
    /// query failure.
    pub(crate) fn from_query(err: SqlError) -> Self {
        let schema_mismatch = match &err {
            SqlError::InvalidColumnIndex(_)
            | SqlError::InvalidColumnType(..)
            | SqlError::InvalidColumnName(_)
            | SqlError::FromSqlConversionFailure(..)
            | SqlError::IntegralValueOutOfRange(..) => true,
            SqlError::SqliteFailure(_, Some(message)) => {
                message.starts_with("no such table") || message.starts_with("no such column")
            }
            _ => false,
        };

        if schema_mismatch {
            StoreError::Schema(err)
        } else {
            StoreError::Query(err)
        }
    }
}
