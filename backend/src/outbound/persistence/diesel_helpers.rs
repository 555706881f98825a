//! Shared helpers for Diesel repository implementations.
//!
//! Each repository owns its port error type, so the helpers here stop at a
//! neutral [`StorageFailure`] classification. Repositories then decide which
//! constraint means what for their own port.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::{debug, warn};

use super::pool::PoolError;

/// Extract a readable message from a pool error.
pub fn map_pool_error_message(error: PoolError) -> String {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    }
}

/// Database failure reduced to what the repositories distinguish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageFailure {
    /// The connection dropped or could not be used.
    Connection(String),
    /// A unique or primary key constraint rejected the write.
    UniqueViolation { constraint: Option<String> },
    /// A foreign key constraint rejected the write.
    ForeignKeyViolation { constraint: Option<String> },
    /// Anything else, including check constraint violations.
    Query(String),
}

impl StorageFailure {
    /// True when the violated constraint is `name`.
    pub fn is_constraint(&self, name: &str) -> bool {
        match self {
            Self::UniqueViolation { constraint } | Self::ForeignKeyViolation { constraint } => {
                constraint.as_deref() == Some(name)
            }
            Self::Connection(_) | Self::Query(_) => false,
        }
    }

    /// Human-readable message for errors that do not map to a richer variant.
    pub fn message(&self) -> String {
        match self {
            Self::Connection(message) | Self::Query(message) => message.clone(),
            Self::UniqueViolation { constraint } => format!(
                "unique constraint {} violated",
                constraint.as_deref().unwrap_or("<unnamed>")
            ),
            Self::ForeignKeyViolation { constraint } => format!(
                "foreign key {} violated",
                constraint.as_deref().unwrap_or("<unnamed>")
            ),
        }
    }

    /// Log a constraint violation nobody expected and degrade it to a query
    /// failure message.
    pub fn unrecognised(&self) -> String {
        let message = self.message();
        warn!(%message, "unrecognised constraint violation - may need specific error mapping");
        message
    }
}

/// Classify a Diesel error, emitting debug context.
pub fn classify_diesel_error(error: DieselError) -> StorageFailure {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(
                ?kind,
                message = info.message(),
                constraint = ?info.constraint_name(),
                "diesel operation failed"
            );
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::DatabaseError(kind, info) => {
            let constraint = info.constraint_name().map(str::to_owned);
            match kind {
                DatabaseErrorKind::UniqueViolation => StorageFailure::UniqueViolation { constraint },
                DatabaseErrorKind::ForeignKeyViolation => {
                    StorageFailure::ForeignKeyViolation { constraint }
                }
                DatabaseErrorKind::ClosedConnection => {
                    StorageFailure::Connection("database connection error".to_owned())
                }
                DatabaseErrorKind::CheckViolation => StorageFailure::Query(format!(
                    "check constraint {} violated",
                    constraint.as_deref().unwrap_or("<unnamed>")
                )),
                _ => StorageFailure::Query("database error".to_owned()),
            }
        }
        DieselError::NotFound => StorageFailure::Query("record not found".to_owned()),
        DieselError::QueryBuilderError(_) => {
            StorageFailure::Query("database query error".to_owned())
        }
        DieselError::RollbackTransaction | DieselError::RollbackErrorOnCommit { .. } => {
            StorageFailure::Query("transaction rolled back".to_owned())
        }
        _ => StorageFailure::Query("database error".to_owned()),
    }
}

/// Collect row conversion results, mapping the first error through `map_err`.
pub fn collect_rows<T, E>(
    results: impl Iterator<Item = Result<T, String>>,
    map_err: impl FnOnce(String) -> E,
) -> Result<Vec<T>, E> {
    results.collect::<Result<Vec<_>, _>>().map_err(map_err)
}

/// Escape `%`, `_`, and `\` so `prefix` matches literally in `LIKE`.
pub fn like_prefix_pattern(prefix: &str) -> String {
    let mut pattern = String::with_capacity(prefix.len() + 1);
    for ch in prefix.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}
