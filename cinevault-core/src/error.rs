use thiserror::Error;

use crate::validation::ValidationFailure;

/// Error taxonomy for the catalog core.
///
/// Storage adapters and services propagate these unchanged; translating them
/// into user-facing results is the caller's job.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// No row matched the requested identifier.
    #[error("not found: {0}")]
    NotFound(String),

    /// One or more business rules were violated. Carries every broken rule,
    /// not just the first.
    #[error(transparent)]
    Validation(#[from] ValidationFailure),

    /// A uniqueness constraint fired at write time despite the pre-check,
    /// e.g. two concurrent creators racing on the same slug. Expected and
    /// reportable, not a programming error.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Connection or transaction-level failure.
    #[error("transient database failure: {0}")]
    Transient(String),

    /// Anything else the database reported.
    #[error("internal error: {0}")]
    Internal(String),
}

impl CatalogError {
    /// Classify a sqlx error under a contextual message.
    ///
    /// Unique-constraint violations become [`CatalogError::Conflict`];
    /// connectivity and pool failures become [`CatalogError::Transient`].
    pub(crate) fn database(context: &str, error: sqlx::Error) -> Self {
        if let Some(db_err) = error.as_database_error()
            && db_err.is_unique_violation()
        {
            let constraint = db_err.constraint().unwrap_or("unknown");
            return CatalogError::Conflict(format!("{context}: duplicate key ({constraint})"));
        }

        match &error {
            sqlx::Error::Io(_) | sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => {
                CatalogError::Transient(format!("{context}: {error}"))
            }
            _ => CatalogError::Internal(format!("{context}: {error}")),
        }
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;
