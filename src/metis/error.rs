use thiserror::Error;

use crate::database::DatabaseError;

/// Rejections raised by the discussion core. Every variant is detected
/// before any write happens.
#[derive(Debug, Error)]
pub enum MetisError {
    /// Path and body (or stored entity) disagree
    #[error("{0}")]
    Consistency(String),

    #[error("{0}")]
    FeatureDisabled(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Forbidden(String),

    #[error(transparent)]
    Database(DatabaseError),
}

impl MetisError {
    pub fn consistency(message: impl Into<String>) -> Self {
        MetisError::Consistency(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        MetisError::Forbidden(message.into())
    }
}

impl From<DatabaseError> for MetisError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::NotFound(msg) => MetisError::NotFound(msg),
            other => MetisError::Database(other),
        }
    }
}

pub type MetisResult<T> = Result<T, MetisError>;
