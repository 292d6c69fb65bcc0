use thiserror::Error;

use super::dialect::Dialect;

#[derive(Debug, Error)]
pub enum ConnectError {
    #[error("Unsupported dialect: {0}")]
    UnsupportedDialect(String),

    #[error("Invalid data source for {dialect}: {reason}")]
    InvalidDataSource { dialect: Dialect, reason: String },

    #[error("Cannot connect to database: {0}")]
    Connect(#[source] sqlx::Error),

    #[error("Connection timed out after {timeout_ms} ms")]
    Timeout { timeout_ms: u64 },
}

impl ConnectError {
    pub(crate) fn invalid(dialect: Dialect, reason: impl Into<String>) -> Self {
        ConnectError::InvalidDataSource {
            dialect,
            reason: reason.into(),
        }
    }
}
