use crate::config::ConfigError;
use crate::db::ConnectError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Config,
    Connection,
    Internal,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Config => "Config",
            ErrorKind::Connection => "Connection",
            ErrorKind::Internal => "Internal",
        }
    }
}

pub fn classify_error(err: &anyhow::Error) -> ErrorKind {
    for cause in err.chain() {
        if cause.downcast_ref::<ConfigError>().is_some() {
            return ErrorKind::Config;
        }
        if let Some(connect) = cause.downcast_ref::<ConnectError>() {
            return match connect {
                ConnectError::UnsupportedDialect(_) | ConnectError::InvalidDataSource { .. } => {
                    ErrorKind::Config
                }
                ConnectError::Connect(_) | ConnectError::Timeout { .. } => ErrorKind::Connection,
            };
        }
    }
    ErrorKind::Internal
}
