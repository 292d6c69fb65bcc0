use std::time::Duration;

use sqlx::mysql::{MySqlPool, MySqlPoolOptions};
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use tokio::time::timeout;

use crate::config::Environment;
use crate::db::connection::{ConnectOptions, connect_options};
use crate::db::dialect::Dialect;
use crate::db::error::ConnectError;

/// A lazily connected pool for one of the supported dialects.
#[derive(Debug, Clone)]
pub enum Connection {
    Sqlite(SqlitePool),
    Postgres(PgPool),
    MySql(MySqlPool),
}

/// Open a connection handle for a resolved environment.
///
/// # Arguments
///
/// * `environment` - Resolved environment (dialect name and expanded data source).
///
/// # Returns
///
/// The connection handle together with the validated dialect. No socket is
/// opened until the handle is first used.
///
/// # Errors
///
/// Returns an error if the dialect is not one of the supported set or the
/// data source cannot be turned into driver options.
pub async fn open(environment: &Environment) -> Result<(Connection, Dialect), ConnectError> {
    let dialect = environment.dialect.parse::<Dialect>()?;
    let options = connect_options(dialect, &environment.datasource)?;

    let connection = match options {
        ConnectOptions::Sqlite(options) => {
            Connection::Sqlite(SqlitePoolOptions::new().connect_lazy_with(options))
        }
        ConnectOptions::Postgres(options) => {
            Connection::Postgres(PgPoolOptions::new().connect_lazy_with(options))
        }
        ConnectOptions::MySql(options) => {
            Connection::MySql(MySqlPoolOptions::new().connect_lazy_with(options))
        }
    };

    tracing::info!(
        environment = environment.name.as_str(),
        dialect = dialect.as_str(),
        "opened connection handle"
    );
    Ok((connection, dialect))
}

impl Connection {
    /// Establish one physical connection. A `timeout_ms` of 0 waits for the
    /// pool's own acquire timeout instead.
    pub async fn ping(&self, timeout_ms: u64) -> Result<(), ConnectError> {
        let acquire = async {
            match self {
                Connection::Sqlite(pool) => pool.acquire().await.map(|_| ()),
                Connection::Postgres(pool) => pool.acquire().await.map(|_| ()),
                Connection::MySql(pool) => pool.acquire().await.map(|_| ()),
            }
        };

        if timeout_ms == 0 {
            return acquire.await.map_err(ConnectError::Connect);
        }

        // `timeout` wraps the future in an outer Result for Elapsed vs driver errors.
        timeout(Duration::from_millis(timeout_ms), acquire)
            .await
            .map_err(|_| ConnectError::Timeout { timeout_ms })?
            .map_err(ConnectError::Connect)
    }

    pub async fn close(&self) {
        match self {
            Connection::Sqlite(pool) => pool.close().await,
            Connection::Postgres(pool) => pool.close().await,
            Connection::MySql(pool) => pool.close().await,
        }
    }
}
