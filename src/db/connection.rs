use std::str::FromStr;

use sqlx::mysql::MySqlConnectOptions;
use sqlx::postgres::{PgConnectOptions, PgSslMode};
use sqlx::sqlite::SqliteConnectOptions;

use super::dialect::Dialect;
use super::error::ConnectError;

/// Driver options built from a data source string. Building them never
/// touches the network or the filesystem.
#[derive(Debug, Clone)]
pub enum ConnectOptions {
    Sqlite(SqliteConnectOptions),
    Postgres(PgConnectOptions),
    MySql(MySqlConnectOptions),
}

pub fn connect_options(dialect: Dialect, datasource: &str) -> Result<ConnectOptions, ConnectError> {
    let datasource = datasource.trim();
    match dialect {
        Dialect::Sqlite3 => sqlite_options(datasource).map(ConnectOptions::Sqlite),
        Dialect::Postgres => postgres_options(datasource).map(ConnectOptions::Postgres),
        Dialect::MySql => mysql_options(datasource).map(ConnectOptions::MySql),
    }
}

fn sqlite_options(datasource: &str) -> Result<SqliteConnectOptions, ConnectError> {
    if datasource.starts_with("sqlite:") {
        return SqliteConnectOptions::from_str(datasource)
            .map_err(|err| ConnectError::invalid(Dialect::Sqlite3, err.to_string()));
    }
    if datasource == ":memory:" {
        return SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(|err| ConnectError::invalid(Dialect::Sqlite3, err.to_string()));
    }

    let path = sqlite_path(datasource);
    if path.is_empty() {
        return Err(ConnectError::invalid(Dialect::Sqlite3, "empty database path"));
    }
    Ok(SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true))
}

/// Strip the `file:` prefix and any query string from a driver-style path.
fn sqlite_path(datasource: &str) -> &str {
    let path = datasource.strip_prefix("file:").unwrap_or(datasource);
    match path.split_once('?') {
        Some((path, query)) => {
            tracing::debug!(query, "ignoring sqlite data source parameters");
            path
        }
        None => path,
    }
}

fn postgres_options(datasource: &str) -> Result<PgConnectOptions, ConnectError> {
    if datasource.starts_with("postgres://") || datasource.starts_with("postgresql://") {
        return PgConnectOptions::from_str(datasource)
            .map_err(|err| ConnectError::invalid(Dialect::Postgres, err.to_string()));
    }

    let pairs = parse_key_value_dsn(datasource)
        .map_err(|reason| ConnectError::invalid(Dialect::Postgres, reason))?;
    let mut options = PgConnectOptions::new();
    for (key, value) in pairs {
        options = match key.as_str() {
            "host" => options.host(&value),
            "port" => {
                let port = value.parse::<u16>().map_err(|_| {
                    ConnectError::invalid(Dialect::Postgres, format!("invalid port: {}", value))
                })?;
                options.port(port)
            }
            "user" => options.username(&value),
            "password" => options.password(&value),
            "dbname" => options.database(&value),
            "sslmode" => {
                let mode = PgSslMode::from_str(&value).map_err(|_| {
                    ConnectError::invalid(Dialect::Postgres, format!("invalid sslmode: {}", value))
                })?;
                options.ssl_mode(mode)
            }
            "application_name" => options.application_name(&value),
            other => {
                tracing::debug!(key = other, "ignoring postgres connection parameter");
                options
            }
        };
    }
    Ok(options)
}

/// Parse a libpq `key=value` connection string. Values may be single-quoted
/// with backslash escapes.
fn parse_key_value_dsn(input: &str) -> Result<Vec<(String, String)>, String> {
    let mut pairs = Vec::new();
    let mut chars = input.chars().peekable();

    loop {
        while chars.next_if(|c| c.is_whitespace()).is_some() {}
        if chars.peek().is_none() {
            break;
        }

        let mut key = String::new();
        while let Some(c) = chars.next_if(|c| *c != '=' && !c.is_whitespace()) {
            key.push(c);
        }
        while chars.next_if(|c| c.is_whitespace()).is_some() {}
        if chars.next() != Some('=') {
            return Err(format!("missing \"=\" after \"{}\"", key));
        }
        while chars.next_if(|c| c.is_whitespace()).is_some() {}

        let mut value = String::new();
        if chars.next_if_eq(&'\'').is_some() {
            loop {
                match chars.next() {
                    Some('\\') => match chars.next() {
                        Some(c) => value.push(c),
                        None => return Err("unterminated quoted value".to_string()),
                    },
                    Some('\'') => break,
                    Some(c) => value.push(c),
                    None => return Err("unterminated quoted value".to_string()),
                }
            }
        } else {
            while let Some(c) = chars.next_if(|c| !c.is_whitespace()) {
                value.push(c);
            }
        }
        pairs.push((key, value));
    }

    if pairs.is_empty() {
        return Err("empty connection string".to_string());
    }
    Ok(pairs)
}

fn mysql_options(datasource: &str) -> Result<MySqlConnectOptions, ConnectError> {
    if datasource.starts_with("mysql://") {
        return MySqlConnectOptions::from_str(datasource)
            .map_err(|err| ConnectError::invalid(Dialect::MySql, err.to_string()));
    }

    let dsn = parse_mysql_dsn(datasource)
        .map_err(|reason| ConnectError::invalid(Dialect::MySql, reason))?;
    let mut options = MySqlConnectOptions::new();
    if let Some(user) = &dsn.user {
        options = options.username(user);
    }
    if let Some(password) = &dsn.password {
        options = options.password(password);
    }
    match &dsn.address {
        MySqlAddress::Default => {}
        MySqlAddress::Tcp { host, port } => {
            options = options.host(host);
            if let Some(port) = port {
                options = options.port(*port);
            }
        }
        MySqlAddress::Unix(path) => {
            options = options.socket(path);
        }
    }
    if !dsn.database.is_empty() {
        options = options.database(&dsn.database);
    }
    for (key, _) in &dsn.params {
        tracing::debug!(key = key.as_str(), "ignoring mysql data source parameter");
    }
    Ok(options)
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum MySqlAddress {
    Default,
    Tcp { host: String, port: Option<u16> },
    Unix(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct MySqlDsn {
    user: Option<String>,
    password: Option<String>,
    address: MySqlAddress,
    database: String,
    params: Vec<(String, String)>,
}

/// Parse a Go driver DSN:
/// `[user[:password]@][net[(addr)]]/dbname[?param1=value1&paramN=valueN]`.
fn parse_mysql_dsn(input: &str) -> Result<MySqlDsn, String> {
    // Passwords may contain '?' or '/', so the database separator is the last
    // slash and parameters only start after it.
    let slash = input
        .rfind('/')
        .ok_or_else(|| "missing \"/\" before database name".to_string())?;
    let (prefix, rest) = (&input[..slash], &input[slash + 1..]);
    let (database, query) = match rest.split_once('?') {
        Some((database, query)) => (database, Some(query)),
        None => (rest, None),
    };

    let (auth, address) = match prefix.rfind('@') {
        Some(at) => (Some(&prefix[..at]), &prefix[at + 1..]),
        None => (None, prefix),
    };

    let (user, password) = match auth {
        Some(auth) => match auth.split_once(':') {
            Some((user, password)) => (Some(user.to_string()), Some(password.to_string())),
            None => (Some(auth.to_string()), None),
        },
        None => (None, None),
    };

    let params = query
        .map(|query| {
            query
                .split('&')
                .filter(|pair| !pair.is_empty())
                .map(|pair| match pair.split_once('=') {
                    Some((k, v)) => (k.to_string(), v.to_string()),
                    None => (pair.to_string(), String::new()),
                })
                .collect()
        })
        .unwrap_or_default();

    Ok(MySqlDsn {
        user: user.filter(|u| !u.is_empty()),
        password,
        address: parse_mysql_address(address)?,
        database: database.to_string(),
        params,
    })
}

fn parse_mysql_address(address: &str) -> Result<MySqlAddress, String> {
    if address.is_empty() || address == "tcp" {
        return Ok(MySqlAddress::Default);
    }

    let (net, addr) = match address.split_once('(') {
        Some((net, rest)) => {
            let addr = rest
                .strip_suffix(')')
                .ok_or_else(|| format!("unterminated address: {}", address))?;
            (net, addr)
        }
        None => return Err(format!("invalid network address: {}", address)),
    };

    match net {
        "tcp" | "tcp4" | "tcp6" => {
            let (host, port) = split_host_port(addr)?;
            if host.is_empty() {
                return Ok(MySqlAddress::Default);
            }
            Ok(MySqlAddress::Tcp {
                host: host.to_string(),
                port,
            })
        }
        "unix" => Ok(MySqlAddress::Unix(addr.to_string())),
        other => Err(format!("unknown network type: {}", other)),
    }
}

/// Split `host[:port]`, accepting bracketed IPv6 hosts.
fn split_host_port(addr: &str) -> Result<(&str, Option<u16>), String> {
    let (host, port) = match addr.strip_prefix('[') {
        Some(rest) => {
            let (host, tail) = rest
                .split_once(']')
                .ok_or_else(|| format!("unterminated IPv6 host: {}", addr))?;
            (host, tail.strip_prefix(':'))
        }
        None => match addr.rsplit_once(':') {
            Some((host, port)) if !host.contains(':') => (host, Some(port)),
            _ => (addr, None),
        },
    };
    let port = port
        .map(|port| {
            port.parse::<u16>()
                .map_err(|_| format!("invalid port: {}", port))
        })
        .transpose()?;
    Ok((host, port))
}
