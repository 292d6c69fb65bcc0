use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use super::error::ConnectError;

const MYSQL_ENGINE: &str = "InnoDB";
const MYSQL_ENCODING: &str = "UTF8";

/// SQL variants the migration engine is built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    Sqlite3,
    Postgres,
    #[serde(rename = "mysql")]
    MySql,
}

impl Dialect {
    pub const ALL: [Dialect; 3] = [Dialect::Sqlite3, Dialect::Postgres, Dialect::MySql];

    pub fn as_str(&self) -> &'static str {
        match self {
            Dialect::Sqlite3 => "sqlite3",
            Dialect::Postgres => "postgres",
            Dialect::MySql => "mysql",
        }
    }

    /// Suffix appended to `CREATE TABLE` statements for this dialect.
    pub fn create_table_suffix(&self) -> Option<String> {
        match self {
            Dialect::MySql => Some(format!(
                " engine={} charset={}",
                MYSQL_ENGINE, MYSQL_ENCODING
            )),
            _ => None,
        }
    }

    pub fn quote_identifier(&self, name: &str) -> String {
        match self {
            Dialect::MySql => format!("`{}`", name.replace('`', "``")),
            _ => format!("\"{}\"", name.replace('"', "\"\"")),
        }
    }

    /// Quoted `schema.table`, or just the table when no schema is set.
    pub fn qualified_table(&self, schema: Option<&str>, table: &str) -> String {
        match schema {
            Some(schema) => format!(
                "{}.{}",
                self.quote_identifier(schema),
                self.quote_identifier(table)
            ),
            None => self.quote_identifier(table),
        }
    }
}

impl FromStr for Dialect {
    type Err = ConnectError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        Dialect::ALL
            .into_iter()
            .find(|dialect| dialect.as_str() == input)
            .ok_or_else(|| ConnectError::UnsupportedDialect(input.to_string()))
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_supported_names() {
        assert_eq!("sqlite3".parse::<Dialect>().unwrap(), Dialect::Sqlite3);
        assert_eq!("postgres".parse::<Dialect>().unwrap(), Dialect::Postgres);
        assert_eq!("mysql".parse::<Dialect>().unwrap(), Dialect::MySql);
    }

    #[test]
    fn rejects_unknown_names() {
        for name in ["sqlite", "Postgres", "mssql", ""] {
            let err = name.parse::<Dialect>().unwrap_err();
            assert!(matches!(err, ConnectError::UnsupportedDialect(ref d) if d == name));
        }
    }

    #[test]
    fn mysql_quotes_with_backticks() {
        assert_eq!(
            Dialect::MySql.qualified_table(Some("ops"), "gorp_migrations"),
            "`ops`.`gorp_migrations`"
        );
        assert_eq!(Dialect::Postgres.qualified_table(None, "v"), "\"v\"");
    }

    #[test]
    fn mysql_table_suffix_names_engine() {
        assert_eq!(
            Dialect::MySql.create_table_suffix().as_deref(),
            Some(" engine=InnoDB charset=UTF8")
        );
        assert_eq!(Dialect::Sqlite3.create_table_suffix(), None);
    }
}
