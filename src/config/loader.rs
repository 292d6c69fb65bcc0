use std::fs;
use std::path::{Path, PathBuf};

use super::env::Env;
use super::error::ConfigError;
use super::schema::{ConfigFormat, Environments, TomlConfigFile, YamlConfigFile};
use crate::migrate::MigrationTracker;

pub const DEFAULT_CONFIG_FILE: &str = "dbconfig.yml";
pub const DEFAULT_ENVIRONMENT: &str = "development";
pub const DEFAULT_MIGRATION_DIR: &str = "migrations";
const FALLBACK_CONFIG_STEM: &str = "dbconfig";

#[derive(Debug, Clone)]
pub struct LoadOptions {
    pub config_path: PathBuf,
    pub environment: String,
    pub cwd: PathBuf,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            config_path: PathBuf::from(DEFAULT_CONFIG_FILE),
            environment: DEFAULT_ENVIRONMENT.to_string(),
            cwd: PathBuf::from("."),
        }
    }
}

/// A fully resolved environment, ready to hand to the connection layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Environment {
    pub name: String,
    pub config_path: PathBuf,
    pub dialect: String,
    pub datasource: String,
    pub dir: String,
    pub table: Option<String>,
    pub schema: Option<String>,
}

impl Environment {
    /// Push the configured tracking location into the migration engine.
    /// Unset values leave the engine's defaults alone.
    pub fn apply_tracking<T: MigrationTracker + ?Sized>(&self, tracker: &mut T) {
        if let Some(table) = &self.table {
            tracker.set_table(table);
        }
        if let Some(schema) = &self.schema {
            tracker.set_schema(schema);
        }
    }
}

pub fn load_environment(options: &LoadOptions, env: &Env) -> Result<Environment, ConfigError> {
    let config_path = resolve_config_path(&options.config_path, &options.environment, &options.cwd);
    let environments = read_config(&config_path)?;
    let mut resolved = resolve_environment(&environments, &options.environment, env)?;
    resolved.config_path = config_path;
    Ok(resolved)
}

/// Pick the file to read. A missing config falls back to
/// `dbconfig.<environment>.toml`, then `dbconfig.toml`, in the working directory.
pub fn resolve_config_path(requested: &Path, environment: &str, cwd: &Path) -> PathBuf {
    let path = if requested.is_absolute() {
        requested.to_path_buf()
    } else {
        cwd.join(requested)
    };
    if path.exists() {
        return path;
    }

    let per_environment = cwd.join(format!("{}.{}.toml", FALLBACK_CONFIG_STEM, environment));
    let fallback = if per_environment.is_file() {
        per_environment
    } else {
        cwd.join(format!("{}.toml", FALLBACK_CONFIG_STEM))
    };
    tracing::debug!(
        requested = %path.display(),
        fallback = %fallback.display(),
        "config file not found, using fallback"
    );
    fallback
}

pub fn read_config(path: &Path) -> Result<Environments, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let format = ConfigFormat::from_path(path);
    tracing::debug!(path = %path.display(), format = format.as_str(), "reading config");

    let environments = match format {
        ConfigFormat::Yaml => serde_yaml::from_str::<YamlConfigFile>(&content)
            .map_err(|source| ConfigError::ParseYaml {
                path: path.to_path_buf(),
                source,
            })?
            .into_environments(),
        ConfigFormat::Toml => toml::from_str::<TomlConfigFile>(&content)
            .map_err(|source| ConfigError::ParseToml {
                path: path.to_path_buf(),
                source,
            })?
            .into_environments(),
    };

    tracing::debug!(count = environments.len(), "parsed environments");
    Ok(environments)
}

pub fn resolve_environment(
    environments: &Environments,
    name: &str,
    env: &Env,
) -> Result<Environment, ConfigError> {
    let record = environments
        .get(name)
        .ok_or_else(|| ConfigError::UnknownEnvironment(name.to_string()))?;

    let dialect = non_empty(record.dialect.as_deref()).ok_or_else(|| {
        ConfigError::MissingDialect {
            environment: name.to_string(),
        }
    })?;
    let datasource = non_empty(record.datasource.as_deref()).ok_or_else(|| {
        ConfigError::MissingDataSource {
            environment: name.to_string(),
        }
    })?;
    let dir = non_empty(record.dir.as_deref()).unwrap_or(DEFAULT_MIGRATION_DIR);

    Ok(Environment {
        name: name.to_string(),
        config_path: PathBuf::new(),
        dialect: dialect.to_string(),
        datasource: env.expand(datasource),
        dir: dir.to_string(),
        table: non_empty(record.table.as_deref()).map(str::to_string),
        schema: non_empty(record.schema.as_deref()).map(str::to_string),
    })
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::EnvironmentRecord;
    use crate::migrate::TrackingTable;
    use tempfile::TempDir;

    const YAML: &str = "\
development:
  dialect: sqlite3
  datasource: test.db
  dir: migrations/sqlite
production:
  dialect: postgres
  datasource: dbname=app user=${PGUSER} sslmode=disable
  table: schema_versions
  schema: ops
";

    fn record(dialect: Option<&str>, datasource: Option<&str>) -> EnvironmentRecord {
        EnvironmentRecord {
            dialect: dialect.map(str::to_string),
            datasource: datasource.map(str::to_string),
            ..EnvironmentRecord::default()
        }
    }

    fn single(name: &str, record: EnvironmentRecord) -> Environments {
        let mut environments = Environments::new();
        environments.insert(name.to_string(), record);
        environments
    }

    #[test]
    fn loads_yaml_and_expands_datasource() {
        let dir = TempDir::new().expect("temp dir");
        fs::write(dir.path().join("dbconfig.yml"), YAML).expect("write config");

        let options = LoadOptions {
            environment: "production".to_string(),
            cwd: dir.path().to_path_buf(),
            ..LoadOptions::default()
        };
        let env = Env::from_pairs(&[("PGUSER", "deploy")]);
        let resolved = load_environment(&options, &env).expect("load");

        assert_eq!(resolved.dialect, "postgres");
        assert_eq!(resolved.datasource, "dbname=app user=deploy sslmode=disable");
        assert_eq!(resolved.dir, DEFAULT_MIGRATION_DIR);
        assert_eq!(resolved.table.as_deref(), Some("schema_versions"));
        assert_eq!(resolved.schema.as_deref(), Some("ops"));
        assert_eq!(resolved.config_path, dir.path().join("dbconfig.yml"));
    }

    #[test]
    fn unknown_environment_is_rejected() {
        let environments = single("development", record(Some("sqlite3"), Some("a.db")));
        let err = resolve_environment(&environments, "staging", &Env::default()).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownEnvironment(ref name) if name == "staging"));
        assert_eq!(err.to_string(), "No environment: staging");
    }

    #[test]
    fn missing_dialect_is_rejected() {
        let environments = single("development", record(None, Some("a.db")));
        let err = resolve_environment(&environments, "development", &Env::default()).unwrap_err();
        assert!(matches!(err, ConfigError::MissingDialect { .. }));
        assert_eq!(err.to_string(), "No dialect specified");
    }

    #[test]
    fn empty_datasource_is_rejected() {
        let environments = single("development", record(Some("sqlite3"), Some("")));
        let err = resolve_environment(&environments, "development", &Env::default()).unwrap_err();
        assert!(matches!(err, ConfigError::MissingDataSource { .. }));
        assert_eq!(err.to_string(), "No data source specified");
    }

    #[test]
    fn dialect_is_not_validated_during_resolution() {
        let environments = single("development", record(Some("oracle"), Some("x")));
        let resolved = resolve_environment(&environments, "development", &Env::default())
            .expect("resolve");
        assert_eq!(resolved.dialect, "oracle");
    }

    #[test]
    fn missing_yaml_falls_back_to_environment_toml() {
        let dir = TempDir::new().expect("temp dir");
        fs::write(dir.path().join("dbconfig.toml"), "").expect("write");
        fs::write(dir.path().join("dbconfig.test.toml"), "").expect("write");

        let path = resolve_config_path(Path::new("dbconfig.yml"), "test", dir.path());
        assert_eq!(path, dir.path().join("dbconfig.test.toml"));

        let path = resolve_config_path(Path::new("dbconfig.yml"), "development", dir.path());
        assert_eq!(path, dir.path().join("dbconfig.toml"));
    }

    #[test]
    fn existing_config_is_used_as_is() {
        let dir = TempDir::new().expect("temp dir");
        fs::write(dir.path().join("custom.yaml"), YAML).expect("write");
        let path = resolve_config_path(Path::new("custom.yaml"), "development", dir.path());
        assert_eq!(path, dir.path().join("custom.yaml"));
    }

    #[test]
    fn unreadable_config_reports_path() {
        let dir = TempDir::new().expect("temp dir");
        let err = read_config(&dir.path().join("dbconfig.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
        assert!(err.to_string().contains("dbconfig.toml"));
    }

    #[test]
    fn malformed_yaml_is_a_parse_error() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("dbconfig.yml");
        fs::write(&path, "development: [unterminated").expect("write");
        let err = read_config(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ParseYaml { .. }));
    }

    #[test]
    fn tracking_only_applied_when_configured() {
        let environments = single("development", record(Some("sqlite3"), Some("a.db")));
        let resolved = resolve_environment(&environments, "development", &Env::default())
            .expect("resolve");
        let mut tracking = TrackingTable::default();
        resolved.apply_tracking(&mut tracking);
        assert_eq!(tracking, TrackingTable::default());

        let mut with_table = record(Some("sqlite3"), Some("a.db"));
        with_table.table = Some("versions".to_string());
        let environments = single("development", with_table);
        let resolved = resolve_environment(&environments, "development", &Env::default())
            .expect("resolve");
        resolved.apply_tracking(&mut tracking);
        assert_eq!(tracking.table(), "versions");
        assert_eq!(tracking.schema(), None);
    }
}
