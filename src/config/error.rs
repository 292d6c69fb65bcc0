use std::path::PathBuf;

use thiserror::Error;

/// Failures while loading the config file or resolving an environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse YAML config {path}: {source}")]
    ParseYaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Failed to parse TOML config {path}: {source}")]
    ParseToml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("No environment: {0}")]
    UnknownEnvironment(String),

    #[error("No dialect specified")]
    MissingDialect { environment: String },

    #[error("No data source specified")]
    MissingDataSource { environment: String },
}
