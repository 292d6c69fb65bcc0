use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Environments keyed by name, sorted for stable listing.
pub type Environments = BTreeMap<String, EnvironmentRecord>;

/// One environment as written in the config file. Every field is optional
/// here; required fields are enforced when the environment is resolved.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct EnvironmentRecord {
    pub dialect: Option<String>,
    pub datasource: Option<String>,
    pub dir: Option<String>,
    pub table: Option<String>,
    pub schema: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Yaml,
    Toml,
}

impl ConfigFormat {
    /// `.yaml` and `.yml` select YAML; every other extension is read as TOML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml") | Some("yml") => ConfigFormat::Yaml,
            _ => ConfigFormat::Toml,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigFormat::Yaml => "yaml",
            ConfigFormat::Toml => "toml",
        }
    }
}

/// YAML layout: the document root maps environment names to records.
/// Entries with an empty body deserialize to `None` and are dropped.
#[derive(Debug, Default, Deserialize)]
#[serde(transparent)]
pub(crate) struct YamlConfigFile {
    pub(crate) environments: BTreeMap<String, Option<EnvironmentRecord>>,
}

/// TOML layout: environments live under the `[database]` table.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct TomlConfigFile {
    #[serde(default)]
    pub(crate) database: BTreeMap<String, EnvironmentRecord>,
}

impl YamlConfigFile {
    pub(crate) fn into_environments(self) -> Environments {
        self.environments
            .into_iter()
            .filter_map(|(name, record)| record.map(|record| (name, record)))
            .collect()
    }
}

impl TomlConfigFile {
    pub(crate) fn into_environments(self) -> Environments {
        self.database
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_follows_extension() {
        assert_eq!(ConfigFormat::from_path(Path::new("dbconfig.yml")), ConfigFormat::Yaml);
        assert_eq!(ConfigFormat::from_path(Path::new("a/b.yaml")), ConfigFormat::Yaml);
        assert_eq!(ConfigFormat::from_path(Path::new("dbconfig.toml")), ConfigFormat::Toml);
        assert_eq!(ConfigFormat::from_path(Path::new("dbconfig")), ConfigFormat::Toml);
    }

    #[test]
    fn yaml_null_entries_are_dropped() {
        let file: YamlConfigFile =
            serde_yaml::from_str("development:\n  dialect: sqlite3\nstaging:\n").expect("yaml");
        let environments = file.into_environments();
        assert_eq!(environments.len(), 1);
        assert!(environments.contains_key("development"));
    }

    #[test]
    fn toml_without_database_table_is_empty() {
        let file: TomlConfigFile = toml::from_str("title = \"x\"\n").expect("toml");
        assert!(file.into_environments().is_empty());
    }
}
