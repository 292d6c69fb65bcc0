use std::path::Path;

use serde_json::json;

use crate::config::{Environment, Environments};
use crate::migrate::TrackingTable;

pub fn emit_json_value(value: &serde_json::Value, pretty: bool) -> anyhow::Result<String> {
    if pretty {
        Ok(serde_json::to_string_pretty(value)?)
    } else {
        Ok(serde_json::to_string(value)?)
    }
}

pub fn error_json(message: &str, kind: &str) -> serde_json::Value {
    json!({
        "error": {
            "message": message,
            "kind": kind,
        }
    })
}

pub fn environment_to_json(environment: &Environment, tracking: &TrackingTable) -> serde_json::Value {
    json!({
        "configPath": environment.config_path.display().to_string(),
        "environment": environment.name,
        "dialect": environment.dialect,
        "datasource": environment.datasource,
        "dir": environment.dir,
        "tracking": {
            "table": tracking.table(),
            "schema": tracking.schema(),
        },
    })
}

pub fn environments_to_json(
    config_path: &Path,
    selected: &str,
    environments: &Environments,
) -> serde_json::Value {
    let entries = environments
        .iter()
        .map(|(name, record)| {
            json!({
                "name": name,
                "selected": name == selected,
                "dialect": record.dialect,
                "dir": record.dir,
                "table": record.table,
                "schema": record.schema,
            })
        })
        .collect::<Vec<_>>();

    json!({
        "configPath": config_path.display().to_string(),
        "environments": entries,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EnvironmentRecord;
    use crate::migrate::MigrationTracker;
    use std::path::PathBuf;

    #[test]
    fn emits_error_json() {
        let value = error_json("boom", "Internal");
        assert_eq!(value["error"]["message"], "boom");
        assert_eq!(value["error"]["kind"], "Internal");
    }

    #[test]
    fn environment_json_includes_tracking() {
        let environment = Environment {
            name: "production".to_string(),
            config_path: PathBuf::from("dbconfig.yml"),
            dialect: "postgres".to_string(),
            datasource: "dbname=app".to_string(),
            dir: "migrations".to_string(),
            table: None,
            schema: Some("ops".to_string()),
        };
        let mut tracking = TrackingTable::default();
        tracking.set_schema("ops");
        let value = environment_to_json(&environment, &tracking);
        assert_eq!(value["environment"], "production");
        assert_eq!(value["tracking"]["table"], "gorp_migrations");
        assert_eq!(value["tracking"]["schema"], "ops");
    }

    #[test]
    fn environments_json_marks_selection() {
        let mut environments = Environments::new();
        environments.insert("development".to_string(), EnvironmentRecord::default());
        environments.insert("production".to_string(), EnvironmentRecord::default());
        let value = environments_to_json(Path::new("dbconfig.yml"), "production", &environments);
        let entries = value["environments"].as_array().expect("array");
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0]["selected"], false);
        assert_eq!(entries[1]["name"], "production");
        assert_eq!(entries[1]["selected"], true);
    }
}
