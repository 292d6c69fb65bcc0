use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Result, anyhow};
use serde_json::json;

use crate::cli::{CliArgs, InitArgs};
use crate::commands::common;
use crate::config::ConfigFormat;
use crate::output::OutputFormat;

pub fn run(args: &CliArgs, cmd: &InitArgs) -> Result<()> {
    let format = common::output_format(args);
    let (target, config_format) = resolve_target_path(cmd.path.as_deref(), cmd.format);

    if target.exists() && !cmd.force {
        return Err(anyhow!("Config already exists: {}", target.display()));
    }

    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)?;
    }

    let template = match config_format {
        ConfigFormat::Yaml => YAML_TEMPLATE,
        ConfigFormat::Toml => TOML_TEMPLATE,
    };
    fs::write(&target, template)?;
    tracing::info!(path = %target.display(), "wrote config");

    if args.quiet {
        return Ok(());
    }

    if matches!(format, OutputFormat::Json) {
        let payload = json!({
            "path": target.display().to_string(),
            "format": config_format.as_str(),
            "created": true,
            "overwritten": cmd.force,
        });
        common::print_json(&payload)?;
    } else {
        println!("Wrote config to {}", target.display());
    }

    Ok(())
}

fn resolve_target_path(path: Option<&Path>, format: ConfigFormat) -> (PathBuf, ConfigFormat) {
    let file_name = match format {
        ConfigFormat::Yaml => "dbconfig.yml",
        ConfigFormat::Toml => "dbconfig.toml",
    };

    match path {
        Some(path)
            if path
                .extension()
                .and_then(|s| s.to_str())
                .is_some_and(|ext| matches!(ext, "yaml" | "yml" | "toml")) =>
        {
            (path.to_path_buf(), ConfigFormat::from_path(path))
        }
        Some(path) => (path.join(file_name), format),
        None => (PathBuf::from(file_name), format),
    }
}

const YAML_TEMPLATE: &str = r#"# sql-migrate configuration
# Each top-level key is an environment, selected with --env.

development:
  # Values: sqlite3 | postgres | mysql
  dialect: sqlite3
  # $VAR and ${VAR} are expanded from the process environment.
  datasource: development.db
  dir: migrations
  # table: gorp_migrations
  # schema: public

production:
  dialect: postgres
  datasource: dbname=${DB_NAME} user=${DB_USER} password=${DB_PASSWORD} sslmode=require
  dir: migrations
"#;

const TOML_TEMPLATE: &str = r#"# sql-migrate configuration
# Each [database.<name>] table is an environment, selected with --env.

[database.development]
# Values: sqlite3 | postgres | mysql
dialect = "sqlite3"
# $VAR and ${VAR} are expanded from the process environment.
datasource = "development.db"
dir = "migrations"
# table = "gorp_migrations"
# schema = "public"

[database.production]
dialect = "postgres"
datasource = "dbname=${DB_NAME} user=${DB_USER} password=${DB_PASSWORD} sslmode=require"
dir = "migrations"
"#;
