use std::io::{self, Write};

use anyhow::Result;

use crate::cli::CliArgs;
use crate::commands::common;
use crate::config;
use crate::output::{OutputFormat, TableOptions, json, table};

pub fn run(args: &CliArgs) -> Result<()> {
    let cwd = std::env::current_dir()?;
    let config_path = config::resolve_config_path(&args.config_path, &args.environment, &cwd);
    let environments = config::read_config(&config_path)?;
    let format = common::output_format(args);

    if args.quiet {
        return Ok(());
    }

    if matches!(format, OutputFormat::Json) {
        let payload = json::environments_to_json(&config_path, &args.environment, &environments);
        return common::print_json(&payload);
    }

    let rows = environments
        .iter()
        .map(|(name, record)| {
            let marker = if *name == args.environment { "*" } else { "" };
            vec![
                Some(format!("{}{}", name, marker)),
                record.dialect.clone(),
                Some(
                    record
                        .dir
                        .clone()
                        .unwrap_or_else(|| config::DEFAULT_MIGRATION_DIR.to_string()),
                ),
                record.table.clone(),
                record.schema.clone(),
            ]
        })
        .collect::<Vec<_>>();

    let rendered = table::render_rows_table(
        &["Environment", "Dialect", "Dir", "Table", "Schema"],
        &rows,
        format,
        &TableOptions::default(),
    );
    writeln!(io::stdout(), "{}", rendered)?;
    Ok(())
}
