use std::io::{self, Write};

use anyhow::Result;

use crate::cli::CliArgs;
use crate::commands::common;
use crate::output::{OutputFormat, TableOptions, json, table};

pub fn run(args: &CliArgs) -> Result<()> {
    let environment = common::load_environment(args)?;
    let tracking = common::tracking_for(&environment);
    let format = common::output_format(args);

    if args.quiet {
        return Ok(());
    }

    match format {
        OutputFormat::Json => {
            common::print_json(&json::environment_to_json(&environment, &tracking))?;
        }
        _ => {
            let rows = vec![
                (
                    "configPath".to_string(),
                    Some(environment.config_path.display().to_string()),
                ),
                ("environment".to_string(), Some(environment.name.clone())),
                ("dialect".to_string(), Some(environment.dialect.clone())),
                ("datasource".to_string(), Some(environment.datasource.clone())),
                ("dir".to_string(), Some(environment.dir.clone())),
                ("table".to_string(), Some(tracking.table().to_string())),
                ("schema".to_string(), tracking.schema().map(str::to_string)),
            ];

            let rendered =
                table::render_key_value_table("Environment", &rows, format, &TableOptions::default());
            writeln!(io::stdout(), "{}", rendered)?;
        }
    }

    Ok(())
}
