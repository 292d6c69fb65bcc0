use anyhow::Result;

use crate::cli::CliArgs;
use crate::config::{self, Environment};
use crate::migrate::TrackingTable;
use crate::output::{self, OutputFormat};

pub fn load_environment(args: &CliArgs) -> Result<Environment> {
    config::load_from_system(
        &args.config_path,
        &args.environment,
        args.env_file.as_deref(),
    )
}

pub fn tracking_for(environment: &Environment) -> TrackingTable {
    let mut tracking = TrackingTable::default();
    environment.apply_tracking(&mut tracking);
    tracking
}

pub fn output_format(args: &CliArgs) -> OutputFormat {
    output::select_format(&args.output)
}

pub fn print_json(value: &serde_json::Value) -> Result<()> {
    let body = output::json::emit_json_value(value, true)?;
    println!("{}", body);
    Ok(())
}
