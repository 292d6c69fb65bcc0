use std::path::Path;
use std::time::Instant;

use anyhow::Result;
use serde_json::json;

use crate::cli::{CheckArgs, CliArgs};
use crate::commands::common;
use crate::db;
use crate::output::{OutputFormat, TableOptions, table};

pub fn run(args: &CliArgs, cmd: &CheckArgs) -> Result<()> {
    let environment = common::load_environment(args)?;
    let tracking = common::tracking_for(&environment);
    let format = common::output_format(args);

    let (dialect, latency_ms) = tokio::runtime::Runtime::new()?.block_on(async {
        let (connection, dialect) = db::open(&environment).await?;
        let mut latency_ms = None;
        if cmd.ping {
            let started = Instant::now();
            let pinged = connection.ping(cmd.timeout_ms).await;
            connection.close().await;
            pinged?;
            latency_ms = Some(started.elapsed().as_millis() as u64);
        }
        Ok::<_, db::ConnectError>((dialect, latency_ms))
    })?;

    let mut warnings = Vec::new();
    let migrations_dir = Path::new(&environment.dir);
    if !migrations_dir.is_dir() {
        tracing::warn!(dir = environment.dir.as_str(), "migration directory not found");
        warnings.push(format!("Migration directory not found: {}", environment.dir));
    }

    let tracking_table = dialect.qualified_table(tracking.schema(), tracking.table());

    if args.quiet {
        return Ok(());
    }

    if matches!(format, OutputFormat::Json) {
        let payload = json!({
            "status": "ok",
            "environment": environment.name,
            "dialect": dialect,
            "dir": environment.dir,
            "trackingTable": tracking_table,
            "createTableSuffix": dialect.create_table_suffix(),
            "pinged": cmd.ping,
            "latencyMs": latency_ms,
            "warnings": warnings,
        });
        return common::print_json(&payload);
    }

    let mut rows = vec![
        ("Status".to_string(), Some("ok".to_string())),
        ("Environment".to_string(), Some(environment.name.clone())),
        ("Dialect".to_string(), Some(dialect.to_string())),
        ("Dir".to_string(), Some(environment.dir.clone())),
        ("TrackingTable".to_string(), Some(tracking_table)),
        ("LatencyMs".to_string(), latency_ms.map(|ms| ms.to_string())),
    ];
    for warning in warnings {
        rows.push(("Warning".to_string(), Some(warning)));
    }

    let rendered = table::render_key_value_table("Check", &rows, format, &TableOptions::default());
    println!("{}", rendered);

    Ok(())
}
