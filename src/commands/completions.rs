use std::io;

use anyhow::{Result, anyhow};
use clap_complete::{Shell, generate};

use crate::cli::{CliArgs, CompletionsArgs, build_cli};

const BIN_NAME: &str = "sql-migrate";

pub fn run(_args: &CliArgs, cmd: &CompletionsArgs) -> Result<()> {
    let shell = cmd
        .shell
        .as_deref()
        .ok_or_else(|| anyhow!("--shell is required"))?
        .parse::<Shell>()
        .map_err(|err| anyhow!("Unsupported shell: {}", err))?;

    let mut cli = build_cli(true);
    generate(shell, &mut cli, BIN_NAME, &mut io::stdout());
    Ok(())
}
