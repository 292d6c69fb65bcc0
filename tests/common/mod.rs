#![allow(dead_code)]

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use serde_json::Value;
use std::path::{Path, PathBuf};

pub fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Command running in `cwd` with the config/env overrides cleared.
pub fn command_in(cwd: &Path) -> Command {
    let mut cmd = cargo_bin_cmd!("sql-migrate");
    cmd.current_dir(cwd)
        .env_remove("SQL_MIGRATE_CONFIG")
        .env_remove("SQL_MIGRATE_ENV")
        .env_remove("RUST_LOG");
    cmd
}

pub fn stdout_json(cmd: &mut Command) -> Value {
    let output = cmd.assert().success().get_output().stdout.clone();
    serde_json::from_slice(&output).expect("json")
}

pub fn stderr_json(cmd: &mut Command) -> Value {
    let output = cmd.assert().failure().get_output().stderr.clone();
    serde_json::from_slice(&output).expect("json")
}
