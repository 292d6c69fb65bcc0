use std::path::PathBuf;

use clap::{Arg, ArgAction, ArgMatches, Command, ValueHint};

use crate::config::{ConfigFormat, DEFAULT_CONFIG_FILE, DEFAULT_ENVIRONMENT};

const DEFAULT_TIMEOUT_MS: u64 = 30_000;

#[derive(Debug, Clone)]
pub struct OutputFlags {
    pub json: bool,
    pub markdown: bool,
    pub pretty: bool,
}

#[derive(Debug, Clone)]
pub struct CliArgs {
    pub config_path: PathBuf,
    pub environment: String,
    pub env_file: Option<PathBuf>,
    pub output: OutputFlags,
    pub verbose: u8,
    pub quiet: bool,
    pub command: CommandKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandKind {
    Help { all: bool, command: Option<String> },
    Config(ConfigArgs),
    Environments(EnvironmentsArgs),
    Check(CheckArgs),
    Init(InitArgs),
    Completions(CompletionsArgs),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConfigArgs;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EnvironmentsArgs;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckArgs {
    pub ping: bool,
    pub timeout_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitArgs {
    pub path: Option<PathBuf>,
    pub format: ConfigFormat,
    pub force: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionsArgs {
    pub shell: Option<String>,
}

pub fn build_cli(show_all: bool) -> Command {
    let mut cmd = Command::new("sql-migrate")
        .about("Resolve SQL migration environments and their database connections")
        .version(env!("CARGO_PKG_VERSION"))
        .arg_required_else_help(true)
        .disable_help_subcommand(true)
        .subcommand_value_name("COMMAND");

    cmd = add_global_args(cmd);

    cmd = cmd.subcommand(command_help());

    cmd = cmd.subcommand(command_config(show_all));
    cmd = cmd.subcommand(command_environments(show_all));
    cmd = cmd.subcommand(command_check(show_all));
    cmd = cmd.subcommand(command_init(show_all));

    cmd = cmd.subcommand(command_completions(show_all));

    cmd
}

pub fn parse_args() -> CliArgs {
    let matches = build_cli(false).get_matches();
    parse_matches(&matches)
}

fn add_global_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("config")
            .long("config")
            .value_name("PATH")
            .value_hint(ValueHint::FilePath)
            .env("SQL_MIGRATE_CONFIG")
            .default_value(DEFAULT_CONFIG_FILE)
            .global(true)
            .help("Configuration file to use"),
    )
    .arg(
        Arg::new("env")
            .long("env")
            .value_name("NAME")
            .env("SQL_MIGRATE_ENV")
            .default_value(DEFAULT_ENVIRONMENT)
            .global(true)
            .help("Environment to use"),
    )
    .arg(
        Arg::new("env-file")
            .long("env-file")
            .value_name("PATH")
            .value_hint(ValueHint::FilePath)
            .global(true)
            .help("Load environment variables from file (default: .env)"),
    )
    .arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .global(true)
            .help("Output as JSON"),
    )
    .arg(
        Arg::new("markdown")
            .long("markdown")
            .action(ArgAction::SetTrue)
            .global(true)
            .help("Force markdown table output"),
    )
    .arg(
        Arg::new("pretty")
            .long("pretty")
            .action(ArgAction::SetTrue)
            .global(true)
            .help("Force pretty-printed table output"),
    )
    .arg(
        Arg::new("verbose")
            .short('v')
            .long("verbose")
            .action(ArgAction::Count)
            .global(true)
            .help("Enable debug logging"),
    )
    .arg(
        Arg::new("quiet")
            .short('q')
            .long("quiet")
            .action(ArgAction::SetTrue)
            .global(true)
            .help("Suppress non-error output"),
    )
}

fn command_help() -> Command {
    Command::new("help")
        .about("Show help for commands")
        .arg(
            Arg::new("all")
                .long("all")
                .action(ArgAction::SetTrue)
                .help("Show all commands, including advanced ones"),
        )
        .arg(Arg::new("command").value_name("COMMAND"))
}

fn command_core(
    name: &'static str,
    about: &'static str,
    aliases: &'static [&'static str],
    _show_all: bool,
) -> Command {
    let mut cmd = Command::new(name).about(about);
    for alias in aliases {
        cmd = cmd.visible_alias(*alias);
    }
    cmd
}

fn command_advanced(
    name: &'static str,
    about: &'static str,
    aliases: &'static [&'static str],
    show_all: bool,
) -> Command {
    let mut cmd = Command::new(name).about(about);
    for alias in aliases {
        cmd = cmd.visible_alias(*alias);
    }
    if !show_all {
        cmd = cmd.hide(true);
    }
    cmd
}

fn command_config(show_all: bool) -> Command {
    command_core("config", "Display the resolved environment", &[], show_all)
}

fn command_environments(show_all: bool) -> Command {
    command_core(
        "environments",
        "List environments in the config file",
        &["envs"],
        show_all,
    )
}

fn command_check(show_all: bool) -> Command {
    command_core(
        "check",
        "Validate the dialect and open a connection handle",
        &[],
        show_all,
    )
    .arg(
        Arg::new("ping")
            .long("ping")
            .action(ArgAction::SetTrue)
            .help("Also establish a connection to the database"),
    )
    .arg(
        Arg::new("timeout")
            .long("timeout")
            .value_name("MS")
            .value_parser(clap::value_parser!(u64))
            .help("Connection timeout in milliseconds (default: 30000, 0 uses the pool acquire timeout)"),
    )
}

fn command_init(show_all: bool) -> Command {
    command_core("init", "Create config file", &[], show_all)
        .arg(
            Arg::new("path")
                .long("path")
                .value_name("path")
                .value_hint(ValueHint::AnyPath),
        )
        .arg(
            Arg::new("format")
                .long("format")
                .value_name("FORMAT")
                .value_parser(["yaml", "toml"])
                .help("Config file format when --path is a directory (default: yaml)"),
        )
        .arg(Arg::new("force").long("force").action(ArgAction::SetTrue))
}

fn command_completions(show_all: bool) -> Command {
    command_advanced("completions", "Generate shell completions", &[], show_all).arg(
        Arg::new("shell")
            .long("shell")
            .value_name("name")
            .value_parser(["bash", "zsh", "fish", "powershell", "elvish"]),
    )
}

fn parse_matches(matches: &ArgMatches) -> CliArgs {
    let config_path = matches
        .get_one::<String>("config")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
    let environment = matches
        .get_one::<String>("env")
        .cloned()
        .unwrap_or_else(|| DEFAULT_ENVIRONMENT.to_string());
    let env_file = matches.get_one::<String>("env-file").map(PathBuf::from);
    let output = OutputFlags {
        json: matches.get_flag("json"),
        markdown: matches.get_flag("markdown"),
        pretty: matches.get_flag("pretty"),
    };
    let verbose = matches.get_count("verbose");
    let quiet = matches.get_flag("quiet");

    let command = match matches.subcommand() {
        Some(("help", sub_m)) => CommandKind::Help {
            all: sub_m.get_flag("all"),
            command: sub_m.get_one::<String>("command").cloned(),
        },
        Some(("config", _)) => CommandKind::Config(ConfigArgs),
        Some(("environments", _)) => CommandKind::Environments(EnvironmentsArgs),
        Some(("check", sub_m)) => CommandKind::Check(CheckArgs {
            ping: sub_m.get_flag("ping"),
            timeout_ms: sub_m
                .get_one::<u64>("timeout")
                .copied()
                .unwrap_or(DEFAULT_TIMEOUT_MS),
        }),
        Some(("init", sub_m)) => CommandKind::Init(InitArgs {
            path: sub_m.get_one::<String>("path").map(PathBuf::from),
            format: match sub_m.get_one::<String>("format").map(String::as_str) {
                Some("toml") => ConfigFormat::Toml,
                _ => ConfigFormat::Yaml,
            },
            force: sub_m.get_flag("force"),
        }),
        Some(("completions", sub_m)) => CommandKind::Completions(CompletionsArgs {
            shell: sub_m.get_one::<String>("shell").cloned(),
        }),
        _ => CommandKind::Help {
            all: false,
            command: None,
        },
    };

    CliArgs {
        config_path,
        environment,
        env_file,
        output,
        verbose,
        quiet,
        command,
    }
}
