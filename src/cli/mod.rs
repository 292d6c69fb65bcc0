mod args;

pub use args::{
    CheckArgs, CliArgs, CommandKind, CompletionsArgs, ConfigArgs, EnvironmentsArgs, InitArgs,
    OutputFlags, build_cli,
};

pub fn parse() -> CliArgs {
    args::parse_args()
}
