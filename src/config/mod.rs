mod env;
mod error;
mod loader;
mod schema;

pub use env::Env;
pub use error::ConfigError;
pub use loader::{
    DEFAULT_CONFIG_FILE, DEFAULT_ENVIRONMENT, DEFAULT_MIGRATION_DIR, Environment, LoadOptions,
    load_environment, read_config, resolve_config_path, resolve_environment,
};
pub use schema::{ConfigFormat, EnvironmentRecord, Environments};

pub fn load_from_system(
    config_path: &std::path::Path,
    environment: &str,
    env_file: Option<&std::path::Path>,
) -> anyhow::Result<Environment> {
    let cwd = std::env::current_dir()?;
    let env = Env::from_system(env_file);
    let options = LoadOptions {
        config_path: config_path.to_path_buf(),
        environment: environment.to_string(),
        cwd,
    };
    Ok(load_environment(&options, &env)?)
}
