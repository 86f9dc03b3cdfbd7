use clap::{Args, Subcommand};

use crate::config::{ConfigKey, StoredConfig, config_file_path};
use crate::error::AppResult;

#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommand {
    /// Store a default value, e.g. `grit config set core.model gpt-4`.
    Set { key: String, value: String },
    /// Print a stored value.
    Get { key: String },
    /// Remove a stored value.
    Unset { key: String },
    /// Show all stored values and the config file location.
    List,
}

pub fn run(command: ConfigCommand) -> AppResult<()> {
    match command {
        ConfigCommand::Set { key, value } => run_set(&key, &value),
        ConfigCommand::Get { key } => run_get(&key),
        ConfigCommand::Unset { key } => run_unset(&key),
        ConfigCommand::List => run_list(),
    }
}

fn run_set(key: &str, value: &str) -> AppResult<()> {
    let key = ConfigKey::parse(key)?;
    let mut cfg = StoredConfig::load()?;
    cfg.set(key, value)?;
    cfg.save()?;
    println!("{} = {}", key.name(), cfg.get(key).unwrap_or_default());
    Ok(())
}

fn run_get(key: &str) -> AppResult<()> {
    let key = ConfigKey::parse(key)?;
    let cfg = StoredConfig::load()?;
    match cfg.get(key) {
        Some(value) => println!("{value}"),
        None => println!("<not set>"),
    }
    Ok(())
}

fn run_unset(key: &str) -> AppResult<()> {
    let key = ConfigKey::parse(key)?;
    let mut cfg = StoredConfig::load()?;
    if cfg.unset(key) {
        cfg.save()?;
        println!("Removed {}", key.name());
    } else {
        println!("{} was not set", key.name());
    }
    Ok(())
}

fn run_list() -> AppResult<()> {
    let cfg = StoredConfig::load()?;
    let path = config_file_path()?;

    println!("Configuration file: {}", path.display());
    let entries = cfg.entries();
    if entries.is_empty() {
        println!("No values stored.");
    } else {
        for (name, value) in entries {
            println!("{name} = {value}");
        }
    }
    Ok(())
}
