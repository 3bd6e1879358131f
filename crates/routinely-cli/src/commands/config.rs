use std::path::Path;

use clap::Subcommand;
use routinely_core::Config;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Get a config value
    Get {
        /// Config key (e.g. "timer.tick_interval_ms", "notifications.bell")
        key: String,
    },
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// New value
        value: String,
    },
    /// List all config values
    List,
    /// Reset config to defaults
    Reset,
}

pub fn run(
    action: ConfigAction,
    config_path: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let save = |config: &Config| match config_path {
        Some(path) => config.save_to(path),
        None => config.save(),
    };

    match action {
        ConfigAction::Get { key } => {
            let config = super::load_config(config_path)?;
            match config.get(&key) {
                Some(value) => println!("{value}"),
                None => return Err(format!("unknown key: {key}").into()),
            }
        }
        ConfigAction::Set { key, value } => {
            let mut config = super::load_config(config_path)?;
            config.set(&key, &value)?;
            save(&config)?;
            println!("ok");
        }
        ConfigAction::List => {
            let config = super::load_config(config_path)?;
            let json = serde_json::to_string_pretty(&config)?;
            println!("{json}");
        }
        ConfigAction::Reset => {
            save(&Config::default())?;
            println!("config reset to defaults");
        }
    }
    Ok(())
}
