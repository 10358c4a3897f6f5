use std::path::Path;

use crate::cli::ConfigCommands;
use crate::config_file::CliConfig;
use crate::error::CliError;

pub fn run_config(command: ConfigCommands, config_path: &Path) -> Result<(), CliError> {
    match command {
        ConfigCommands::Show => run_config_show(config_path),
        ConfigCommands::Init {
            remote_url,
            interval,
            timeout,
            no_seed,
            force,
        } => {
            let path = run_config_init(
                config_path,
                ConfigInit {
                    remote_url,
                    interval,
                    timeout,
                    no_seed,
                    force,
                },
            )?;
            println!("Saved config to {}", path.display());
            Ok(())
        }
    }
}

/// Field updates requested by `quotes config init`
#[derive(Debug, Default)]
pub struct ConfigInit {
    pub remote_url: Option<String>,
    pub interval: Option<u64>,
    pub timeout: Option<u64>,
    pub no_seed: bool,
    pub force: bool,
}

fn run_config_show(config_path: &Path) -> Result<(), CliError> {
    let mut config = CliConfig::load_from_path(config_path)?;
    config.apply_env_overrides()?;
    println!("# {}", config_path.display());
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}

/// Merge `init` into the config at `config_path` (or defaults with `force`),
/// validate, and save.
pub fn run_config_init(config_path: &Path, init: ConfigInit) -> Result<&Path, CliError> {
    let mut config = if init.force {
        CliConfig::default()
    } else {
        CliConfig::load_from_path(config_path)?
    };

    if let Some(remote_url) = init.remote_url {
        config.sync.remote_url = remote_url;
    }
    if let Some(interval) = init.interval {
        config.sync.sync_interval_secs = interval;
    }
    if let Some(timeout) = init.timeout {
        config.sync.fetch_timeout_secs = timeout;
    }
    if init.no_seed {
        config.sync.seed_defaults = false;
    }

    config.sync.validate()?;
    config.save_to_path(config_path)?;
    Ok(config_path)
}
