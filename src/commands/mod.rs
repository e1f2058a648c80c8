// Command handlers module
pub mod check;
pub mod config;
pub mod watch;

use anyhow::Result;
use clap::ArgMatches;
use std::path::PathBuf;

use crate::core::Config;

/// Settings file selected by `--config`, falling back to the default location
pub fn config_path(matches: &ArgMatches) -> Result<PathBuf> {
    match matches.get_one::<String>("config") {
        Some(path) => Ok(PathBuf::from(path)),
        None => Config::get_config_path(),
    }
}

/// Command-line values that take precedence over the settings file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    pub url: Option<String>,
    pub token: Option<String>,
    pub interval_secs: Option<u64>,
}

impl Overrides {
    /// Read the override flags. Commands that do not declare a flag simply
    /// leave it unset.
    pub fn from_matches(matches: &ArgMatches) -> Self {
        Self {
            url: matches.try_get_one::<String>("url").ok().flatten().cloned(),
            token: matches.try_get_one::<String>("token").ok().flatten().cloned(),
            interval_secs: matches.try_get_one::<u64>("interval").ok().flatten().copied(),
        }
    }

    pub fn apply(&self, config: &mut Config) {
        if let Some(url) = &self.url {
            config.nightscout_url = url.clone();
        }
        if let Some(token) = &self.token {
            config.auth_token = Some(token.clone());
        }
        if let Some(secs) = self.interval_secs {
            config.alerts.poll_interval_secs = secs;
        }
    }
}

/// Load the settings file and apply command-line overrides
pub fn load_config(matches: &ArgMatches) -> Result<(PathBuf, Config, Overrides)> {
    let path = config_path(matches)?;
    let mut config = Config::load_from(&path)?;
    let overrides = Overrides::from_matches(matches);
    overrides.apply(&mut config);
    Ok((path, config, overrides))
}
