use anyhow::{Context, Result};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use crate::core::glucose::alerts::AlertConfig;
use crate::core::glucose::feed::FeedRequest;
use crate::core::glucose::url_builder::UrlBuilder;

/// Environment variable that points at an alternative settings file
pub const CONFIG_ENV_VAR: &str = "GLUCMON_CONFIG";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Nightscout site, optionally with query parameters
    pub nightscout_url: String,
    /// Read token appended as `token=`
    pub auth_token: Option<String>,
    pub request_timeout_secs: u64,
    pub alerts: AlertConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            nightscout_url: String::new(),
            auth_token: None,
            request_timeout_secs: 10,
            alerts: AlertConfig::default(),
        }
    }
}

/// Settings snapshot shared between the watch loop and the poll cycles.
pub type SharedConfig = Arc<RwLock<Config>>;

impl Config {
    /// Load from the default location.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::get_config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let data = fs::read(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        // Empty or corrupted files fall back to defaults
        if data.iter().all(u8::is_ascii_whitespace) {
            return Ok(Config::default());
        }

        match serde_json::from_slice(&data) {
            Ok(config) => Ok(config),
            Err(e) => {
                log::warn!("Ignoring unreadable config {:?}: {}", path, e);
                Ok(Config::default())
            }
        }
    }

    /// Strict variant used for hot reloads: a broken file is an error so the
    /// previous settings can stay in place.
    pub fn parse_file(path: &Path) -> Result<Self> {
        let data = fs::read(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        serde_json::from_slice(&data)
            .with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::get_config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        let data = serde_json::to_vec_pretty(self).with_context(|| "Failed to serialize config")?;

        fs::write(path, data)
            .with_context(|| format!("Failed to write config file: {:?}", path))?;

        Ok(())
    }

    pub fn get_config_path() -> Result<PathBuf> {
        if let Some(path) = std::env::var_os(CONFIG_ENV_VAR) {
            return Ok(PathBuf::from(path));
        }

        let config_dir =
            dirs::config_dir().with_context(|| "Could not determine config directory")?;

        Ok(config_dir.join("glucmon").join("config.json"))
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.alerts.poll_interval_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Build the feed request for the current settings.
    pub fn feed_request(&self) -> crate::Result<FeedRequest> {
        let url = UrlBuilder::new(&self.nightscout_url)?
            .token(self.auth_token.as_deref())
            .build();

        Ok(FeedRequest {
            url,
            timeout: self.request_timeout(),
        })
    }

    /// List of problems that prevent monitoring.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.nightscout_url.trim().is_empty() {
            errors.push("Nightscout URL is not set (glucmon config set url <URL>)".to_string());
        } else if let Err(e) = UrlBuilder::new(&self.nightscout_url) {
            errors.push(e.to_string());
        }
        if self.alerts.poll_interval_secs == 0 {
            errors.push("Poll interval must be at least 1 second".to_string());
        }
        if self.alerts.stale_after_secs == 0 {
            errors.push("Stale window must be at least 1 second".to_string());
        }
        if self.request_timeout_secs == 0 {
            errors.push("Request timeout must be at least 1 second".to_string());
        }

        errors
    }
}

/// Settings file with change detection.
pub struct SettingsStore {
    path: PathBuf,
    modified: Option<SystemTime>,
    shared: SharedConfig,
}

impl SettingsStore {
    pub fn open(path: PathBuf) -> Result<Self> {
        let config = Config::load_from(&path)?;
        Ok(Self::with_config(path, config))
    }

    /// Store seeded with an in-memory config (e.g. with CLI overrides applied).
    pub fn with_config(path: PathBuf, config: Config) -> Self {
        let modified = modified_time(&path);
        Self {
            path,
            modified,
            shared: Arc::new(RwLock::new(config)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn shared(&self) -> SharedConfig {
        self.shared.clone()
    }

    pub fn snapshot(&self) -> Config {
        self.shared.read().clone()
    }

    /// Re-read the file when its modification time changed.
    ///
    /// Returns the new config when it was reloaded. A file that fails to parse
    /// keeps the previous snapshot.
    pub fn reload_if_changed(&mut self) -> Option<Config> {
        let modified = modified_time(&self.path);
        if modified.is_none() || modified == self.modified {
            return None;
        }
        self.modified = modified;

        match Config::parse_file(&self.path) {
            Ok(config) => {
                let problems = config.validate();
                if !problems.is_empty() {
                    log::warn!("Reloaded settings have problems: {}", problems.join("; "));
                }
                *self.shared.write() = config.clone();
                log::info!("Settings reloaded from {:?}", self.path);
                Some(config)
            }
            Err(e) => {
                log::warn!("Keeping previous settings: {:#}", e);
                None
            }
        }
    }

    /// Apply `edit` to the file's settings and write them back.
    pub fn update<F: FnOnce(&mut Config)>(&mut self, edit: F) -> Result<Config> {
        let mut config = self.snapshot();
        edit(&mut config);
        config.save_to(&self.path)?;
        self.modified = modified_time(&self.path);
        *self.shared.write() = config.clone();
        Ok(config)
    }
}

fn modified_time(path: &Path) -> Option<SystemTime> {
    fs::metadata(path).and_then(|m| m.modified()).ok()
}
