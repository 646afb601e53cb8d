use serde::Deserialize;
use std::env;
use std::io;
use std::iter::FromIterator;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Error, ErrorKind, Result};
use crate::provider::DEFAULT_API_URL;
use crate::settings::RawSettings;

const CONFIG_PATH_ENV_VAR: &str = "CALFETCH_CONFIG_FILE";

pub(crate) fn find_configfile_locations() -> io::Result<Vec<PathBuf>> {
    let config_env: Option<PathBuf> = env::var(CONFIG_PATH_ENV_VAR).ok().map(PathBuf::from);

    let home = dirs::home_dir().ok_or_else(|| {
        io::Error::new(io::ErrorKind::Other, "Unable to find home directory")
    })?;

    let home_config = PathBuf::from_iter([&home, &PathBuf::from(".calfetch.toml")].iter());

    let config_xdg = if let Ok(dir) = env::var("XDG_CONFIG_HOME") {
        PathBuf::from_iter([dir, "calfetch".to_string(), "config.toml".to_string()].iter())
    } else {
        let base = dirs::config_dir().unwrap_or_else(|| home.join(".config"));
        PathBuf::from_iter(
            [
                base.as_path(),
                Path::new("calfetch"),
                Path::new("config.toml"),
            ]
            .iter(),
        )
    };

    let mut locations = vec![config_xdg, home_config];

    if let Some(path) = config_env {
        locations.insert(0, path);
    }

    Ok(locations)
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_url: String,
    pub country: String,
    pub timeout_secs: u64,
    pub render: RawSettings,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            api_url: DEFAULT_API_URL.to_owned(),
            country: "ID".to_owned(),
            timeout_secs: 30,
            render: RawSettings::default(),
        }
    }
}

impl Config {
    pub fn from_toml(content: &str) -> Result<Config> {
        Ok(toml::from_str(content)?)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::new(
            ErrorKind::Config,
            &format!("Could not read '{}': {}", path.display(), e),
        )
    })?;

    Config::from_toml(&content).map_err(|e| {
        let msg = format!(
            "{} (in '{}')",
            e.message.as_deref().unwrap_or_default(),
            path.display()
        );
        e.with_msg(&msg)
    })
}

/// Loads `path` if given, otherwise the first existing file among the
/// default locations. Falls back to defaults when none exists.
pub fn load_suitable_config(path: Option<&Path>) -> Result<Config> {
    if let Some(path) = path {
        return load_config(path);
    }

    let locations = find_configfile_locations().unwrap_or_else(|e| {
        log::warn!("{}", e);
        Vec::new()
    });

    match locations.iter().find(|p| p.is_file()) {
        Some(found) => {
            log::info!("Using configuration from {}", found.display());
            load_config(found)
        }
        None => {
            log::debug!("No configuration file found, using defaults");
            Ok(Config::default())
        }
    }
}
