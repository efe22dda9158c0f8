use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::{
    path::{Path, PathBuf},
    str::FromStr,
    time::Duration,
};

/// Connection URL used when none is configured.
pub const DEFAULT_DATABASE_URL: &str = "sqlite:flightdesk.db";

/// Config file read from the working directory when `--config` is not
/// given.
pub const DEFAULT_CONFIG_FILE: &str = "flightdesk.toml";

const DEFAULT_TRANSACTION_TIMEOUT_SECS: u64 = 5;

/// Resolved configuration for a CLI run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub database_url: String,
    pub transaction_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            transaction_timeout: Duration::from_secs(DEFAULT_TRANSACTION_TIMEOUT_SECS),
        }
    }
}

/// Contents of `flightdesk.toml`. Every key is optional.
///
/// ```toml
/// database_url = "postgresql://airline@localhost/airline"
/// transaction_timeout_secs = 10
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub database_url: Option<String>,
    pub transaction_timeout_secs: Option<u64>,
}

impl ConfigFile {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        contents
            .parse()
            .with_context(|| format!("parsing config file {}", path.display()))
    }
}

impl FromStr for ConfigFile {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let file: ConfigFile = toml::from_str(s)?;

        if file.transaction_timeout_secs == Some(0) {
            bail!("transaction_timeout_secs must be at least 1");
        }

        Ok(file)
    }
}

/// Values given on the command line or through the environment. These take
/// precedence over the config file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub config_path: Option<PathBuf>,
    pub database_url: Option<String>,
    pub transaction_timeout_secs: Option<u64>,
}

impl Config {
    /// Layers overrides over the config file over defaults.
    ///
    /// An explicitly named config file must exist. The default one is read
    /// only if present.
    pub fn resolve(overrides: &Overrides) -> Result<Config> {
        let file = match &overrides.config_path {
            Some(path) => ConfigFile::load(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                ConfigFile::load(DEFAULT_CONFIG_FILE)?
            }
            None => ConfigFile::default(),
        };

        Config::layer(&file, overrides)
    }

    fn layer(file: &ConfigFile, overrides: &Overrides) -> Result<Config> {
        let defaults = Config::default();

        let timeout_secs = overrides
            .transaction_timeout_secs
            .or(file.transaction_timeout_secs)
            .unwrap_or(DEFAULT_TRANSACTION_TIMEOUT_SECS);

        if timeout_secs == 0 {
            bail!("the transaction timeout must be at least 1 second");
        }

        Ok(Config {
            database_url: overrides
                .database_url
                .clone()
                .or_else(|| file.database_url.clone())
                .unwrap_or(defaults.database_url),
            transaction_timeout: Duration::from_secs(timeout_secs),
        })
    }
}
