use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::cli::GlobalArgs;
use crate::error::ConfigError;

/// Where snapper lives and how it is invoked.
///
/// Read from `~/.config/snapbrk/config.toml` (or the platform equivalent);
/// every key is optional.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub snapper: PathBuf,
    pub installation_helper: PathBuf,
    /// Snapper configuration that must be registered, usually `root`.
    pub config_name: String,
    /// Installation-helper step that creates a snapshot.
    pub step: u32,
    /// Locale forced on `snapper list` so dates come out in a parseable form.
    pub locale: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            snapper: PathBuf::from("/usr/bin/snapper"),
            installation_helper: PathBuf::from("/usr/lib/snapper/installation-helper"),
            config_name: "root".to_string(),
            step: 5,
            locale: "en_US.UTF-8".to_string(),
        }
    }
}

impl Config {
    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "snapbrk")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Reads and parses `path`, which must exist.
    pub fn read(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Loads the config file, falling back to defaults when it does not exist.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match Config::read(path) {
            Err(ConfigError::Read { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
                log::debug!("no config file at {}, using defaults", path.display());
                Ok(Config::default())
            }
            other => other,
        }
    }

    /// Builds the effective config: file first, then command-line overrides.
    ///
    /// An explicit `--config` must exist; only the default location may be absent.
    pub fn from_args(args: &GlobalArgs) -> Result<Self, ConfigError> {
        let mut config = match &args.config {
            Some(path) => Config::read(path)?,
            None => match Config::default_path() {
                Some(path) => Config::load_from(&path)?,
                None => Config::default(),
            },
        };

        if let Some(name) = &args.snapper_config {
            config.config_name = name.clone();
        }

        Ok(config)
    }
}
