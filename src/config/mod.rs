//! TOML configuration for the cleaner service: logging, the client's data
//! directory, the task store location, and a static identity list.

mod structs;

pub use structs::{
    AccountEntry, FileConfig, GeneralConfig, HostConfig, PathsConfig, TerminalConfig,
};

use crate::identity::{AccountIdentity, StaticAccounts};
use crate::level::Level;
use crate::platform::Platform;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// An empty file is a valid config; every section falls back to defaults.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,
    pub terminal: TerminalConfig,
    pub file: FileConfig,
    pub paths: PathsConfig,
    pub host: HostConfig,
}

impl Config {
    /// Loads from the default location.
    ///
    /// # Errors
    /// Fails if the config directory can't be determined or the TOML is malformed.
    pub fn load() -> Result<Self, crate::Error> {
        let path = Self::get_config_path()?;
        Self::load_from(&path)
    }

    /// Loads from an explicit path; a missing file yields defaults.
    ///
    /// # Errors
    /// Returns error if the file cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self, crate::Error> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// # Errors
    /// Returns error on malformed TOML.
    pub fn parse(content: &str) -> Result<Self, crate::Error> {
        Ok(toml::from_str(content)?)
    }

    /// `<config_dir>/ntclean/config.toml`.
    ///
    /// # Errors
    /// Fails when the platform has no concept of a config directory.
    pub fn get_config_path() -> Result<PathBuf, crate::Error> {
        directories::ProjectDirs::from("", "", "ntclean")
            .map(|dirs| dirs.config_dir().join("config.toml"))
            .ok_or(crate::Error::ConfigDirNotFound)
    }

    /// Unknown level strings fall back to Info.
    #[must_use]
    pub fn parse_level(&self) -> Level {
        self.general.level.parse().unwrap_or(Level::Info)
    }

    /// `auto` (and anything unrecognised) detects from the build target.
    #[must_use]
    pub fn parse_platform(&self) -> Platform {
        match self.paths.platform.trim().to_lowercase().as_str() {
            "windows" | "win" => Platform::Windows,
            "linux" | "unix" => Platform::Linux,
            _ => Platform::detect(),
        }
    }

    #[must_use]
    pub fn data_dir(&self) -> PathBuf {
        expand_path(&self.paths.data_dir)
    }

    #[must_use]
    pub fn store_path(&self) -> PathBuf {
        expand_path(&self.paths.store)
    }

    #[must_use]
    pub fn log_dir(&self) -> PathBuf {
        expand_path(&self.file.base_dir)
    }

    /// The `[host]` section as an identity source for the engine.
    #[must_use]
    pub fn account_source(&self) -> StaticAccounts {
        let accounts: Vec<AccountIdentity> = self
            .host
            .accounts
            .iter()
            .filter(|a| !a.uin.is_empty() && !a.uid.is_empty())
            .map(|a| AccountIdentity {
                uin: a.uin.clone(),
                uid: a.uid.clone(),
                nick_name: a.nick_name.clone(),
            })
            .collect();

        let current = self.host.self_uin.as_ref().and_then(|uin| {
            accounts.iter().find(|a| &a.uin == uin).cloned()
        });

        StaticAccounts::new(accounts, current)
    }
}

/// Tilde and `$VAR` expansion; the input is used verbatim if expansion fails.
#[must_use]
pub fn expand_path(path: &str) -> PathBuf {
    shellexpand::full(path).map_or_else(
        |_| PathBuf::from(path),
        |expanded| PathBuf::from(expanded.as_ref()),
    )
}
