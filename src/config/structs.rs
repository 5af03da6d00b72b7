//! Configuration struct definitions.

use serde::Deserialize;

/// General configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Minimum log level.
    pub level: String,
    /// Name used for log files.
    pub app_name: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            app_name: "ntclean".to_string(),
        }
    }
}

/// Terminal output configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TerminalConfig {
    pub enabled: bool,
    pub colors: bool,
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            colors: true,
        }
    }
}

/// Log file output configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub enabled: bool,
    /// Directory holding the daily log files.
    pub base_dir: String,
}

impl Default for FileConfig {
    fn default() -> Self {
        let base_dir = directories::ProjectDirs::from("", "", "ntclean").map_or_else(
            || "logs".to_string(),
            |dirs| {
                dirs.state_dir()
                    .unwrap_or_else(|| dirs.data_dir())
                    .join("logs")
                    .to_string_lossy()
                    .into_owned()
            },
        );

        Self {
            enabled: false,
            base_dir,
        }
    }
}

/// Where the chat client keeps its data and where tasks are persisted.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Base data directory of the client (the one holding account folders
    /// or `nt_qq_<hash>` folders).
    pub data_dir: String,
    /// JSON document with default options and scheduled tasks.
    pub store: String,
    /// Directory layout to expect: `auto`, `windows` or `linux`.
    pub platform: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        let data_dir = if cfg!(windows) {
            directories::UserDirs::new().map_or_else(
                || "Tencent Files".to_string(),
                |dirs| {
                    dirs.document_dir()
                        .unwrap_or_else(|| dirs.home_dir())
                        .join("Tencent Files")
                        .to_string_lossy()
                        .into_owned()
                },
            )
        } else {
            "~/.config/QQ".to_string()
        };

        let store = directories::ProjectDirs::from("", "", "ntclean").map_or_else(
            || "ntclean.json".to_string(),
            |dirs| {
                dirs.data_dir()
                    .join("tasks.json")
                    .to_string_lossy()
                    .into_owned()
            },
        );

        Self {
            data_dir,
            store,
            platform: "auto".to_string(),
        }
    }
}

/// Identity information a live client session would normally provide.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct HostConfig {
    /// The account the host is logged in as.
    pub self_uin: Option<String>,
    /// Known uin/uid pairs (the client's login list).
    pub accounts: Vec<AccountEntry>,
}

/// One entry of the static login list.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AccountEntry {
    pub uin: String,
    pub uid: String,
    pub nick_name: Option<String>,
}
