//! Unified error type for all ntclean operations.
//!
//! Individual file and directory failures never show up here; the walker
//! swallows them and logs a warning. These variants cover orchestration-level
//! failures that a caller can act on.

/// Error type for ntclean operations.
#[derive(Debug)]
pub enum Error {
    /// I/O error.
    Io(std::io::Error),
    /// TOML config parsing error.
    ConfigParse(toml::de::Error),
    /// Task store (de)serialization error.
    Json(serde_json::Error),
    /// Config directory not found.
    ConfigDirNotFound,
    /// Account handle is not a digit string and cannot be turned into a path.
    InvalidAccount(String),
    /// A clean was asked for "the current account" but none is configured.
    NoCurrentAccount,
    /// No scheduled task with this id.
    TaskNotFound(String),
    /// Failure reported by the host environment, such as its identity service.
    Runtime(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::ConfigParse(e) => write!(f, "parse error: {e}"),
            Self::Json(e) => write!(f, "task store error: {e}"),
            Self::ConfigDirNotFound => write!(f, "config directory not found"),
            Self::InvalidAccount(uin) => write!(f, "invalid account: {uin:?}"),
            Self::NoCurrentAccount => write!(f, "no current account configured"),
            Self::TaskNotFound(id) => write!(f, "task not found: {id}"),
            Self::Runtime(s) => write!(f, "runtime error: {s}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::ConfigParse(e) => Some(e),
            Self::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Self::ConfigParse(e)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}
