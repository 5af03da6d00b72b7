//! The two on-disk layouts the client uses for per-account data.
//!
//! Windows keeps each account under a folder named after its uin; Linux
//! hides it behind `nt_qq_<md5(md5(uid) + salt)>`. Both are expressed as a
//! [`DataRootStrategy`] picked once from [`Platform`], so nothing else in the
//! crate branches on the operating system.

mod hashed;
mod uin_dir;

pub use hashed::{HASH_DIR_PREFIX, HASH_SALT, HashedLayout, compute_nt_hash, hash_dir_for};
pub use uin_dir::UinDirLayout;

use crate::identity::{AccountIdentity, IdentityCache};
use crate::logger::Logger;
use std::fmt;
use std::path::{Path, PathBuf};

/// Per-account subdirectory that holds the categorized caches.
pub const DATA_DIR: &str = "nt_data";

/// Which layout convention the data directory follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    /// `<base>/<uin>/nt_qq/nt_data`
    Windows,
    /// `<base>/nt_qq_<hash>/nt_data`
    Linux,
}

impl Platform {
    /// From the build target.
    #[must_use]
    pub const fn detect() -> Self {
        if cfg!(windows) {
            Self::Windows
        } else {
            Self::Linux
        }
    }

    #[must_use]
    pub fn strategy(self) -> Box<dyn DataRootStrategy> {
        match self {
            Self::Windows => Box::new(UinDirLayout),
            Self::Linux => Box::new(HashedLayout),
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Windows => f.write_str("windows"),
            Self::Linux => f.write_str("linux"),
        }
    }
}

/// Locates an account's data root under a base directory.
///
/// Implementations may read and extend the identity cache; they never fail,
/// an unresolvable account is simply `None`.
pub trait DataRootStrategy: Send + Sync {
    fn platform(&self) -> Platform;

    /// The account's `nt_data` directory, if it exists.
    fn data_root(
        &self,
        base: &Path,
        uin: &str,
        ids: &mut IdentityCache,
        logger: &Logger,
    ) -> Option<PathBuf>;

    /// The account's `nt_temp` sibling, if the layout has one.
    fn temp_root(&self, base: &Path, uin: &str, ids: &IdentityCache) -> Option<PathBuf>;

    /// Accounts discoverable under `base`.
    fn accounts(&self, base: &Path, ids: &mut IdentityCache, logger: &Logger) -> Vec<String>;

    /// Called for every identity the host reports at startup.
    fn preload(
        &self,
        _base: &Path,
        _identity: &AccountIdentity,
        _ids: &mut IdentityCache,
        _logger: &Logger,
    ) {
    }
}

/// A uin is a non-empty string of ASCII digits. Anything else could escape
/// the base directory once joined into a path.
#[must_use]
pub fn is_valid_uin(uin: &str) -> bool {
    !uin.is_empty() && uin.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uin_validation() {
        assert!(is_valid_uin("123456789"));
        assert!(!is_valid_uin(""));
        assert!(!is_valid_uin("../123"));
        assert!(!is_valid_uin("12a45"));
    }

    #[test]
    fn strategy_matches_platform() {
        assert_eq!(Platform::Windows.strategy().platform(), Platform::Windows);
        assert_eq!(Platform::Linux.strategy().platform(), Platform::Linux);
    }
}
