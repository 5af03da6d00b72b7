//! Windows layout: the account folder is named after the uin.

use super::{DATA_DIR, DataRootStrategy, Platform};
use crate::identity::IdentityCache;
use crate::logger::Logger;
use crate::walk::child_dirs;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

static ACCOUNT_DIR_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{5,11}$").expect("Invalid account dir regex"));

const PLATFORM_DIR: &str = "nt_qq";

/// `<base>/<uin>/nt_qq/nt_data`, checked directly on every call.
#[derive(Debug, Clone, Copy, Default)]
pub struct UinDirLayout;

impl DataRootStrategy for UinDirLayout {
    fn platform(&self) -> Platform {
        Platform::Windows
    }

    fn data_root(
        &self,
        base: &Path,
        uin: &str,
        _ids: &mut IdentityCache,
        logger: &Logger,
    ) -> Option<PathBuf> {
        let root = base.join(uin).join(PLATFORM_DIR).join(DATA_DIR);
        if root.is_dir() {
            Some(root)
        } else {
            logger.debug("PATHS", &format!("No data root at {}", root.display()));
            None
        }
    }

    fn temp_root(&self, _base: &Path, _uin: &str, _ids: &IdentityCache) -> Option<PathBuf> {
        None
    }

    fn accounts(&self, base: &Path, _ids: &mut IdentityCache, logger: &Logger) -> Vec<String> {
        child_dirs(base, logger)
            .into_iter()
            .filter(|(name, _)| ACCOUNT_DIR_REGEX.is_match(name))
            .map(|(name, _)| name)
            .collect()
    }
}
