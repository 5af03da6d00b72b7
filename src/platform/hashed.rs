//! Linux layout: each account's root is `nt_qq_<hash>` where
//! `hash = md5(hex(md5(uid)) + "nt_kernel")`. The hash is one-way, so a uin
//! can only be mapped to its directory through a known uid, or by guessing.

use super::{DATA_DIR, DataRootStrategy, Platform};
use crate::identity::{AccountIdentity, IdentityCache};
use crate::logger::Logger;
use crate::walk::child_dirs;
use md5::{Digest, Md5};
use regex::Regex;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

/// Appended to the hex uid digest before the second round.
pub const HASH_SALT: &str = "nt_kernel";
/// Directory name prefix in front of the hash.
pub const HASH_DIR_PREFIX: &str = "nt_qq_";

const TEMP_DIR: &str = "nt_temp";

static HASH_DIR_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^nt_qq_[a-f0-9]{32}$").expect("Invalid hash dir regex"));

/// Lowercase hex `md5(md5_hex(uid) + "nt_kernel")`.
#[must_use]
pub fn compute_nt_hash(uid: &str) -> String {
    let inner = hex(&Md5::digest(uid.as_bytes()));
    let mut hasher = Md5::new();
    hasher.update(inner.as_bytes());
    hasher.update(HASH_SALT.as_bytes());
    hex(&hasher.finalize())
}

fn hex(bytes: &[u8]) -> String {
    bytes.iter().fold(String::with_capacity(32), |mut out, b| {
        let _ = write!(out, "{b:02x}");
        out
    })
}

/// `<base>/nt_qq_<hash>` for a uid.
#[must_use]
pub fn hash_dir_for(base: &Path, uid: &str) -> PathBuf {
    base.join(format!("{HASH_DIR_PREFIX}{}", compute_nt_hash(uid)))
}

#[derive(Debug, Clone, Copy, Default)]
pub struct HashedLayout;

impl HashedLayout {
    /// Last resort: the first `nt_qq_<hash>` folder with an `nt_data` inside.
    /// With several accounts on disk and no uid this may pick the wrong one;
    /// the guess is only cached when nothing better is bound yet.
    fn scan_for_root(
        base: &Path,
        uin: &str,
        ids: &mut IdentityCache,
        logger: &Logger,
    ) -> Option<PathBuf> {
        let (_, hash_dir) = child_dirs(base, logger)
            .into_iter()
            .filter(|(name, _)| HASH_DIR_REGEX.is_match(name))
            .find(|(_, dir)| dir.join(DATA_DIR).is_dir())?;

        logger.debug(
            "PATHS",
            &format!("Guessed {} for account {uin}", hash_dir.display()),
        );
        let root = hash_dir.join(DATA_DIR);
        ids.bind_hash_dir_if_absent(uin, hash_dir);
        Some(root)
    }
}

impl DataRootStrategy for HashedLayout {
    fn platform(&self) -> Platform {
        Platform::Linux
    }

    fn data_root(
        &self,
        base: &Path,
        uin: &str,
        ids: &mut IdentityCache,
        logger: &Logger,
    ) -> Option<PathBuf> {
        if let Some(cached) = ids.hash_dir(uin) {
            let root = cached.join(DATA_DIR);
            if root.is_dir() {
                return Some(root);
            }
        }

        if let Some(uid) = ids.uid(uin) {
            let hash_dir = hash_dir_for(base, uid);
            let root = hash_dir.join(DATA_DIR);
            if root.is_dir() {
                ids.bind_hash_dir(uin, hash_dir);
                return Some(root);
            }
            logger.debug(
                "PATHS",
                &format!("Hash dir for {uin} has no data: {}", hash_dir.display()),
            );
        }

        if !base.is_dir() {
            return None;
        }
        Self::scan_for_root(base, uin, ids, logger)
    }

    fn temp_root(&self, _base: &Path, uin: &str, ids: &IdentityCache) -> Option<PathBuf> {
        let temp = ids.hash_dir(uin)?.join(TEMP_DIR);
        temp.is_dir().then_some(temp)
    }

    /// Only accounts whose uid is known and whose hash directory exists;
    /// unknown accounts cannot be recovered from the hashed names.
    fn accounts(&self, base: &Path, ids: &mut IdentityCache, _logger: &Logger) -> Vec<String> {
        let candidates: Vec<(String, PathBuf)> = ids
            .uids()
            .filter(|(uin, _)| ids.hash_dir(uin).is_none())
            .map(|(uin, uid)| (uin.to_string(), hash_dir_for(base, uid)))
            .collect();

        for (uin, dir) in candidates {
            if dir.is_dir() {
                ids.bind_hash_dir(uin, dir);
            }
        }

        ids.uids()
            .filter(|(uin, _)| ids.hash_dir(uin).is_some())
            .map(|(uin, _)| uin.to_string())
            .collect()
    }

    fn preload(
        &self,
        base: &Path,
        identity: &AccountIdentity,
        ids: &mut IdentityCache,
        logger: &Logger,
    ) {
        let dir = hash_dir_for(base, &identity.uid);
        if dir.is_dir() {
            logger.info(
                "ACCOUNTS",
                &format!("Hash dir cached for {}: {}", identity.uin, dir.display()),
            );
            ids.bind_hash_dir(identity.uin.clone(), dir);
        } else {
            logger.warn(
                "ACCOUNTS",
                &format!("Hash dir missing for {}: {}", identity.uin, dir.display()),
            );
        }
    }
}
