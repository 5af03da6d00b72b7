//! Account identities: the uin every caller uses, the uid the Linux layout
//! hashes, and the hashed directory once it has been found on disk.
//!
//! The cache is owned by a [`CleanEngine`](crate::engine::CleanEngine) rather
//! than living in a process global, so separate sessions (and tests) never
//! see each other's bindings. Entries are only ever added or overwritten
//! until [`IdentityCache::clear`] is called.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// One account as reported by the host's login list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountIdentity {
    pub uin: String,
    pub uid: String,
    pub nick_name: Option<String>,
}

impl AccountIdentity {
    #[must_use]
    pub fn new(uin: impl Into<String>, uid: impl Into<String>) -> Self {
        Self {
            uin: uin.into(),
            uid: uid.into(),
            nick_name: None,
        }
    }
}

/// Identity lookups the host environment provides.
pub trait AccountSource {
    /// Every account that has logged in on this machine.
    ///
    /// # Errors
    /// Whatever the host's identity service reports; the engine falls back
    /// to [`current_account`](Self::current_account).
    fn login_list(&self) -> Result<Vec<AccountIdentity>, crate::Error>;

    /// The account the host is running as, if known.
    fn current_account(&self) -> Option<AccountIdentity>;
}

/// A fixed login list, e.g. from the `[host]` config section.
#[derive(Debug, Clone, Default)]
pub struct StaticAccounts {
    accounts: Vec<AccountIdentity>,
    current: Option<AccountIdentity>,
}

impl StaticAccounts {
    #[must_use]
    pub const fn new(accounts: Vec<AccountIdentity>, current: Option<AccountIdentity>) -> Self {
        Self { accounts, current }
    }
}

impl AccountSource for StaticAccounts {
    fn login_list(&self) -> Result<Vec<AccountIdentity>, crate::Error> {
        Ok(self.accounts.clone())
    }

    fn current_account(&self) -> Option<AccountIdentity> {
        self.current.clone()
    }
}

/// uin → uid and uin → hashed directory bindings.
///
/// Ordered maps keep account enumeration deterministic.
#[derive(Debug, Clone, Default)]
pub struct IdentityCache {
    uids: BTreeMap<String, String>,
    hash_dirs: BTreeMap<String, PathBuf>,
    current_uid: Option<String>,
}

impl IdentityCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_uid(&mut self, uin: impl Into<String>, uid: impl Into<String>) {
        self.uids.insert(uin.into(), uid.into());
    }

    #[must_use]
    pub fn uid(&self, uin: &str) -> Option<&str> {
        self.uids.get(uin).map(String::as_str)
    }

    /// Known uin/uid pairs, ordered by uin.
    pub fn uids(&self) -> impl Iterator<Item = (&str, &str)> {
        self.uids.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    #[must_use]
    pub fn hash_dir(&self, uin: &str) -> Option<&Path> {
        self.hash_dirs.get(uin).map(PathBuf::as_path)
    }

    /// Overwrites any previous binding; used when the uid proves the match.
    pub fn bind_hash_dir(&mut self, uin: impl Into<String>, dir: impl Into<PathBuf>) {
        self.hash_dirs.insert(uin.into(), dir.into());
    }

    /// Keeps an existing binding; used for first-found guesses.
    pub fn bind_hash_dir_if_absent(&mut self, uin: &str, dir: impl Into<PathBuf>) {
        self.hash_dirs
            .entry(uin.to_string())
            .or_insert_with(|| dir.into());
    }

    #[must_use]
    pub fn current_uid(&self) -> Option<&str> {
        self.current_uid.as_deref()
    }

    pub fn set_current_uid(&mut self, uid: impl Into<String>) {
        self.current_uid = Some(uid.into());
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.uids.is_empty() && self.hash_dirs.is_empty()
    }

    /// Drops every binding, e.g. when the host session changes.
    pub fn clear(&mut self) {
        self.uids.clear();
        self.hash_dirs.clear();
        self.current_uid = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_found_binding_is_kept() {
        let mut cache = IdentityCache::new();
        cache.bind_hash_dir_if_absent("10001", "/a");
        cache.bind_hash_dir_if_absent("10001", "/b");
        assert_eq!(cache.hash_dir("10001"), Some(Path::new("/a")));

        cache.bind_hash_dir("10001", "/c");
        assert_eq!(cache.hash_dir("10001"), Some(Path::new("/c")));
    }

    #[test]
    fn clear_resets_everything() {
        let mut cache = IdentityCache::new();
        cache.insert_uid("10001", "u_abc");
        cache.set_current_uid("u_abc");
        cache.bind_hash_dir("10001", "/a");
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.current_uid(), None);
    }
}
