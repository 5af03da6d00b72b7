//! Maps an account to the existing cache directories of each category.
//!
//! Categories are discovered at query time and never persisted. Every path
//! is checked for existence before it is listed; an account whose data root
//! cannot be found yields empty lists rather than an error.

mod category;

pub use category::{Category, ParseCategoryError};

use crate::identity::{AccountSource, IdentityCache};
use crate::logger::Logger;
use crate::platform::{DataRootStrategy, Platform};
use crate::walk::child_dirs;
use regex::Regex;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, LazyLock, Mutex, PoisonError};

static MONTH_DIR_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{4}-[0-9]{2}$").expect("Invalid month dir regex"));

const NAPCAT_DIR: &str = "NapCat";

/// Existing directories per category for one account.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanablePaths {
    dirs: BTreeMap<Category, Vec<PathBuf>>,
}

impl CleanablePaths {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, category: Category) -> &[PathBuf] {
        self.dirs.get(&category).map_or(&[], Vec::as_slice)
    }

    /// All ten categories in [`Category::ALL`] order, empty ones included.
    pub fn iter(&self) -> impl Iterator<Item = (Category, &[PathBuf])> {
        Category::ALL.into_iter().map(|c| (c, self.get(c)))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dirs.values().all(Vec::is_empty)
    }

    #[must_use]
    pub fn dir_count(&self) -> usize {
        self.dirs.values().map(Vec::len).sum()
    }

    pub fn push(&mut self, category: Category, dir: PathBuf) {
        self.dirs.entry(category).or_default().push(dir);
    }

    fn push_if_exists(&mut self, category: Category, dir: PathBuf) {
        if dir.is_dir() {
            self.push(category, dir);
        }
    }
}

/// Resolves data roots through a platform layout and an owned identity cache.
pub struct PathResolver {
    layout: Box<dyn DataRootStrategy>,
    identities: Mutex<IdentityCache>,
    logger: Arc<Logger>,
}

impl PathResolver {
    #[must_use]
    pub fn new(layout: Box<dyn DataRootStrategy>, logger: Arc<Logger>) -> Self {
        Self {
            layout,
            identities: Mutex::new(IdentityCache::new()),
            logger,
        }
    }

    #[must_use]
    pub fn platform(&self) -> Platform {
        self.layout.platform()
    }

    /// Runs `f` with the identity cache locked.
    pub fn with_identities<R>(&self, f: impl FnOnce(&mut IdentityCache) -> R) -> R {
        let mut ids = self
            .identities
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        f(&mut ids)
    }

    /// A snapshot of the current bindings.
    #[must_use]
    pub fn identities(&self) -> IdentityCache {
        self.with_identities(|ids| ids.clone())
    }

    /// Seeds the cache from the host's login list, falling back to the
    /// current account when the list is unavailable or empty.
    pub fn load_identities(&self, base: &Path, source: &dyn AccountSource) {
        let current = source.current_account();
        let list = match source.login_list() {
            Ok(list) if !list.is_empty() => {
                self.logger
                    .info("ACCOUNTS", &format!("Login list has {} accounts", list.len()));
                list
            }
            Ok(_) => {
                self.logger
                    .warn("ACCOUNTS", "Login list is empty, using current account");
                current.iter().cloned().collect()
            }
            Err(e) => {
                self.logger.warn(
                    "ACCOUNTS",
                    &format!("Login list unavailable ({e}), using current account"),
                );
                current.iter().cloned().collect()
            }
        };

        self.with_identities(|ids| {
            for identity in &list {
                if identity.uin.is_empty() || identity.uid.is_empty() {
                    continue;
                }
                ids.insert_uid(identity.uin.clone(), identity.uid.clone());
                if current.as_ref().is_some_and(|c| c.uin == identity.uin) {
                    ids.set_current_uid(identity.uid.clone());
                }
                self.layout.preload(base, identity, ids, &self.logger);
                self.logger.debug(
                    "ACCOUNTS",
                    &format!(
                        "Loaded uin={} uid={} nick={}",
                        identity.uin,
                        identity.uid,
                        identity.nick_name.as_deref().unwrap_or("N/A")
                    ),
                );
            }
        });
    }

    /// The account's `nt_data` directory, if it can be located.
    #[must_use]
    pub fn data_root(&self, base: &Path, uin: &str) -> Option<PathBuf> {
        self.with_identities(|ids| self.layout.data_root(base, uin, ids, &self.logger))
    }

    /// Accounts the layout can find under `base`.
    #[must_use]
    pub fn accounts(&self, base: &Path) -> Vec<String> {
        self.with_identities(|ids| self.layout.accounts(base, ids, &self.logger))
    }

    /// Every existing cache directory for `uin`, by category.
    #[must_use]
    pub fn cleanable_paths(&self, base: &Path, uin: &str) -> CleanablePaths {
        let mut paths = CleanablePaths::new();
        let Some(root) = self.data_root(base, uin) else {
            self.logger
                .info("PATHS", &format!("No data root for account {uin}"));
            return paths;
        };

        let video_months = self.month_dirs(&root.join("Video"));
        for month in &video_months {
            let ori = month.join("Ori");
            paths.push(
                Category::Video,
                if ori.is_dir() { ori } else { month.clone() },
            );
        }
        for month in &video_months {
            paths.push_if_exists(Category::VideoThumb, month.join("Thumb"));
            paths.push_if_exists(Category::VideoThumb, month.join("ThumbTemp"));
        }

        for month in self.month_dirs(&root.join("Ptt")) {
            let found: Vec<PathBuf> = ["Ori", "OriTemp"]
                .into_iter()
                .map(|sub| month.join(sub))
                .filter(|dir| dir.is_dir())
                .collect();
            if found.is_empty() {
                paths.push(Category::Ptt, month);
            } else {
                for dir in found {
                    paths.push(Category::Ptt, dir);
                }
            }
        }

        for month in self.month_dirs(&root.join("Pic")) {
            let ori = month.join("Ori");
            paths.push(Category::Pic, if ori.is_dir() { ori } else { month });
        }

        let file_root = root.join("File");
        for sub in ["Ori", "Thumb", "ThumbTemp"] {
            paths.push_if_exists(Category::File, file_root.join(sub));
        }

        paths.push_if_exists(Category::Log, root.join("log"));
        paths.push_if_exists(Category::LogCache, root.join("log-cache"));

        let temp = self.with_identities(|ids| self.layout.temp_root(base, uin, ids));
        if let Some(temp) = temp {
            paths.push(Category::NtTemp, temp);
        }

        let napcat = base.join(NAPCAT_DIR);
        paths.push_if_exists(Category::NapCatData, napcat.join("data"));
        paths.push_if_exists(Category::NapCatTemp, napcat.join("temp"));

        self.logger.debug(
            "PATHS",
            &format!("Account {uin}: {} cache dirs", paths.dir_count()),
        );
        paths
    }

    /// `YYYY-MM` subdirectories, sorted.
    fn month_dirs(&self, dir: &Path) -> Vec<PathBuf> {
        child_dirs(dir, &self.logger)
            .into_iter()
            .filter(|(name, _)| MONTH_DIR_REGEX.is_match(name))
            .map(|(_, path)| path)
            .collect()
    }
}

impl std::fmt::Debug for PathResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PathResolver")
            .field("platform", &self.platform())
            .finish_non_exhaustive()
    }
}
