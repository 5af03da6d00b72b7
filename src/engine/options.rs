//! Which categories a clean touches and how many days of files it keeps.

use super::size::{clamp_u32, truncate};
use crate::paths::Category;
use serde::{Deserialize, Deserializer, Serialize};

/// Ten enable flags plus the retention window. Stored inside the default
/// options and inside every scheduled task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CleanOptions {
    pub enable_video: bool,
    pub enable_video_thumb: bool,
    pub enable_ptt: bool,
    pub enable_pic: bool,
    pub enable_file: bool,
    pub enable_log: bool,
    pub enable_log_cache: bool,
    pub enable_nt_temp: bool,
    pub enable_nap_cat_data: bool,
    pub enable_nap_cat_temp: bool,
    #[serde(deserialize_with = "lenient_u32")]
    pub retain_days: u32,
}

impl Default for CleanOptions {
    /// Everything but NapCat's own data, keeping a week.
    fn default() -> Self {
        Self {
            enable_video: true,
            enable_video_thumb: true,
            enable_ptt: true,
            enable_pic: true,
            enable_file: true,
            enable_log: true,
            enable_log_cache: true,
            enable_nt_temp: true,
            enable_nap_cat_data: false,
            enable_nap_cat_temp: true,
            retain_days: 7,
        }
    }
}

impl CleanOptions {
    /// Every category off; a starting point for targeted cleans.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            enable_video: false,
            enable_video_thumb: false,
            enable_ptt: false,
            enable_pic: false,
            enable_file: false,
            enable_log: false,
            enable_log_cache: false,
            enable_nt_temp: false,
            enable_nap_cat_data: false,
            enable_nap_cat_temp: false,
            retain_days: 0,
        }
    }

    #[must_use]
    pub const fn is_enabled(&self, category: Category) -> bool {
        match category {
            Category::Video => self.enable_video,
            Category::VideoThumb => self.enable_video_thumb,
            Category::Ptt => self.enable_ptt,
            Category::Pic => self.enable_pic,
            Category::File => self.enable_file,
            Category::Log => self.enable_log,
            Category::LogCache => self.enable_log_cache,
            Category::NtTemp => self.enable_nt_temp,
            Category::NapCatData => self.enable_nap_cat_data,
            Category::NapCatTemp => self.enable_nap_cat_temp,
        }
    }

    fn flag_mut(&mut self, category: Category) -> &mut bool {
        match category {
            Category::Video => &mut self.enable_video,
            Category::VideoThumb => &mut self.enable_video_thumb,
            Category::Ptt => &mut self.enable_ptt,
            Category::Pic => &mut self.enable_pic,
            Category::File => &mut self.enable_file,
            Category::Log => &mut self.enable_log,
            Category::LogCache => &mut self.enable_log_cache,
            Category::NtTemp => &mut self.enable_nt_temp,
            Category::NapCatData => &mut self.enable_nap_cat_data,
            Category::NapCatTemp => &mut self.enable_nap_cat_temp,
        }
    }

    #[must_use]
    pub fn with_category(mut self, category: Category, enabled: bool) -> Self {
        *self.flag_mut(category) = enabled;
        self
    }

    #[must_use]
    pub const fn retain_days(mut self, days: u32) -> Self {
        self.retain_days = days;
        self
    }

    /// A copy with every field present in `patch` replaced.
    #[must_use]
    pub fn merged(mut self, patch: &OptionsPatch) -> Self {
        for (category, value) in patch.flags() {
            if let Some(enabled) = value {
                *self.flag_mut(category) = enabled;
            }
        }
        if let Some(days) = patch.retain_days {
            self.retain_days = days;
        }
        self
    }
}

/// Partial options: the fields a caller wants to change.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OptionsPatch {
    pub enable_video: Option<bool>,
    pub enable_video_thumb: Option<bool>,
    pub enable_ptt: Option<bool>,
    pub enable_pic: Option<bool>,
    pub enable_file: Option<bool>,
    pub enable_log: Option<bool>,
    pub enable_log_cache: Option<bool>,
    pub enable_nt_temp: Option<bool>,
    pub enable_nap_cat_data: Option<bool>,
    pub enable_nap_cat_temp: Option<bool>,
    #[serde(deserialize_with = "lenient_opt_u32")]
    pub retain_days: Option<u32>,
}

impl OptionsPatch {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn set(mut self, category: Category, enabled: bool) -> Self {
        let slot = match category {
            Category::Video => &mut self.enable_video,
            Category::VideoThumb => &mut self.enable_video_thumb,
            Category::Ptt => &mut self.enable_ptt,
            Category::Pic => &mut self.enable_pic,
            Category::File => &mut self.enable_file,
            Category::Log => &mut self.enable_log,
            Category::LogCache => &mut self.enable_log_cache,
            Category::NtTemp => &mut self.enable_nt_temp,
            Category::NapCatData => &mut self.enable_nap_cat_data,
            Category::NapCatTemp => &mut self.enable_nap_cat_temp,
        };
        *slot = Some(enabled);
        self
    }

    #[must_use]
    pub const fn retain_days(mut self, days: u32) -> Self {
        self.retain_days = Some(days);
        self
    }

    fn flags(&self) -> [(Category, Option<bool>); 10] {
        [
            (Category::Video, self.enable_video),
            (Category::VideoThumb, self.enable_video_thumb),
            (Category::Ptt, self.enable_ptt),
            (Category::Pic, self.enable_pic),
            (Category::File, self.enable_file),
            (Category::Log, self.enable_log),
            (Category::LogCache, self.enable_log_cache),
            (Category::NtTemp, self.enable_nt_temp),
            (Category::NapCatData, self.enable_nap_cat_data),
            (Category::NapCatTemp, self.enable_nap_cat_temp),
        ]
    }
}

/// A number as the dashboard or a hand-edited file may send it.
#[derive(Deserialize)]
#[serde(untagged)]
enum LooseNumber {
    Int(i64),
    Float(f64),
    Text(String),
}

impl LooseNumber {
    /// Negative → 0, fractions truncated, unparsable text → 0.
    fn into_u32(self) -> u32 {
        match self {
            Self::Int(n) => clamp_u32(n),
            Self::Float(f) => clamp_u32(truncate(f)),
            Self::Text(s) => super::size::parse_retain_days(&s),
        }
    }
}

pub(crate) fn lenient_u32<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    Ok(Option::<LooseNumber>::deserialize(deserializer)?.map_or(0, LooseNumber::into_u32))
}

pub(crate) fn lenient_opt_u32<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<u32>, D::Error> {
    Ok(Option::<LooseNumber>::deserialize(deserializer)?.map(LooseNumber::into_u32))
}
