//! The ten cache categories a clean can target.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Category {
    Video,
    VideoThumb,
    Ptt,
    Pic,
    File,
    Log,
    LogCache,
    NtTemp,
    NapCatData,
    NapCatTemp,
}

impl Category {
    /// Enumeration order used for every scan and clean.
    pub const ALL: [Self; 10] = [
        Self::Video,
        Self::VideoThumb,
        Self::Ptt,
        Self::Pic,
        Self::File,
        Self::Log,
        Self::LogCache,
        Self::NtTemp,
        Self::NapCatData,
        Self::NapCatTemp,
    ];

    /// The camelCase name used in stored options and reports.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Video => "video",
            Self::VideoThumb => "videoThumb",
            Self::Ptt => "ptt",
            Self::Pic => "pic",
            Self::File => "file",
            Self::Log => "log",
            Self::LogCache => "logCache",
            Self::NtTemp => "ntTemp",
            Self::NapCatData => "napCatData",
            Self::NapCatTemp => "napCatTemp",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseCategoryError(String);

impl fmt::Display for ParseCategoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown cache category: '{}'", self.0)
    }
}

impl std::error::Error for ParseCategoryError {}

impl FromStr for Category {
    type Err = ParseCategoryError;

    /// Case-insensitive; `-` and `_` are ignored (`log-cache`, `nap_cat_temp`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted: String = s
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_lowercase();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().to_lowercase() == wanted)
            .ok_or_else(|| ParseCategoryError(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_loose_names() {
        assert_eq!("videoThumb".parse(), Ok(Category::VideoThumb));
        assert_eq!("log-cache".parse(), Ok(Category::LogCache));
        assert_eq!("NAP_CAT_TEMP".parse(), Ok(Category::NapCatTemp));
        assert!("thumbs".parse::<Category>().is_err());
    }

    #[test]
    fn all_is_in_declaration_order() {
        let mut sorted = Category::ALL;
        sorted.sort();
        assert_eq!(sorted, Category::ALL);
    }
}
