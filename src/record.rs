use crate::error::{Error, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A single page entry of a sitemap.
///
/// Field order is the order keys appear in every output format:
/// `loc`, `lastmod`, `priority`, `changefreq`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PageRecord {
    /// Absolute URL of the page
    pub loc: String,

    /// Date of last modification, written as `YYYY-MM-DD`
    pub lastmod: NaiveDate,

    /// Relative importance of the page
    pub priority: Priority,

    /// Expected update frequency
    pub changefreq: ChangeFreq,
}

impl PageRecord {
    /// Creates a new page record.
    #[must_use]
    pub fn new(
        loc: impl Into<String>,
        lastmod: NaiveDate,
        priority: Priority,
        changefreq: ChangeFreq,
    ) -> Self {
        Self {
            loc: loc.into(),
            lastmod,
            priority,
            changefreq,
        }
    }
}

/// Sitemap priority, a decimal in `[0, 1]`.
///
/// Whole values are written without a fraction (`1`, not `1.0`) so the
/// textual and JSON forms match what search engines usually see.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Priority(f64);

impl Priority {
    /// Highest priority.
    pub const MAX: Self = Self(1.0);

    /// Lowest priority.
    pub const MIN: Self = Self(0.0);

    /// Creates a priority, rejecting values outside `[0, 1]` and NaN.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the value is out of range.
    pub fn new(value: f64) -> Result<Self> {
        if (0.0..=1.0).contains(&value) {
            Ok(Self(value))
        } else {
            Err(Error::config(format!(
                "priority must be within [0, 1], got {value}"
            )))
        }
    }

    /// Returns the raw value.
    #[must_use]
    pub const fn value(self) -> f64 {
        self.0
    }

    #[allow(clippy::float_cmp)]
    fn is_whole(self) -> bool {
        self.0.fract() == 0.0
    }
}

impl Default for Priority {
    fn default() -> Self {
        Self(0.5)
    }
}

impl fmt::Display for Priority {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_whole() {
            write!(f, "{}", self.0 as u64)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

impl Serialize for Priority {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        if self.is_whole() {
            serializer.serialize_u64(self.0 as u64)
        } else {
            serializer.serialize_f64(self.0)
        }
    }
}

impl<'de> Deserialize<'de> for Priority {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = f64::deserialize(deserializer)?;
        Self::new(value).map_err(serde::de::Error::custom)
    }
}

/// How frequently a page is likely to change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeFreq {
    /// Changes on every access
    Always,
    /// Hourly updates
    Hourly,
    /// Daily updates
    Daily,
    /// Weekly updates
    Weekly,
    /// Monthly updates
    Monthly,
    /// Yearly updates
    Yearly,
    /// Archived page
    Never,
}

impl ChangeFreq {
    /// Returns the sitemap protocol keyword.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Always => "always",
            Self::Hourly => "hourly",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
            Self::Never => "never",
        }
    }
}

impl fmt::Display for ChangeFreq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
