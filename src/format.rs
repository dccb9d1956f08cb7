use crate::error::{Error, Result};
use std::{fmt, str::FromStr};

/// Output format of a generated sitemap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SitemapFormat {
    /// Sitemap protocol XML document
    #[default]
    Xml,
    /// Delimited text table with a header line
    Csv,
    /// Pretty-printed JSON array
    Json,
}

impl SitemapFormat {
    /// All supported formats.
    pub const ALL: [Self; 3] = [Self::Xml, Self::Csv, Self::Json];

    /// Returns the file extension for this format.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Xml => "xml",
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }

    /// Returns the format tag accepted on the command line.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        self.extension()
    }
}

impl FromStr for SitemapFormat {
    type Err = Error;

    /// Tags are matched exactly; `XML` or ` xml` are rejected.
    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|format| format.as_str() == s)
            .ok_or_else(|| Error::unsupported_format(s))
    }
}

impl fmt::Display for SitemapFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<SitemapFormat> for String {
    fn from(format: SitemapFormat) -> Self {
        format.as_str().to_string()
    }
}
