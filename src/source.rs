//! Page sources feeding the generator.
//!
//! A source is an opaque provider of an ordered list of uniform records.
//! [`StaticPages`] is the compiled-in example table; [`JsonFilePages`] reads
//! the same shape from a JSON array on disk.

use crate::{
    error::{Error, Result},
    record::{ChangeFreq, PageRecord, Priority},
};
use chrono::NaiveDate;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::debug;

/// Provides the records a sitemap is generated from.
pub trait PageSource {
    /// Returns the records in output order.
    ///
    /// # Errors
    ///
    /// Returns an error if the records cannot be produced.
    fn pages(&self) -> Result<Vec<PageRecord>>;
}

impl PageSource for Vec<PageRecord> {
    fn pages(&self) -> Result<Vec<PageRecord>> {
        Ok(self.clone())
    }
}

const STATIC_TABLE: [(&str, &str, f64, ChangeFreq); 6] = [
    ("https://site.ru/", "2020-12-14", 1.0, ChangeFreq::Hourly),
    ("https://site.ru/news", "2020-12-10", 0.5, ChangeFreq::Daily),
    ("https://site.ru/about", "2020-12-12", 0.5, ChangeFreq::Daily),
    ("https://site.ru/products/ps5", "2020-12-11", 0.1, ChangeFreq::Weekly),
    ("https://site.ru/products/xbox", "2020-12-12", 0.1, ChangeFreq::Weekly),
    ("https://site.ru/products/wii", "2020-12-11", 0.1, ChangeFreq::Weekly),
];

/// The built-in six page example table.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticPages;

impl PageSource for StaticPages {
    fn pages(&self) -> Result<Vec<PageRecord>> {
        STATIC_TABLE
            .iter()
            .map(|&(loc, lastmod, priority, changefreq)| {
                let lastmod = NaiveDate::parse_from_str(lastmod, "%Y-%m-%d")
                    .map_err(|e| Error::page_source(format!("invalid lastmod '{lastmod}': {e}")))?;
                Ok(PageRecord::new(loc, lastmod, Priority::new(priority)?, changefreq))
            })
            .collect()
    }
}

/// Reads records from a JSON file containing an array of page objects.
#[derive(Debug, Clone)]
pub struct JsonFilePages {
    path: PathBuf,
}

impl JsonFilePages {
    /// Creates a source backed by the given file.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the backing file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PageSource for JsonFilePages {
    fn pages(&self) -> Result<Vec<PageRecord>> {
        let raw = fs::read_to_string(&self.path).map_err(|e| {
            Error::page_source(format!("cannot read '{}': {e}", self.path.display()))
        })?;

        let pages: Vec<PageRecord> = serde_json::from_str(&raw).map_err(|e| {
            Error::page_source(format!("invalid page data in '{}': {e}", self.path.display()))
        })?;

        debug!("Loaded {} pages from {}", pages.len(), self.path.display());
        Ok(pages)
    }
}
