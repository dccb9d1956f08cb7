use crate::error::{Error, Result};
use crate::format::SitemapFormat;
use crate::serializer::{DEFAULT_CSV_DELIMITER, DEFAULT_JSON_INDENT};
use chrono::NaiveDate;
use directories::ProjectDirs;
use std::path::PathBuf;

const APPLICATION: &str = "sitemap-gen";
const SITEMAPS_SUBDIR: &str = "sitemaps";
const FALLBACK_STORAGE_DIR: &str = "storage";
const MAX_JSON_INDENT: usize = 16;

/// Returns the directory sitemaps are written to when none is configured.
///
/// This is the platform data directory of the application joined with
/// `sitemaps`, or `./storage/sitemaps` when no home directory is known.
#[must_use]
pub fn default_output_dir() -> PathBuf {
    ProjectDirs::from("", "", APPLICATION).map_or_else(
        || PathBuf::from(FALLBACK_STORAGE_DIR).join(SITEMAPS_SUBDIR),
        |dirs| dirs.data_dir().join(SITEMAPS_SUBDIR),
    )
}

/// Configuration for a sitemap generation run.
///
/// Use [`Config::builder()`] to construct a new configuration.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct Config {
    /// Requested format tag (`xml`, `csv` or `json`)
    ///
    /// Kept as given so an unknown tag is reported when the run starts.
    pub format: String,

    /// Output directory; the platform default when `None`
    pub output_dir: Option<PathBuf>,

    /// JSON file to read pages from instead of the built-in table
    pub pages_file: Option<PathBuf>,

    /// Column delimiter for CSV output
    pub csv_delimiter: String,

    /// Indentation width for JSON output
    pub json_indent: usize,

    /// Date used in the announced filename; today when `None`
    pub date: Option<NaiveDate>,

    /// Dry run mode (no file writes)
    pub dry_run: bool,
}

impl Config {
    /// Creates a new configuration builder.
    ///
    /// # Examples
    ///
    /// ```
    /// use sitemap_gen::{Config, SitemapFormat};
    ///
    /// let config = Config::builder()
    ///     .format(SitemapFormat::Csv)
    ///     .output_dir("./public")
    ///     .build()
    ///     .expect("valid configuration");
    ///
    /// assert_eq!(config.format, "csv");
    /// ```
    #[must_use]
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Validates the configuration.
    ///
    /// The format tag is not checked here.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The CSV delimiter is empty or contains a line break
    /// - The JSON indent is larger than 16
    /// - The pages file doesn't exist
    pub fn validate(&self) -> Result<()> {
        if self.csv_delimiter.is_empty() {
            return Err(Error::config("csv_delimiter must not be empty"));
        }

        if self.csv_delimiter.contains(['\n', '\r']) {
            return Err(Error::config("csv_delimiter must not contain line breaks"));
        }

        if self.json_indent > MAX_JSON_INDENT {
            return Err(Error::config(format!(
                "json_indent ({}) must be at most {MAX_JSON_INDENT}",
                self.json_indent
            )));
        }

        if let Some(ref pages_file) = self.pages_file {
            if !pages_file.is_file() {
                return Err(Error::config(format!(
                    "Pages file does not exist: {}",
                    pages_file.display()
                )));
            }
        }

        Ok(())
    }

    /// Returns the directory the sitemap will be written to.
    #[must_use]
    pub fn resolved_output_dir(&self) -> PathBuf {
        self.output_dir.clone().unwrap_or_else(default_output_dir)
    }

    /// Returns the configured date, or today's local date.
    #[must_use]
    pub fn effective_date(&self) -> NaiveDate {
        self.date
            .unwrap_or_else(|| chrono::Local::now().date_naive())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            format: SitemapFormat::default().into(),
            output_dir: None,
            pages_file: None,
            csv_delimiter: DEFAULT_CSV_DELIMITER.to_string(),
            json_indent: DEFAULT_JSON_INDENT,
            date: None,
            dry_run: false,
        }
    }
}

/// Builder for creating a [`Config`].
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    format: Option<String>,
    output_dir: Option<PathBuf>,
    pages_file: Option<PathBuf>,
    csv_delimiter: Option<String>,
    json_indent: Option<usize>,
    date: Option<NaiveDate>,
    dry_run: bool,
}

impl ConfigBuilder {
    /// Sets the output format, either a [`SitemapFormat`] or a raw tag.
    #[must_use]
    pub fn format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    /// Sets the output directory.
    #[must_use]
    pub fn output_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(path.into());
        self
    }

    /// Reads pages from a JSON file instead of the built-in table.
    #[must_use]
    pub fn pages_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.pages_file = Some(path.into());
        self
    }

    /// Sets the CSV column delimiter.
    #[must_use]
    pub fn csv_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.csv_delimiter = Some(delimiter.into());
        self
    }

    /// Sets the JSON indentation width.
    #[must_use]
    pub fn json_indent(mut self, width: usize) -> Self {
        self.json_indent = Some(width);
        self
    }

    /// Fixes the date used in the announced filename.
    #[must_use]
    pub fn date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    /// Enables dry run mode (no file writes).
    #[must_use]
    pub fn dry_run(mut self, enabled: bool) -> Self {
        self.dry_run = enabled;
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails.
    pub fn build(self) -> Result<Config> {
        let config = Config {
            format: self
                .format
                .unwrap_or_else(|| SitemapFormat::default().into()),
            output_dir: self.output_dir,
            pages_file: self.pages_file,
            csv_delimiter: self
                .csv_delimiter
                .unwrap_or_else(|| DEFAULT_CSV_DELIMITER.to_string()),
            json_indent: self.json_indent.unwrap_or(DEFAULT_JSON_INDENT),
            date: self.date,
            dry_run: self.dry_run,
        };

        config.validate()?;
        Ok(config)
    }
}
