use crate::{
    config::Config,
    error::Result,
    format::SitemapFormat,
    serializer::Serializer,
    source::{JsonFilePages, PageSource, StaticPages},
    writer::Writer,
};
use chrono::NaiveDate;
use std::{
    path::PathBuf,
    time::{Duration, Instant},
};
use tracing::{error, info, instrument, warn};

/// Name of the file the sitemap is actually written to.
#[must_use]
pub fn target_file_name(format: SitemapFormat) -> String {
    format!("sitemap.{}", format.extension())
}

/// Date-stamped filename announced at the start of a run.
///
/// Only reported; the file on disk is named by [`target_file_name`].
#[must_use]
pub fn announced_file_name(date: NaiveDate, format_tag: &str) -> String {
    format!("sitemap_{}.{format_tag}", date.format("%Y-%m-%d"))
}

/// Outcome of a generation run.
#[derive(Debug, Clone)]
pub struct GenerationStats {
    /// Format the sitemap was encoded in
    pub format: String,

    /// Number of records serialized
    pub records: usize,

    /// Size of the encoded sitemap in bytes
    pub bytes: usize,

    /// Path of the sitemap file
    pub path: PathBuf,

    /// Date-stamped filename that was announced
    pub announced_file_name: String,

    /// Whether the file was written (false in dry run mode)
    pub written: bool,

    /// Total execution time
    pub duration: Duration,
}

/// Generates a sitemap file from a page source.
pub struct Generator {
    config: Config,
    source: Box<dyn PageSource>,
    serializer: Serializer,
    writer: Writer,
}

impl Generator {
    /// Creates a generator reading from the configured pages file, or from
    /// the built-in table when none is set.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration validation fails.
    pub fn new(config: Config) -> Result<Self> {
        let source: Box<dyn PageSource> = match config.pages_file {
            Some(ref path) => Box::new(JsonFilePages::new(path)),
            None => Box::new(StaticPages),
        };

        Self::with_source(config, source)
    }

    /// Creates a generator with an explicit page source.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration validation fails.
    pub fn with_source(config: Config, source: Box<dyn PageSource>) -> Result<Self> {
        config.validate()?;

        let serializer = Serializer::new(&config);
        let writer = Writer::new(config.resolved_output_dir());

        Ok(Self {
            config,
            source,
            serializer,
            writer,
        })
    }

    /// Loads the pages, encodes them and writes `{dir}/sitemap.{ext}`.
    ///
    /// Nothing is written when the format is unknown or encoding fails.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The page source fails
    /// - The format tag is not xml, csv or json
    /// - The serializer produces no usable output
    /// - The output directory or file cannot be written
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use sitemap_gen::{Config, Generator};
    ///
    /// # fn main() -> anyhow::Result<()> {
    /// let config = Config::builder()
    ///     .format("json")
    ///     .output_dir("./public")
    ///     .build()?;
    ///
    /// let stats = Generator::new(config)?.run()?;
    /// println!("{}", stats.path.display());
    /// # Ok(())
    /// # }
    /// ```
    #[instrument(skip(self), fields(format = %self.config.format))]
    pub fn run(self) -> Result<GenerationStats> {
        let start_time = Instant::now();

        let pages = self.source.pages()?;
        let announced = announced_file_name(self.config.effective_date(), &self.config.format);

        info!("Getting ready to generate the file {announced}");
        info!("Found {} items. Start processing...", pages.len());

        let content = self
            .config
            .format
            .parse::<SitemapFormat>()
            .and_then(|format| {
                self.serializer
                    .serialize(&pages, format)
                    .map(|content| (format, content))
            })
            .inspect_err(|_| error!("Oops something unexpected happened :("));
        let (format, content) = content?;

        let file_name = target_file_name(format);
        let written = !self.config.dry_run;
        let path = if written {
            self.writer.write(&file_name, &content)?
        } else {
            warn!("Dry run mode enabled - skipping file write");
            self.writer.target_path(&file_name)
        };

        if written {
            info!("File is ready by path: {}", path.display());
            info!("✓ Completed in {:.2}s", start_time.elapsed().as_secs_f64());
        }

        Ok(GenerationStats {
            format: format.to_string(),
            records: pages.len(),
            bytes: content.len(),
            path,
            announced_file_name: announced,
            written,
            duration: start_time.elapsed(),
        })
    }
}
