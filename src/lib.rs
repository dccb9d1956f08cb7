//! # sitemap-gen
//!
//! Generates a sitemap file in XML, CSV or JSON from a list of page records.
//!
//! ## Quick Start
//!
//! ```no_run
//! use sitemap_gen::{Config, Generator, SitemapFormat};
//!
//! # fn main() -> anyhow::Result<()> {
//! let config = Config::builder()
//!     .format(SitemapFormat::Xml)
//!     .output_dir("./public")
//!     .build()?;
//!
//! let stats = Generator::new(config)?.run()?;
//! println!("Wrote {} pages to {}", stats.records, stats.path.display());
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! 1. **Source**: provides an ordered list of [`PageRecord`]s
//! 2. **Serializer**: encodes the records as XML, CSV or JSON text
//! 3. **Writer**: creates the output directory and writes `sitemap.{ext}`
//!
//! The serializers are also usable on their own:
//!
//! ```
//! use sitemap_gen::{PageSource, StaticPages, serializer};
//!
//! let pages = StaticPages.pages().unwrap();
//! let csv = serializer::to_csv(&pages, ";").unwrap();
//! assert_eq!(csv.lines().next(), Some("loc;lastmod;priority;changefreq"));
//! ```

#![warn(
    missing_docs,
    rust_2018_idioms,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery
)]
#![allow(clippy::module_name_repetitions)]

mod config;
mod error;
mod format;
mod generator;
mod record;
mod source;
mod writer;

pub mod serializer;

pub use config::{Config, ConfigBuilder, default_output_dir};
pub use error::{Error, Result};
pub use format::SitemapFormat;
pub use generator::{GenerationStats, Generator, announced_file_name, target_file_name};
pub use record::{ChangeFreq, PageRecord, Priority};
pub use serializer::Serializer;
pub use source::{JsonFilePages, PageSource, StaticPages};

/// Runs a complete generation with the given configuration.
///
/// # Errors
///
/// Returns an error if:
/// - Configuration is invalid
/// - The page source fails
/// - The format is not xml, csv or json
/// - Encoding fails
/// - The output directory or file cannot be written
///
/// # Examples
///
/// ```no_run
/// use sitemap_gen::{Config, run};
///
/// # fn main() -> anyhow::Result<()> {
/// let config = Config::builder().format("csv").build()?;
///
/// run(config)?;
/// # Ok(())
/// # }
/// ```
pub fn run(config: Config) -> Result<GenerationStats> {
    Generator::new(config)?.run()
}
