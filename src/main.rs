use anyhow::Context;
use clap::Parser;
use sitemap_gen::{Config, Generator};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    name = "sitemap-gen",
    version,
    author,
    about = "Generates sitemap files in xml, csv, json formats",
    long_about = "Generates a sitemap file from a list of page records.\n\n\
    The file is written to <FILE_PATH>/sitemap.<FILE_TYPE>, replacing any previous file. \
    Without --pages the built-in page table is used.\n\n\
    USAGE EXAMPLES:\n  \
      # XML sitemap in the default storage directory\n  \
      sitemap-gen\n\n  \
      # CSV sitemap in ./public\n  \
      sitemap-gen --file_type=csv --file_path=./public\n\n  \
      # JSON sitemap from your own page list\n  \
      sitemap-gen --file_type=json --pages ./pages.json"
)]
struct Cli {
    /// Output format: xml, csv or json
    #[arg(long = "file_type", visible_alias = "file-type", default_value = "xml", value_name = "TYPE")]
    file_type: String,

    /// Output directory [default: <data dir>/sitemaps]
    #[arg(long = "file_path", visible_alias = "file-path", value_name = "DIR")]
    file_path: Option<PathBuf>,

    /// JSON file with an array of page records to use instead of the built-in table
    #[arg(long, value_name = "FILE")]
    pages: Option<PathBuf>,

    /// CSV column delimiter
    #[arg(long, default_value = ";")]
    delimiter: String,

    /// Dry run (don't write files)
    #[arg(long)]
    dry_run: bool,

    /// Verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_tracing(cli.verbose);

    let mut builder = Config::builder()
        .format(cli.file_type)
        .csv_delimiter(cli.delimiter)
        .dry_run(cli.dry_run);

    if let Some(dir) = cli.file_path {
        builder = builder.output_dir(dir);
    }

    if let Some(pages) = cli.pages {
        builder = builder.pages_file(pages);
    }

    let config = builder.build().context("Failed to build configuration")?;

    // Returned errors are reported by anyhow and exit non-zero.
    Generator::new(config)
        .and_then(Generator::run)
        .context("Sitemap generation failed")?;

    Ok(())
}

fn setup_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => EnvFilter::new("sitemap_gen=info"),
        1 => EnvFilter::new("sitemap_gen=debug"),
        _ => EnvFilter::new("sitemap_gen=trace"),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_thread_ids(false))
        .init();
}
