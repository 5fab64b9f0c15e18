//! Bookshelf CLI
//!
//! Loads a catalog from a CSV file and opens the interactive menu.

use anyhow::{Context, Result};
use bookshelf::{bulk_load, BookshelfConfig, Catalog, ImportSchema, Shell};
use clap::{Parser, ValueEnum};
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "bookshelf")]
#[command(about = "In-memory book catalog with CSV import")]
struct Args {
    /// CSV file loaded at startup
    catalog: PathBuf,

    /// TOML configuration file
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Import schema (with-id, generated-id)
    #[arg(short = 's', long)]
    schema: Option<ImportSchema>,

    /// Fixed seed for id generation
    #[arg(long)]
    seed: Option<u64>,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = "bookshelf=info")]
    log_level: String,

    /// Print the catalog and exit instead of opening the menu
    #[arg(short = 'l', long)]
    list: bool,

    /// Output format for --list
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

fn main() {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(args.log_level.as_str())),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    if let Err(err) = run(args) {
        error!("{:#}", err);
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let config = load_config(&args)?;
    info!(
        "Using id range [{}, {}), import schema {}",
        config.ids.min, config.ids.max, config.import.schema
    );

    let mut catalog = Catalog::from_config(&config)?;
    let report = bulk_load(&args.catalog, &mut catalog, config.import.schema)
        .with_context(|| format!("unable to read catalog file {}", args.catalog.display()))?;
    info!(
        "Loaded {} books from {} ({} lines skipped)",
        report.imported,
        args.catalog.display(),
        report.skipped_count()
    );

    if args.list {
        print_catalog(&catalog, args.format)?;
        catalog.destroy();
        return Ok(());
    }

    let stdin = io::stdin();
    let mut shell = Shell::new(catalog, config, stdin.lock(), io::stdout());
    shell.run().context("menu loop failed")?;
    shell.into_catalog().destroy();
    Ok(())
}

fn load_config(args: &Args) -> Result<BookshelfConfig> {
    let config = match &args.config {
        Some(path) => BookshelfConfig::load(path)
            .with_context(|| format!("unable to load config {}", path.display()))?,
        None => BookshelfConfig::default(),
    };

    let mut config = config
        .with_env_overrides()
        .context("invalid BOOKSHELF_* environment override")?;

    if let Some(schema) = args.schema {
        config.import.schema = schema;
    }
    if let Some(seed) = args.seed {
        config.ids.seed = Some(seed);
    }
    Ok(config)
}

fn print_catalog(catalog: &Catalog, format: Format) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match format {
        Format::Text => {
            for book in catalog.iter() {
                writeln!(out, "{}", book)?;
            }
        }
        Format::Json => {
            let books: Vec<_> = catalog.iter().collect();
            serde_json::to_writer_pretty(&mut out, &books)?;
            writeln!(out)?;
        }
    }
    Ok(())
}
