//! Geocatalog - Main entry point
//!
//! Loads a catalog init document into an item tree, then prints the tree or
//! exports it back to JSON.

mod catalog;
mod config;

use anyhow::Result;
use clap::Parser;
use geocatalog_core::CatalogContext;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "geocatalog")]
#[command(about = "Load, inspect and re-export geospatial catalog documents")]
#[command(version)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "geocatalog.toml")]
    config: PathBuf,

    /// Catalog document to load (overrides the configured path)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Write the exported document here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Export every item, including disabled data sources and empty groups
    #[arg(long)]
    all: bool,

    /// Print the item tree instead of exporting
    #[arg(long)]
    tree: bool,

    /// Write a default configuration file to --config and exit
    #[arg(long)]
    write_default_config: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    // Logs go to stderr so the exported document can be piped
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("Geocatalog v{}", env!("CARGO_PKG_VERSION"));

    if args.write_default_config {
        config::save_default_config(&args.config)?;
        info!(path = %args.config.display(), "Wrote default configuration");
        return Ok(());
    }

    // Load configuration
    let mut config = config::load_config(&args.config)?;

    if let Some(input) = args.input {
        config.catalog.path = input.display().to_string();
    }
    if let Some(output) = args.output {
        config.export.output = Some(output.display().to_string());
    }
    if args.all {
        config.export.enabled_items_only = false;
    }

    let context = CatalogContext::with_builtin_types();
    let document = catalog::load_document(Path::new(&config.catalog.path))?;
    let root = catalog::build_catalog(&context, &document)?;

    if args.tree {
        let mut stdout = std::io::stdout().lock();
        catalog::write_tree(&mut stdout, &root, 0)?;
        return Ok(());
    }

    let exported = catalog::export_catalog(&root, config.export.enabled_items_only)?;
    let mut text = if config.export.pretty {
        serde_json::to_string_pretty(&exported)?
    } else {
        serde_json::to_string(&exported)?
    };
    text.push('\n');

    match &config.export.output {
        Some(path) => {
            std::fs::write(path, text)?;
            info!(
                path = %path,
                enabled_items_only = config.export.enabled_items_only,
                "Catalog exported"
            );
        }
        None => std::io::stdout().lock().write_all(text.as_bytes())?,
    }

    Ok(())
}
