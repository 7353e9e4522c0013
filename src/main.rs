//! fieldmap: derive search-index field mappings
//!
//! Reads record types from a catalog document and prints the field mapping
//! of one of them.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use fieldmap::{Catalog, Mapping, Passthrough, SchemaBuilder};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// Derive search-index field mappings from record type descriptions
#[derive(Parser)]
#[command(name = "fieldmap")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Catalog file (YAML, or JSON with a .json extension)
    catalog: PathBuf,

    /// Record type to map
    #[arg(short, long, required_unless_present = "list")]
    record: Option<String>,

    /// List the record types of the catalog and exit
    #[arg(long)]
    list: bool,

    /// Maximum nesting depth for object and nested fields
    #[arg(short, long, default_value_t = 3)]
    depth: usize,

    /// Output format
    #[arg(long, default_value = "json", value_enum)]
    format: OutputFormat,

    /// Wrap the properties in a full {"mappings": ...} document
    #[arg(long)]
    wrap: bool,

    /// Ignore the rules section of the catalog
    #[arg(long)]
    no_rules: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Yaml,
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "error" => Level::ERROR,
        _ => Level::WARN,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let catalog = load_catalog(&cli.catalog)?;

    if cli.list {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        for name in catalog.names() {
            writeln!(handle, "{name}")?;
        }
        return Ok(());
    }

    let record = cli
        .record
        .as_deref()
        .context("--record is required unless --list is given")?;
    let shape = catalog.shape(record)?;

    info!(record, depth = cli.depth, "building mapping");

    let builder = SchemaBuilder::new(cli.depth);
    let properties = if cli.no_rules {
        builder.with_hook(Passthrough).build(&shape)
    } else {
        builder.with_hook(catalog.rules().clone()).build(&shape)
    }
    .with_context(|| format!("Failed to build mapping for '{record}'"))?;

    info!(fields = properties.len(), "mapping built");

    if cli.wrap {
        output(&Mapping::new(properties), cli.format)
    } else {
        output(&properties, cli.format)
    }
}

fn load_catalog(path: &Path) -> Result<Catalog> {
    let catalog = Catalog::load(path)
        .with_context(|| format!("Failed to load catalog: {}", path.display()))?;

    info!(path = %path.display(), records = catalog.names().len(), "catalog loaded");
    Ok(catalog)
}

fn output<T: serde::Serialize>(value: &T, format: OutputFormat) -> Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();

    match format {
        OutputFormat::Yaml => {
            let yaml = serde_yaml::to_string(value)?;
            write!(handle, "{}", yaml)?;
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(value)?;
            writeln!(handle, "{}", json)?;
        }
    }

    Ok(())
}
