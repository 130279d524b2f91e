//! CLI module - Command-line interface definitions and handlers

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::io::Read;
use std::path::{Path, PathBuf};

use cachemeta::core::config::{default_workers, RegistryConfig};
use cachemeta::core::logging;
use cachemeta::core::render::{OutputFormat, RenderConfig, Renderer};
use cachemeta::{
    extract_field_from_cache_metadata_entries, list_metadata_shards, read_cache_metadata,
    sanitise_s3_path, save_cache_metadata, shard_uri, MetadataEntry, TableFormat,
};

/// cachemeta - record and read back metadata shards for cached feature files.
#[derive(Parser, Debug)]
#[command(name = "cachemeta")]
#[command(
    author,
    version,
    about,
    long_about = r#"cachemeta records which feature files a caching pass produced as one
metadata shard per node, and reads every node's shard back in parallel.

Object store roots are given as s3://bucket/key (the scheme is optional). They
are served from a local directory: s3://bucket/key maps to STORE_DIR/bucket/key.

Examples:
    cachemeta --store-dir /mnt/s3 save --root s3://bucket/cache --node-id 0 --input files.txt
    cachemeta --store-dir /mnt/s3 list --root s3://bucket/cache
    cachemeta --store-dir /mnt/s3 read --root s3://bucket/cache --workers 8
"#
)]
pub struct Cli {
    /// Base directory of the local object store.
    #[arg(
        long,
        global = true,
        default_value = ".",
        env = "CACHEMETA_STORE_DIR",
        value_name = "DIR"
    )]
    pub store_dir: PathBuf,

    /// Number of workers used to read shards.
    #[arg(
        long,
        global = true,
        env = "CACHEMETA_WORKERS",
        value_name = "N",
        long_help = "Number of workers used to read shards.\n\n\
Defaults to the available parallelism of the machine."
    )]
    pub workers: Option<usize>,

    /// Shard table format (csv/jsonl).
    #[arg(
        long,
        global = true,
        default_value = "csv",
        env = "CACHEMETA_TABLE_FORMAT",
        value_parser = ["csv", "jsonl"],
        value_name = "FORMAT"
    )]
    pub table_format: String,

    /// Output format (jsonl/json/raw).
    #[arg(long, global = true, default_value = "jsonl", value_name = "FORMAT")]
    pub format: String,

    /// Pretty-print JSON/JSONL output with indentation.
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Quiet mode (errors only on stderr).
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging on stderr).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Persist one node's metadata shard.
    #[command(
        long_about = "Read cached feature locations (one per line) from --input, or stdin when\n\
omitted, and write them as this node's shard under ROOT/metadata/.\n\n\
Prints the URI of the written shard."
    )]
    Save {
        /// Cache root location.
        #[arg(long, value_name = "ROOT")]
        root: PathBuf,

        /// Node identifier used in the shard name.
        #[arg(long, default_value = "0", value_name = "N")]
        node_id: u32,

        /// File with one location per line.
        #[arg(long, value_name = "FILE")]
        input: Option<PathBuf>,
    },

    /// Read metadata entries from shards.
    #[command(
        long_about = "Read the named shards under ROOT/metadata/ and print every entry in\n\
shard order. Without SHARD arguments, every shard of the cache is read."
    )]
    Read {
        /// Cache root location.
        #[arg(long, value_name = "ROOT")]
        root: PathBuf,

        /// Shard file names.
        #[arg(value_name = "SHARD", num_args = 0..)]
        shards: Vec<String>,
    },

    /// List the metadata shards of a cache, ordered by node id.
    List {
        /// Cache root location.
        #[arg(long, value_name = "ROOT")]
        root: PathBuf,
    },

    /// Print the canonical s3:// form of a location.
    Sanitize {
        #[arg(value_name = "PATH")]
        path: PathBuf,
    },

    /// Print one field of every entry read from shards.
    Extract {
        /// Cache root location.
        #[arg(long, value_name = "ROOT")]
        root: PathBuf,

        /// Entry field to print.
        #[arg(long, default_value = "location", value_name = "NAME")]
        field: String,

        /// Shard file names.
        #[arg(value_name = "SHARD", num_args = 0..)]
        shards: Vec<String>,
    },

    /// Print the resolved configuration.
    Config,
}

/// Run the CLI command
pub fn run(cli: Cli) -> Result<()> {
    logging::init(cli.verbose, cli.quiet);

    let format: OutputFormat = cli.format.parse().unwrap_or_default();
    let renderer = Renderer::with_config(RenderConfig::with_pretty(format, cli.pretty));

    let table_format: TableFormat = cli.table_format.parse().map_err(anyhow::Error::msg)?;
    let config = RegistryConfig {
        store_dir: cli.store_dir,
        workers: cli.workers.unwrap_or_else(default_workers),
        table_format,
    };

    match cli.command {
        Commands::Save {
            root,
            node_id,
            input,
        } => {
            let entries: Vec<MetadataEntry> = read_locations(input.as_deref())?
                .into_iter()
                .map(MetadataEntry::new)
                .collect();

            save_cache_metadata(
                &entries,
                &root,
                node_id,
                &config.provider(),
                config.table_format,
            )
            .with_context(|| format!("Failed to save cache metadata under {}", root.display()))?;

            print(&renderer, &[shard_uri(&root, node_id, config.table_format)])
        }

        Commands::Read { root, shards } => {
            let entries = read_entries(&config, &root, shards)?;
            print(&renderer, &entries)
        }

        Commands::List { root } => {
            let shards = list_metadata_shards(&root, &config.provider(), config.table_format)
                .with_context(|| format!("Failed to list metadata shards under {}", root.display()))?;
            print(&renderer, &shards)
        }

        Commands::Sanitize { path } => print(&renderer, &[sanitise_s3_path(&path)]),

        Commands::Extract {
            root,
            field,
            shards,
        } => {
            let entries = read_entries(&config, &root, shards)?;
            let values = extract_field_from_cache_metadata_entries(&entries, &field)?;
            print(&renderer, &values)
        }

        Commands::Config => print(&renderer, &[&config]),
    }
}

/// Read the given shards, or every shard of the cache when none are given
fn read_entries(
    config: &RegistryConfig,
    root: &Path,
    shards: Vec<String>,
) -> Result<Vec<MetadataEntry>> {
    let provider = config.provider();
    let shards = if shards.is_empty() {
        list_metadata_shards(root, &provider, config.table_format)
            .with_context(|| format!("Failed to list metadata shards under {}", root.display()))?
    } else {
        shards
    };

    let pool = config
        .build_pool()
        .context("Failed to build worker pool")?;

    read_cache_metadata(root, &shards, &pool, &provider, config.table_format)
        .with_context(|| format!("Failed to read cache metadata under {}", root.display()))
}

/// Locations from a file or stdin, one per non-empty line
fn read_locations(input: Option<&Path>) -> Result<Vec<String>> {
    let content = match input {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read locations from {:?}", path))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read locations from stdin")?;
            buf
        }
    };

    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

fn print<T: Serialize>(renderer: &Renderer, items: &[T]) -> Result<()> {
    renderer
        .render_to(items, std::io::stdout().lock())
        .context("Failed to write output")
}
