//! cachemeta - CLI for the cache metadata registry
//!
//! cachemeta provides:
//! - Saving one node's metadata shard from a list of cached feature locations
//! - Listing and reading back every node's shard in parallel
//! - Path sanitization and field extraction helpers
//! - Unified output format (jsonl/json/raw)

use anyhow::Result;
use clap::Parser;

mod cli;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli::run(cli)
}
