//! `niya-solve`: the batch sampler CLI.

use anyhow::Result;
use clap::Parser;

use niya_core::sampler::{self, SamplerConfig};

/// Randomly samples boards across the permutation space, canonicalizes
/// and solves each, and persists results to a SQLite database.
#[derive(Parser, Debug)]
#[command(name = "niya-solve", version, about)]
struct Cli {
    /// Skip P2 reply analysis for faster solving (P1 results only).
    #[arg(long)]
    skip_p2: bool,

    /// Number of canonical boards per database save.
    #[arg(long, default_value_t = 10)]
    batch_size: usize,

    /// Number of worker threads (defaults to available parallelism).
    #[arg(long)]
    workers: Option<usize>,

    /// Stop after this many new boards are solved during this run.
    #[arg(long)]
    target: Option<u64>,

    /// Path to the results database.
    #[arg(long, default_value = "data/niya.db")]
    db: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = SamplerConfig {
        db_path: cli.db,
        skip_p2: cli.skip_p2,
        batch_size: cli.batch_size,
        target: cli.target,
        ..SamplerConfig::default()
    };
    if let Some(workers) = cli.workers {
        config.workers = workers;
    }

    sampler::run(config)
}
