//! Write the seeded sample player table to disk.
//!
//! Usage: generate_sample [--seed N] [--rows N] [OUT]
//! OUT defaults to `sample_players.parquet`; the extension picks the format.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use football_analytics::data::filter::FilteredView;
use football_analytics::data::sample::{self, DEFAULT_PLAYERS, DEFAULT_SEED};
use football_analytics::export;

#[derive(Parser, Debug)]
#[command(name = "generate_sample", about = "Write the sample player table to a file")]
struct Args {
    #[arg(long, default_value_t = DEFAULT_SEED)]
    seed: u64,

    #[arg(long, default_value_t = DEFAULT_PLAYERS)]
    rows: usize,

    /// Output file (.parquet, .csv, .json or .xlsx)
    #[arg(default_value = "sample_players.parquet")]
    out: PathBuf,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let dataset = sample::generate(args.seed, args.rows);
    let view = FilteredView::all(&dataset);
    let format = export::export_to_path(&view, &args.out, b',')
        .with_context(|| format!("writing {}", args.out.display()))?;

    println!(
        "Wrote {} players ({} teams, {} positions) as {format} to {}",
        dataset.len(),
        dataset.teams.len(),
        dataset.positions.len(),
        args.out.display()
    );
    Ok(())
}
