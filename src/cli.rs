//! Command-line definitions for the `football-analytics` shell.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::data::TableFormat;

/// Command-line arguments
#[derive(Clone, Parser, Debug)]
#[command(
    name = "football-analytics",
    version,
    about = "Filter, rank and compare football player statistics"
)]
pub struct Args {
    /// Player table to load (.csv, .xlsx, .json, .parquet). Without it a
    /// seeded sample table is generated.
    #[arg(long, global = true, value_name = "PATH")]
    pub data: Option<PathBuf>,

    /// Read --data as this format instead of detecting it from the extension
    #[arg(long, global = true)]
    pub format: Option<TableFormat>,

    /// Seed of the sample table (overrides the config file)
    #[arg(long, global = true)]
    pub seed: Option<u64>,

    /// TOML configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Team to include; repeat for several. Defaults to all teams.
    #[arg(long = "team", global = true, value_name = "TEAM")]
    pub teams: Vec<String>,

    /// Position to include; repeat for several. Defaults to all positions.
    #[arg(long = "position", global = true, value_name = "POSITION")]
    pub positions: Vec<String>,

    /// Select no teams at all (the view will be empty)
    #[arg(long, global = true, conflicts_with = "teams")]
    pub no_teams: bool,

    /// Select no positions at all (the view will be empty)
    #[arg(long, global = true, conflicts_with = "positions")]
    pub no_positions: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Clone, Subcommand, Debug)]
pub enum Command {
    /// List the selectable teams and positions
    Universe,
    /// Print the filtered table
    View,
    /// List player names in the filtered table
    Players,
    /// Rank players by a metric
    Top {
        /// goals, assists, passes, pass_accuracy, tackles or interceptions
        #[arg(long, short, default_value = "goals")]
        metric: String,
        /// Number of players (defaults to `top_n` from the config)
        #[arg(short)]
        n: Option<usize>,
    },
    /// Compare two players side by side
    Compare { player1: String, player2: String },
    /// Write the filtered table to a file (.csv, .json, .parquet, .xlsx)
    Export {
        /// Output path (defaults to `export_path` from the config)
        path: Option<PathBuf>,
    },
}
