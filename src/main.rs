use std::collections::BTreeSet;

use anyhow::{Context, Result};
use clap::Parser;

use football_analytics::cli::{Args, Command};
use football_analytics::config::AnalyticsConfig;
use football_analytics::data::{self, CategoryColumn, DatasetStore};
use football_analytics::export;
use football_analytics::state::SessionState;

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = AnalyticsConfig::load_or_default(args.config.as_deref())
        .context("loading configuration")?;
    let seed = args.seed.unwrap_or(config.seed);
    let mut session = SessionState::new(DatasetStore::with_sample_size(seed, config.sample_size));

    if let Some(path) = &args.data {
        let loaded = match args.format {
            Some(format) => {
                let raw = std::fs::read(path)
                    .with_context(|| format!("reading {}", path.display()))?;
                session.load_upload(&raw, format)
            }
            None => session.load_path(path),
        };
        loaded.with_context(|| format!("loading {}", path.display()))?;
    }

    let teams = selection(&session, CategoryColumn::Team, &args.teams, args.no_teams);
    let positions = selection(
        &session,
        CategoryColumn::Position,
        &args.positions,
        args.no_positions,
    );
    session.set_selection(teams, positions);

    run(&args.command, &session, &config)
}

/// Explicit values, nothing, or the full universe when no value was given.
fn selection(
    session: &SessionState,
    column: CategoryColumn,
    values: &[String],
    none: bool,
) -> BTreeSet<String> {
    if none {
        BTreeSet::new()
    } else if values.is_empty() {
        data::universe(session.dataset(), column).clone()
    } else {
        values.iter().cloned().collect()
    }
}

fn run(command: &Command, session: &SessionState, config: &AnalyticsConfig) -> Result<()> {
    let view = session.view();
    match command {
        Command::Universe => {
            for column in [CategoryColumn::Team, CategoryColumn::Position] {
                let values: Vec<&str> = data::universe(session.dataset(), column)
                    .iter()
                    .map(String::as_str)
                    .collect();
                println!("{column}: {}", values.join(", "));
            }
        }
        Command::View => {
            println!("{}", export::pretty_table(&view)?);
            println!("{} of {} players", view.len(), session.dataset().len());
        }
        Command::Players => {
            for name in data::player_names(&view) {
                println!("{name}");
            }
        }
        Command::Top { metric, n } => {
            let n = n.unwrap_or(config.top_n);
            let ranked = data::top_n(&view, metric, n)?;
            let metric: data::Metric = metric.parse()?;
            println!("Top {} players by {metric}", ranked.len());
            for (rank, rec) in ranked.iter().enumerate() {
                println!(
                    "{:>3}. {:<24} {:<12} {:>10}",
                    rank + 1,
                    rec.player,
                    rec.team,
                    format_value(rec.metric(metric))
                );
            }
        }
        Command::Compare { player1, player2 } => match data::compare(&view, player1, player2) {
            Ok(cmp) => {
                println!("{:<16} {:>14} {:>14}", "Metric", player1, player2);
                for (metric, left, right) in cmp.rows() {
                    println!(
                        "{:<16} {:>14} {:>14}",
                        metric.column_name(),
                        format_value(left),
                        format_value(right)
                    );
                }
            }
            // An unresolved side means there is nothing to compare.
            Err(e) => println!("Skipping comparison: {e}"),
        },
        Command::Export { path } => {
            let path = path.clone().unwrap_or_else(|| config.export_path.clone());
            let format = export::export_to_path(&view, &path, config.delimiter_byte())?;
            println!("Exported {} players as {format} to {}", view.len(), path.display());
        }
    }
    Ok(())
}

fn format_value(v: f64) -> String {
    if v.fract() == 0.0 {
        format!("{v:.0}")
    } else {
        format!("{v:.2}")
    }
}
