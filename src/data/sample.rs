use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use super::model::{Dataset, Record};

pub const DEFAULT_SEED: u64 = 42;
pub const DEFAULT_PLAYERS: usize = 100;

pub const TEAMS: [&str; 3] = ["Team A", "Team B", "Team C"];
pub const POSITIONS: [&str; 3] = ["Forward", "Midfielder", "Defender"];

/// Deterministic synthetic player table: the same seed always yields the
/// same records.
///
/// Ranges (upper bounds exclusive):
/// goals 0..30, assists 0..20, passes 500..2000, pass accuracy 60..95,
/// tackles and interceptions 10..100.
pub fn generate(seed: u64, n_players: usize) -> Dataset {
    let mut rng = StdRng::seed_from_u64(seed);

    // Draw column by column so every column is a stable function of the seed.
    let teams: Vec<&str> = (0..n_players).map(|_| pick(&mut rng, &TEAMS)).collect();
    let positions: Vec<&str> = (0..n_players).map(|_| pick(&mut rng, &POSITIONS)).collect();
    let goals: Vec<u32> = (0..n_players).map(|_| rng.gen_range(0..30)).collect();
    let assists: Vec<u32> = (0..n_players).map(|_| rng.gen_range(0..20)).collect();
    let passes: Vec<u32> = (0..n_players).map(|_| rng.gen_range(500..2000)).collect();
    let accuracy: Vec<f64> = (0..n_players).map(|_| rng.gen_range(60.0..95.0)).collect();
    let tackles: Vec<u32> = (0..n_players).map(|_| rng.gen_range(10..100)).collect();
    let interceptions: Vec<u32> = (0..n_players).map(|_| rng.gen_range(10..100)).collect();

    let records = (0..n_players)
        .map(|i| Record {
            player: format!("Player {i}"),
            team: teams[i].to_string(),
            position: positions[i].to_string(),
            goals: goals[i],
            assists: assists[i],
            passes: passes[i],
            pass_accuracy: accuracy[i],
            tackles: tackles[i],
            interceptions: interceptions[i],
            extra: BTreeMap::new(),
        })
        .collect();

    Dataset::from_records(records)
}

fn pick<'a>(rng: &mut StdRng, labels: &[&'a str]) -> &'a str {
    labels.choose(rng).copied().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_data() {
        assert_eq!(generate(7, 50), generate(7, 50));
        assert_ne!(generate(7, 50), generate(8, 50));
    }

    #[test]
    fn values_within_ranges() {
        let ds = generate(DEFAULT_SEED, DEFAULT_PLAYERS);
        assert_eq!(ds.len(), DEFAULT_PLAYERS);
        assert_eq!(ds.records[0].player, "Player 0");
        assert_eq!(ds.records[99].player, "Player 99");
        for r in &ds.records {
            assert!(TEAMS.contains(&r.team.as_str()));
            assert!(POSITIONS.contains(&r.position.as_str()));
            assert!(r.goals < 30);
            assert!(r.assists < 20);
            assert!((500..2000).contains(&r.passes));
            assert!((60.0..95.0).contains(&r.pass_accuracy));
            assert!((10..100).contains(&r.tackles));
            assert!((10..100).contains(&r.interceptions));
        }
    }

    #[test]
    fn universes_cover_label_sets() {
        let ds = generate(DEFAULT_SEED, DEFAULT_PLAYERS);
        assert_eq!(ds.teams.len(), 3);
        assert_eq!(ds.positions.len(), 3);
    }
}
