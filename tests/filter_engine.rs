use std::collections::{BTreeMap, BTreeSet};

use football_analytics::data::sample;
use football_analytics::data::{
    apply, lookup_one, top_n, top_n_by, universe, CategoryColumn, Dataset, FilteredView, Metric,
    Record,
};
use football_analytics::AnalyticsError;

fn player(name: &str, team: &str, position: &str, goals: u32) -> Record {
    Record {
        player: name.to_string(),
        team: team.to_string(),
        position: position.to_string(),
        goals,
        assists: 0,
        passes: 500,
        pass_accuracy: 80.0,
        tackles: 10,
        interceptions: 10,
        extra: BTreeMap::new(),
    }
}

fn set(values: &[&str]) -> BTreeSet<String> {
    values.iter().map(|v| v.to_string()).collect()
}

fn three_players() -> Dataset {
    Dataset::from_records(vec![
        player("A", "TeamX", "Forward", 5),
        player("B", "TeamY", "Defender", 9),
        player("C", "TeamX", "Forward", 5),
    ])
}

fn names(records: &[&Record]) -> Vec<String> {
    records.iter().map(|r| r.player.clone()).collect()
}

#[test]
fn scenario_filter_and_rank() {
    let ds = three_players();

    let view = apply(&ds, &set(&["TeamX"]), &set(&["Forward"]));
    assert_eq!(names(&view.records()), vec!["A", "C"]);

    let all = FilteredView::all(&ds);
    assert_eq!(names(&top_n(&all, "goals", 2).unwrap()), vec!["B", "A"]);
    assert_eq!(names(&top_n(&all, "goals", 3).unwrap()), vec!["B", "A", "C"]);
}

#[test]
fn apply_returns_exactly_matching_records_in_order() {
    let ds = sample::generate(11, 300);
    let teams = set(&["Team A", "Team C"]);
    let positions = set(&["Midfielder"]);
    let view = apply(&ds, &teams, &positions);

    let expected: Vec<usize> = ds
        .records
        .iter()
        .enumerate()
        .filter(|(_, r)| teams.contains(&r.team) && positions.contains(&r.position))
        .map(|(i, _)| i)
        .collect();
    assert_eq!(view.indices(), expected.as_slice());
    assert!(view
        .iter()
        .all(|r| teams.contains(&r.team) && positions.contains(&r.position)));
}

#[test]
fn full_universe_is_a_no_op() {
    let ds = sample::generate(5, 120);
    let view = apply(
        &ds,
        universe(&ds, CategoryColumn::Team),
        universe(&ds, CategoryColumn::Position),
    );
    assert_eq!(view.len(), ds.len());
    let records: Vec<Record> = view.iter().cloned().collect();
    assert_eq!(records, ds.records);
}

#[test]
fn empty_selection_gives_empty_view() {
    let ds = sample::generate(5, 50);
    let everything = universe(&ds, CategoryColumn::Position).clone();
    assert!(apply(&ds, &BTreeSet::new(), &everything).is_empty());
    let teams = universe(&ds, CategoryColumn::Team).clone();
    assert!(apply(&ds, &teams, &BTreeSet::new()).is_empty());
}

#[test]
fn top_n_is_sorted_and_stable() {
    let ds = sample::generate(23, 200);
    let view = FilteredView::all(&ds);
    for metric in Metric::ALL {
        let ranked = top_n_by(&view, metric, 25);
        assert_eq!(ranked.len(), 25);
        for pair in ranked.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            assert!(a.metric(metric) >= b.metric(metric));
            if a.metric(metric) == b.metric(metric) {
                let pos = |r: &Record| ds.records.iter().position(|x| std::ptr::eq(x, r));
                assert!(pos(a) < pos(b), "tie order broken for {metric}");
            }
        }
    }
}

#[test]
fn top_n_length_is_min_of_n_and_view() {
    let ds = three_players();
    let view = apply(&ds, &set(&["TeamX"]), &set(&["Forward"]));
    assert_eq!(top_n(&view, "assists", 10).unwrap().len(), 2);
}

#[test]
fn unknown_metric_is_rejected() {
    let ds = three_players();
    let err = top_n(&FilteredView::all(&ds), "unknown_metric", 3).unwrap_err();
    assert!(matches!(err, AnalyticsError::InvalidMetric(m) if m == "unknown_metric"));
}

#[test]
fn lookup_on_empty_view_is_not_found() {
    let ds = three_players();
    let view = apply(&ds, &BTreeSet::new(), &BTreeSet::new());
    assert!(matches!(lookup_one(&view, "A"), Err(AnalyticsError::NotFound(_))));

    let view = FilteredView::all(&ds);
    assert_eq!(lookup_one(&view, "B").unwrap().goals, 9);
}
