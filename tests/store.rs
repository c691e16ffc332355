use std::sync::Arc;

use football_analytics::data::{DatasetStore, TableFormat};
use football_analytics::state::SessionState;
use football_analytics::AnalyticsError;

const UPLOAD: &str = "\
Player,Team,Position,Goals,Assists,Passes,Pass_Accuracy,Tackles,Interceptions
Ana,Reds,Forward,12,4,800,77.5,20,15
Ben,Blues,Goalkeeper,0,1,650,88,5,9
";

#[test]
fn malformed_upload_keeps_previous_dataset() {
    let mut store = DatasetStore::initialize(42);
    let before = store.current();

    let err = store
        .replace(b"Player,Team\n\"unterminated", TableFormat::Csv)
        .unwrap_err();
    assert!(matches!(err, AnalyticsError::Parse { ref format, .. } if format == "csv"));
    assert!(Arc::ptr_eq(&before, &store.current()));
    assert_eq!(store.generation(), 0);

    let err = store.replace(b"\x00\x01garbage", TableFormat::Xlsx).unwrap_err();
    assert!(matches!(err, AnalyticsError::Parse { .. }));
    assert_eq!(*store.current(), *before);
}

#[test]
fn replace_swaps_and_recomputes_universes() {
    let mut store = DatasetStore::initialize(42);
    let snapshot = store.current();

    store.replace(UPLOAD.as_bytes(), TableFormat::Csv).unwrap();
    let current = store.current();
    assert_eq!(current.len(), 2);
    assert_eq!(current.teams.iter().collect::<Vec<_>>(), ["Blues", "Reds"]);
    assert!(current.positions.contains("Goalkeeper"));
    assert_eq!(store.generation(), 1);

    // The old snapshot is untouched.
    assert_eq!(snapshot.len(), 100);
    assert!(snapshot.teams.contains("Team A"));
}

#[test]
fn session_selection_resets_on_upload() {
    let mut session = SessionState::new(DatasetStore::initialize(42));
    session.set_selection(
        ["Team A".to_string()].into_iter().collect(),
        ["Forward".to_string()].into_iter().collect(),
    );
    assert!(session.view().len() < 100);

    session.load_upload(UPLOAD.as_bytes(), TableFormat::Csv).unwrap();
    assert_eq!(session.view().len(), 2);
    assert!(session.selection.teams.contains("Reds"));
    assert!(!session.selection.teams.contains("Team A"));
    assert!(session.status_message.is_none());
}

#[test]
fn stale_selection_values_are_dropped() {
    let mut session = SessionState::new(DatasetStore::initialize(42));
    session.set_selection(
        ["Team A".to_string(), "Nobody FC".to_string()].into_iter().collect(),
        ["Forward".to_string()].into_iter().collect(),
    );
    assert!(!session.selection.teams.contains("Nobody FC"));
    assert!(session
        .view()
        .iter()
        .all(|r| r.team == "Team A" && r.position == "Forward"));
}
