use std::collections::BTreeSet;

use super::model::{CategoryColumn, Dataset, Record};

// ---------------------------------------------------------------------------
// Filter selection: which teams / positions are ticked
// ---------------------------------------------------------------------------

/// Selected values per filterable column.
/// An empty set means nothing is selected, which hides every record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSelection {
    pub teams: BTreeSet<String>,
    pub positions: BTreeSet<String>,
}

impl FilterSelection {
    /// Everything selected (i.e., show all records).
    pub fn all(dataset: &Dataset) -> Self {
        Self {
            teams: dataset.teams.clone(),
            positions: dataset.positions.clone(),
        }
    }

    pub fn selected(&self, column: CategoryColumn) -> &BTreeSet<String> {
        match column {
            CategoryColumn::Team => &self.teams,
            CategoryColumn::Position => &self.positions,
        }
    }

    pub fn selected_mut(&mut self, column: CategoryColumn) -> &mut BTreeSet<String> {
        match column {
            CategoryColumn::Team => &mut self.teams,
            CategoryColumn::Position => &mut self.positions,
        }
    }

    /// Drop selected values that are not in the dataset's universes.
    /// Returns the dropped values.
    pub fn retain_known(&mut self, dataset: &Dataset) -> Vec<String> {
        let mut dropped = Vec::new();
        for column in [CategoryColumn::Team, CategoryColumn::Position] {
            let universe = dataset.universe(column);
            let selected = self.selected_mut(column);
            dropped.extend(selected.difference(universe).cloned());
            selected.retain(|v| universe.contains(v));
        }
        dropped
    }
}

// ---------------------------------------------------------------------------
// Filtered view
// ---------------------------------------------------------------------------

/// Read-only subset of a dataset: the indices of matching records, in
/// source order.
#[derive(Debug, Clone)]
pub struct FilteredView<'a> {
    dataset: &'a Dataset,
    indices: Vec<usize>,
}

impl<'a> FilteredView<'a> {
    /// View over every record of `dataset`.
    pub fn all(dataset: &'a Dataset) -> Self {
        Self {
            dataset,
            indices: (0..dataset.len()).collect(),
        }
    }

    /// View over precomputed indices. Out-of-range indices are dropped.
    pub fn from_indices(dataset: &'a Dataset, mut indices: Vec<usize>) -> Self {
        indices.retain(|&i| i < dataset.len());
        Self { dataset, indices }
    }

    pub fn dataset(&self) -> &'a Dataset {
        self.dataset
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a Record> + '_ {
        let records = &self.dataset.records;
        self.indices.iter().map(move |&i| &records[i])
    }

    pub fn records(&self) -> Vec<&'a Record> {
        self.iter().collect()
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Filter engine
// ---------------------------------------------------------------------------

/// Distinct values of a filterable column, sorted.
pub fn universe(dataset: &Dataset, column: CategoryColumn) -> &BTreeSet<String> {
    dataset.universe(column)
}

/// Return indices of records whose team and position are both selected.
pub fn filtered_indices(
    dataset: &Dataset,
    teams: &BTreeSet<String>,
    positions: &BTreeSet<String>,
) -> Vec<usize> {
    if teams.is_empty() || positions.is_empty() {
        // Nothing selected for a column → hide everything
        return Vec::new();
    }
    dataset
        .records
        .iter()
        .enumerate()
        .filter(|(_, rec)| teams.contains(&rec.team) && positions.contains(&rec.position))
        .map(|(i, _)| i)
        .collect()
}

/// Records with `team ∈ teams` and `position ∈ positions`, in source order.
pub fn apply<'a>(
    dataset: &'a Dataset,
    teams: &BTreeSet<String>,
    positions: &BTreeSet<String>,
) -> FilteredView<'a> {
    let indices = filtered_indices(dataset, teams, positions);
    log::debug!(
        "filter: {} of {} records match {} team(s) x {} position(s)",
        indices.len(),
        dataset.len(),
        teams.len(),
        positions.len()
    );
    FilteredView { dataset, indices }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    fn rec(player: &str, team: &str, position: &str) -> Record {
        Record {
            player: player.into(),
            team: team.into(),
            position: position.into(),
            goals: 0,
            assists: 0,
            passes: 0,
            pass_accuracy: 0.0,
            tackles: 0,
            interceptions: 0,
            extra: BTreeMap::new(),
        }
    }

    fn set(values: &[&str]) -> BTreeSet<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn retain_known_drops_stale_values() {
        let ds = Dataset::from_records(vec![rec("a", "Team A", "Forward")]);
        let mut sel = FilterSelection {
            teams: set(&["Team A", "Team Z"]),
            positions: set(&["Forward"]),
        };
        let dropped = sel.retain_known(&ds);
        assert_eq!(dropped, vec!["Team Z".to_string()]);
        assert_eq!(sel, FilterSelection::all(&ds));
    }

    #[test]
    fn unknown_selected_values_match_nothing() {
        let ds = Dataset::from_records(vec![rec("a", "Team A", "Forward")]);
        let view = apply(&ds, &set(&["Team Q"]), &set(&["Forward"]));
        assert!(view.is_empty());
    }

    #[test]
    fn from_indices_drops_out_of_range() {
        let ds = Dataset::from_records(vec![rec("a", "Team A", "Forward")]);
        let view = FilteredView::from_indices(&ds, vec![0, 3]);
        assert_eq!(view.indices(), &[0]);
    }
}
