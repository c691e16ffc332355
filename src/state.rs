use std::collections::BTreeSet;
use std::path::Path;

use crate::data::filter::{filtered_indices, FilterSelection, FilteredView};
use crate::data::loader::TableFormat;
use crate::data::model::{CategoryColumn, Dataset};
use crate::data::store::DatasetStore;
use crate::error::Result;

// ---------------------------------------------------------------------------
// Session state
// ---------------------------------------------------------------------------

/// One user's session, independent of how it is presented.
pub struct SessionState {
    /// Active player table.
    pub store: DatasetStore,

    /// Team / position selections.
    pub selection: FilterSelection,

    /// Indices of records passing the current selection (cached).
    pub visible_indices: Vec<usize>,

    /// Status / error message for the user.
    pub status_message: Option<String>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new(DatasetStore::default())
    }
}

impl SessionState {
    pub fn new(store: DatasetStore) -> Self {
        let selection = FilterSelection::all(store.dataset());
        let visible_indices = (0..store.dataset().len()).collect();
        Self {
            store,
            selection,
            visible_indices,
            status_message: None,
        }
    }

    pub fn dataset(&self) -> &Dataset {
        self.store.dataset()
    }

    /// Install a new dataset and reset every filter to "all".
    pub fn set_dataset(&mut self, dataset: Dataset) {
        self.store.swap(dataset);
        self.reset_selection();
    }

    /// Replace the dataset from uploaded bytes. On failure the previous
    /// dataset and selection stay in place and the error is kept as the
    /// status message.
    pub fn load_upload(&mut self, raw: &[u8], format: TableFormat) -> Result<()> {
        let outcome = self.store.replace(raw, format).map(|_| ());
        self.after_load(outcome)
    }

    pub fn load_path(&mut self, path: &Path) -> Result<()> {
        let outcome = self.store.replace_from_path(path).map(|_| ());
        self.after_load(outcome)
    }

    fn after_load(&mut self, outcome: Result<()>) -> Result<()> {
        match outcome {
            Ok(()) => {
                self.reset_selection();
                self.status_message = None;
                Ok(())
            }
            Err(e) => {
                log::error!("Failed to load data: {e}");
                self.status_message = Some(format!("Error: {e}"));
                Err(e)
            }
        }
    }

    fn reset_selection(&mut self) {
        self.selection = FilterSelection::all(self.store.dataset());
        self.refilter();
    }

    /// Recompute `visible_indices` after a selection change.
    pub fn refilter(&mut self) {
        self.visible_indices = filtered_indices(
            self.store.dataset(),
            &self.selection.teams,
            &self.selection.positions,
        );
    }

    /// The filtered view for the current selection.
    pub fn view(&self) -> FilteredView<'_> {
        FilteredView::from_indices(self.store.dataset(), self.visible_indices.clone())
    }

    /// Replace both selections at once. Values outside the current
    /// universes are dropped.
    pub fn set_selection(&mut self, teams: BTreeSet<String>, positions: BTreeSet<String>) {
        self.selection = FilterSelection { teams, positions };
        let dropped = self.selection.retain_known(self.store.dataset());
        if !dropped.is_empty() {
            log::warn!("Ignoring unknown filter values: {dropped:?}");
        }
        self.refilter();
    }

    /// Toggle a single value in a column's selection. Values outside the
    /// column's universe are never added.
    pub fn toggle(&mut self, column: CategoryColumn, value: &str) {
        let known = self.store.dataset().universe(column).contains(value);
        let selected = self.selection.selected_mut(column);
        if !selected.remove(value) {
            if !known {
                log::warn!("Ignoring unknown filter value: {value:?}");
                return;
            }
            selected.insert(value.to_string());
        }
        self.refilter();
    }

    /// Select all values in a column.
    pub fn select_all(&mut self, column: CategoryColumn) {
        let all_vals = self.store.dataset().universe(column).clone();
        *self.selection.selected_mut(column) = all_vals;
        self.refilter();
    }

    /// Deselect all values in a column.
    pub fn select_none(&mut self, column: CategoryColumn) {
        self.selection.selected_mut(column).clear();
        self.refilter();
    }
}
