/// Data layer: core types, loading, filtering and ranking.
///
/// Architecture:
/// ```text
///  seed ─► sample        .csv / .xlsx / .json / .parquet
///            │                      │
///            │                      ▼
///            │                ┌──────────┐
///            │                │  loader   │  parse bytes → Dataset
///            │                └──────────┘
///            ▼                      │
///   ┌─────────────────────────────────┐
///   │ store   Arc<Dataset>, swapped whole │
///   └─────────────────────────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  team ∈ T ∧ position ∈ P → FilteredView
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  rank     │  top-N by metric, player lookup, comparison
///   └──────────┘
/// ```

pub mod filter;
pub mod loader;
pub mod model;
pub mod rank;
pub mod sample;
pub mod store;

pub use filter::{apply, universe, FilterSelection, FilteredView};
pub use loader::TableFormat;
pub use model::{CategoryColumn, CellValue, Dataset, Metric, Record};
pub use rank::{compare, lookup_one, player_names, top_n, top_n_by, PlayerComparison};
pub use store::DatasetStore;
