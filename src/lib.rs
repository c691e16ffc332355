//! Player statistics explorer.
//!
//! A [`DatasetStore`](data::DatasetStore) holds the session's player table
//! (seeded sample data or an uploaded CSV/XLSX/JSON/Parquet file). The
//! filter engine in [`data`] narrows it by team and position, ranks it by a
//! metric and resolves players for head-to-head comparison. [`export`]
//! writes any view back out.

pub mod cli;
pub mod config;
pub mod data;
pub mod error;
pub mod export;
pub mod state;

pub use error::{AnalyticsError, Result};
