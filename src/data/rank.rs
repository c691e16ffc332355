use std::collections::HashSet;

use super::filter::FilteredView;
use super::model::{Metric, Record};
use crate::error::{AnalyticsError, Result};

/// Up to `n` records of `view`, highest `metric` first.
///
/// Fails with [`AnalyticsError::InvalidMetric`] for a name outside the
/// recognised numeric columns.
pub fn top_n<'a>(view: &FilteredView<'a>, metric: &str, n: usize) -> Result<Vec<&'a Record>> {
    let metric: Metric = metric.parse()?;
    Ok(top_n_by(view, metric, n))
}

/// Typed [`top_n`]. Equal values keep their order in the view.
pub fn top_n_by<'a>(view: &FilteredView<'a>, metric: Metric, n: usize) -> Vec<&'a Record> {
    let mut ranked = view.records();
    // `sort_by` is stable, so ties stay in view order.
    ranked.sort_by(|a, b| b.metric(metric).total_cmp(&a.metric(metric)));
    ranked.truncate(n);
    log::debug!("top {n} by {metric}: {} of {} records", ranked.len(), view.len());
    ranked
}

/// First record whose player name equals `player`. Duplicate names resolve
/// to the earliest one in the view.
pub fn lookup_one<'a>(view: &FilteredView<'a>, player: &str) -> Result<&'a Record> {
    view.iter()
        .find(|rec| rec.player == player)
        .ok_or_else(|| AnalyticsError::NotFound(player.to_string()))
}

/// Distinct player names in view order, for the comparison pickers.
pub fn player_names<'a>(view: &FilteredView<'a>) -> Vec<&'a str> {
    let mut seen = HashSet::new();
    view.iter()
        .map(|rec| rec.player.as_str())
        .filter(|name| seen.insert(*name))
        .collect()
}

// ---------------------------------------------------------------------------
// Head-to-head comparison
// ---------------------------------------------------------------------------

/// Two resolved players and their metric values side by side.
#[derive(Debug, Clone)]
pub struct PlayerComparison<'a> {
    pub left: &'a Record,
    pub right: &'a Record,
}

impl<'a> PlayerComparison<'a> {
    /// `(metric, left value, right value)` for every metric in [`Metric::ALL`] order.
    pub fn rows(&self) -> Vec<(Metric, f64, f64)> {
        Metric::ALL
            .into_iter()
            .map(|m| (m, self.left.metric(m), self.right.metric(m)))
            .collect()
    }
}

/// Resolve both players in `view`. Fails with `NotFound` for the first
/// name that does not resolve.
pub fn compare<'a>(view: &FilteredView<'a>, left: &str, right: &str) -> Result<PlayerComparison<'a>> {
    Ok(PlayerComparison {
        left: lookup_one(view, left)?,
        right: lookup_one(view, right)?,
    })
}
