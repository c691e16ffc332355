use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use crate::error::AnalyticsError;

// ---------------------------------------------------------------------------
// CellValue – a single cell of an extra (non-core) column
// ---------------------------------------------------------------------------

/// A dynamically-typed cell mirroring the common spreadsheet dtypes.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Integer(i64),
    Float(f64),
    Bool(bool),
    String(String),
    Null,
}

/// Renders the cell the way it is written back to delimited files:
/// nulls become empty fields, floats keep full precision.
impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Null => Ok(()),
        }
    }
}

impl CellValue {
    /// Guess the type of a raw text cell: empty → Null, then integer, float,
    /// bool, falling back to string.
    pub fn guess(s: &str) -> Self {
        if s.is_empty() {
            return CellValue::Null;
        }
        if let Ok(i) = s.parse::<i64>() {
            return CellValue::Integer(i);
        }
        if let Ok(f) = s.parse::<f64>() {
            return CellValue::Float(f);
        }
        if s == "true" || s == "false" {
            return CellValue::Bool(s == "true");
        }
        CellValue::String(s.to_string())
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Metric – the recognised numeric columns
// ---------------------------------------------------------------------------

/// Numeric statistic a record can be ranked or compared on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Metric {
    Goals,
    Assists,
    Passes,
    PassAccuracy,
    Tackles,
    Interceptions,
}

impl Metric {
    pub const ALL: [Metric; 6] = [
        Metric::Goals,
        Metric::Assists,
        Metric::Passes,
        Metric::PassAccuracy,
        Metric::Tackles,
        Metric::Interceptions,
    ];

    /// Column header used in files and tables.
    pub fn column_name(self) -> &'static str {
        match self {
            Metric::Goals => "Goals",
            Metric::Assists => "Assists",
            Metric::Passes => "Passes",
            Metric::PassAccuracy => "Pass_Accuracy",
            Metric::Tackles => "Tackles",
            Metric::Interceptions => "Interceptions",
        }
    }

    /// Normalised key, as accepted on the command line.
    pub fn key(self) -> &'static str {
        match self {
            Metric::Goals => "goals",
            Metric::Assists => "assists",
            Metric::Passes => "passes",
            Metric::PassAccuracy => "pass_accuracy",
            Metric::Tackles => "tackles",
            Metric::Interceptions => "interceptions",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}

impl FromStr for Metric {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = normalize_header(s);
        Metric::ALL
            .into_iter()
            .find(|m| m.key() == key)
            .ok_or_else(|| AnalyticsError::InvalidMetric(s.to_string()))
    }
}

/// Lower-case a header and fold `-` and spaces into `_`.
///
/// `"Pass Accuracy"`, `"pass-accuracy"` and `"Pass_Accuracy"` all map to
/// `"pass_accuracy"`.
pub fn normalize_header(s: &str) -> String {
    s.trim()
        .chars()
        .map(|c| match c {
            ' ' | '-' => '_',
            c => c.to_ascii_lowercase(),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// CategoryColumn – the filterable columns
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CategoryColumn {
    Team,
    Position,
}

impl CategoryColumn {
    pub fn column_name(self) -> &'static str {
        match self {
            CategoryColumn::Team => "Team",
            CategoryColumn::Position => "Position",
        }
    }
}

impl fmt::Display for CategoryColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}

// ---------------------------------------------------------------------------
// Record – one row of the player table
// ---------------------------------------------------------------------------

/// Column headers of the core player table, in their canonical order.
pub const CORE_COLUMNS: [&str; 9] = [
    "Player",
    "Team",
    "Position",
    "Goals",
    "Assists",
    "Passes",
    "Pass_Accuracy",
    "Tackles",
    "Interceptions",
];

/// A single player's statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub player: String,
    pub team: String,
    pub position: String,
    pub goals: u32,
    pub assists: u32,
    pub passes: u32,
    /// Percentage in `[0, 100]`.
    pub pass_accuracy: f64,
    pub tackles: u32,
    pub interceptions: u32,
    /// Any further columns of an uploaded file: column_name → value.
    pub extra: BTreeMap<String, CellValue>,
}

impl Record {
    pub fn metric(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Goals => f64::from(self.goals),
            Metric::Assists => f64::from(self.assists),
            Metric::Passes => f64::from(self.passes),
            Metric::PassAccuracy => self.pass_accuracy,
            Metric::Tackles => f64::from(self.tackles),
            Metric::Interceptions => f64::from(self.interceptions),
        }
    }

    pub fn category(&self, column: CategoryColumn) -> &str {
        match column {
            CategoryColumn::Team => &self.team,
            CategoryColumn::Position => &self.position,
        }
    }

    /// Value of the named column, core or extra. Unknown columns are `Null`.
    pub fn cell(&self, column: &str) -> CellValue {
        match normalize_header(column).as_str() {
            "player" => CellValue::String(self.player.clone()),
            "team" => CellValue::String(self.team.clone()),
            "position" => CellValue::String(self.position.clone()),
            "goals" => CellValue::Integer(i64::from(self.goals)),
            "assists" => CellValue::Integer(i64::from(self.assists)),
            "passes" => CellValue::Integer(i64::from(self.passes)),
            "pass_accuracy" => CellValue::Float(self.pass_accuracy),
            "tackles" => CellValue::Integer(i64::from(self.tackles)),
            "interceptions" => CellValue::Integer(i64::from(self.interceptions)),
            _ => self.extra.get(column).cloned().unwrap_or(CellValue::Null),
        }
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The full player table with pre-computed filter universes.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    /// All records, in source order.
    pub records: Vec<Record>,
    /// Column headers in file order (core columns plus extras).
    pub column_names: Vec<String>,
    /// Sorted distinct teams.
    pub teams: BTreeSet<String>,
    /// Sorted distinct positions.
    pub positions: BTreeSet<String>,
}

impl Dataset {
    /// Build a dataset whose columns are the core columns followed by any
    /// extra columns in first-seen order.
    pub fn from_records(records: Vec<Record>) -> Self {
        let mut column_names: Vec<String> = CORE_COLUMNS.iter().map(|c| c.to_string()).collect();
        for rec in &records {
            for col in rec.extra.keys() {
                if !column_names.contains(col) {
                    column_names.push(col.clone());
                }
            }
        }
        Self::with_columns(records, column_names)
    }

    /// Build a dataset keeping the caller's column order.
    pub fn with_columns(records: Vec<Record>, column_names: Vec<String>) -> Self {
        let teams = records.iter().map(|r| r.team.clone()).collect();
        let positions = records.iter().map(|r| r.position.clone()).collect();
        Dataset {
            records,
            column_names,
            teams,
            positions,
        }
    }

    /// Distinct values of a filterable column.
    pub fn universe(&self, column: CategoryColumn) -> &BTreeSet<String> {
        match column {
            CategoryColumn::Team => &self.teams,
            CategoryColumn::Position => &self.positions,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
