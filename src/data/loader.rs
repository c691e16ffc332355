use std::collections::BTreeMap;
use std::fmt;
use std::io::Cursor;
use std::path::Path;
use std::str::FromStr;

use anyhow::{anyhow, bail, Context, Result};
use arrow::array::{Array, ArrayRef, AsArray};
use arrow::datatypes::{DataType, Float32Type, Float64Type, Int32Type, Int64Type, UInt32Type, UInt64Type};
use calamine::{open_workbook_auto_from_rs, Data, Reader};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{normalize_header, CellValue, Dataset, Record};
use crate::error::AnalyticsError;

// ---------------------------------------------------------------------------
// Formats
// ---------------------------------------------------------------------------

/// Tabular formats a player table can be read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableFormat {
    Csv,
    /// Excel workbooks (.xlsx, .xls, .xlsm, .xlsb); the first sheet is read.
    Xlsx,
    /// Records-oriented JSON: `[{ "Player": ..., "Team": ... }, ...]`
    Json,
    Parquet,
}

impl TableFormat {
    /// Detect the format from a path's extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }

    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "csv" => Some(Self::Csv),
            "xlsx" | "xls" | "xlsm" | "xlsb" => Some(Self::Xlsx),
            "json" => Some(Self::Json),
            "parquet" | "pq" => Some(Self::Parquet),
            _ => None,
        }
    }
}

impl fmt::Display for TableFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TableFormat::Csv => "csv",
            TableFormat::Xlsx => "xlsx",
            TableFormat::Json => "json",
            TableFormat::Parquet => "parquet",
        };
        f.write_str(name)
    }
}

impl FromStr for TableFormat {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::from_extension(s.trim_start_matches('.'))
            .ok_or_else(|| AnalyticsError::UnsupportedFormat(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Parse raw file contents in the given format.
pub fn parse_bytes(raw: &[u8], format: TableFormat) -> Result<Dataset> {
    let table = match format {
        TableFormat::Csv => read_csv(raw)?,
        TableFormat::Xlsx => read_xlsx(raw)?,
        TableFormat::Json => read_json(raw)?,
        TableFormat::Parquet => read_parquet(raw)?,
    };
    table.into_dataset()
}

// ---------------------------------------------------------------------------
// RawTable – format-independent intermediate
// ---------------------------------------------------------------------------

/// Header row plus cells, before the player columns are validated.
///
/// Text cells hold the source text verbatim. When `untyped` is set (CSV)
/// every non-empty cell is text and extra columns get their type guessed.
struct RawTable {
    headers: Vec<String>,
    rows: Vec<Vec<CellValue>>,
    untyped: bool,
}

static NULL_CELL: CellValue = CellValue::Null;

/// Position of each required column in the header row.
struct CoreIndex {
    player: usize,
    team: usize,
    position: usize,
    goals: usize,
    assists: usize,
    passes: usize,
    pass_accuracy: usize,
    tackles: usize,
    interceptions: usize,
}

impl RawTable {
    fn column(&self, key: &str) -> Result<usize> {
        self.headers
            .iter()
            .position(|h| normalize_header(h) == key)
            .with_context(|| format!("missing required column '{key}'"))
    }

    fn core_index(&self) -> Result<CoreIndex> {
        Ok(CoreIndex {
            player: self.column("player")?,
            team: self.column("team")?,
            position: self.column("position")?,
            goals: self.column("goals")?,
            assists: self.column("assists")?,
            passes: self.column("passes")?,
            pass_accuracy: self.column("pass_accuracy")?,
            tackles: self.column("tackles")?,
            interceptions: self.column("interceptions")?,
        })
    }

    fn into_dataset(self) -> Result<Dataset> {
        if self.headers.is_empty() {
            bail!("no header row");
        }
        let idx = self.core_index()?;
        let core = [
            idx.player,
            idx.team,
            idx.position,
            idx.goals,
            idx.assists,
            idx.passes,
            idx.pass_accuracy,
            idx.tackles,
            idx.interceptions,
        ];

        let mut records = Vec::with_capacity(self.rows.len());
        for (row_no, row) in self.rows.iter().enumerate() {
            let cell = |i: usize| row.get(i).unwrap_or(&NULL_CELL);
            let header = |i: usize| self.headers[i].as_str();

            let mut extra = BTreeMap::new();
            for (col_idx, value) in row.iter().enumerate() {
                if core.contains(&col_idx) || col_idx >= self.headers.len() {
                    continue;
                }
                let value = match value {
                    CellValue::String(s) if self.untyped => CellValue::guess(s),
                    other => other.clone(),
                };
                extra.insert(self.headers[col_idx].clone(), value);
            }

            records.push(Record {
                player: text(cell(idx.player), row_no, header(idx.player))?,
                team: text(cell(idx.team), row_no, header(idx.team))?,
                position: text(cell(idx.position), row_no, header(idx.position))?,
                goals: count(cell(idx.goals), row_no, header(idx.goals))?,
                assists: count(cell(idx.assists), row_no, header(idx.assists))?,
                passes: count(cell(idx.passes), row_no, header(idx.passes))?,
                pass_accuracy: percentage(
                    cell(idx.pass_accuracy),
                    row_no,
                    header(idx.pass_accuracy),
                )?,
                tackles: count(cell(idx.tackles), row_no, header(idx.tackles))?,
                interceptions: count(cell(idx.interceptions), row_no, header(idx.interceptions))?,
                extra,
            });
        }

        Ok(Dataset::with_columns(records, self.headers))
    }
}

/// Identifier and category cells keep their source text, so `"007"` and
/// `"7"` stay distinct.
fn text(value: &CellValue, row: usize, col: &str) -> Result<String> {
    match value {
        CellValue::Null => bail!("row {row}: '{col}' is empty"),
        CellValue::String(s) => Ok(s.clone()),
        other => Ok(other.to_string()),
    }
}

/// Numeric view of a cell; text is parsed the way CSV cells are guessed.
fn numeric(value: &CellValue) -> CellValue {
    match value {
        CellValue::String(s) => CellValue::guess(s.trim()),
        other => other.clone(),
    }
}

fn count(value: &CellValue, row: usize, col: &str) -> Result<u32> {
    let n = match numeric(value) {
        CellValue::Integer(i) => i as f64,
        CellValue::Float(f) if f.fract() == 0.0 => f,
        other => bail!("row {row}: '{col}' must be a whole number, got '{other}'"),
    };
    if !(0.0..=f64::from(u32::MAX)).contains(&n) {
        bail!("row {row}: '{col}' must be non-negative, got {n}");
    }
    Ok(n as u32)
}

fn percentage(value: &CellValue, row: usize, col: &str) -> Result<f64> {
    let v = numeric(value)
        .as_f64()
        .with_context(|| format!("row {row}: '{col}' must be a number, got '{value}'"))?;
    if !v.is_finite() || !(0.0..=100.0).contains(&v) {
        bail!("row {row}: '{col}' must be a percentage in [0, 100], got {v}");
    }
    Ok(v)
}

fn header_name(raw: &str, col_idx: usize) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        format!("column_{}", col_idx + 1)
    } else {
        trimmed.to_string()
    }
}

// ---------------------------------------------------------------------------
// CSV reader
// ---------------------------------------------------------------------------

/// Header row with column names, one player per line. Cells stay text until
/// their column is known.
fn read_csv(raw: &[u8]) -> Result<RawTable> {
    let mut reader = csv::ReaderBuilder::new().from_reader(raw);
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .enumerate()
        .map(|(i, h)| header_name(h.trim_start_matches('\u{feff}'), i))
        .collect();

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        rows.push(
            record
                .iter()
                .map(|s| match s {
                    "" => CellValue::Null,
                    s => CellValue::String(s.to_string()),
                })
                .collect(),
        );
    }

    Ok(RawTable {
        headers,
        rows,
        untyped: true,
    })
}

// ---------------------------------------------------------------------------
// Excel reader
// ---------------------------------------------------------------------------

/// First worksheet; first row is the header.
fn read_xlsx(raw: &[u8]) -> Result<RawTable> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(raw.to_vec()))
        .map_err(|e| anyhow!("opening workbook: {e}"))?;
    let range = workbook
        .worksheet_range_at(0)
        .context("workbook has no worksheets")?
        .map_err(|e| anyhow!("reading first worksheet: {e}"))?;

    let mut rows_iter = range.rows();
    let headers: Vec<String> = match rows_iter.next() {
        Some(first) => first
            .iter()
            .enumerate()
            .map(|(i, c)| header_name(&c.to_string(), i))
            .collect(),
        None => Vec::new(),
    };
    let rows = rows_iter
        .map(|r| r.iter().map(excel_to_cell).collect())
        .collect();

    Ok(RawTable {
        headers,
        rows,
        untyped: false,
    })
}

fn excel_to_cell(data: &Data) -> CellValue {
    match data {
        Data::Int(i) => CellValue::Integer(*i),
        Data::Float(f) => CellValue::Float(*f),
        Data::String(s) => CellValue::String(s.clone()),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::Empty => CellValue::Null,
        other => CellValue::String(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// JSON reader
// ---------------------------------------------------------------------------

/// Records-oriented JSON, as written by `df.to_json(orient='records')`.
fn read_json(raw: &[u8]) -> Result<RawTable> {
    let root: JsonValue = serde_json::from_slice(raw).context("parsing JSON")?;
    let records = root.as_array().context("expected top-level JSON array")?;

    let mut headers: Vec<String> = Vec::new();
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("row {i} is not a JSON object"))?;
        for key in obj.keys() {
            if !headers.contains(key) {
                headers.push(key.clone());
            }
        }
    }

    let rows = records
        .iter()
        .filter_map(|rec| rec.as_object())
        .map(|obj| {
            headers
                .iter()
                .map(|h| obj.get(h).map(json_to_cell).unwrap_or(CellValue::Null))
                .collect()
        })
        .collect();

    Ok(RawTable {
        headers,
        rows,
        untyped: false,
    })
}

fn json_to_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::String(s) => CellValue::String(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                CellValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                CellValue::Float(f)
            } else {
                CellValue::String(n.to_string())
            }
        }
        JsonValue::Bool(b) => CellValue::Bool(*b),
        JsonValue::Null => CellValue::Null,
        other => CellValue::String(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet reader
// ---------------------------------------------------------------------------

/// Flat Parquet file, one column per field. Works with files written by
/// Pandas (`df.to_parquet()`), Polars and our own exporter.
fn read_parquet(raw: &[u8]) -> Result<RawTable> {
    let builder = ParquetRecordBatchReaderBuilder::try_new(bytes::Bytes::from(raw.to_vec()))
        .context("reading parquet metadata")?;
    let headers: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build().context("building parquet reader")?;

    let mut rows = Vec::new();
    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        for row in 0..batch.num_rows() {
            rows.push(
                batch
                    .columns()
                    .iter()
                    .map(|col| arrow_to_cell(col, row))
                    .collect(),
            );
        }
    }

    Ok(RawTable {
        headers,
        rows,
        untyped: false,
    })
}

/// Extract a single cell from an Arrow column at a given row.
fn arrow_to_cell(col: &ArrayRef, row: usize) -> CellValue {
    if col.is_null(row) {
        return CellValue::Null;
    }
    match col.data_type() {
        DataType::Utf8 => CellValue::String(col.as_string::<i32>().value(row).to_string()),
        DataType::LargeUtf8 => CellValue::String(col.as_string::<i64>().value(row).to_string()),
        DataType::Int32 => CellValue::Integer(i64::from(col.as_primitive::<Int32Type>().value(row))),
        DataType::Int64 => CellValue::Integer(col.as_primitive::<Int64Type>().value(row)),
        DataType::UInt32 => CellValue::Integer(i64::from(col.as_primitive::<UInt32Type>().value(row))),
        DataType::UInt64 => match i64::try_from(col.as_primitive::<UInt64Type>().value(row)) {
            Ok(v) => CellValue::Integer(v),
            Err(_) => CellValue::Float(col.as_primitive::<UInt64Type>().value(row) as f64),
        },
        DataType::Float32 => CellValue::Float(f64::from(col.as_primitive::<Float32Type>().value(row))),
        DataType::Float64 => CellValue::Float(col.as_primitive::<Float64Type>().value(row)),
        DataType::Boolean => CellValue::Bool(col.as_boolean().value(row)),
        _ => match arrow::util::display::array_value_to_string(col, row) {
            Ok(s) => CellValue::String(s),
            Err(_) => CellValue::String(format!("{:?}", col.data_type())),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "Player,Team,Position,Goals,Assists,Passes,Pass_Accuracy,Tackles,Interceptions";

    #[test]
    fn csv_with_extra_columns() {
        let csv = format!("{HEADER},Foot\nAlice,Team A,Forward,5,2,900,81.5,20,11,left\n");
        let ds = parse_bytes(csv.as_bytes(), TableFormat::Csv).unwrap();
        assert_eq!(ds.len(), 1);
        let rec = &ds.records[0];
        assert_eq!(rec.player, "Alice");
        assert_eq!(rec.goals, 5);
        assert_eq!(rec.pass_accuracy, 81.5);
        assert_eq!(rec.extra.get("Foot"), Some(&CellValue::String("left".into())));
        assert_eq!(ds.column_names.last().map(String::as_str), Some("Foot"));
    }

    #[test]
    fn headers_match_loosely() {
        let csv = "player,TEAM,position,goals,assists,passes,Pass Accuracy,tackles,interceptions\n\
                   Bob,Team B,Defender,1.0,0,600,70,40,33\n";
        let ds = parse_bytes(csv.as_bytes(), TableFormat::Csv).unwrap();
        assert_eq!(ds.records[0].goals, 1);
        assert_eq!(ds.records[0].pass_accuracy, 70.0);
    }

    #[test]
    fn header_only_is_empty_dataset() {
        let ds = parse_bytes(format!("{HEADER}\n").as_bytes(), TableFormat::Csv).unwrap();
        assert!(ds.is_empty());
        assert!(ds.teams.is_empty());
    }

    #[test]
    fn numeric_looking_names_keep_their_text() {
        let csv = format!(
            "{HEADER},Shirt\n\
             007,01,Forward,5,2,900,81.5,20,11,09\n\
             1e3,1,Forward,3,1,700,70,15,10,10\n"
        );
        let ds = parse_bytes(csv.as_bytes(), TableFormat::Csv).unwrap();
        let players: Vec<&str> = ds.records.iter().map(|r| r.player.as_str()).collect();
        assert_eq!(players, vec!["007", "1e3"]);
        let teams: Vec<&str> = ds.teams.iter().map(String::as_str).collect();
        assert_eq!(teams, vec!["01", "1"]);
        assert_eq!(ds.records[0].extra.get("Shirt"), Some(&CellValue::Integer(9)));
    }

    #[test]
    fn rejects_missing_column() {
        let err = parse_bytes(b"Player,Team\nA,B\n", TableFormat::Csv).unwrap_err();
        assert!(format!("{err:#}").contains("missing required column"));
    }

    #[test]
    fn rejects_empty_input() {
        assert!(parse_bytes(b"", TableFormat::Csv).is_err());
    }

    #[test]
    fn rejects_bad_numbers() {
        let negative = format!("{HEADER}\nA,T,F,-1,0,0,50,0,0\n");
        assert!(parse_bytes(negative.as_bytes(), TableFormat::Csv).is_err());
        let fractional = format!("{HEADER}\nA,T,F,1.5,0,0,50,0,0\n");
        assert!(parse_bytes(fractional.as_bytes(), TableFormat::Csv).is_err());
        let accuracy = format!("{HEADER}\nA,T,F,1,0,0,120,0,0\n");
        assert!(parse_bytes(accuracy.as_bytes(), TableFormat::Csv).is_err());
    }

    #[test]
    fn ragged_csv_is_an_error() {
        let csv = format!("{HEADER}\nA,T,F,1\n");
        assert!(parse_bytes(csv.as_bytes(), TableFormat::Csv).is_err());
    }

    #[test]
    fn json_records() {
        let json = r#"[
            {"Player": "Cara", "Team": "Team C", "Position": "Midfielder",
             "Goals": 3, "Assists": 7, "Passes": 1500, "Pass_Accuracy": 88.25,
             "Tackles": 45, "Interceptions": 30, "Age": 27}
        ]"#;
        let ds = parse_bytes(json.as_bytes(), TableFormat::Json).unwrap();
        assert_eq!(ds.records[0].assists, 7);
        assert_eq!(ds.records[0].extra.get("Age"), Some(&CellValue::Integer(27)));
    }

    #[test]
    fn garbage_xlsx_is_an_error() {
        assert!(parse_bytes(b"definitely not a workbook", TableFormat::Xlsx).is_err());
    }

    #[test]
    fn format_detection() {
        assert_eq!(TableFormat::from_path(Path::new("a/b.XLSX")), Some(TableFormat::Xlsx));
        assert_eq!("csv".parse::<TableFormat>().unwrap(), TableFormat::Csv);
        assert_eq!(".pq".parse::<TableFormat>().unwrap(), TableFormat::Parquet);
        assert!("txt".parse::<TableFormat>().is_err());
    }
}
