use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Arc;

use arrow::array::{ArrayRef, BooleanArray, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use rust_xlsxwriter::Workbook;
use serde_json::{Map, Value as JsonValue};

use crate::data::filter::FilteredView;
use crate::data::loader::TableFormat;
use crate::data::model::CellValue;
use crate::error::{AnalyticsError, Result};

// ---------------------------------------------------------------------------
// Delimited text
// ---------------------------------------------------------------------------

/// Header row with every dataset column, then one line per record of the
/// view, in view order.
pub fn write_delimited<W: Write>(view: &FilteredView<'_>, writer: W, delimiter: u8) -> Result<()> {
    let columns = &view.dataset().column_names;
    let mut out = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(writer);

    out.write_record(columns).map_err(export_err)?;
    for rec in view.iter() {
        out.write_record(columns.iter().map(|c| rec.cell(c).to_string()))
            .map_err(export_err)?;
    }
    out.flush()?;
    Ok(())
}

// ---------------------------------------------------------------------------
// JSON
// ---------------------------------------------------------------------------

/// Records-oriented JSON array keyed by column name.
pub fn write_json<W: Write>(view: &FilteredView<'_>, writer: W) -> Result<()> {
    let columns = &view.dataset().column_names;
    let rows: Vec<JsonValue> = view
        .iter()
        .map(|rec| {
            let obj: Map<String, JsonValue> = columns
                .iter()
                .map(|c| (c.clone(), cell_to_json(rec.cell(c))))
                .collect();
            JsonValue::Object(obj)
        })
        .collect();
    serde_json::to_writer_pretty(writer, &rows).map_err(export_err)
}

fn cell_to_json(cell: CellValue) -> JsonValue {
    match cell {
        CellValue::Integer(i) => JsonValue::from(i),
        CellValue::Float(f) => JsonValue::from(f),
        CellValue::Bool(b) => JsonValue::Bool(b),
        CellValue::String(s) => JsonValue::String(s),
        CellValue::Null => JsonValue::Null,
    }
}

// ---------------------------------------------------------------------------
// Arrow / Parquet
// ---------------------------------------------------------------------------

/// Column type chosen for an Arrow export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnKind {
    Int,
    Float,
    Bool,
    Text,
}

/// Widen the kind so every non-null cell of the column fits.
fn infer_kind(cells: &[CellValue]) -> ColumnKind {
    let mut kind: Option<ColumnKind> = None;
    for cell in cells {
        let this = match cell {
            CellValue::Null => continue,
            CellValue::Integer(_) => ColumnKind::Int,
            CellValue::Float(_) => ColumnKind::Float,
            CellValue::Bool(_) => ColumnKind::Bool,
            CellValue::String(_) => ColumnKind::Text,
        };
        kind = Some(match (kind, this) {
            (None, k) => k,
            (Some(a), b) if a == b => a,
            (Some(ColumnKind::Int), ColumnKind::Float) | (Some(ColumnKind::Float), ColumnKind::Int) => {
                ColumnKind::Float
            }
            _ => ColumnKind::Text,
        });
    }
    kind.unwrap_or(ColumnKind::Text)
}

/// The view as a single Arrow record batch, one column per dataset column.
pub fn to_record_batch(view: &FilteredView<'_>) -> Result<RecordBatch> {
    let columns = &view.dataset().column_names;
    let mut fields = Vec::with_capacity(columns.len());
    let mut arrays: Vec<ArrayRef> = Vec::with_capacity(columns.len());

    for name in columns {
        let cells: Vec<CellValue> = view.iter().map(|rec| rec.cell(name)).collect();
        let (data_type, array): (DataType, ArrayRef) = match infer_kind(&cells) {
            ColumnKind::Int => (
                DataType::Int64,
                Arc::new(Int64Array::from_iter(cells.iter().map(|c| match c {
                    CellValue::Integer(i) => Some(*i),
                    _ => None,
                }))) as ArrayRef,
            ),
            ColumnKind::Float => (
                DataType::Float64,
                Arc::new(Float64Array::from_iter(cells.iter().map(CellValue::as_f64))) as ArrayRef,
            ),
            ColumnKind::Bool => (
                DataType::Boolean,
                Arc::new(BooleanArray::from_iter(cells.iter().map(|c| match c {
                    CellValue::Bool(b) => Some(*b),
                    _ => None,
                }))) as ArrayRef,
            ),
            ColumnKind::Text => (
                DataType::Utf8,
                Arc::new(StringArray::from_iter(cells.iter().map(|c| match c {
                    CellValue::Null => None,
                    other => Some(other.to_string()),
                }))) as ArrayRef,
            ),
        };
        fields.push(Field::new(name.as_str(), data_type, true));
        arrays.push(array);
    }

    let schema = Arc::new(Schema::new(fields));
    RecordBatch::try_new(schema, arrays).map_err(export_err)
}

/// Write the view as a Parquet file with one record batch.
pub fn write_parquet<W: Write + Send>(view: &FilteredView<'_>, writer: W) -> Result<()> {
    let batch = to_record_batch(view)?;
    let mut out = ArrowWriter::try_new(writer, batch.schema(), None).map_err(export_err)?;
    out.write(&batch).map_err(export_err)?;
    out.close().map_err(export_err)?;
    Ok(())
}

/// Render the view as a boxed text table.
pub fn pretty_table(view: &FilteredView<'_>) -> Result<String> {
    let batch = to_record_batch(view)?;
    arrow::util::pretty::pretty_format_batches(&[batch])
        .map(|table| table.to_string())
        .map_err(export_err)
}

// ---------------------------------------------------------------------------
// Excel
// ---------------------------------------------------------------------------

/// Single-sheet workbook with a header row; numbers stay numeric.
pub fn write_xlsx<W: Write>(view: &FilteredView<'_>, mut writer: W) -> Result<()> {
    let columns = &view.dataset().column_names;
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name("Players").map_err(export_err)?;

    for (col_idx, name) in columns.iter().enumerate() {
        sheet
            .write_string(0, col_idx as u16, name.as_str())
            .map_err(export_err)?;
    }
    for (row_idx, rec) in view.iter().enumerate() {
        let row = row_idx as u32 + 1;
        for (col_idx, name) in columns.iter().enumerate() {
            let col = col_idx as u16;
            let written = match rec.cell(name) {
                CellValue::Integer(i) => sheet.write_number(row, col, i as f64),
                CellValue::Float(f) => sheet.write_number(row, col, f),
                CellValue::Bool(b) => sheet.write_boolean(row, col, b),
                CellValue::String(s) => sheet.write_string(row, col, s.as_str()),
                CellValue::Null => continue,
            };
            written.map_err(export_err)?;
        }
    }

    let buffer = workbook.save_to_buffer().map_err(export_err)?;
    writer.write_all(&buffer)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

/// Write the view to `path`, choosing the format from its extension.
/// `delimiter` applies to CSV output only.
pub fn export_to_path(view: &FilteredView<'_>, path: &Path, delimiter: u8) -> Result<TableFormat> {
    let unsupported = || AnalyticsError::UnsupportedFormat(path.display().to_string());
    let format = TableFormat::from_path(path).ok_or_else(unsupported)?;
    // Legacy and macro-enabled workbook extensions can be read but not written.
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    if format == TableFormat::Xlsx && extension.as_deref() != Some("xlsx") {
        return Err(unsupported());
    }
    let mut file = BufWriter::new(File::create(path)?);
    match format {
        TableFormat::Csv => write_delimited(view, &mut file, delimiter)?,
        TableFormat::Json => write_json(view, &mut file)?,
        TableFormat::Parquet => write_parquet(view, &mut file)?,
        TableFormat::Xlsx => write_xlsx(view, &mut file)?,
    }
    file.flush()?;
    log::info!("Exported {} players to {} ({format})", view.len(), path.display());
    Ok(format)
}

fn export_err(e: impl std::fmt::Display) -> AnalyticsError {
    AnalyticsError::Export(e.to_string())
}
