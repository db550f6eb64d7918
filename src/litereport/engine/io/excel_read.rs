use std::io::ErrorKind as IoErrorKind;
use std::path::Path;

use calamine::{DataType, Range, Reader, open_workbook_auto};
use rust_decimal::Decimal;
use tracing::{debug, instrument, warn};

use crate::litereport::engine::error::{ReportError, Result};
use crate::litereport::engine::io::{
    ARTICLE_HEADER, DESCRIPTION_HEADER, FIXED_COLUMNS, QUANTITY_HEADER, REPORT_SHEET,
};
use crate::litereport::engine::model::{CellValue, DuplicateKeyPolicy, LineItem, RawRow, RecordSet};

static EMPTY_CELL: CellValue = CellValue::Empty;

/// Reads every row of a worksheet as raw cells anchored at cell A1.
///
/// `sheet` selects a worksheet by name; `None` reads the first worksheet.
#[instrument(
    level = "debug",
    skip_all,
    fields(path = %path.display(), sheet = sheet.unwrap_or("<first>"))
)]
pub fn read_rows(path: &Path, sheet: Option<&str>) -> Result<Vec<RawRow>> {
    match path.try_exists() {
        Ok(true) => {}
        Ok(false) => {
            return Err(ReportError::file_access(
                path,
                std::io::Error::from(IoErrorKind::NotFound),
            ));
        }
        Err(error) => return Err(ReportError::file_access(path, error)),
    }

    let mut workbook =
        open_workbook_auto(path).map_err(|error| ReportError::invalid_workbook(path, error))?;
    let range_result = match sheet {
        Some(name) => workbook.worksheet_range(name).ok_or_else(|| {
            ReportError::invalid_workbook(path, format!("missing sheet '{name}'"))
        })?,
        None => workbook
            .worksheet_range_at(0)
            .ok_or_else(|| ReportError::NoWorksheet(path.to_path_buf()))?,
    };
    let range = range_result.map_err(|error| ReportError::invalid_workbook(path, error))?;

    let rows = anchored_rows(&range);
    debug!(row_count = rows.len(), "worksheet loaded");
    Ok(rows)
}

/// Reads a canonical report workbook. A path that does not exist yet yields
/// an empty set so the first report can create the destination.
#[instrument(level = "debug", skip_all, fields(path = %path.display()))]
pub fn read_report(path: &Path) -> Result<RecordSet> {
    let exists = path
        .try_exists()
        .map_err(|error| ReportError::file_access(path, error))?;
    if !exists {
        debug!("destination does not exist yet");
        return Ok(RecordSet::new());
    }

    let rows = read_rows(path, Some(REPORT_SHEET))?;
    let mut rows = rows.into_iter().enumerate();

    let headers: Vec<String> = match rows.next() {
        Some((_, header_row)) => header_row.iter().map(CellValue::to_raw_text).collect(),
        None => return Ok(RecordSet::new()),
    };
    validate_headers(path, &headers)?;

    let mut records = RecordSet::new();
    for (row_idx, row) in rows {
        let row_number = row_idx + 1;
        let key = cell_at(&row, 0).to_raw_text();
        if key.trim().is_empty() {
            continue;
        }

        let description = cell_at(&row, 1).to_raw_text();
        let quantity = cell_at(&row, 2).to_quantity().unwrap_or_else(|| {
            warn!(row = row_number, %key, "non-numeric quantity treated as zero");
            Decimal::ZERO
        });

        let mut item = LineItem::new(key, description, quantity);
        for (col_idx, cell) in row.into_iter().enumerate().skip(FIXED_COLUMNS) {
            let header = headers.get(col_idx).cloned().unwrap_or_default();
            if header.trim().is_empty() {
                continue;
            }
            item.insert_auxiliary(header, cell);
        }

        records.insert_row(item, row_number, DuplicateKeyPolicy::Reject)?;
    }

    debug!(record_count = records.len(), "report read");
    Ok(records)
}

/// Returns the cell at `col_idx`, treating cells past the end of the row as
/// empty.
pub fn cell_at(row: &[CellValue], col_idx: usize) -> &CellValue {
    row.get(col_idx).unwrap_or(&EMPTY_CELL)
}

fn validate_headers(path: &Path, headers: &[String]) -> Result<()> {
    let expected = [ARTICLE_HEADER, DESCRIPTION_HEADER, QUANTITY_HEADER];
    for (position, name) in expected.iter().enumerate() {
        let found = headers
            .get(position)
            .map(|header| header.trim())
            .unwrap_or_default();
        if !found.eq_ignore_ascii_case(name) {
            return Err(ReportError::invalid_workbook(
                path,
                format!("expected column '{name}' at position {}, found '{found}'", position + 1),
            ));
        }
    }
    Ok(())
}

fn anchored_rows(range: &Range<DataType>) -> Vec<RawRow> {
    let (first_row, first_col) = match range.start() {
        Some((row, col)) => (row as usize, col as usize),
        None => return Vec::new(),
    };

    let mut rows: Vec<RawRow> = vec![Vec::new(); first_row];
    for row in range.rows() {
        let mut cells = vec![CellValue::Empty; first_col];
        cells.extend(row.iter().map(cell_value));
        rows.push(cells);
    }
    rows
}

fn cell_value(cell: &DataType) -> CellValue {
    match cell {
        DataType::String(value) => CellValue::Text(value.clone()),
        DataType::Float(value) => CellValue::Number(*value),
        DataType::Int(value) => CellValue::Number(*value as f64),
        DataType::Bool(value) => CellValue::Boolean(*value),
        DataType::Empty => CellValue::Empty,
        other => CellValue::Text(other.to_string()),
    }
}
