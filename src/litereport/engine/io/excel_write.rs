use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_xlsxwriter::{Format, Workbook};
use tempfile::NamedTempFile;
use tracing::{debug, instrument, warn};

use crate::litereport::engine::error::{ReportError, Result};
use crate::litereport::engine::io::{
    ARTICLE_HEADER, DESCRIPTION_HEADER, FIXED_COLUMNS, QUANTITY_HEADER, REPORT_SHEET,
};
use crate::litereport::engine::model::{CellValue, RecordSet};

/// A fully written report waiting next to its destination.
///
/// Dropping a staged report without committing removes the temporary file
/// and leaves the destination untouched.
#[derive(Debug)]
pub struct StagedReport {
    target: PathBuf,
    file: NamedTempFile,
}

impl StagedReport {
    /// Destination the staged file will replace.
    pub fn target(&self) -> &Path {
        &self.target
    }

    /// Renames the staged file over the destination.
    #[instrument(level = "debug", skip_all, fields(output = %self.target.display()))]
    pub fn commit(self) -> Result<()> {
        let StagedReport { target, file } = self;
        file.persist(&target)
            .map_err(|error| ReportError::file_access(&target, error.error))?;
        debug!("staged report committed");
        Ok(())
    }
}

/// Writes the records to `path`, replacing any existing file atomically.
pub fn write_report(path: &Path, records: &RecordSet) -> Result<()> {
    stage_report(path, records)?.commit()
}

/// Serialises the records into a temporary file in the destination
/// directory. Nothing is visible at `path` until [`StagedReport::commit`].
#[instrument(level = "debug", skip(records), fields(output = %path.display(), records = records.len()))]
pub fn stage_report(path: &Path, records: &RecordSet) -> Result<StagedReport> {
    let bytes = render_report(records)?;

    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&directory).map_err(|error| ReportError::file_access(&directory, error))?;

    let mut file = tempfile::Builder::new()
        .prefix(".lite-report-")
        .suffix(".xlsx.tmp")
        .tempfile_in(&directory)
        .map_err(|error| ReportError::file_access(&directory, error))?;
    file.write_all(&bytes)
        .and_then(|()| file.as_file().sync_all())
        .map_err(|error| ReportError::file_access(file.path(), error))?;

    debug!(bytes = bytes.len(), temp = %file.path().display(), "report staged");
    Ok(StagedReport {
        target: path.to_path_buf(),
        file,
    })
}

/// Converts a quantity to the `f64` stored in the workbook, or `None` when
/// the conversion would not read back as the same decimal.
pub fn exact_f64(quantity: Decimal) -> Option<f64> {
    let value = quantity.to_f64()?;
    (Decimal::from_f64(value) == Some(quantity)).then_some(value)
}

/// Renders the canonical workbook: a bold frozen header row followed by one
/// row per item, auxiliary columns in sorted order.
///
/// Quantities are numeric cells, so they carry `f64` precision: about 15
/// significant digits. Anything finer is rounded to the nearest `f64` and
/// logged.
pub fn render_report(records: &RecordSet) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();
    let auxiliary_columns = records.auxiliary_columns();

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(REPORT_SHEET)?;

    let headers = [ARTICLE_HEADER, DESCRIPTION_HEADER, QUANTITY_HEADER]
        .into_iter()
        .chain(auxiliary_columns.iter().map(String::as_str));
    for (col_idx, header) in headers.enumerate() {
        worksheet.write_string_with_format(0, col_idx as u16, header, &header_format)?;
    }
    worksheet.set_freeze_panes(1, 0)?;

    for (row_idx, item) in records.iter().enumerate() {
        let row = (row_idx + 1) as u32;
        worksheet.write_string(row, 0, &item.key)?;
        if !item.description.is_empty() {
            worksheet.write_string(row, 1, &item.description)?;
        }
        let quantity = exact_f64(item.quantity).unwrap_or_else(|| {
            let rounded = item.quantity.to_f64().unwrap_or_default();
            warn!(
                key = %item.key,
                quantity = %item.quantity,
                rounded,
                "quantity rounded to f64 precision"
            );
            rounded
        });
        worksheet.write_number(row, 2, quantity)?;

        for (offset, column) in auxiliary_columns.iter().enumerate() {
            let col = (FIXED_COLUMNS + offset) as u16;
            match item.auxiliary.get(column) {
                Some(CellValue::Text(value)) => {
                    worksheet.write_string(row, col, value)?;
                }
                Some(CellValue::Number(value)) => {
                    worksheet.write_number(row, col, *value)?;
                }
                Some(CellValue::Boolean(value)) => {
                    worksheet.write_boolean(row, col, *value)?;
                }
                Some(CellValue::Empty) | None => {}
            }
        }
    }

    Ok(workbook.save_to_buffer()?)
}
