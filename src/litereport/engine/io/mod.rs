//! Spreadsheet adapters and the canonical report layout they share.

pub mod excel_read;
pub mod excel_write;

use std::path::{Path, PathBuf};

use crate::litereport::engine::error::{ReportError, Result};

/// Sheet name holding the canonical report.
pub const REPORT_SHEET: &str = "Report";
/// Header of the key column.
pub const ARTICLE_HEADER: &str = "Article";
/// Header of the description column.
pub const DESCRIPTION_HEADER: &str = "Description";
/// Header of the quantity column.
pub const QUANTITY_HEADER: &str = "Quantity";
/// Number of columns preceding the auxiliary columns.
pub const FIXED_COLUMNS: usize = 3;

const OUTPUT_EXTENSION: &str = "xlsx";
const INPUT_EXTENSIONS: [&str; 2] = ["xlsx", "xls"];

/// Forces the `.xlsx` extension on a destination path. A missing extension
/// is appended, any other extension is replaced.
pub fn normalize_output_path(path: &Path) -> PathBuf {
    let mut normalized = path.to_path_buf();
    let already_xlsx = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(OUTPUT_EXTENSION));
    if !already_xlsx {
        normalized.set_extension(OUTPUT_EXTENSION);
    }
    normalized
}

/// Checks that a retailer export is a workbook type the reader understands.
pub fn ensure_input_extension(path: &Path) -> Result<()> {
    let supported = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            INPUT_EXTENSIONS
                .iter()
                .any(|candidate| ext.eq_ignore_ascii_case(candidate))
        });
    if supported {
        Ok(())
    } else {
        Err(ReportError::UnsupportedExtension {
            path: path.to_path_buf(),
            expected: ".xlsx or .xls",
        })
    }
}
