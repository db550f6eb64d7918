//! Retailer export layouts and the parsers that turn their rows into
//! canonical records.

mod technomarket;
mod technopolis;

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

use crate::litereport::engine::error::{ReportError, Result};
use crate::litereport::engine::io::excel_read::cell_at;
use crate::litereport::engine::model::{DuplicateKeyPolicy, LineItem, RawRow, RecordSet};

pub use technomarket::TechnomarketParser;
pub use technopolis::TechnopolisParser;

/// Retailer whose export layout the input follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Store {
    Technopolis,
    Technomarket,
}

impl Store {
    /// Returns the parser for this retailer's layout.
    pub fn parser(self) -> &'static dyn RetailerParser {
        match self {
            Store::Technopolis => &TechnopolisParser,
            Store::Technomarket => &TechnomarketParser,
        }
    }
}

impl fmt::Display for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Store::Technopolis => write!(f, "Technopolis"),
            Store::Technomarket => write!(f, "Technomarket"),
        }
    }
}

/// Fixed column positions of a retailer export. Columns are zero based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnLayout {
    /// Title, period and caption rows preceding the data.
    pub header_rows: usize,
    pub key: usize,
    pub description: usize,
    pub quantity: usize,
    /// Extra columns carried into the report, as `(column, header)`.
    pub auxiliary: &'static [(usize, &'static str)],
}

impl ColumnLayout {
    /// Minimum row width needed to read key, description and quantity.
    pub fn required_width(&self) -> usize {
        self.key.max(self.description).max(self.quantity) + 1
    }
}

/// Converts the raw rows of one retailer export into canonical records.
pub trait RetailerParser: Send + Sync {
    /// Column layout of the export.
    fn layout(&self) -> &ColumnLayout;

    /// Returns `true` when the row with this key closes the data block.
    fn is_terminator(&self, _key: &str) -> bool {
        false
    }

    /// Parses `rows`, applying `duplicates` when a key repeats.
    fn parse(&self, rows: &[RawRow], duplicates: DuplicateKeyPolicy) -> Result<RecordSet> {
        parse_with_layout(self, rows, duplicates)
    }
}

fn parse_with_layout<P>(
    parser: &P,
    rows: &[RawRow],
    duplicates: DuplicateKeyPolicy,
) -> Result<RecordSet>
where
    P: RetailerParser + ?Sized,
{
    let layout = parser.layout();
    let required = layout.required_width();
    let mut records = RecordSet::new();

    for (row_idx, row) in rows.iter().enumerate().skip(layout.header_rows) {
        let row_number = row_idx + 1;
        let key = cell_at(row, layout.key).to_text();
        if key.is_empty() {
            trace!(row = row_number, "blank key, row skipped");
            continue;
        }
        if parser.is_terminator(&key) {
            trace!(row = row_number, %key, "totals row reached");
            break;
        }
        if row.len() < required {
            return Err(ReportError::Format {
                row: row_number,
                message: format!(
                    "expected at least {required} columns, found {}; is the right store selected?",
                    row.len()
                ),
            });
        }

        let description = cell_at(row, layout.description).to_text();
        let quantity = cell_at(row, layout.quantity).to_quantity().unwrap_or_else(|| {
            warn!(row = row_number, %key, "non-numeric quantity treated as zero");
            Decimal::ZERO
        });

        let mut item = LineItem::new(key, description, quantity);
        for &(column, header) in layout.auxiliary {
            item.insert_auxiliary(header.to_string(), cell_at(row, column).clone());
        }
        records.insert_row(item, row_number, duplicates)?;
    }

    Ok(records)
}
