use std::collections::{BTreeMap, HashMap};

use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::litereport::engine::error::{ReportError, Result};

/// Business identifier of a line item (article or product code).
pub type ItemKey = String;

/// A single spreadsheet cell as seen by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum CellValue {
    /// Blank cell, or a cell past the end of the row.
    Empty,
    /// Plain string content.
    Text(String),
    /// Any numeric content, including dates stored as serial numbers.
    Number(f64),
    /// Boolean content.
    Boolean(bool),
}

impl CellValue {
    /// Returns `true` for blank cells and whitespace-only text.
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(value) => value.trim().is_empty(),
            CellValue::Number(_) | CellValue::Boolean(_) => false,
        }
    }

    /// Renders the cell as trimmed text. Whole numbers drop their fractional
    /// part so numeric article codes compare equal to their text form.
    pub fn to_text(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Text(value) => value.trim().to_string(),
            CellValue::Number(value) if value.fract() == 0.0 && value.abs() < 1e15 => {
                format!("{}", *value as i64)
            }
            CellValue::Number(value) => value.to_string(),
            CellValue::Boolean(value) => value.to_string(),
        }
    }

    /// Renders the cell as text without trimming. Numbers and booleans
    /// render as in [`CellValue::to_text`].
    pub fn to_raw_text(&self) -> String {
        match self {
            CellValue::Text(value) => value.clone(),
            other => other.to_text(),
        }
    }

    /// Interprets the cell as a quantity. Blank cells count as zero and
    /// `None` means the cell is not numeric. Text may use either `,` or `.`
    /// as the decimal separator and either one (or whitespace) to group
    /// thousands; see [`parse_quantity_text`].
    pub fn to_quantity(&self) -> Option<Decimal> {
        match self {
            CellValue::Number(value) => Decimal::from_f64(*value),
            CellValue::Text(value) => parse_quantity_text(value),
            CellValue::Empty => Some(Decimal::ZERO),
            CellValue::Boolean(_) => None,
        }
    }
}

/// Parses a quantity typed as text.
///
/// When both `,` and `.` appear, the last one is the decimal separator and
/// the other groups thousands (`1.234,50`, `1,234.50`). A separator that
/// appears more than once only groups (`1.234.567`). A single separator is
/// always decimal, so `1,234` reads as `1.234`.
pub fn parse_quantity_text(text: &str) -> Option<Decimal> {
    let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    if compact.is_empty() {
        return Some(Decimal::ZERO);
    }

    let last_comma = compact.rfind(',');
    let last_dot = compact.rfind('.');
    let decimal_separator = match (last_comma, last_dot) {
        (Some(comma), Some(dot)) => Some(if comma > dot { ',' } else { '.' }),
        (Some(_), None) if compact.matches(',').count() == 1 => Some(','),
        (None, Some(_)) if compact.matches('.').count() == 1 => Some('.'),
        _ => None,
    };

    let normalized: String = compact
        .chars()
        .filter_map(|c| match c {
            ',' | '.' if Some(c) == decimal_separator => Some('.'),
            ',' | '.' => None,
            other => Some(other),
        })
        .collect();
    normalized.parse::<Decimal>().ok()
}

/// One row of raw cells, ordered by column starting at column A.
pub type RawRow = Vec<CellValue>;

/// A single canonical report line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// Article code, unique within a [`RecordSet`].
    pub key: ItemKey,
    /// Free-text label carried through unchanged.
    pub description: String,
    /// The value combined by the merge.
    pub quantity: Decimal,
    /// Retailer specific extra columns keyed by column header. Blank values
    /// are never stored.
    pub auxiliary: BTreeMap<String, CellValue>,
}

impl LineItem {
    /// Creates a line item without auxiliary columns.
    pub fn new(key: impl Into<ItemKey>, description: impl Into<String>, quantity: Decimal) -> Self {
        Self {
            key: key.into(),
            description: description.into(),
            quantity,
            auxiliary: BTreeMap::new(),
        }
    }

    /// Adds an auxiliary value, ignoring blank cells.
    pub fn with_auxiliary(mut self, column: impl Into<String>, value: CellValue) -> Self {
        self.insert_auxiliary(column.into(), value);
        self
    }

    /// Inserts or replaces an auxiliary value. Blank cells are dropped.
    pub fn insert_auxiliary(&mut self, column: String, value: CellValue) {
        if value.is_blank() {
            return;
        }
        self.auxiliary.insert(column, value);
    }
}

/// How a second occurrence of a key inside one input file is handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DuplicateKeyPolicy {
    /// Abort with a validation error.
    #[default]
    Reject,
    /// Keep the later row's values in the earlier row's position.
    LastWins,
}

/// Ordered collection of line items keyed by [`LineItem::key`].
///
/// Iteration yields items in insertion order, which is the row order of the
/// workbook the set was read from.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<LineItem>", into = "Vec<LineItem>")]
pub struct RecordSet {
    items: Vec<LineItem>,
    index: HashMap<ItemKey, usize>,
    source_rows: Vec<usize>,
}

impl PartialEq for RecordSet {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl RecordSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&LineItem> {
        let position = *self.index.get(key)?;
        self.items.get(position)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut LineItem> {
        let position = *self.index.get(key)?;
        self.items.get_mut(position)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LineItem> {
        self.items.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(|item| item.key.as_str())
    }

    /// Appends an item, or replaces the existing item with the same key in
    /// place. Returns the replaced item, if any.
    pub fn upsert(&mut self, item: LineItem) -> Option<LineItem> {
        self.upsert_from_row(item, 0)
    }

    /// Inserts an item read from spreadsheet row `row`, applying `policy`
    /// when the key was already seen.
    pub fn insert_row(
        &mut self,
        item: LineItem,
        row: usize,
        policy: DuplicateKeyPolicy,
    ) -> Result<()> {
        if let Some(&position) = self.index.get(&item.key) {
            let first_row = self.source_rows.get(position).copied().unwrap_or_default();
            match policy {
                DuplicateKeyPolicy::Reject => {
                    return Err(ReportError::DuplicateKey {
                        key: item.key,
                        row,
                        first_row,
                    });
                }
                DuplicateKeyPolicy::LastWins => {
                    debug!(key = %item.key, row, first_row, "duplicate key replaced");
                }
            }
        }
        self.upsert_from_row(item, row);
        Ok(())
    }

    fn upsert_from_row(&mut self, item: LineItem, row: usize) -> Option<LineItem> {
        match self.index.get(&item.key) {
            Some(&position) => {
                if let Some(source_row) = self.source_rows.get_mut(position) {
                    *source_row = row;
                }
                self.items
                    .get_mut(position)
                    .map(|slot| std::mem::replace(slot, item))
            }
            None => {
                self.index.insert(item.key.clone(), self.items.len());
                self.items.push(item);
                self.source_rows.push(row);
                None
            }
        }
    }

    /// Names of every auxiliary column used by any item, sorted.
    pub fn auxiliary_columns(&self) -> Vec<String> {
        let mut columns: Vec<String> = self
            .items
            .iter()
            .flat_map(|item| item.auxiliary.keys().cloned())
            .collect();
        columns.sort();
        columns.dedup();
        columns
    }
}

impl FromIterator<LineItem> for RecordSet {
    fn from_iter<I: IntoIterator<Item = LineItem>>(iter: I) -> Self {
        let mut set = RecordSet::new();
        for item in iter {
            set.upsert(item);
        }
        set
    }
}

impl From<Vec<LineItem>> for RecordSet {
    fn from(items: Vec<LineItem>) -> Self {
        items.into_iter().collect()
    }
}

impl From<RecordSet> for Vec<LineItem> {
    fn from(set: RecordSet) -> Self {
        set.items
    }
}

impl IntoIterator for RecordSet {
    type Item = LineItem;
    type IntoIter = std::vec::IntoIter<LineItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a RecordSet {
    type Item = &'a LineItem;
    type IntoIter = std::slice::Iter<'a, LineItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
