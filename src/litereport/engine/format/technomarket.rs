use crate::litereport::engine::format::{ColumnLayout, RetailerParser};

const LAYOUT: ColumnLayout = ColumnLayout {
    header_rows: 3,
    key: 1,
    description: 2,
    quantity: 5,
    auxiliary: &[(0, "Store"), (3, "EAN"), (4, "Price")],
};

const TOTAL_LABELS: [&str; 2] = ["total", "общо"];

/// Technomarket exports: a title row, a period row and a caption row, then
/// store, item code, description, EAN, price and quantity from column A. The
/// sheet ends with a totals row.
#[derive(Debug, Clone, Copy, Default)]
pub struct TechnomarketParser;

impl RetailerParser for TechnomarketParser {
    fn layout(&self) -> &ColumnLayout {
        &LAYOUT
    }

    fn is_terminator(&self, key: &str) -> bool {
        let folded = key.trim_end_matches(':').to_lowercase();
        TOTAL_LABELS.contains(&folded.as_str())
    }
}
