use crate::litereport::engine::format::{ColumnLayout, RetailerParser};

const LAYOUT: ColumnLayout = ColumnLayout {
    header_rows: 1,
    key: 0,
    description: 1,
    quantity: 2,
    auxiliary: &[(3, "Sales Value")],
};

/// Technopolis exports: one caption row, then article, description,
/// quantity and sales value from column A.
#[derive(Debug, Clone, Copy, Default)]
pub struct TechnopolisParser;

impl RetailerParser for TechnopolisParser {
    fn layout(&self) -> &ColumnLayout {
        &LAYOUT
    }
}
