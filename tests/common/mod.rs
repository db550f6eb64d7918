#![allow(dead_code)]

use std::path::Path;

use lite_report::model::{CellValue, LineItem, RawRow, RecordSet};
use rust_decimal::Decimal;
use rust_xlsxwriter::Workbook;

pub fn text(value: &str) -> CellValue {
    CellValue::Text(value.to_string())
}

pub fn number(value: f64) -> CellValue {
    CellValue::Number(value)
}

pub fn item(key: &str, description: &str, quantity: i64) -> LineItem {
    LineItem::new(key, description, Decimal::from(quantity))
}

pub fn quantities(records: &RecordSet) -> Vec<(String, Decimal)> {
    records
        .iter()
        .map(|item| (item.key.clone(), item.quantity))
        .collect()
}

/// Writes raw rows to the first sheet of a new workbook, starting at A1.
pub fn write_rows(path: &Path, rows: &[RawRow]) {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    for (row_idx, row) in rows.iter().enumerate() {
        for (col_idx, cell) in row.iter().enumerate() {
            let (row, col) = (row_idx as u32, col_idx as u16);
            match cell {
                CellValue::Text(value) => {
                    worksheet.write_string(row, col, value).expect("string written");
                }
                CellValue::Number(value) => {
                    worksheet.write_number(row, col, *value).expect("number written");
                }
                CellValue::Boolean(value) => {
                    worksheet.write_boolean(row, col, *value).expect("boolean written");
                }
                CellValue::Empty => {}
            }
        }
    }
    workbook.save(path).expect("fixture workbook saved");
}

/// Technopolis export with one caption row.
pub fn technopolis_rows(lines: &[(&str, &str, f64)]) -> Vec<RawRow> {
    let mut rows = vec![vec![
        text("Article"),
        text("Name"),
        text("Qty"),
        text("Sales Value"),
    ]];
    for &(key, description, quantity) in lines {
        rows.push(vec![text(key), text(description), number(quantity), number(quantity * 10.0)]);
    }
    rows
}

/// Technomarket export with title, period and caption rows and a totals row.
pub fn technomarket_rows(lines: &[(&str, &str, f64)]) -> Vec<RawRow> {
    let mut rows = vec![
        vec![text("Technomarket sales report")],
        vec![text("Period: 01.09 - 30.09")],
        vec![
            text("Store"),
            text("Item code"),
            text("Description"),
            text("EAN"),
            text("Price"),
            text("Qty"),
        ],
    ];
    let mut total = 0.0;
    for &(key, description, quantity) in lines {
        total += quantity;
        rows.push(vec![
            text("Sofia 1"),
            text(key),
            text(description),
            text("3800000000000"),
            number(19.99),
            number(quantity),
        ]);
    }
    rows.push(vec![
        CellValue::Empty,
        text("Total"),
        CellValue::Empty,
        CellValue::Empty,
        CellValue::Empty,
        number(total),
    ]);
    rows
}
