mod common;

use common::{number, technomarket_rows, technopolis_rows, text};
use lite_report::format::{RetailerParser, Store, TechnomarketParser, TechnopolisParser};
use lite_report::model::{CellValue, DuplicateKeyPolicy};
use lite_report::{ErrorKind, ReportError};
use rust_decimal::Decimal;

#[test]
fn technopolis_rows_become_line_items() {
    let rows = technopolis_rows(&[("1001", "Kettle", 4.0), ("1002", "Toaster", 2.5)]);

    let records = TechnopolisParser
        .parse(&rows, DuplicateKeyPolicy::Reject)
        .expect("Technopolis rows parsed");

    assert_eq!(records.keys().collect::<Vec<_>>(), vec!["1001", "1002"]);
    let toaster = records.get("1002").expect("toaster present");
    assert_eq!(toaster.description, "Toaster");
    assert_eq!(toaster.quantity, Decimal::new(25, 1));
    assert_eq!(
        toaster.auxiliary.get("Sales Value"),
        Some(&CellValue::Number(25.0))
    );
}

#[test]
fn technomarket_stops_at_totals_row() {
    let rows = technomarket_rows(&[("TM-1", "Blender", 3.0), ("TM-2", "Mixer", 1.0)]);

    let records = Store::Technomarket
        .parser()
        .parse(&rows, DuplicateKeyPolicy::Reject)
        .expect("Technomarket rows parsed");

    assert_eq!(records.keys().collect::<Vec<_>>(), vec!["TM-1", "TM-2"]);
    let blender = records.get("TM-1").expect("blender present");
    assert_eq!(blender.quantity, Decimal::from(3));
    assert_eq!(blender.auxiliary.get("Store"), Some(&text("Sofia 1")));
    assert_eq!(blender.auxiliary.get("Price"), Some(&number(19.99)));
    assert!(!records.contains_key("Total"));
}

#[test]
fn blank_keys_are_skipped() {
    let mut rows = technopolis_rows(&[("1001", "Kettle", 4.0)]);
    rows.push(vec![CellValue::Empty, CellValue::Empty, CellValue::Empty]);
    rows.push(vec![text("   "), text("stray note"), number(9.0)]);

    let records = TechnopolisParser
        .parse(&rows, DuplicateKeyPolicy::Reject)
        .expect("rows parsed");

    assert_eq!(records.len(), 1);
}

#[test]
fn non_numeric_quantities_count_as_zero() {
    let rows = vec![
        vec![text("Article"), text("Name"), text("Qty")],
        vec![text("A"), text("dash"), text("-")],
        vec![text("B"), text("blank"), CellValue::Empty],
        vec![text("C"), text("comma"), text("3,5")],
    ];

    let records = TechnopolisParser
        .parse(&rows, DuplicateKeyPolicy::Reject)
        .expect("rows parsed");

    assert_eq!(records.get("A").expect("A").quantity, Decimal::ZERO);
    assert_eq!(records.get("B").expect("B").quantity, Decimal::ZERO);
    assert_eq!(records.get("C").expect("C").quantity, Decimal::new(35, 1));
}

#[test]
fn numeric_keys_drop_the_fraction() {
    let rows = vec![
        vec![text("Article"), text("Name"), text("Qty")],
        vec![number(4_006_381.0), text("Charger"), number(1.0)],
    ];

    let records = TechnopolisParser
        .parse(&rows, DuplicateKeyPolicy::Reject)
        .expect("rows parsed");

    assert!(records.contains_key("4006381"));
}

#[test]
fn narrow_rows_report_the_row_number() {
    let rows = technopolis_rows(&[
        ("1001", "Kettle", 4.0),
        ("1002", "Toaster", 2.0),
        ("1003", "Iron", 1.0),
    ]);

    let error = TechnomarketParser
        .parse(&rows, DuplicateKeyPolicy::Reject)
        .expect_err("Technopolis layout rejected by the Technomarket parser");

    assert_eq!(error.kind(), ErrorKind::Format);
    assert!(matches!(error, ReportError::Format { row: 4, .. }));
}

#[test]
fn duplicate_keys_follow_the_policy() {
    let rows = technopolis_rows(&[
        ("1001", "Kettle", 4.0),
        ("1002", "Toaster", 2.0),
        ("1001", "Kettle v2", 6.0),
    ]);

    let error = TechnopolisParser
        .parse(&rows, DuplicateKeyPolicy::Reject)
        .expect_err("duplicate rejected");
    assert_eq!(error.kind(), ErrorKind::Validation);
    assert!(matches!(
        error,
        ReportError::DuplicateKey { ref key, row: 4, first_row: 2 } if key == "1001"
    ));

    let records = TechnopolisParser
        .parse(&rows, DuplicateKeyPolicy::LastWins)
        .expect("duplicate replaced");
    assert_eq!(records.keys().collect::<Vec<_>>(), vec!["1001", "1002"]);
    let kettle = records.get("1001").expect("kettle present");
    assert_eq!(kettle.description, "Kettle v2");
    assert_eq!(kettle.quantity, Decimal::from(6));
}

#[test]
fn grouped_text_quantities_keep_their_value() {
    let parsed = |value: &str| text(value).to_quantity();

    assert_eq!(parsed("1.234,50"), Some(Decimal::new(123_450, 2)));
    assert_eq!(parsed("1,234.50"), Some(Decimal::new(123_450, 2)));
    assert_eq!(parsed("1 234,50"), Some(Decimal::new(123_450, 2)));
    assert_eq!(parsed("1.234.567"), Some(Decimal::from(1_234_567)));
    assert_eq!(parsed("-12,5"), Some(Decimal::new(-125, 1)));
    assert_eq!(parsed("1,234"), Some(Decimal::new(1_234, 3)));
    assert_eq!(parsed("n/a"), None);
}
