mod common;

use common::{item, quantities, text};
use lite_report::merge::{MergeStats, merge, merge_with_stats};
use lite_report::model::RecordSet;
use rust_decimal::Decimal;

fn existing() -> RecordSet {
    [
        item("A", "Alpha", 10).with_auxiliary("Shelf", text("1")),
        item("B", "Bravo", 5).with_auxiliary("Shelf", text("2")),
    ]
    .into_iter()
    .collect()
}

fn incoming() -> RecordSet {
    [item("B", "Bravo (new label)", 3), item("C", "Charlie", 7)]
        .into_iter()
        .collect()
}

fn expected(values: &[(&str, i64)]) -> Vec<(String, Decimal)> {
    values
        .iter()
        .map(|&(key, quantity)| (key.to_string(), Decimal::from(quantity)))
        .collect()
}

#[test]
fn additive_merge_updates_and_appends() {
    let (merged, stats) = merge_with_stats(&incoming(), &existing(), false);

    assert_eq!(quantities(&merged), expected(&[("A", 10), ("B", 8), ("C", 7)]));
    assert_eq!(
        stats,
        MergeStats {
            updated: 1,
            inserted: 1
        }
    );
}

#[test]
fn subtractive_merge_updates_and_appends() {
    let merged = merge(&incoming(), &existing(), true);

    assert_eq!(quantities(&merged), expected(&[("A", 10), ("B", 2), ("C", 7)]));
}

#[test]
fn existing_labels_and_auxiliary_columns_win() {
    let merged = merge(&incoming(), &existing(), false);

    let bravo = merged.get("B").expect("B merged");
    assert_eq!(bravo.description, "Bravo");
    assert_eq!(bravo.auxiliary.get("Shelf"), Some(&text("2")));
}

#[test]
fn new_keys_are_inserted_unchanged() {
    let incoming = incoming();
    let merged = merge(&incoming, &existing(), true);

    assert_eq!(merged.get("C"), incoming.get("C"));
}

#[test]
fn subtraction_is_not_clamped() {
    let incoming: RecordSet = [item("A", "Alpha", 25)].into_iter().collect();

    let merged = merge(&incoming, &existing(), true);

    assert_eq!(merged.get("A").expect("A merged").quantity, Decimal::from(-15));
}

#[test]
fn empty_incoming_is_a_no_op() {
    let existing = existing();

    assert_eq!(merge(&RecordSet::new(), &existing, false), existing);
    assert_eq!(merge(&RecordSet::new(), &existing, true), existing);
}

#[test]
fn empty_existing_yields_incoming() {
    let incoming = incoming();

    assert_eq!(merge(&incoming, &RecordSet::new(), true), incoming);
}

#[test]
fn new_keys_follow_existing_keys_in_incoming_order() {
    let incoming: RecordSet = [item("Z", "Zulu", 1), item("A", "Alpha", 1), item("M", "Mike", 1)]
        .into_iter()
        .collect();

    let merged = merge(&incoming, &existing(), false);

    assert_eq!(merged.keys().collect::<Vec<_>>(), vec!["A", "B", "Z", "M"]);
}
