use serde::Serialize;
use tracing::{debug, instrument};

use crate::litereport::engine::model::RecordSet;

/// Counters describing what a merge changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MergeStats {
    /// Existing items whose quantity was combined with an incoming one.
    pub updated: usize,
    /// Incoming items appended because their key was new.
    pub inserted: usize,
}

/// Combines `incoming` into `existing`.
///
/// Matching keys get `existing ± incoming` quantity while keeping the
/// existing description and auxiliary columns. Unknown keys are appended in
/// incoming order. Quantities are never clamped.
pub fn merge(incoming: &RecordSet, existing: &RecordSet, subtract: bool) -> RecordSet {
    merge_with_stats(incoming, existing, subtract).0
}

/// Same as [`merge`], also reporting how many items were updated or added.
#[instrument(
    level = "debug",
    skip_all,
    fields(incoming = incoming.len(), existing = existing.len(), subtract)
)]
pub fn merge_with_stats(
    incoming: &RecordSet,
    existing: &RecordSet,
    subtract: bool,
) -> (RecordSet, MergeStats) {
    let mut merged = existing.clone();
    let mut stats = MergeStats::default();

    for item in incoming {
        match merged.get_mut(&item.key) {
            Some(base) => {
                if subtract {
                    base.quantity -= item.quantity;
                } else {
                    base.quantity += item.quantity;
                }
                stats.updated += 1;
            }
            None => {
                merged.upsert(item.clone());
                stats.inserted += 1;
            }
        }
    }

    debug!(
        updated = stats.updated,
        inserted = stats.inserted,
        total = merged.len(),
        "records merged"
    );
    (merged, stats)
}
