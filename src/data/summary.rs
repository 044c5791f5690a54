use std::collections::BTreeMap;

use super::model::{ApplicationDataset, EligibilityLabel};
use super::stats::{mean, median_sorted};

// ---------------------------------------------------------------------------
// Grouped summary statistics
// ---------------------------------------------------------------------------

/// One row of the summary table: statistics for a single eligibility group.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupSummary {
    pub label: EligibilityLabel,
    /// Number of filtered rows in the group, null amounts included.
    pub count: usize,
    /// Mean repair amount over the group's non-null values, rounded to two
    /// decimals. `None` when every amount in the group is null.
    pub mean: Option<f64>,
    /// Median repair amount, same null handling and rounding as `mean`.
    pub median: Option<f64>,
}

/// Round to two decimal places, halves away from zero.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Group the filtered rows by eligibility label and compute count, mean and
/// median of the repair amount.
///
/// Null amounts are dropped from mean and median, never treated as zero.
/// Groups with no rows are omitted rather than emitted with a zero count, so
/// an empty view produces an empty table. Rows without a label (unmapped
/// eligibility codes) belong to no group.
pub fn summarize(dataset: &ApplicationDataset, indices: &[usize]) -> Vec<GroupSummary> {
    let mut groups: BTreeMap<EligibilityLabel, (usize, Vec<f64>)> = BTreeMap::new();

    for &idx in indices {
        let app = &dataset.applications[idx];
        let Some(label) = app.label else { continue };
        let entry = groups.entry(label).or_default();
        entry.0 += 1;
        if let Some(amount) = app.repair_amount {
            entry.1.push(amount);
        }
    }

    groups
        .into_iter()
        .map(|(label, (count, mut amounts))| {
            amounts.sort_by(|a, b| a.total_cmp(b));
            GroupSummary {
                label,
                count,
                mean: mean(&amounts).map(round2),
                median: median_sorted(&amounts).map(round2),
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
