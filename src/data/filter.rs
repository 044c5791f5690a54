use std::collections::BTreeSet;

use super::model::{ApplicationDataset, EligibilityLabel};

// ---------------------------------------------------------------------------
// FilterSelection – which option values are ticked on each dimension
// ---------------------------------------------------------------------------

/// The sidebar selection: one set of ticked values per filter dimension.
///
/// Request-scoped and never persisted; rebuilt from the UI on every change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSelection {
    pub states: BTreeSet<String>,
    pub residence_types: BTreeSet<String>,
    pub labels: BTreeSet<EligibilityLabel>,
}

impl FilterSelection {
    /// Selection with every discovered option ticked (the identity filter).
    pub fn all(dataset: &ApplicationDataset) -> Self {
        FilterSelection {
            states: dataset.states.iter().cloned().collect(),
            residence_types: dataset.residence_types.iter().cloned().collect(),
            labels: dataset.labels.iter().copied().collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Filter predicate
// ---------------------------------------------------------------------------

/// Return indices of applications that pass all three filters, in source
/// order (stable filter, no sort).
///
/// AND across dimensions, OR within a dimension's selected set. A null value
/// in a filtered column never matches a selection, so rows with a null state,
/// null residence type, or an unmapped eligibility code are excluded.
pub fn filtered_indices(dataset: &ApplicationDataset, selection: &FilterSelection) -> Vec<usize> {
    dataset
        .applications
        .iter()
        .enumerate()
        .filter(|(_, app)| {
            let state_ok = app
                .state
                .as_ref()
                .is_some_and(|s| selection.states.contains(s));
            let residence_ok = app
                .residence_type
                .as_ref()
                .is_some_and(|r| selection.residence_types.contains(r));
            let label_ok = app.label.is_some_and(|l| selection.labels.contains(&l));
            state_ok && residence_ok && label_ok
        })
        .map(|(i, _)| i)
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
