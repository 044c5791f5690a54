use std::collections::BTreeSet;
use std::fmt;

// ---------------------------------------------------------------------------
// EligibilityLabel – category derived from the raw TSA flag
// ---------------------------------------------------------------------------

/// Transitional Shelter Assistance eligibility, derived once at load time
/// from the raw `tsaEligible` code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EligibilityLabel {
    Eligible,
    NotEligible,
}

impl EligibilityLabel {
    /// Map a raw eligibility code to its label.
    ///
    /// Total for `{0, 1}`; any other code (including null) produces no label.
    /// Unlabeled rows never match an eligibility selection downstream.
    pub fn from_code(code: Option<i64>) -> Option<Self> {
        match code {
            Some(1) => Some(EligibilityLabel::Eligible),
            Some(0) => Some(EligibilityLabel::NotEligible),
            _ => None,
        }
    }
}

impl fmt::Display for EligibilityLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EligibilityLabel::Eligible => write!(f, "Eligible"),
            EligibilityLabel::NotEligible => write!(f, "Not eligible"),
        }
    }
}

// ---------------------------------------------------------------------------
// Application – one row of the source table
// ---------------------------------------------------------------------------

/// A single relief application (one row of the source table).
#[derive(Debug, Clone, PartialEq)]
pub struct Application {
    /// Two-letter state code (`damagedStateAbbreviation`).
    pub state: Option<String>,
    /// Dwelling category (`residenceType`).
    pub residence_type: Option<String>,
    /// Raw eligibility flag (`tsaEligible`), expected 0 or 1.
    pub tsa_eligible: Option<i64>,
    /// Assessed repair cost in USD (`repairAmount`).
    pub repair_amount: Option<f64>,
    /// Label derived from `tsa_eligible`.
    pub label: Option<EligibilityLabel>,
}

impl Application {
    pub fn new(
        state: Option<String>,
        residence_type: Option<String>,
        tsa_eligible: Option<i64>,
        repair_amount: Option<f64>,
    ) -> Self {
        let label = EligibilityLabel::from_code(tsa_eligible);
        Application {
            state,
            residence_type,
            tsa_eligible,
            repair_amount,
            label,
        }
    }
}

// ---------------------------------------------------------------------------
// ApplicationDataset – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The full parsed dataset with pre-computed filter option sets.
///
/// Rows are never mutated after load; every downstream view (filtered
/// indices, summary table, chart series) is a fresh derived value.
#[derive(Debug, Clone)]
pub struct ApplicationDataset {
    /// All applications (rows) in source order.
    pub applications: Vec<Application>,
    /// Sorted distinct non-null state codes.
    pub states: Vec<String>,
    /// Sorted distinct non-null residence types.
    pub residence_types: Vec<String>,
    /// Distinct eligibility labels observed in the data.
    pub labels: Vec<EligibilityLabel>,
}

impl ApplicationDataset {
    /// Build the filter option sets from the loaded rows.
    pub fn from_applications(applications: Vec<Application>) -> Self {
        let mut states: BTreeSet<String> = BTreeSet::new();
        let mut residence_types: BTreeSet<String> = BTreeSet::new();
        let mut labels: BTreeSet<EligibilityLabel> = BTreeSet::new();

        for app in &applications {
            if let Some(state) = &app.state {
                states.insert(state.clone());
            }
            if let Some(residence) = &app.residence_type {
                residence_types.insert(residence.clone());
            }
            if let Some(label) = app.label {
                labels.insert(label);
            }
        }

        ApplicationDataset {
            applications,
            states: states.into_iter().collect(),
            residence_types: residence_types.into_iter().collect(),
            labels: labels.into_iter().collect(),
        }
    }

    /// Number of applications.
    pub fn len(&self) -> usize {
        self.applications.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.applications.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn app(state: &str, residence: &str, tsa: i64, repair: f64) -> Application {
        Application::new(
            Some(state.to_string()),
            Some(residence.to_string()),
            Some(tsa),
            Some(repair),
        )
    }

    #[test]
    fn label_mapping_is_total_for_known_codes() {
        assert_eq!(
            EligibilityLabel::from_code(Some(1)),
            Some(EligibilityLabel::Eligible)
        );
        assert_eq!(
            EligibilityLabel::from_code(Some(0)),
            Some(EligibilityLabel::NotEligible)
        );
    }

    #[test]
    fn unknown_codes_produce_no_label() {
        assert_eq!(EligibilityLabel::from_code(None), None);
        assert_eq!(EligibilityLabel::from_code(Some(2)), None);
        assert_eq!(EligibilityLabel::from_code(Some(-1)), None);
    }

    #[test]
    fn label_display_matches_dashboard_text() {
        assert_eq!(EligibilityLabel::Eligible.to_string(), "Eligible");
        assert_eq!(EligibilityLabel::NotEligible.to_string(), "Not eligible");
    }

    #[test]
    fn option_sets_are_sorted_deduplicated_and_non_null() {
        let dataset = ApplicationDataset::from_applications(vec![
            app("TX", "House/Duplex", 1, 1000.0),
            app("FL", "Apartment", 0, 2000.0),
            app("TX", "Apartment", 1, 3000.0),
            Application::new(None, None, None, Some(500.0)),
        ]);

        assert_eq!(dataset.states, vec!["FL".to_string(), "TX".to_string()]);
        assert_eq!(
            dataset.residence_types,
            vec!["Apartment".to_string(), "House/Duplex".to_string()]
        );
        assert_eq!(
            dataset.labels,
            vec![EligibilityLabel::Eligible, EligibilityLabel::NotEligible]
        );
        assert_eq!(dataset.len(), 4);
    }

    #[test]
    fn unmapped_codes_do_not_appear_in_label_options() {
        let dataset = ApplicationDataset::from_applications(vec![
            app("TX", "Apartment", 1, 1000.0),
            app("TX", "Apartment", 7, 2000.0),
        ]);
        assert_eq!(dataset.labels, vec![EligibilityLabel::Eligible]);
    }
}
