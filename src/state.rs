use crate::color::LabelColors;
use crate::data::filter::{filtered_indices, FilterSelection};
use crate::data::loader::LoadError;
use crate::data::model::ApplicationDataset;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
///
/// The dataset itself lives in the loader's process-wide cache; this struct
/// only holds the borrowed handle plus the per-frame selection.
pub struct AppState {
    /// Loaded dataset (None when the load failed).
    pub dataset: Option<&'static ApplicationDataset>,

    /// Current sidebar selection.
    pub selection: FilterSelection,

    /// Indices of applications passing the current filters (cached).
    pub visible: Vec<usize>,

    /// Per-label colours for the box plot and filter labels.
    pub label_colors: LabelColors,

    /// Fatal load error; when set, nothing but the message renders.
    pub fatal_error: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            dataset: None,
            selection: FilterSelection::default(),
            visible: Vec::new(),
            label_colors: LabelColors::default(),
            fatal_error: None,
        }
    }
}

impl AppState {
    /// Build the initial state from the one-time load result.
    pub fn from_load(result: Result<&'static ApplicationDataset, &'static LoadError>) -> Self {
        let mut state = AppState::default();
        match result {
            Ok(dataset) => {
                log::info!(
                    "Loaded {} applications ({} states, {} residence types)",
                    dataset.len(),
                    dataset.states.len(),
                    dataset.residence_types.len()
                );
                state.set_dataset(dataset);
            }
            Err(e) => {
                log::error!("Failed to load dataset: {e}");
                state.fatal_error = Some(format!("Error loading data: {e}"));
            }
        }
        state
    }

    /// Ingest the loaded dataset: identity selection, full visibility.
    pub fn set_dataset(&mut self, dataset: &'static ApplicationDataset) {
        self.selection = FilterSelection::all(dataset);
        self.label_colors = LabelColors::new(&dataset.labels);
        self.dataset = Some(dataset);
        self.refilter();
    }

    /// Recompute `visible` after a selection change.
    pub fn refilter(&mut self) {
        if let Some(dataset) = self.dataset {
            self.visible = filtered_indices(dataset, &self.selection);
        }
    }
}
