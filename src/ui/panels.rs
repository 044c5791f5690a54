use std::collections::BTreeSet;

use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::filter::FilterSelection;
use crate::state::AppState;
use crate::ui::format_thousands;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel. Any change to a selection recomputes the
/// filtered view before the central panel draws this frame.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    let dataset = match state.dataset {
        Some(ds) => ds,
        None => {
            ui.label("No dataset loaded.");
            return;
        }
    };

    // Clone the colour map so the closure below doesn't borrow `state`
    // while the selection is mutably borrowed.
    let label_colors = state.label_colors.clone();

    let FilterSelection {
        states,
        residence_types,
        labels,
    } = &mut state.selection;

    let mut changed = false;

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            changed |= option_section(ui, "State", &dataset.states, states, |s| {
                RichText::new(s.as_str())
            });
            changed |= option_section(
                ui,
                "Residence type",
                &dataset.residence_types,
                residence_types,
                |r| RichText::new(r.as_str()),
            );
            changed |= option_section(ui, "TSA eligibility", &dataset.labels, labels, |label| {
                RichText::new(label.to_string()).color(label_colors.color_for(*label))
            });
        });

    if changed {
        state.refilter();
    }
}

/// One collapsible multi-select section: All / None buttons plus a checkbox
/// per discovered option. Returns whether the selection changed.
fn option_section<T>(
    ui: &mut Ui,
    title: &str,
    options: &[T],
    selected: &mut BTreeSet<T>,
    text_for: impl Fn(&T) -> RichText,
) -> bool
where
    T: Ord + Clone,
{
    let mut changed = false;

    let header_text = format!("{title}  ({}/{})", selected.len(), options.len());
    egui::CollapsingHeader::new(RichText::new(header_text).strong())
        .id_salt(title)
        .default_open(true)
        .show(ui, |ui: &mut Ui| {
            ui.horizontal(|ui: &mut Ui| {
                if ui.small_button("All").clicked() {
                    *selected = options.iter().cloned().collect();
                    changed = true;
                }
                if ui.small_button("None").clicked() {
                    selected.clear();
                    changed = true;
                }
            });

            for option in options {
                let mut checked = selected.contains(option);
                if ui.checkbox(&mut checked, text_for(option)).changed() {
                    if checked {
                        selected.insert(option.clone());
                    } else {
                        selected.remove(option);
                    }
                    changed = true;
                }
            }
        });

    changed
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top bar: dashboard title and applicant counts.
pub fn top_bar(ui: &mut Ui, state: &AppState) {
    ui.horizontal(|ui: &mut Ui| {
        ui.heading("FEMA Disaster Relief Dashboard");

        ui.separator();

        if let Some(dataset) = state.dataset {
            ui.label(format!(
                "{} applications loaded, {} after filters",
                format_thousands(dataset.len()),
                format_thousands(state.visible.len())
            ));
        }

        if let Some(msg) = &state.fatal_error {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}
