use eframe::egui::{self, RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::summary::summarize;
use crate::state::AppState;
use crate::ui::format_thousands;

/// Number of rows shown in the preview table.
pub const PREVIEW_ROWS: usize = 5;

// ---------------------------------------------------------------------------
// Filtered data preview
// ---------------------------------------------------------------------------

/// Render the first rows of the filtered view plus the sample-size line.
pub fn preview_section(ui: &mut Ui, state: &AppState) {
    let Some(dataset) = state.dataset else { return };

    ui.strong("Filtered Data Preview");
    ui.add_space(4.0);

    if state.visible.is_empty() {
        ui.label("No applications match the current filters.");
    } else {
        TableBuilder::new(ui)
            .striped(true)
            .column(Column::auto().at_least(60.0))
            .column(Column::auto().at_least(120.0))
            .column(Column::auto().at_least(110.0))
            .column(Column::remainder().at_least(130.0))
            .header(20.0, |mut header| {
                header.col(|ui| {
                    ui.strong("State");
                });
                header.col(|ui| {
                    ui.strong("Residence type");
                });
                header.col(|ui| {
                    ui.strong("TSA eligibility");
                });
                header.col(|ui| {
                    ui.strong("Repair Amount (USD)");
                });
            })
            .body(|mut body| {
                for &idx in state.visible.iter().take(PREVIEW_ROWS) {
                    let app = &dataset.applications[idx];
                    body.row(18.0, |mut row| {
                        row.col(|ui| {
                            ui.label(app.state.as_deref().unwrap_or("<null>"));
                        });
                        row.col(|ui| {
                            ui.label(app.residence_type.as_deref().unwrap_or("<null>"));
                        });
                        row.col(|ui| {
                            let text = app
                                .label
                                .map(|l| l.to_string())
                                .unwrap_or_else(|| "<null>".to_string());
                            ui.label(text);
                        });
                        row.col(|ui| {
                            let text = app
                                .repair_amount
                                .map(|v| format!("{v:.2}"))
                                .unwrap_or_else(|| "<null>".to_string());
                            ui.label(text);
                        });
                    });
                }
            });
    }

    ui.add_space(4.0);
    ui.label(format!(
        "Current sample size after filters: {} applicants.",
        format_thousands(state.visible.len())
    ));
}

// ---------------------------------------------------------------------------
// Summary statistics
// ---------------------------------------------------------------------------

/// Render the grouped summary table for the current filters.
pub fn summary_section(ui: &mut Ui, state: &AppState) {
    let Some(dataset) = state.dataset else { return };

    ui.strong("Summary Statistics (Current Filters)");
    ui.add_space(4.0);

    let summary = summarize(dataset, &state.visible);
    if summary.is_empty() {
        ui.label("No rows to summarize.");
        return;
    }

    egui::Grid::new("summary_grid")
        .striped(true)
        .min_col_width(90.0)
        .show(ui, |ui: &mut Ui| {
            ui.strong("TSA eligibility");
            ui.strong("Count");
            ui.strong("Mean");
            ui.strong("Median");
            ui.end_row();

            for group in &summary {
                ui.label(RichText::new(group.label.to_string())
                    .color(state.label_colors.color_for(group.label)));
                ui.label(format_thousands(group.count));
                ui.label(optional_stat(group.mean));
                ui.label(optional_stat(group.median));
                ui.end_row();
            }
        });
}

/// A statistic that may be undefined (all amounts in the group were null).
fn optional_stat(value: Option<f64>) -> String {
    value
        .map(|v| format!("{v:.2}"))
        .unwrap_or_else(|| "n/a".to_string())
}
