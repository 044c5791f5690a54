use std::path::Path;

use eframe::egui::{self, Color32, RichText, ScrollArea};

use crate::data::loader;
use crate::state::AppState;
use crate::ui::{charts, panels, table};

/// Fixed dataset path, resolved against the working directory.
pub const DATA_FILE: &str = "fema_applications.csv";

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct ReliefDashApp {
    pub state: AppState,
}

impl ReliefDashApp {
    /// Load the dataset (memoized, once per process) and build the initial
    /// state.
    pub fn new() -> Self {
        Self {
            state: AppState::from_load(loader::load_cached(Path::new(DATA_FILE))),
        }
    }
}

impl Default for ReliefDashApp {
    fn default() -> Self {
        Self::new()
    }
}

impl eframe::App for ReliefDashApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: title and counts ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &self.state);
        });

        // A failed load renders the error and nothing else.
        if let Some(message) = self.state.fatal_error.clone() {
            egui::CentralPanel::default().show(ctx, |ui| {
                ui.centered_and_justified(|ui| {
                    ui.heading(RichText::new(message).color(Color32::RED));
                });
            });
            return;
        }

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(220.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: preview, charts, summary ----
        egui::CentralPanel::default().show(ctx, |ui| {
            ScrollArea::vertical().show(ui, |ui| {
                ui.label(
                    "This dashboard explores FEMA Individual Assistance housing data, \
                     focusing on repair amounts and Transitional Shelter Assistance \
                     (TSA) eligibility across several disaster-impacted states.",
                );
                ui.separator();

                table::preview_section(ui, &self.state);
                ui.separator();

                charts::histogram_section(ui, &self.state);
                ui.separator();

                charts::box_plot_section(ui, &self.state);
                ui.separator();

                table::summary_section(ui, &self.state);
            });
        });
    }
}
