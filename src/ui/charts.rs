use eframe::egui::{Color32, RichText, Ui};
use egui_plot::{Bar, BarChart, BoxElem, BoxPlot, BoxSpread, Legend, Plot, Points};

use crate::data::stats::{box_stats, histogram};
use crate::state::AppState;

/// Fixed histogram bin count; edges span the filtered data's range.
pub const HISTOGRAM_BINS: usize = 40;

// ---------------------------------------------------------------------------
// Histogram of repair amounts
// ---------------------------------------------------------------------------

/// Render the repair-amount histogram for the current filters.
pub fn histogram_section(ui: &mut Ui, state: &AppState) {
    let Some(dataset) = state.dataset else { return };

    ui.strong("Histogram of Repair Amount");
    ui.add_space(4.0);

    let values: Vec<f64> = state
        .visible
        .iter()
        .filter_map(|&idx| dataset.applications[idx].repair_amount)
        .collect();

    let bins = histogram(&values, HISTOGRAM_BINS);
    if bins.is_empty() {
        ui.label("No repair amounts to plot.");
        return;
    }

    let bars: Vec<Bar> = bins
        .iter()
        .map(|bin| {
            // A degenerate single-bin histogram still gets a visible bar.
            let width = if bin.width() > 0.0 { bin.width() } else { 1.0 };
            Bar::new(bin.center(), bin.count as f64).width(width)
        })
        .collect();

    Plot::new("repair_histogram")
        .height(260.0)
        .x_axis_label("Repair Amount (USD)")
        .y_axis_label("Number of Applicants")
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(false)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(
                BarChart::new(bars)
                    .name("Applicants")
                    .color(Color32::LIGHT_BLUE),
            );
        });

    ui.label(
        RichText::new(
            "Most households cluster at lower repair amounts, with a long right \
             tail of high-cost cases.",
        )
        .italics()
        .weak(),
    );
}

// ---------------------------------------------------------------------------
// Box plot of repair amount by eligibility
// ---------------------------------------------------------------------------

/// Render one box per eligibility label observed in the filtered view,
/// with outlier points beyond the whiskers.
pub fn box_plot_section(ui: &mut Ui, state: &AppState) {
    let Some(dataset) = state.dataset else { return };

    ui.strong("Repair Amount by TSA Eligibility");
    ui.add_space(4.0);

    // Grouped raw values, nulls dropped; fixed x slot per label.
    let groups: Vec<_> = dataset
        .labels
        .iter()
        .enumerate()
        .filter_map(|(slot, &label)| {
            let values: Vec<f64> = state
                .visible
                .iter()
                .map(|&idx| &dataset.applications[idx])
                .filter(|app| app.label == Some(label))
                .filter_map(|app| app.repair_amount)
                .collect();
            box_stats(&values).map(|stats| (slot as f64, label, stats))
        })
        .collect();

    if groups.is_empty() {
        ui.label("No repair amounts to plot.");
        return;
    }

    Plot::new("repair_box_plot")
        .height(260.0)
        .legend(Legend::default())
        .y_axis_label("Repair Amount (USD)")
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(false)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for (x, label, stats) in &groups {
                let color = state.label_colors.color_for(*label);
                let elem = BoxElem::new(
                    *x,
                    BoxSpread::new(
                        stats.whisker_low,
                        stats.q1,
                        stats.median,
                        stats.q3,
                        stats.whisker_high,
                    ),
                )
                .box_width(0.5);

                plot_ui.box_plot(
                    BoxPlot::new(vec![elem])
                        .name(label.to_string())
                        .color(color),
                );

                if !stats.outliers.is_empty() {
                    let points: Vec<[f64; 2]> =
                        stats.outliers.iter().map(|&v| [*x, v]).collect();
                    plot_ui.points(Points::new(points).color(color).radius(2.0));
                }
            }
        });

    ui.label(
        RichText::new(
            "TSA-eligible households tend to have higher repair amounts than \
             non-eligible households, suggesting assistance is reaching homes \
             with more severe damage.",
        )
        .italics()
        .weak(),
    );
}
