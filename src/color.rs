use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::data::model::EligibilityLabel;

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Color mapping: eligibility label → Color32
// ---------------------------------------------------------------------------

/// Maps the eligibility labels observed in the dataset to distinct colours,
/// used by the box plot and the sidebar filter labels.
#[derive(Debug, Clone, Default)]
pub struct LabelColors {
    mapping: BTreeMap<EligibilityLabel, Color32>,
}

impl LabelColors {
    /// Build a colour map for the observed labels.
    pub fn new(labels: &[EligibilityLabel]) -> Self {
        let palette = generate_palette(labels.len());
        let mapping: BTreeMap<EligibilityLabel, Color32> = labels
            .iter()
            .zip(palette.into_iter())
            .map(|(label, color): (&EligibilityLabel, Color32)| (*label, color))
            .collect();

        LabelColors { mapping }
    }

    /// Look up the colour for a label.
    pub fn color_for(&self, label: EligibilityLabel) -> Color32 {
        self.mapping.get(&label).copied().unwrap_or(Color32::GRAY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_colors_are_distinct() {
        let palette = generate_palette(4);
        assert_eq!(palette.len(), 4);
        for (i, a) in palette.iter().enumerate() {
            for b in palette.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn labels_get_stable_distinct_colors() {
        let labels = [EligibilityLabel::Eligible, EligibilityLabel::NotEligible];
        let colors = LabelColors::new(&labels);
        assert_ne!(
            colors.color_for(EligibilityLabel::Eligible),
            colors.color_for(EligibilityLabel::NotEligible)
        );
    }
}
