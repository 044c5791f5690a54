//! Descriptive statistics backing the charts and the summary table.

// ---------------------------------------------------------------------------
// Basic aggregates
// ---------------------------------------------------------------------------

/// Arithmetic mean. `None` on an empty sample.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Quantile by linear interpolation on an ascending-sorted sample.
/// `q` is in `[0, 1]`. `None` on an empty sample.
pub fn quantile_sorted(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    if lo == hi {
        return Some(sorted[lo]);
    }
    let frac = pos - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

/// Median of an ascending-sorted sample.
pub fn median_sorted(sorted: &[f64]) -> Option<f64> {
    quantile_sorted(sorted, 0.5)
}

// ---------------------------------------------------------------------------
// Histogram – fixed-width binning over the observed range
// ---------------------------------------------------------------------------

/// A single histogram bin. `right` is exclusive except for the last bin,
/// which closes the range so the maximum lands in a bin.
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramBin {
    pub left: f64,
    pub right: f64,
    pub count: usize,
}

impl HistogramBin {
    pub fn center(&self) -> f64 {
        (self.left + self.right) / 2.0
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }
}

/// Partition `values` into `bins` equal-width bins spanning the observed
/// min..=max. Edges are derived from the input sample, so they move with the
/// active filters. An empty sample yields no bins; a sample where every
/// value is equal collapses to a single degenerate bin.
pub fn histogram(values: &[f64], bins: usize) -> Vec<HistogramBin> {
    if values.is_empty() || bins == 0 {
        return Vec::new();
    }

    let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);

    if (max - min).abs() < f64::EPSILON {
        return vec![HistogramBin {
            left: min,
            right: max,
            count: values.len(),
        }];
    }

    let width = (max - min) / bins as f64;
    let mut counts = vec![0usize; bins];
    for &v in values {
        let mut i = ((v - min) / width) as usize;
        if i >= bins {
            i = bins - 1; // the maximum falls in the closing bin
        }
        counts[i] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| {
            let left = min + i as f64 * width;
            let right = if i == bins - 1 {
                max
            } else {
                min + (i + 1) as f64 * width
            };
            HistogramBin { left, right, count }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Box plot – Tukey five-number summary plus outliers
// ---------------------------------------------------------------------------

/// Five-number summary for one box of the box plot.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxStats {
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    /// Smallest data point within 1.5 IQR below Q1.
    pub whisker_low: f64,
    /// Largest data point within 1.5 IQR above Q3.
    pub whisker_high: f64,
    /// Data points beyond the whiskers.
    pub outliers: Vec<f64>,
}

/// Tukey box statistics: quartiles by linear interpolation, whiskers at the
/// most extreme data points within 1.5 IQR of the box. `None` on an empty
/// sample.
pub fn box_stats(values: &[f64]) -> Option<BoxStats> {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let q1 = quantile_sorted(&sorted, 0.25)?;
    let median = quantile_sorted(&sorted, 0.5)?;
    let q3 = quantile_sorted(&sorted, 0.75)?;

    let iqr = q3 - q1;
    let low_fence = q1 - 1.5 * iqr;
    let high_fence = q3 + 1.5 * iqr;

    let whisker_low = sorted
        .iter()
        .copied()
        .find(|v| *v >= low_fence)
        .unwrap_or(q1);
    let whisker_high = sorted
        .iter()
        .rev()
        .copied()
        .find(|v| *v <= high_fence)
        .unwrap_or(q3);
    let outliers = sorted
        .iter()
        .copied()
        .filter(|v| *v < low_fence || *v > high_fence)
        .collect();

    Some(BoxStats {
        q1,
        median,
        q3,
        whisker_low,
        whisker_high,
        outliers,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_of_empty_is_none() {
        assert_eq!(mean(&[]), None);
        assert_eq!(mean(&[1000.0, 2000.0, 3000.0]), Some(2000.0));
    }

    #[test]
    fn median_interpolates_even_samples() {
        assert_eq!(median_sorted(&[1.0, 2.0, 3.0]), Some(2.0));
        assert_eq!(median_sorted(&[1.0, 2.0, 3.0, 4.0]), Some(2.5));
        assert_eq!(median_sorted(&[]), None);
    }

    #[test]
    fn quantiles_interpolate_linearly() {
        let sorted = [0.0, 10.0, 20.0, 30.0];
        assert_eq!(quantile_sorted(&sorted, 0.0), Some(0.0));
        assert_eq!(quantile_sorted(&sorted, 0.25), Some(7.5));
        assert_eq!(quantile_sorted(&sorted, 1.0), Some(30.0));
    }

    #[test]
    fn histogram_of_empty_sample_has_no_bins() {
        assert!(histogram(&[], 40).is_empty());
    }

    #[test]
    fn histogram_of_constant_sample_collapses_to_one_bin() {
        let bins = histogram(&[5.0, 5.0, 5.0], 40);
        assert_eq!(bins.len(), 1);
        assert_eq!(bins[0].count, 3);
        assert_eq!(bins[0].left, 5.0);
        assert_eq!(bins[0].right, 5.0);
    }

    #[test]
    fn histogram_spans_the_observed_range_and_counts_everything() {
        let values: Vec<f64> = (0..100).map(|i| i as f64).collect();
        let bins = histogram(&values, 40);

        assert_eq!(bins.len(), 40);
        assert_eq!(bins.first().unwrap().left, 0.0);
        assert_eq!(bins.last().unwrap().right, 99.0);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), values.len());
    }

    #[test]
    fn histogram_places_the_maximum_in_the_last_bin() {
        let bins = histogram(&[0.0, 1.0, 2.0, 10.0], 4);
        assert_eq!(bins.last().unwrap().count, 1);
    }

    #[test]
    fn histogram_edges_track_the_input_sample() {
        let wide = histogram(&[0.0, 100.0], 10);
        let narrow = histogram(&[40.0, 60.0], 10);
        assert_eq!(wide[0].left, 0.0);
        assert_eq!(narrow[0].left, 40.0);
        assert_eq!(narrow.last().unwrap().right, 60.0);
    }

    #[test]
    fn box_stats_of_empty_sample_is_none() {
        assert_eq!(box_stats(&[]), None);
    }

    #[test]
    fn box_stats_five_number_summary() {
        let stats = box_stats(&[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        assert_eq!(stats.q1, 2.0);
        assert_eq!(stats.median, 3.0);
        assert_eq!(stats.q3, 4.0);
        assert_eq!(stats.whisker_low, 1.0);
        assert_eq!(stats.whisker_high, 5.0);
        assert!(stats.outliers.is_empty());
    }

    #[test]
    fn box_stats_flags_points_beyond_the_fences() {
        // IQR = 2, fences at 2 - 3 = -1 and 4 + 3 = 7; 100 is an outlier.
        let stats = box_stats(&[1.0, 2.0, 3.0, 4.0, 100.0]).unwrap();
        assert_eq!(stats.outliers, vec![100.0]);
        assert!(stats.whisker_high <= 7.0);
    }

    #[test]
    fn box_stats_of_single_value() {
        let stats = box_stats(&[42.0]).unwrap();
        assert_eq!(stats.median, 42.0);
        assert_eq!(stats.whisker_low, 42.0);
        assert_eq!(stats.whisker_high, 42.0);
        assert!(stats.outliers.is_empty());
    }
}
