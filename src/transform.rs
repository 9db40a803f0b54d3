use crate::error::{ChartError, Result};
use crate::stats::{percentile, sorted_copy};
use serde::Deserialize;

/// Number of evaluation points on a density curve.
const KDE_GRID_POINTS: usize = 200;

/// How far past the data the density grid extends, in bandwidths.
const KDE_CUT: f64 = 3.0;

/// Kernel bandwidth selection rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Bandwidth {
    /// `sigma * n^(-1/5)`
    #[default]
    Scott,
    /// `0.9 * min(sigma, IQR / 1.34) * n^(-1/5)`
    Silverman,
}

/// How bar heights are aggregated when an x value repeats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BarAggregate {
    #[default]
    Mean,
    Sum,
}

/// Equal-width histogram: `edges.len() == counts.len() + 1`.
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramBins {
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
}

/// Gaussian KDE evaluated on a regular grid.
#[derive(Debug, Clone, PartialEq)]
pub struct DensityCurve {
    pub grid: Vec<f64>,
    pub density: Vec<f64>,
    pub bandwidth: f64,
}

/// Box-and-whisker statistics for one series.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxStats {
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    /// Smallest value inside the lower fence
    pub lower_whisker: f64,
    /// Largest value inside the upper fence
    pub upper_whisker: f64,
    pub outliers: Vec<f64>,
}

/// Bars grouped by distinct x value, sorted ascending.
#[derive(Debug, Clone, PartialEq)]
pub struct BarGroups {
    pub categories: Vec<String>,
    pub heights: Vec<f64>,
}

/// Count values into `bin_count` equal-width bins spanning [min, max].
///
/// The last bin is closed on the right so the maximum is counted. A range of
/// zero width is widened to one unit centred on the value.
pub fn bin_values(values: &[f64], bin_count: usize) -> HistogramBins {
    let bin_count = bin_count.max(1);
    if values.is_empty() {
        return HistogramBins {
            edges: Vec::new(),
            counts: Vec::new(),
        };
    }

    let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let (lo, hi) = if min == max {
        (min - 0.5, max + 0.5)
    } else {
        (min, max)
    };
    let width = (hi - lo) / bin_count as f64;

    let edges: Vec<f64> = (0..=bin_count).map(|i| lo + i as f64 * width).collect();
    let mut counts = vec![0usize; bin_count];
    for &v in values {
        let idx = ((v - lo) / width).floor() as usize;
        counts[idx.min(bin_count - 1)] += 1;
    }

    HistogramBins { edges, counts }
}

/// Gaussian kernel function
fn gaussian_kernel(u: f64) -> f64 {
    const SQRT_2PI: f64 = 2.5066282746310002;
    (-0.5 * u * u).exp() / SQRT_2PI
}

/// Kernel bandwidth for `data` under `rule`.
///
/// Degenerate input (one value, or zero spread) gets a narrow bandwidth
/// scaled to the magnitude of the data, so the curve becomes a spike.
pub fn select_bandwidth(data: &[f64], rule: Bandwidth) -> f64 {
    let n = data.len() as f64;
    let mean = data.iter().sum::<f64>() / n.max(1.0);
    let narrow = 1e-3 * mean.abs().max(1.0);
    if n < 2.0 {
        return narrow;
    }

    let variance = data.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1.0);
    let std_dev = variance.sqrt();

    let h = match rule {
        Bandwidth::Scott => std_dev * n.powf(-0.2),
        Bandwidth::Silverman => {
            let sorted = sorted_copy(data);
            let iqr = percentile(&sorted, 0.75) - percentile(&sorted, 0.25);
            let scale = if iqr > 0.0 { std_dev.min(iqr / 1.34) } else { std_dev };
            0.9 * scale * n.powf(-0.2)
        }
    };

    if h > 0.0 && h.is_finite() {
        h
    } else {
        narrow
    }
}

/// Compute a Gaussian KDE over a grid reaching `KDE_CUT` bandwidths past the data.
pub fn compute_kde(data: &[f64], rule: Bandwidth) -> DensityCurve {
    if data.is_empty() {
        return DensityCurve {
            grid: Vec::new(),
            density: Vec::new(),
            bandwidth: 0.0,
        };
    }

    let bandwidth = select_bandwidth(data, rule);
    let n = data.len() as f64;

    let min = data.iter().fold(f64::INFINITY, |a, &b| a.min(b));
    let max = data.iter().fold(f64::NEG_INFINITY, |a, &b| a.max(b));
    let start = min - KDE_CUT * bandwidth;
    let end = max + KDE_CUT * bandwidth;
    let step = (end - start) / (KDE_GRID_POINTS - 1) as f64;

    let mut grid = Vec::with_capacity(KDE_GRID_POINTS);
    let mut density = Vec::with_capacity(KDE_GRID_POINTS);

    for i in 0..KDE_GRID_POINTS {
        let x = start + i as f64 * step;
        let d: f64 = data
            .iter()
            .map(|&xi| gaussian_kernel((x - xi) / bandwidth))
            .sum::<f64>()
            / (n * bandwidth);
        grid.push(x);
        density.push(d.max(0.0));
    }

    DensityCurve {
        grid,
        density,
        bandwidth,
    }
}

/// Quartiles, whiskers at the furthest data within 1.5 IQR of the box, and outliers.
pub fn box_stats(attribute: &str, values: &[f64]) -> Result<BoxStats> {
    if values.is_empty() {
        return Err(ChartError::EmptyColumn(attribute.to_string()));
    }

    let ys = sorted_copy(values);
    let q1 = percentile(&ys, 0.25);
    let median = percentile(&ys, 0.50);
    let q3 = percentile(&ys, 0.75);
    let iqr = q3 - q1;

    let lower_fence = q1 - 1.5 * iqr;
    let upper_fence = q3 + 1.5 * iqr;

    // ys is sorted, so the first/last value inside the fences are the whiskers
    let lower_whisker = ys.iter().copied().find(|&v| v >= lower_fence).unwrap_or(q1);
    let upper_whisker = ys.iter().rev().copied().find(|&v| v <= upper_fence).unwrap_or(q3);

    let outliers: Vec<f64> = ys
        .iter()
        .copied()
        .filter(|&v| v < lower_fence || v > upper_fence)
        .collect();

    Ok(BoxStats {
        q1,
        median,
        q3,
        lower_whisker,
        upper_whisker,
        outliers,
    })
}

/// Group y by distinct x, aggregate each group, and sort groups by x.
pub fn aggregate_bars(pairs: &[(f64, f64)], aggregate: BarAggregate) -> BarGroups {
    let mut sorted = pairs.to_vec();
    sorted.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut categories = Vec::new();
    let mut heights = Vec::new();

    for group in sorted.chunk_by(|a, b| a.0 == b.0) {
        let sum: f64 = group.iter().map(|&(_, y)| y).sum();
        let height = match aggregate {
            BarAggregate::Sum => sum,
            BarAggregate::Mean => sum / group.len() as f64,
        };
        categories.push(category_label(group[0].0));
        heights.push(height);
    }

    BarGroups {
        categories,
        heights,
    }
}

/// Whole numbers print without a fractional part (years, months, counts).
fn category_label(x: f64) -> String {
    if x.fract() == 0.0 && x.abs() < 1e15 {
        format!("{:.0}", x)
    } else {
        x.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bin_values_counts_sum() {
        let values: Vec<f64> = (0..100).map(|i| i as f64).collect();
        let bins = bin_values(&values, 10);
        assert_eq!(bins.counts.len(), 10);
        assert_eq!(bins.edges.len(), 11);
        assert_eq!(bins.counts.iter().sum::<usize>(), 100);
        assert!(bins.counts.iter().all(|&c| c == 10));
    }

    #[test]
    fn test_bin_values_max_in_last_bin() {
        let bins = bin_values(&[0.0, 5.0, 10.0], 10);
        assert_eq!(bins.counts[0], 1);
        assert_eq!(bins.counts[5], 1);
        assert_eq!(bins.counts[9], 1);
        assert_eq!(bins.edges[0], 0.0);
        assert_eq!(bins.edges[10], 10.0);
    }

    #[test]
    fn test_bin_values_constant_column() {
        let bins = bin_values(&[3.0, 3.0, 3.0], 10);
        assert_eq!(bins.counts.iter().sum::<usize>(), 3);
        assert_eq!(bins.edges[0], 2.5);
        assert_eq!(bins.edges[10], 3.5);
        assert_eq!(bins.counts[5], 3);
    }

    #[test]
    fn test_bin_values_empty() {
        let bins = bin_values(&[], 10);
        assert!(bins.counts.is_empty());
    }

    #[test]
    fn test_kde_non_negative_and_integrates_to_one() {
        let data = vec![1.0, 2.0, 2.5, 3.0, 7.0, 8.0];
        let curve = compute_kde(&data, Bandwidth::Scott);
        assert_eq!(curve.grid.len(), KDE_GRID_POINTS);
        assert!(curve.density.iter().all(|&d| d >= 0.0));

        let step = curve.grid[1] - curve.grid[0];
        let area: f64 = curve.density.iter().sum::<f64>() * step;
        assert!((area - 1.0).abs() < 0.02, "area was {}", area);
    }

    #[test]
    fn test_kde_constant_column_is_spike() {
        let curve = compute_kde(&[5.0, 5.0, 5.0], Bandwidth::Scott);
        assert!(curve.bandwidth > 0.0);
        assert!(curve.bandwidth < 0.01);
        let peak = curve.density.iter().cloned().fold(0.0, f64::max);
        assert!(peak > 10.0);
    }

    #[test]
    fn test_bandwidth_rules() {
        let data: Vec<f64> = (1..=10).map(|i| i as f64).collect();
        let scott = select_bandwidth(&data, Bandwidth::Scott);
        let silverman = select_bandwidth(&data, Bandwidth::Silverman);
        let std = (data.iter().map(|x| (x - 5.5f64).powi(2)).sum::<f64>() / 9.0).sqrt();
        assert!((scott - std * 10f64.powf(-0.2)).abs() < 1e-12);
        assert!(silverman < scott);
    }

    #[test]
    fn test_box_stats_outliers() {
        let data = vec![1.0, 2.0, 3.0, 4.0, 5.0, 100.0];
        let stats = box_stats("streams", &data).unwrap();
        assert_eq!(stats.median, 3.5);
        assert_eq!(stats.outliers, vec![100.0]);
        assert_eq!(stats.lower_whisker, 1.0);
        assert_eq!(stats.upper_whisker, 5.0);
    }

    #[test]
    fn test_box_stats_empty() {
        let err = box_stats("liveness", &[]).unwrap_err();
        assert_eq!(err, ChartError::EmptyColumn("liveness".to_string()));
    }

    #[test]
    fn test_aggregate_bars_mean_sorted() {
        let pairs = vec![(2023.0, 10.0), (2021.0, 4.0), (2023.0, 20.0), (2022.0, 1.0)];
        let bars = aggregate_bars(&pairs, BarAggregate::Mean);
        assert_eq!(bars.categories, vec!["2021", "2022", "2023"]);
        assert_eq!(bars.heights, vec![4.0, 1.0, 15.0]);
    }

    #[test]
    fn test_aggregate_bars_sum() {
        let pairs = vec![(1.0, 10.0), (1.0, 15.0), (2.0, 20.0)];
        let bars = aggregate_bars(&pairs, BarAggregate::Sum);
        assert_eq!(bars.heights, vec![25.0, 20.0]);
    }

    #[test]
    fn test_category_label() {
        assert_eq!(category_label(7.0), "7");
        assert_eq!(category_label(0.5), "0.5");
    }
}
