use crate::charts::ChartKind;
use crate::stats::SummaryStatistics;
use crate::transform::{BarGroups, BoxStats, DensityCurve, HistogramBins};

// =============================================================================
// Figure: the artifact handed from the chart core to the presentation surface
// =============================================================================

/// The primary geometry of a figure, already computed from the data.
#[derive(Debug, Clone, PartialEq)]
pub enum Visual {
    Histogram(HistogramBins),
    Density(DensityCurve),
    Bars(BarGroups),
    /// Unordered point cloud
    Points(Vec<(f64, f64)>),
    /// Polyline through the points in row order
    Trace(Vec<(f64, f64)>),
    Boxplot(BoxStats),
}

/// A renderable chart: a visual axis plus an optional statistics-table axis.
///
/// Figures are plain values; rasterize one with [`crate::graph::render`].
#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    pub kind: ChartKind,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub visual: Visual,
    pub summary: Option<SummaryStatistics>,
}

impl Figure {
    /// Number of axes in the figure: the visual, plus the table if present.
    pub fn axes_count(&self) -> usize {
        1 + usize::from(self.summary.is_some())
    }

    pub fn stats_panel(&self) -> Option<&SummaryStatistics> {
        self.summary.as_ref()
    }
}
