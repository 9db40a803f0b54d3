// Chart strategy family: one module per chart kind, one shared render contract

pub mod bar;
pub mod boxplot;
pub mod density;
pub mod histogram;
pub mod line;
pub mod scatter;

use crate::data::Dataset;
use crate::dispatch::AttributeSelector;
use crate::error::{ChartError, Result};
use crate::ir::Figure;
use crate::stats::{self, SummaryStatistics};
use crate::RenderOptions;
use std::fmt;
use std::str::FromStr;

/// The closed set of supported charts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartKind {
    Histogram,
    Density,
    Bar,
    Scatter,
    Line,
    Boxplot,
}

impl ChartKind {
    pub const ALL: [ChartKind; 6] = [
        ChartKind::Histogram,
        ChartKind::Density,
        ChartKind::Bar,
        ChartKind::Scatter,
        ChartKind::Line,
        ChartKind::Boxplot,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ChartKind::Histogram => "histogram",
            ChartKind::Density => "density",
            ChartKind::Bar => "bar",
            ChartKind::Scatter => "scatter",
            ChartKind::Line => "line",
            ChartKind::Boxplot => "boxplot",
        }
    }

    /// Number of attributes the chart is drawn from: 1, or 2 for an x/y pair.
    pub fn arity(self) -> usize {
        match self {
            ChartKind::Histogram | ChartKind::Density | ChartKind::Boxplot => 1,
            ChartKind::Bar | ChartKind::Scatter | ChartKind::Line => 2,
        }
    }

    /// Whether the figure carries a statistics panel below the visual.
    pub fn has_stats_panel(self) -> bool {
        !matches!(self, ChartKind::Boxplot)
    }
}

impl FromStr for ChartKind {
    type Err = ChartError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        ChartKind::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ChartError::UnknownChartKind(wanted.to_string()))
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Render `kind` over the selected attributes.
///
/// The selector must already match the chart's arity; a mismatch is
/// reported as `AttributeArity` rather than guessed around.
pub fn render(
    kind: ChartKind,
    dataset: &Dataset,
    selector: &AttributeSelector,
    options: &RenderOptions,
) -> Result<Figure> {
    match (kind, selector) {
        (ChartKind::Histogram, AttributeSelector::Single(a)) => histogram::render(dataset, a, options),
        (ChartKind::Density, AttributeSelector::Single(a)) => density::render(dataset, a, options),
        (ChartKind::Boxplot, AttributeSelector::Single(a)) => boxplot::render(dataset, a, options),
        (ChartKind::Bar, AttributeSelector::Pair { x, y }) => bar::render(dataset, x, y, options),
        (ChartKind::Scatter, AttributeSelector::Pair { x, y }) => scatter::render(dataset, x, y, options),
        (ChartKind::Line, AttributeSelector::Pair { x, y }) => line::render(dataset, x, y, options),
        (kind, selector) => Err(ChartError::AttributeArity {
            kind: kind.name().to_string(),
            expected: kind.arity(),
            found: selector.arity(),
        }),
    }
}

/// Non-missing values of one attribute, failing with `EmptyColumn` when there are none.
pub(crate) fn usable_values(dataset: &Dataset, attribute: &str) -> Result<Vec<f64>> {
    let values = dataset.values(attribute)?;
    if values.is_empty() {
        return Err(ChartError::EmptyColumn(attribute.to_string()));
    }
    Ok(values)
}

/// Axis label for an attribute: first letter upper-case, the rest lower-case.
pub(crate) fn axis_label(attribute: &str) -> String {
    let mut chars = attribute.trim().chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Summarize a pair independently (x row, then y row) and return the
/// rows where both attributes are present.
pub(crate) fn pair_inputs(
    dataset: &Dataset,
    x: &str,
    y: &str,
) -> Result<(SummaryStatistics, Vec<(f64, f64)>)> {
    let summary = stats::summarize(dataset, &[x, y])?;
    let points = dataset.paired_values(x, y)?;
    Ok((summary, points))
}
