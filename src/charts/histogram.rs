use super::{axis_label, usable_values, ChartKind};
use crate::data::Dataset;
use crate::error::Result;
use crate::ir::{Figure, Visual};
use crate::stats::SummaryStatistics;
use crate::transform::bin_values;
use crate::RenderOptions;

/// Frequency histogram of one attribute with its summary table.
pub fn render(dataset: &Dataset, attribute: &str, options: &RenderOptions) -> Result<Figure> {
    let values = usable_values(dataset, attribute)?;
    let summary = SummaryStatistics::from_columns(&[(attribute, values.as_slice())])?;
    let bins = bin_values(&values, options.bins);

    let label = axis_label(attribute);
    Ok(Figure {
        kind: ChartKind::Histogram,
        title: format!("Histogram of {}", label),
        x_label: label,
        y_label: "Frequency".to_string(),
        visual: Visual::Histogram(bins),
        summary: Some(summary),
    })
}
