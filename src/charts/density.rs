use super::{axis_label, usable_values, ChartKind};
use crate::data::Dataset;
use crate::error::Result;
use crate::ir::{Figure, Visual};
use crate::stats::SummaryStatistics;
use crate::transform::compute_kde;
use crate::RenderOptions;

/// Kernel density estimate of one attribute with its summary table.
pub fn render(dataset: &Dataset, attribute: &str, options: &RenderOptions) -> Result<Figure> {
    let values = usable_values(dataset, attribute)?;
    let summary = SummaryStatistics::from_columns(&[(attribute, values.as_slice())])?;
    let curve = compute_kde(&values, options.bandwidth);

    let label = axis_label(attribute);
    Ok(Figure {
        kind: ChartKind::Density,
        title: format!("Density Plot of {}", label),
        x_label: label,
        y_label: "Density".to_string(),
        visual: Visual::Density(curve),
        summary: Some(summary),
    })
}
