use super::{axis_label, pair_inputs, ChartKind};
use crate::data::Dataset;
use crate::error::Result;
use crate::ir::{Figure, Visual};
use crate::RenderOptions;

/// Raw (x, y) point cloud with a joint summary table.
pub fn render(dataset: &Dataset, x: &str, y: &str, _options: &RenderOptions) -> Result<Figure> {
    let (summary, points) = pair_inputs(dataset, x, y)?;

    let (x_label, y_label) = (axis_label(x), axis_label(y));
    Ok(Figure {
        kind: ChartKind::Scatter,
        title: format!("Scatter Plot of {} vs {}", y_label, x_label),
        x_label,
        y_label,
        visual: Visual::Points(points),
        summary: Some(summary),
    })
}
