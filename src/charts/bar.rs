use super::{axis_label, pair_inputs, ChartKind};
use crate::data::Dataset;
use crate::error::Result;
use crate::ir::{Figure, Visual};
use crate::stats::SummaryStatistics;
use crate::transform::aggregate_bars;
use crate::RenderOptions;

/// Bars of y aggregated per distinct x value; the table summarizes y only.
pub fn render(dataset: &Dataset, x: &str, y: &str, options: &RenderOptions) -> Result<Figure> {
    let (joint, pairs) = pair_inputs(dataset, x, y)?;
    let bars = aggregate_bars(&pairs, options.bar_aggregate);

    // keep the y row of the joint table
    let y_row = &joint.rows()[1];
    let summary = SummaryStatistics::from_rows(vec![y_row.clone()]);

    let (x_label, y_label) = (axis_label(x), axis_label(y));
    Ok(Figure {
        kind: ChartKind::Bar,
        title: format!("Bar Plot of {} by {}", y_label, x_label),
        x_label,
        y_label,
        visual: Visual::Bars(bars),
        summary: Some(summary),
    })
}
