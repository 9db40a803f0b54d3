use super::{axis_label, usable_values, ChartKind};
use crate::data::Dataset;
use crate::error::Result;
use crate::ir::{Figure, Visual};
use crate::transform::box_stats;
use crate::RenderOptions;

/// Box-and-whisker plot of one attribute. Boxplots carry no statistics panel.
pub fn render(dataset: &Dataset, attribute: &str, _options: &RenderOptions) -> Result<Figure> {
    let values = usable_values(dataset, attribute)?;
    let stats = box_stats(attribute, &values)?;

    let label = axis_label(attribute);
    Ok(Figure {
        kind: ChartKind::Boxplot,
        title: format!("Boxplot of {}", label),
        x_label: String::new(),
        y_label: label,
        visual: Visual::Boxplot(stats),
        summary: None,
    })
}
