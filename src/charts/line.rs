use super::{axis_label, pair_inputs, ChartKind};
use crate::data::Dataset;
use crate::error::Result;
use crate::ir::{Figure, Visual};
use crate::RenderOptions;

/// Trace of y against x in row order: no sorting, no interpolation.
pub fn render(dataset: &Dataset, x: &str, y: &str, _options: &RenderOptions) -> Result<Figure> {
    let (summary, points) = pair_inputs(dataset, x, y)?;

    let (x_label, y_label) = (axis_label(x), axis_label(y));
    Ok(Figure {
        kind: ChartKind::Line,
        title: format!("Line Plot of {} vs {}", y_label, x_label),
        x_label,
        y_label,
        visual: Visual::Trace(points),
        summary: Some(summary),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_keeps_row_order() {
        let data = Dataset::from_csv_str("bpm,energy\n120,0.5\n80,0.9\n100,0.1\n").unwrap();
        let figure = render(&data, "bpm", "energy", &RenderOptions::default()).unwrap();
        assert_eq!(
            figure.visual,
            Visual::Trace(vec![(120.0, 0.5), (80.0, 0.9), (100.0, 0.1)])
        );
        assert_eq!(figure.title, "Line Plot of Energy vs Bpm");
        assert_eq!(figure.axes_count(), 2);
    }
}
