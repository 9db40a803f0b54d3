use crate::ir::Visual;

/// One axis of a panel.
#[derive(Debug, Clone, PartialEq)]
pub struct Scale {
    pub min: f64,
    pub max: f64,
    /// Labels for category indices 0..n when the axis is categorical
    pub categories: Option<Vec<String>>,
}

impl Scale {
    fn continuous((min, max): (f64, f64)) -> Self {
        Scale {
            min,
            max,
            categories: None,
        }
    }

    pub fn is_categorical(&self) -> bool {
        self.categories.is_some()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PanelScales {
    pub x: Scale,
    pub y: Scale,
}

/// Build the x/y scales for the primary panel of a figure
pub fn build_scales(visual: &Visual) -> PanelScales {
    match visual {
        Visual::Histogram(bins) => {
            let x = min_max(bins.edges.iter().copied());
            let y = min_max(bins.counts.iter().map(|&c| c as f64));
            PanelScales {
                x: Scale::continuous(pad_range(x.0, x.1)),
                y: Scale::continuous(pad_top(include_zero(y))),
            }
        }
        Visual::Density(curve) => {
            let x = min_max(curve.grid.iter().copied());
            let y = min_max(curve.density.iter().copied());
            PanelScales {
                x: Scale::continuous(nonzero_width(x)),
                // density axis starts at 0, matching the clipped curve
                y: Scale::continuous(pad_top((0.0, y.1.max(0.0)))),
            }
        }
        Visual::Bars(bars) => {
            let n = bars.categories.len().max(1) as f64;
            let y = min_max(bars.heights.iter().copied());
            PanelScales {
                x: Scale {
                    min: -0.5,
                    max: n - 0.5,
                    categories: Some(bars.categories.clone()),
                },
                y: Scale::continuous(pad_top(include_zero(y))),
            }
        }
        Visual::Points(points) | Visual::Trace(points) => {
            let x = min_max(points.iter().map(|p| p.0));
            let y = min_max(points.iter().map(|p| p.1));
            PanelScales {
                x: Scale::continuous(pad_range(x.0, x.1)),
                y: Scale::continuous(pad_range(y.0, y.1)),
            }
        }
        Visual::Boxplot(stats) => {
            let values = [stats.lower_whisker, stats.upper_whisker, stats.q1, stats.q3]
                .into_iter()
                .chain(stats.outliers.iter().copied());
            let y = min_max(values);
            PanelScales {
                x: Scale {
                    min: -0.5,
                    max: 0.5,
                    categories: Some(vec![String::new()]),
                },
                y: Scale::continuous(pad_range(y.0, y.1)),
            }
        }
    }
}

fn min_max(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (min, max) = values
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    if min > max {
        // no finite values
        (0.0, 1.0)
    } else {
        (min, max)
    }
}

/// Widen a range by 5% on each side; a single value gets +-1.
pub fn pad_range(min: f64, max: f64) -> (f64, f64) {
    if min == max {
        (min - 1.0, max + 1.0)
    } else {
        let padding = (max - min) * 0.05;
        (min - padding, max + padding)
    }
}

fn include_zero((min, max): (f64, f64)) -> (f64, f64) {
    (min.min(0.0), max.max(0.0))
}

fn pad_top((min, max): (f64, f64)) -> (f64, f64) {
    if min == max {
        (min, max + 1.0)
    } else {
        (min, max + (max - min) * 0.05)
    }
}

fn nonzero_width((min, max): (f64, f64)) -> (f64, f64) {
    if min == max {
        (min - 1.0, max + 1.0)
    } else {
        (min, max)
    }
}
