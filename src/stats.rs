//! Descriptive summary statistics (count, mean, std, min, quartiles, max).

use crate::data::Dataset;
use crate::error::{ChartError, Result};
use std::fmt;

/// Column labels of a summary table, in display order.
pub const STAT_LABELS: [&str; 8] = ["count", "mean", "std", "min", "25%", "50%", "75%", "max"];

/// The eight descriptive statistics of one attribute.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeSummary {
    pub attribute: String,
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation; `NaN` when only one value is present.
    pub std: f64,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

impl AttributeSummary {
    /// Summarize a slice of non-missing values.
    pub fn from_values(attribute: &str, values: &[f64]) -> Result<Self> {
        if values.is_empty() {
            return Err(ChartError::EmptyColumn(attribute.to_string()));
        }

        let count = values.len();
        let n = count as f64;
        let mean = values.iter().sum::<f64>() / n;

        let std = if count > 1 {
            let sum_sq = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>();
            (sum_sq / (n - 1.0)).sqrt()
        } else {
            f64::NAN
        };

        let sorted = sorted_copy(values);

        Ok(Self {
            attribute: attribute.to_string(),
            count,
            mean,
            std,
            min: sorted[0],
            q1: percentile(&sorted, 0.25),
            median: percentile(&sorted, 0.50),
            q3: percentile(&sorted, 0.75),
            max: sorted[count - 1],
        })
    }

    /// Statistics in `STAT_LABELS` order.
    pub fn values(&self) -> [f64; 8] {
        [
            self.count as f64,
            self.mean,
            self.std,
            self.min,
            self.q1,
            self.median,
            self.q3,
            self.max,
        ]
    }

    /// Display cells in `STAT_LABELS` order.
    pub fn cells(&self) -> Vec<String> {
        let mut cells = vec![self.count.to_string()];
        cells.extend(self.values()[1..].iter().map(|&v| format_stat(v)));
        cells
    }
}

/// Summary table keyed by attribute, in request order.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryStatistics {
    rows: Vec<AttributeSummary>,
}

impl SummaryStatistics {
    /// Summarize already-extracted columns, keeping their order.
    pub fn from_columns(columns: &[(&str, &[f64])]) -> Result<Self> {
        let rows = columns
            .iter()
            .map(|&(name, values)| AttributeSummary::from_values(name, values))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { rows })
    }

    pub(crate) fn from_rows(rows: Vec<AttributeSummary>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[AttributeSummary] {
        &self.rows
    }

    pub fn get(&self, attribute: &str) -> Option<&AttributeSummary> {
        self.rows
            .iter()
            .find(|r| r.attribute.eq_ignore_ascii_case(attribute))
    }

    /// Header row of the rendered table: an empty corner cell followed by the labels.
    pub fn header(&self) -> Vec<String> {
        std::iter::once(String::new())
            .chain(STAT_LABELS.iter().map(|s| s.to_string()))
            .collect()
    }

    /// Body rows of the rendered table: attribute name followed by its cells.
    pub fn table_rows(&self) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|row| {
                std::iter::once(row.attribute.clone())
                    .chain(row.cells())
                    .collect()
            })
            .collect()
    }
}

impl fmt::Display for SummaryStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut lines = vec![self.header()];
        lines.extend(self.table_rows());

        let columns = lines[0].len();
        let widths: Vec<usize> = (0..columns)
            .map(|c| lines.iter().map(|l| l[c].chars().count()).max().unwrap_or(0))
            .collect();

        for line in &lines {
            let cells: Vec<String> = line
                .iter()
                .zip(&widths)
                .enumerate()
                .map(|(c, (cell, &w))| {
                    if c == 0 {
                        format!("{:<w$}", cell, w = w)
                    } else {
                        format!("{:>w$}", cell, w = w)
                    }
                })
                .collect();
            writeln!(f, "{}", cells.join("  ").trim_end())?;
        }
        Ok(())
    }
}

/// Summarize one attribute, or an (x, y) pair in the given order.
pub fn summarize(dataset: &Dataset, attributes: &[&str]) -> Result<SummaryStatistics> {
    // a summary covers one attribute or an (x, y) pair; the pair is the upper bound reported
    if attributes.is_empty() || attributes.len() > 2 {
        return Err(ChartError::AttributeArity {
            kind: "summary".to_string(),
            expected: 2,
            found: attributes.len(),
        });
    }

    let columns = attributes
        .iter()
        .map(|&name| Ok((name, dataset.values(name)?)))
        .collect::<Result<Vec<_>>>()?;
    let borrowed: Vec<(&str, &[f64])> = columns
        .iter()
        .map(|(name, values)| (*name, values.as_slice()))
        .collect();

    SummaryStatistics::from_columns(&borrowed)
}

/// Linear interpolation between order statistics: `rank = p * (n - 1)`.
pub fn percentile(sorted_data: &[f64], p: f64) -> f64 {
    let n = sorted_data.len();
    if n == 0 {
        return f64::NAN;
    }
    if n == 1 {
        return sorted_data[0];
    }

    let rank = p * (n - 1) as f64;
    let lower_idx = rank.floor() as usize;
    let upper_idx = rank.ceil() as usize;

    if lower_idx == upper_idx {
        sorted_data[lower_idx]
    } else {
        let weight = rank - lower_idx as f64;
        sorted_data[lower_idx] * (1.0 - weight) + sorted_data[upper_idx] * weight
    }
}

pub(crate) fn sorted_copy(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted
}

/// Compact cell text: up to four decimals, scientific for large magnitudes.
pub fn format_stat(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.abs() >= 1e7 {
        return format!("{:.3e}", value);
    }
    let text = format!("{:.4}", value);
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}
