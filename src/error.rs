use thiserror::Error;

/// Errors raised by the chart core.
///
/// Only `DataLoad` is fatal; every other variant aborts the current request
/// and leaves the dataset and dispatcher ready for the next one.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChartError {
    #[error("Failed to load dataset: {0}")]
    DataLoad(String),

    #[error("Unknown attribute '{0}'")]
    UnknownAttribute(String),

    #[error("Attribute '{attribute}' is not numeric (row {row}: '{value}')")]
    NonNumeric {
        attribute: String,
        row: usize,
        value: String,
    },

    #[error("Unknown chart kind '{0}' (expected one of: histogram, density, bar, scatter, line, boxplot)")]
    UnknownChartKind(String),

    #[error("Chart '{kind}' expects {expected} attribute(s), got {found}")]
    AttributeArity {
        kind: String,
        expected: usize,
        found: usize,
    },

    #[error("Attribute '{0}' has no usable values")]
    EmptyColumn(String),

    #[error("Invalid chart request: {0}")]
    Parse(String),
}

pub type Result<T> = std::result::Result<T, ChartError>;
