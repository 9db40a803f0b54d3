use crate::error::{ChartError, Result};
use serde_json::Value;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Cell spellings treated as a missing value (compared case-insensitively).
const MISSING_MARKERS: [&str; 5] = ["na", "n/a", "nan", "null", "none"];

/// Read-only, row-ordered table of named columns.
///
/// Cells are stored as the text that was read; numeric interpretation
/// happens per request so that identifying text columns (track name,
/// artist) can live next to the numeric attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Dataset {
    /// Build a dataset from already-split headers and rows.
    ///
    /// Every row must have exactly one cell per header.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self> {
        validate_headers(&headers)?;
        for (idx, row) in rows.iter().enumerate() {
            if row.len() != headers.len() {
                return Err(ChartError::DataLoad(format!(
                    "row {} has {} fields, header has {}",
                    idx + 1,
                    row.len(),
                    headers.len()
                )));
            }
        }
        Ok(Self { headers, rows })
    }

    /// Load a CSV file with a header row.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            ChartError::DataLoad(format!("cannot open '{}': {}", path.display(), e))
        })?;
        let dataset = Self::from_reader(file)?;
        tracing::info!(
            path = %path.display(),
            rows = dataset.row_count(),
            columns = dataset.headers.len(),
            "loaded dataset"
        );
        Ok(dataset)
    }

    /// Parse CSV from any reader. Invalid UTF-8 is replaced rather than rejected,
    /// since exported song titles are frequently Latin-1.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(reader);

        let headers: Vec<String> = csv_reader
            .byte_headers()
            .map_err(|e| ChartError::DataLoad(format!("cannot read header: {}", e)))?
            .iter()
            .map(|h| String::from_utf8_lossy(h).trim().to_string())
            .collect();

        if headers.is_empty() || (headers.len() == 1 && headers[0].is_empty()) {
            return Err(ChartError::DataLoad("missing header row".to_string()));
        }
        validate_headers(&headers)?;

        let mut rows = Vec::new();
        for (idx, record) in csv_reader.byte_records().enumerate() {
            let record = record
                .map_err(|e| ChartError::DataLoad(format!("row {}: {}", idx + 1, e)))?;
            rows.push(
                record
                    .iter()
                    .map(|cell| String::from_utf8_lossy(cell).into_owned())
                    .collect(),
            );
        }

        Ok(Self { headers, rows })
    }

    /// Parse CSV held in memory.
    pub fn from_csv_str(text: &str) -> Result<Self> {
        Self::from_reader(text.as_bytes())
    }

    /// Create a dataset from a JSON array of objects
    pub fn from_json(value: &Value) -> Result<Self> {
        let array = value.as_array().ok_or_else(|| {
            ChartError::DataLoad("input data must be a JSON array of objects".to_string())
        })?;

        if array.is_empty() {
            return Err(ChartError::DataLoad("input data array is empty".to_string()));
        }

        // Extract headers from the first object
        let first_obj = array[0].as_object().ok_or_else(|| {
            ChartError::DataLoad("items in array must be objects".to_string())
        })?;

        let headers: Vec<String> = first_obj.keys().cloned().collect();

        let mut rows = Vec::with_capacity(array.len());
        for item in array {
            let obj = item.as_object().ok_or_else(|| {
                ChartError::DataLoad("items in array must be objects".to_string())
            })?;

            let mut row = Vec::with_capacity(headers.len());
            for header in &headers {
                let val_str = match obj.get(header) {
                    Some(Value::String(s)) => s.clone(),
                    Some(Value::Number(n)) => n.to_string(),
                    Some(Value::Bool(b)) => b.to_string(),
                    Some(Value::Null) | None => String::new(),
                    _ => {
                        return Err(ChartError::DataLoad(format!(
                            "unsupported value type for field '{}'",
                            header
                        )))
                    }
                };
                row.push(val_str);
            }
            rows.push(row);
        }

        Self::new(headers, rows)
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_ok()
    }

    /// Raw cells of a column, in row order.
    pub fn column(&self, name: &str) -> Result<Vec<&str>> {
        let idx = self.column_index(name)?;
        Ok(self.rows.iter().map(|row| row[idx].as_str()).collect())
    }

    /// Numeric view of a column: `None` marks a missing cell.
    ///
    /// Fails with `NonNumeric` on the first non-missing cell that does not
    /// parse as a float.
    pub fn numeric_column(&self, name: &str) -> Result<Vec<Option<f64>>> {
        let idx = self.column_index(name)?;
        tracing::debug!(attribute = name, rows = self.rows.len(), "extracting numeric column");

        self.rows
            .iter()
            .enumerate()
            .map(|(row_idx, row)| {
                let cell = row[idx].trim();
                if is_missing(cell) {
                    return Ok(None);
                }
                // `inf` and `infinity` parse as f64 but are not usable data
                match cell.parse::<f64>() {
                    Ok(v) if v.is_finite() => Ok(Some(v)),
                    _ => Err(ChartError::NonNumeric {
                        attribute: self.headers[idx].clone(),
                        row: row_idx + 1,
                        value: cell.to_string(),
                    }),
                }
            })
            .collect()
    }

    /// The non-missing values of a numeric column, in row order.
    pub fn values(&self, name: &str) -> Result<Vec<f64>> {
        Ok(self.numeric_column(name)?.into_iter().flatten().collect())
    }

    /// Row-aligned (x, y) pairs where both cells are present.
    pub fn paired_values(&self, x: &str, y: &str) -> Result<Vec<(f64, f64)>> {
        let xs = self.numeric_column(x)?;
        let ys = self.numeric_column(y)?;
        Ok(xs
            .into_iter()
            .zip(ys)
            .filter_map(|pair| match pair {
                (Some(x), Some(y)) => Some((x, y)),
                _ => None,
            })
            .collect())
    }

    fn column_index(&self, name: &str) -> Result<usize> {
        let name = name.trim();
        self.headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case(name))
            .ok_or_else(|| ChartError::UnknownAttribute(name.to_string()))
    }
}

fn validate_headers(headers: &[String]) -> Result<()> {
    if headers.is_empty() {
        return Err(ChartError::DataLoad("missing header row".to_string()));
    }
    if let Some(pos) = headers.iter().position(|h| h.trim().is_empty()) {
        return Err(ChartError::DataLoad(format!(
            "header column {} has no name",
            pos + 1
        )));
    }
    Ok(())
}

fn is_missing(cell: &str) -> bool {
    cell.is_empty() || MISSING_MARKERS.iter().any(|m| cell.eq_ignore_ascii_case(m))
}
