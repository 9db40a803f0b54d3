// Library exports for hotcharts

pub mod charts;
pub mod data;
pub mod dispatch;
pub mod error;
pub mod graph;
pub mod ir;
pub mod parser;
pub mod scale;
pub mod stats;
pub mod transform;

pub use charts::ChartKind;
pub use data::Dataset;
pub use dispatch::{AttributeSelector, ChartDispatcher, ChartRequest, SPOTIFY_ATTRIBUTES};
pub use error::{ChartError, Result};
pub use ir::{Figure, Visual};
pub use stats::{summarize, SummaryStatistics};

use serde::Deserialize;
use transform::{BarAggregate, Bandwidth};

#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[serde(rename = "png")]
    #[default]
    Png,
    #[serde(rename = "svg")]
    Svg,
}

/// Rendering configuration, typically read from a JSON file.
/// Every field is optional in the JSON form.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct RenderOptions {
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    #[serde(default, rename = "type")]
    pub format: OutputFormat,
    /// Histogram bin count
    #[serde(default = "default_bins")]
    pub bins: usize,
    #[serde(default)]
    pub bandwidth: Bandwidth,
    #[serde(default)]
    pub bar_aggregate: BarAggregate,
    #[serde(default = "default_fill_color")]
    pub fill_color: String,
    #[serde(default = "default_edge_color")]
    pub edge_color: String,
}

const MIN_CANVAS_SIDE: u32 = 100;
const MAX_CANVAS_SIDE: u32 = 8192;

fn default_width() -> u32 { 800 }
fn default_height() -> u32 { 1000 }
fn default_bins() -> usize { 10 }
fn default_fill_color() -> String { "blue".to_string() }
fn default_edge_color() -> String { "black".to_string() }

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            format: OutputFormat::Png,
            bins: default_bins(),
            bandwidth: Bandwidth::Scott,
            bar_aggregate: BarAggregate::Mean,
            fill_color: default_fill_color(),
            edge_color: default_edge_color(),
        }
    }
}

impl RenderOptions {
    pub fn from_json_str(text: &str) -> anyhow::Result<Self> {
        let options: RenderOptions = serde_json::from_str(text)?;
        options.validate()?;
        Ok(options)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.width < MIN_CANVAS_SIDE || self.height < MIN_CANVAS_SIDE {
            anyhow::bail!(
                "Canvas must be at least {}x{} pixels (got {}x{})",
                MIN_CANVAS_SIDE,
                MIN_CANVAS_SIDE,
                self.width,
                self.height
            );
        }
        if self.width > MAX_CANVAS_SIDE || self.height > MAX_CANVAS_SIDE {
            anyhow::bail!(
                "Canvas must be at most {}x{} pixels (got {}x{})",
                MAX_CANVAS_SIDE,
                MAX_CANVAS_SIDE,
                self.width,
                self.height
            );
        }
        if self.bins == 0 {
            anyhow::bail!("Histogram needs at least one bin");
        }
        Ok(())
    }
}
