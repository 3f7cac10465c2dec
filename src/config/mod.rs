//! Configuration types for the analysis pipeline.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for nearest-neighbor subsampling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SamplingConfig {
    /// Maximum working set size for the nearest-neighbor computation.
    #[serde(default = "default_sample_size")]
    pub sample_size: usize,

    /// Optional RNG seed. When unset the sample is drawn from OS entropy
    /// and repeated runs may yield slightly different averages.
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_sample_size() -> usize {
    1000
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            sample_size: default_sample_size(),
            seed: None,
        }
    }
}

/// Configuration for the Z-value histogram chart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistogramConfig {
    /// Number of histogram bins.
    #[serde(default = "default_bins")]
    pub bins: usize,

    /// Rendered image width in pixels.
    #[serde(default = "default_histogram_width")]
    pub width: u32,

    /// Rendered image height in pixels.
    #[serde(default = "default_histogram_height")]
    pub height: u32,
}

fn default_bins() -> usize {
    20
}

// Charts are embedded in the PDF as uncompressed raster, so the default
// dimensions are chosen to keep both payloads under the report size budget.
fn default_histogram_width() -> u32 {
    560
}

fn default_histogram_height() -> u32 {
    320
}

impl Default for HistogramConfig {
    fn default() -> Self {
        Self {
            bins: default_bins(),
            width: default_histogram_width(),
            height: default_histogram_height(),
        }
    }
}

/// Configuration for the 3D scatter chart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScatterConfig {
    /// Maximum points to plot (stride-subsampled if exceeded).
    #[serde(default = "default_scatter_max_points")]
    pub max_points: usize,

    /// Rendered image width in pixels.
    #[serde(default = "default_scatter_width")]
    pub width: u32,

    /// Rendered image height in pixels.
    #[serde(default = "default_scatter_height")]
    pub height: u32,

    /// Point marker radius in pixels.
    #[serde(default = "default_point_size")]
    pub point_size: u32,
}

fn default_scatter_max_points() -> usize {
    50_000
}

fn default_scatter_width() -> u32 {
    560
}

fn default_scatter_height() -> u32 {
    420
}

fn default_point_size() -> u32 {
    2
}

impl Default for ScatterConfig {
    fn default() -> Self {
        Self {
            max_points: default_scatter_max_points(),
            width: default_scatter_width(),
            height: default_scatter_height(),
            point_size: default_point_size(),
        }
    }
}

/// Configuration for report assembly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Target artifact size in megabytes. Exceeding it produces a warning,
    /// never a failure.
    #[serde(default = "default_size_budget_mb")]
    pub size_budget_mb: f64,
}

fn default_size_budget_mb() -> f64 {
    2.0
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            size_budget_mb: default_size_budget_mb(),
        }
    }
}

/// Main analysis configuration combining all sub-configs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default)]
    pub sampling: SamplingConfig,

    #[serde(default)]
    pub histogram: HistogramConfig,

    #[serde(default)]
    pub scatter: ScatterConfig,

    #[serde(default)]
    pub report: ReportConfig,
}

impl AnalysisConfig {
    /// Load configuration from a YAML file.
    pub fn from_yaml<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        let config: AnalysisConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a YAML file.
    pub fn to_yaml<P: AsRef<Path>>(&self, path: P) -> Result<(), Box<dyn std::error::Error>> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
