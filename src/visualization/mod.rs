//! Chart rendering for point cloud reports.
//!
//! Renders a Z-value histogram and a Z-colored 3D scatter into in-memory RGB
//! buffers using plotters, then encodes each as PNG. Charts are drawn without
//! text (no titles or tick labels), so rendering has no runtime font
//! dependency; captions are supplied by the report layout instead.

use plotters::prelude::*;
use plotters_bitmap::BitMapBackend;
use thiserror::Error;

use crate::config::{HistogramConfig, ScatterConfig};
use crate::core::loaders::PointCloud;

/// Errors that can occur during chart rendering.
#[derive(Error, Debug)]
pub enum VisualizationError {
    #[error("plotting error: {0}")]
    PlottingError(String),

    #[error("PNG encoding error: {0}")]
    Encode(#[from] image::ImageError),

    #[error("empty point cloud")]
    EmptyPointCloud,
}

/// Result type for visualization operations.
pub type Result<T> = std::result::Result<T, VisualizationError>;

/// Encoded PNG buffers for the two report charts.
#[derive(Debug, Clone)]
pub struct ChartSet {
    /// Z-value distribution histogram.
    pub histogram_png: Vec<u8>,
    /// 3D scatter colored by Z value.
    pub scatter_png: Vec<u8>,
}

/// Histogram bar fill color (steel blue).
const BAR_COLOR: RGBColor = RGBColor(70, 130, 180);

/// Anchor colors for the Z gradient, low to high.
const GRADIENT_ANCHORS: &[(u8, u8, u8)] = &[
    (68, 1, 84),    // dark violet
    (59, 82, 139),  // blue
    (33, 145, 140), // teal
    (94, 201, 98),  // green
    (253, 231, 37), // yellow
];

/// Render both report charts for a point cloud.
pub fn render_charts(
    cloud: &PointCloud,
    histogram: &HistogramConfig,
    scatter: &ScatterConfig,
) -> Result<ChartSet> {
    Ok(ChartSet {
        histogram_png: render_z_histogram(cloud, histogram)?,
        scatter_png: render_scatter_3d(cloud, scatter)?,
    })
}

/// Render a histogram of Z values as an encoded PNG buffer.
pub fn render_z_histogram(cloud: &PointCloud, config: &HistogramConfig) -> Result<Vec<u8>> {
    if cloud.is_empty() {
        return Err(VisualizationError::EmptyPointCloud);
    }

    let bins = config.bins.max(1);
    let (z_min, z_max) = value_range(&cloud.z);
    let bin_width = (z_max - z_min) / bins as f64;

    // Bin counts; the top edge folds into the last bin
    let mut counts = vec![0u32; bins];
    for &z in &cloud.z {
        let idx = (((z - z_min) / bin_width) as usize).min(bins - 1);
        counts[idx] += 1;
    }
    let max_count = counts.iter().copied().max().unwrap_or(1).max(1);

    let size = (config.width, config.height);
    let mut buf = vec![0u8; (size.0 * size.1 * 3) as usize];
    {
        let root = BitMapBackend::with_buffer(&mut buf, size).into_drawing_area();
        root.fill(&WHITE)
            .map_err(|e| VisualizationError::PlottingError(e.to_string()))?;

        let mut chart = ChartBuilder::on(&root)
            .margin(12)
            .build_cartesian_2d(z_min..z_max, 0u32..(max_count + max_count / 10 + 1))
            .map_err(|e| VisualizationError::PlottingError(e.to_string()))?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .disable_y_mesh()
            .draw()
            .map_err(|e| VisualizationError::PlottingError(e.to_string()))?;

        chart
            .draw_series(counts.iter().enumerate().map(|(i, &count)| {
                let x0 = z_min + i as f64 * bin_width;
                let x1 = x0 + bin_width;
                Rectangle::new([(x0, 0), (x1, count)], BAR_COLOR.mix(0.7).filled())
            }))
            .map_err(|e| VisualizationError::PlottingError(e.to_string()))?;

        root.present()
            .map_err(|e| VisualizationError::PlottingError(e.to_string()))?;
    }

    encode_png(buf, size.0, size.1)
}

/// Render a 3D scatter plot colored by Z value as an encoded PNG buffer.
///
/// Clouds larger than `config.max_points` are stride-subsampled, which keeps
/// the rendering deterministic for a given input.
pub fn render_scatter_3d(cloud: &PointCloud, config: &ScatterConfig) -> Result<Vec<u8>> {
    if cloud.is_empty() {
        return Err(VisualizationError::EmptyPointCloud);
    }

    let n = cloud.len();
    let max_points = config.max_points.max(1);
    let step = if n > max_points { n / max_points } else { 1 };

    let (x_min, x_max) = value_range(&cloud.x);
    let (y_min, y_max) = value_range(&cloud.y);
    let (z_min, z_max) = value_range(&cloud.z);
    let z_span = z_max - z_min;

    let size = (config.width, config.height);
    let mut buf = vec![0u8; (size.0 * size.1 * 3) as usize];
    {
        let root = BitMapBackend::with_buffer(&mut buf, size).into_drawing_area();
        root.fill(&WHITE)
            .map_err(|e| VisualizationError::PlottingError(e.to_string()))?;

        let mut chart = ChartBuilder::on(&root)
            .margin(12)
            .build_cartesian_3d(x_min..x_max, y_min..y_max, z_min..z_max)
            .map_err(|e| VisualizationError::PlottingError(e.to_string()))?;

        chart.with_projection(|mut pb| {
            pb.pitch = 0.35;
            pb.yaw = 0.8;
            pb.scale = 0.85;
            pb.into_matrix()
        });

        let point_size = config.point_size as i32;
        chart
            .draw_series((0..n).step_by(step).map(|i| {
                let z = cloud.z[i];
                let t = (z - z_min) / z_span;
                Circle::new(
                    (cloud.x[i], cloud.y[i], z),
                    point_size,
                    z_gradient(t).mix(0.6).filled(),
                )
            }))
            .map_err(|e| VisualizationError::PlottingError(e.to_string()))?;

        root.present()
            .map_err(|e| VisualizationError::PlottingError(e.to_string()))?;
    }

    encode_png(buf, size.0, size.1)
}

/// Map a normalized value in [0, 1] onto the Z gradient.
fn z_gradient(t: f64) -> RGBColor {
    let t = t.clamp(0.0, 1.0);
    let segments = GRADIENT_ANCHORS.len() - 1;
    let pos = t * segments as f64;
    let idx = (pos as usize).min(segments - 1);
    let frac = pos - idx as f64;

    let (r0, g0, b0) = GRADIENT_ANCHORS[idx];
    let (r1, g1, b1) = GRADIENT_ANCHORS[idx + 1];

    let lerp = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * frac).round() as u8;
    RGBColor(lerp(r0, r1), lerp(g0, g1), lerp(b0, b1))
}

/// Compute a value range, widened when degenerate so chart axes stay valid.
fn value_range(values: &[f64]) -> (f64, f64) {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for &v in values {
        if v < min {
            min = v;
        }
        if v > max {
            max = v;
        }
    }

    if (max - min).abs() < f64::EPSILON {
        min -= 1.0;
        max += 1.0;
    }
    (min, max)
}

/// Encode a raw RGB pixel buffer as PNG.
fn encode_png(buf: Vec<u8>, width: u32, height: u32) -> Result<Vec<u8>> {
    let img = image::RgbImage::from_raw(width, height, buf)
        .ok_or_else(|| VisualizationError::PlottingError("pixel buffer size mismatch".into()))?;

    let mut png = std::io::Cursor::new(Vec::new());
    img.write_to(&mut png, image::ImageOutputFormat::Png)?;
    Ok(png.into_inner())
}
