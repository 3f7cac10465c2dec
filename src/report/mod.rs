//! One-page PDF report assembly.
//!
//! Lays out the statistics table and the two rendered charts on a single
//! US-letter page using printpdf with built-in Helvetica fonts, so no system
//! font lookup is involved. The artifact's on-disk size is measured and
//! returned; keeping it under the configured budget is best-effort and the
//! caller decides what to do when it is exceeded.

use std::fs::{self, File};
use std::io::{BufWriter, Cursor};
use std::path::{Path, PathBuf};

use chrono::Local;
use printpdf::image_crate::codecs::png::PngDecoder;
use printpdf::{BuiltinFont, Image, ImageTransform, Mm, PdfDocument, PdfLayerReference};
use thiserror::Error;

use crate::processors::neighbors::NeighborMetric;
use crate::processors::statistics::StatisticsSummary;
use crate::visualization::ChartSet;

/// Errors that can occur during report assembly.
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("failed to create report file '{path}': {source}")]
    CreateFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF error: {0}")]
    Pdf(String),
}

/// Result type for report operations.
pub type Result<T> = std::result::Result<T, ReportError>;

/// The finished report artifact.
#[derive(Debug, Clone)]
pub struct ReportArtifact {
    /// Location of the written document.
    pub path: PathBuf,
    /// Size on disk in bytes.
    pub size_bytes: u64,
}

impl ReportArtifact {
    /// Artifact size in megabytes, rounded to two decimals.
    pub fn size_mb(&self) -> f64 {
        (self.size_bytes as f64 / (1024.0 * 1024.0) * 100.0).round() / 100.0
    }
}

/// US-letter page dimensions in millimeters.
const PAGE_WIDTH_MM: f32 = 215.9;
const PAGE_HEIGHT_MM: f32 = 279.4;

/// Embedded chart resolution. The charts are rendered around 560 px wide, so
/// 180 dpi places each at roughly 79 mm, two columns per page.
const IMAGE_DPI: f32 = 180.0;

/// Assemble the one-page PDF report and write it to `output_path`.
///
/// # Errors
///
/// Returns [`ReportError`] if the file cannot be created (for example an
/// unwritable output directory) or if PDF generation fails.
pub fn assemble_report(
    output_path: &Path,
    source_name: &str,
    summary: &StatisticsSummary,
    metric: &NeighborMetric,
    charts: &ChartSet,
) -> Result<ReportArtifact> {
    let (doc, page, layer) = PdfDocument::new(
        "Point Cloud Analysis Report",
        Mm(PAGE_WIDTH_MM),
        Mm(PAGE_HEIGHT_MM),
        "Layer 1",
    );
    let layer = doc.get_page(page).get_layer(layer);

    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| ReportError::Pdf(e.to_string()))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| ReportError::Pdf(e.to_string()))?;

    // Header
    layer.use_text("Point Cloud Analysis Report", 16.0, Mm(58.0), Mm(262.0), &bold);
    let subtitle = format!(
        "File: {} | Generated: {}",
        source_name,
        Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    layer.use_text(subtitle, 9.0, Mm(18.0), Mm(254.0), &font);
    layer.use_text(
        "Statistical analysis and visualization of the point cloud: spatial extent,",
        9.0,
        Mm(18.0),
        Mm(246.0),
        &font,
    );
    layer.use_text(
        "distribution metrics, and a 3D view with height-based coloring.",
        9.0,
        Mm(18.0),
        Mm(241.5),
        &font,
    );

    // Statistics table
    layer.use_text("Statistical Summary", 12.0, Mm(18.0), Mm(230.0), &bold);
    draw_stats_rows(&layer, summary, metric, &font, &bold);

    // Charts, two columns
    layer.use_text("Z-value Distribution", 10.0, Mm(18.0), Mm(148.0), &bold);
    layer.use_text("3D Point Cloud", 10.0, Mm(115.0), Mm(148.0), &bold);
    embed_png(&layer, &charts.histogram_png, Mm(15.0), Mm(96.0))?;
    embed_png(&layer, &charts.scatter_png, Mm(112.0), Mm(82.0))?;

    // Write out and measure
    let file = File::create(output_path).map_err(|e| ReportError::CreateFile {
        path: output_path.display().to_string(),
        source: e,
    })?;
    doc.save(&mut BufWriter::new(file))
        .map_err(|e| ReportError::Pdf(e.to_string()))?;

    let size_bytes = fs::metadata(output_path)?.len();

    Ok(ReportArtifact {
        path: output_path.to_path_buf(),
        size_bytes,
    })
}

/// Draw the two-column statistics table as text rows.
fn draw_stats_rows(
    layer: &PdfLayerReference,
    summary: &StatisticsSummary,
    metric: &NeighborMetric,
    font: &printpdf::IndirectFontRef,
    bold: &printpdf::IndirectFontRef,
) {
    let rows: Vec<(String, String, String, String)> = vec![
        (
            "Total Points".into(),
            format!("{}", summary.count),
            "X Extent (m)".into(),
            format!("{:.3}", summary.x.extent),
        ),
        (
            "X Mean (m)".into(),
            format!("{:.3}", summary.x.mean),
            "Y Extent (m)".into(),
            format!("{:.3}", summary.y.extent),
        ),
        (
            "Y Mean (m)".into(),
            format!("{:.3}", summary.y.mean),
            "Z Extent (m)".into(),
            format!("{:.3}", summary.z.extent),
        ),
        (
            "Z Mean (m)".into(),
            format!("{:.3}", summary.z.mean),
            "X Std Dev (m)".into(),
            format!("{:.3}", summary.x.std_dev),
        ),
        (
            "Y Std Dev (m)".into(),
            format!("{:.3}", summary.y.std_dev),
            "Z Std Dev (m)".into(),
            format!("{:.3}", summary.z.std_dev),
        ),
        (
            "Avg NN Distance (m)".into(),
            format!("{:.4}", metric.average_distance),
            "NN Sample Size".into(),
            format!("{}", metric.sample_size),
        ),
    ];

    let mut y = 222.0;
    for (label_a, value_a, label_b, value_b) in rows {
        layer.use_text(label_a, 9.0, Mm(18.0), Mm(y), bold);
        layer.use_text(value_a, 9.0, Mm(64.0), Mm(y), font);
        layer.use_text(label_b, 9.0, Mm(112.0), Mm(y), bold);
        layer.use_text(value_b, 9.0, Mm(162.0), Mm(y), font);
        y -= 6.5;
    }
}

/// Decode a PNG buffer and place it on the layer at the given position.
fn embed_png(layer: &PdfLayerReference, png: &[u8], x: Mm, y: Mm) -> Result<()> {
    let decoder =
        PngDecoder::new(Cursor::new(png)).map_err(|e| ReportError::Pdf(e.to_string()))?;
    let image = Image::try_from(decoder).map_err(|e| ReportError::Pdf(e.to_string()))?;

    image.add_to_layer(
        layer.clone(),
        ImageTransform {
            translate_x: Some(x),
            translate_y: Some(y),
            dpi: Some(IMAGE_DPI),
            ..Default::default()
        },
    );
    Ok(())
}
