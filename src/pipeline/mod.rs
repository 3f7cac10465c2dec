//! Pipeline orchestration and the machine-readable result contract.
//!
//! Sequences parse -> statistics -> nearest-neighbor -> charts -> report and
//! normalizes every failure into a closed error taxonomy. Callers (the CLI)
//! translate the outcome into exactly one `JSON_RESULT:`-prefixed JSON line
//! on stdout; everything else printed by the pipeline is diagnostic and
//! carries no stability guarantee.

use std::path::Path;

use log::{info, warn};
use serde::Serialize;
use thiserror::Error;

use crate::config::AnalysisConfig;
use crate::core::loaders::{self, LoaderError};
use crate::processors::neighbors::{self, NeighborError, NeighborMetric};
use crate::processors::statistics::{self, StatisticsSummary};
use crate::report::{self, ReportArtifact, ReportError};
use crate::visualization::{self, VisualizationError};

/// Prefix tagging the single machine-readable result line on stdout.
pub const RESULT_PREFIX: &str = "JSON_RESULT:";

/// Closed taxonomy of pipeline failures. Each variant maps to a stable
/// `error_kind` string in the result payload.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("parse error: {0}")]
    Parse(#[from] LoaderError),

    #[error("computation error: {0}")]
    Computation(#[from] NeighborError),

    #[error("render error: {0}")]
    Render(#[from] VisualizationError),

    #[error("assembly error: {0}")]
    Assembly(#[from] ReportError),
}

impl PipelineError {
    /// Stable, matchable error kind for the result channel.
    pub fn kind(&self) -> &'static str {
        match self {
            PipelineError::Parse(_) => "parse",
            PipelineError::Computation(_) => "computation",
            PipelineError::Render(_) => "render",
            PipelineError::Assembly(_) => "assembly",
        }
    }
}

/// Everything a successful run produced.
#[derive(Debug)]
pub struct PipelineRun {
    /// Statistics over the full parsed cloud.
    pub summary: StatisticsSummary,
    /// Nearest-neighbor metric over the working set.
    pub metric: NeighborMetric,
    /// The written report.
    pub artifact: ReportArtifact,
    /// Data lines silently skipped during parsing.
    pub skipped_lines: usize,
    /// True when the artifact exceeded the configured size budget.
    pub over_budget: bool,
}

/// The single structured payload emitted on the result channel.
#[derive(Debug, Serialize)]
pub struct RunOutcome {
    pub success: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_file: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_size_mb: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub point_count: Option<usize>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub skipped_lines: Option<usize>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<&'static str>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RunOutcome {
    /// Build the success payload. `point_count` is always the full parsed
    /// count, never a downsampled one.
    pub fn success(run: &PipelineRun) -> Self {
        Self {
            success: true,
            output_file: Some(run.artifact.path.display().to_string()),
            file_size_mb: Some(run.artifact.size_mb()),
            point_count: Some(run.summary.count),
            skipped_lines: Some(run.skipped_lines),
            error_kind: None,
            error: None,
        }
    }

    /// Build the failure payload from a normalized pipeline error.
    pub fn failure(error: &PipelineError) -> Self {
        Self {
            success: false,
            output_file: None,
            file_size_mb: None,
            point_count: None,
            skipped_lines: None,
            error_kind: Some(error.kind()),
            error: Some(error.to_string()),
        }
    }

    /// Render the tagged result line.
    pub fn to_result_line(&self) -> String {
        // Serialization of this shape cannot fail; fall back to a minimal
        // failure payload if it somehow does.
        let json = serde_json::to_string(self)
            .unwrap_or_else(|_| r#"{"success":false,"error":"result serialization"}"#.into());
        format!("{}{}", RESULT_PREFIX, json)
    }
}

/// Run the full analysis pipeline for one input file.
///
/// All stages execute sequentially; any stage failure aborts the run and is
/// returned as a [`PipelineError`] for the caller to report. The size budget
/// check never fails the run, it only sets [`PipelineRun::over_budget`].
pub fn run(input: &Path, output: &Path, config: &AnalysisConfig) -> Result<PipelineRun, PipelineError> {
    info!("reading {}", input.display());
    let (cloud, load_stats) = loaders::load_xyz_file(input)?;
    info!(
        "loaded {} points ({} lines skipped)",
        cloud.len(),
        load_stats.skipped_lines
    );

    let summary = statistics::calculate_statistics(&cloud);
    info!(
        "extents: x={:.3} y={:.3} z={:.3}",
        summary.x.extent, summary.y.extent, summary.z.extent
    );

    let metric = neighbors::average_nearest_neighbor(
        &cloud,
        config.sampling.sample_size,
        config.sampling.seed,
    )?;
    info!(
        "average nearest-neighbor distance: {:.4} over {} points",
        metric.average_distance, metric.sample_size
    );

    let charts = visualization::render_charts(&cloud, &config.histogram, &config.scatter)?;
    info!("charts rendered");

    let source_name = input
        .file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| input.display().to_string());
    let artifact = report::assemble_report(output, &source_name, &summary, &metric, &charts)?;
    info!(
        "report written to {} ({:.2} MB)",
        artifact.path.display(),
        artifact.size_mb()
    );

    let over_budget = artifact.size_mb() > config.report.size_budget_mb;
    if over_budget {
        warn!(
            "report size {:.2} MB exceeds the {:.1} MB budget",
            artifact.size_mb(),
            config.report.size_budget_mb
        );
    }

    Ok(PipelineRun {
        summary,
        metric,
        artifact,
        skipped_lines: load_stats.skipped_lines,
        over_budget,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds_are_stable() {
        let parse: PipelineError =
            LoaderError::NoValidPoints(std::path::PathBuf::from("x.xyz")).into();
        assert_eq!(parse.kind(), "parse");

        let comp: PipelineError = NeighborError::InsufficientPoints(1).into();
        assert_eq!(comp.kind(), "computation");

        let render: PipelineError = VisualizationError::EmptyPointCloud.into();
        assert_eq!(render.kind(), "render");

        let assembly: PipelineError = ReportError::Pdf("boom".into()).into();
        assert_eq!(assembly.kind(), "assembly");
    }

    #[test]
    fn test_failure_outcome_shape() {
        let err: PipelineError = NeighborError::InsufficientPoints(1).into();
        let outcome = RunOutcome::failure(&err);

        let line = outcome.to_result_line();
        assert!(line.starts_with(RESULT_PREFIX));

        let json: serde_json::Value =
            serde_json::from_str(line.trim_start_matches(RESULT_PREFIX)).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["error_kind"], "computation");
        assert!(json["error"].as_str().unwrap().contains("at least 2"));
        assert!(json.get("output_file").is_none());
    }
}
