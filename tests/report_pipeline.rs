//! End-to-end tests for the analysis pipeline and its result contract.

use std::fs;
use std::io::Write;
use std::path::Path;

use cloud_report::config::AnalysisConfig;
use cloud_report::pipeline::{self, PipelineError, RunOutcome, RESULT_PREFIX};
use tempfile::tempdir;

fn write_input(path: &Path, contents: &str) {
    let mut file = fs::File::create(path).unwrap();
    file.write_all(contents.as_bytes()).unwrap();
}

#[test]
fn end_to_end_mixed_input() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("points.xyz");
    let output = dir.path().join("report.pdf");

    write_input(
        &input,
        "0 0 0\n1 0 0\n0 1 0\n# comment\n\nbad data here\n",
    );

    let config = AnalysisConfig::default();
    let run = pipeline::run(&input, &output, &config).unwrap();

    // Only the three valid lines survive
    assert_eq!(run.summary.count, 3);
    assert_eq!(run.skipped_lines, 1);

    // Extents from the unit triangle
    assert_eq!(run.summary.x.extent, 1.0);
    assert_eq!(run.summary.y.extent, 1.0);
    assert_eq!(run.summary.z.extent, 0.0);

    // Each point's nearest neighbor sits at distance exactly 1.0
    assert_eq!(run.metric.average_distance, 1.0);
    assert_eq!(run.metric.sample_size, 3);

    // The artifact is a real PDF on disk
    let bytes = fs::read(&output).unwrap();
    assert_eq!(&bytes[..5], b"%PDF-");
    assert_eq!(run.artifact.size_bytes, bytes.len() as u64);

    // Default-config reports must land inside the 2 MB budget
    assert!(run.artifact.size_mb() < 2.0);
    assert!(!run.over_budget);
}

#[test]
fn success_payload_reports_full_point_count() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("points.xyz");
    let output = dir.path().join("report.pdf");

    // More points than the scatter downsampling budget used below
    let mut contents = String::new();
    for i in 0..300 {
        let t = i as f64 * 0.11;
        contents.push_str(&format!(
            "{:.6} {:.6} {:.6}\n",
            t.sin() * 4.0,
            t.cos() * 4.0,
            t * 0.2
        ));
    }
    write_input(&input, &contents);

    let mut config = AnalysisConfig::default();
    config.scatter.max_points = 50;
    config.sampling.sample_size = 100;
    config.sampling.seed = Some(3);

    let run = pipeline::run(&input, &output, &config).unwrap();
    let outcome = RunOutcome::success(&run);
    let line = outcome.to_result_line();
    assert!(line.starts_with(RESULT_PREFIX));

    let json: serde_json::Value =
        serde_json::from_str(line.trim_start_matches(RESULT_PREFIX)).unwrap();

    // Full parsed count, not the downsampled or sampled counts
    assert_eq!(json["success"], true);
    assert_eq!(json["point_count"], 300);
    assert_eq!(json["skipped_lines"], 0);
    assert_eq!(json["output_file"], output.display().to_string());
    assert!(json["file_size_mb"].as_f64().unwrap() > 0.0);

    // Working set was capped by the sampling threshold
    assert_eq!(run.metric.sample_size, 100);
}

#[test]
fn garbage_only_input_is_a_parse_failure() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("garbage.xyz");
    let output = dir.path().join("report.pdf");

    write_input(&input, "# header only\nnot numbers at all\n1.0 2.0\n");

    let config = AnalysisConfig::default();
    let err = pipeline::run(&input, &output, &config).unwrap_err();

    assert!(matches!(err, PipelineError::Parse(_)));
    assert_eq!(err.kind(), "parse");
    assert!(!output.exists());

    let outcome = RunOutcome::failure(&err);
    let json: serde_json::Value =
        serde_json::from_str(outcome.to_result_line().trim_start_matches(RESULT_PREFIX)).unwrap();
    assert_eq!(json["success"], false);
    assert_eq!(json["error_kind"], "parse");
    assert!(json["error"].as_str().unwrap().contains("no valid points"));
}

#[test]
fn single_point_is_a_computation_failure() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("one.xyz");
    let output = dir.path().join("report.pdf");

    write_input(&input, "1.0 2.0 3.0\n");

    let config = AnalysisConfig::default();
    let err = pipeline::run(&input, &output, &config).unwrap_err();

    assert!(matches!(err, PipelineError::Computation(_)));
    assert_eq!(err.kind(), "computation");
}

#[test]
fn unwritable_output_is_an_assembly_failure() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("points.xyz");

    write_input(&input, "0 0 0\n1 1 1\n2 2 2\n");

    let config = AnalysisConfig::default();
    let err = pipeline::run(
        &input,
        Path::new("/nonexistent/dir/report.pdf"),
        &config,
    )
    .unwrap_err();

    assert!(matches!(err, PipelineError::Assembly(_)));
    assert_eq!(err.kind(), "assembly");
}

#[test]
fn fixed_seed_reproduces_the_metric_end_to_end() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("big.xyz");

    // More points than the sampling threshold so the stochastic path runs
    let mut contents = String::new();
    for i in 0..1500 {
        let t = i as f64 * 0.031;
        contents.push_str(&format!(
            "{:.6},{:.6},{:.6}\n",
            t.sin() * 20.0,
            t.cos() * 20.0,
            t
        ));
    }
    write_input(&input, &contents);

    let mut config = AnalysisConfig::default();
    config.sampling.seed = Some(1234);

    let first = pipeline::run(&input, &dir.path().join("a.pdf"), &config).unwrap();
    let second = pipeline::run(&input, &dir.path().join("b.pdf"), &config).unwrap();

    assert_eq!(first.metric.sample_size, 1000);
    assert_eq!(
        first.metric.average_distance.to_bits(),
        second.metric.average_distance.to_bits()
    );
}
