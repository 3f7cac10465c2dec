//! Command-line interface for the report pipeline.

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info, warn};
use std::path::PathBuf;
use std::time::Instant;

use crate::config::AnalysisConfig;
use crate::pipeline::{self, RunOutcome};

#[derive(Parser, Debug)]
#[command(name = "cloud-report")]
#[command(about = "Point cloud analysis and PDF report generation", version)]
pub struct Cli {
    /// Input point cloud file (XYZ/TXT/CSV)
    input: PathBuf,

    /// Output PDF file path
    output: PathBuf,

    /// Path to YAML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// RNG seed for reproducible nearest-neighbor sampling
    #[arg(long)]
    seed: Option<u64>,

    /// Maximum working set size for the nearest-neighbor computation
    #[arg(long)]
    sample_size: Option<usize>,

    /// Increase verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Create a spinner for indeterminate operations
fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

/// Print a summary box
fn print_summary(title: &str, items: &[(&str, String)]) {
    eprintln!();
    eprintln!("╔══════════════════════════════════════════════════════════════╗");
    eprintln!("║ {:<62} ║", title);
    eprintln!("╠══════════════════════════════════════════════════════════════╣");
    for (key, value) in items {
        let display_value = if value.len() > 39 {
            format!("{}...", &value[..36])
        } else {
            value.clone()
        };
        eprintln!("║ {:<20}: {:<39} ║", key, display_value);
    }
    eprintln!("╚══════════════════════════════════════════════════════════════╝");
    eprintln!();
}

/// Parse arguments, run the pipeline, and emit the structured result.
///
/// Returns the process exit code: 0 on success, 1 on any pipeline failure.
/// Invocation-arity errors are handled by clap before any processing begins
/// (usage text on stderr, non-zero exit, no structured result).
pub fn run() -> i32 {
    let cli = Cli::parse();

    // Initialize logging based on verbosity (must come first)
    env_logger::Builder::new()
        .filter_level(match cli.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            _ => log::LevelFilter::Debug,
        })
        .format_timestamp_secs()
        .init();

    // Load config, CLI flags override file values
    let mut config = match &cli.config {
        Some(path) => match AnalysisConfig::from_yaml(path) {
            Ok(cfg) => {
                info!("loaded config from: {}", path.display());
                cfg
            }
            Err(e) => {
                warn!(
                    "failed to load config from {}: {}, using defaults",
                    path.display(),
                    e
                );
                AnalysisConfig::default()
            }
        },
        None => AnalysisConfig::default(),
    };
    if let Some(seed) = cli.seed {
        config.sampling.seed = Some(seed);
    }
    if let Some(sample_size) = cli.sample_size {
        config.sampling.sample_size = sample_size;
    }

    let start = Instant::now();
    let spinner = create_spinner("Analyzing point cloud...");

    let result = pipeline::run(&cli.input, &cli.output, &config);

    spinner.finish_and_clear();

    match result {
        Ok(run) => {
            print_summary(
                "Report Generation Complete",
                &[
                    ("Input file", cli.input.display().to_string()),
                    ("Output PDF", run.artifact.path.display().to_string()),
                    ("Points", run.summary.count.to_string()),
                    ("Skipped lines", run.skipped_lines.to_string()),
                    ("NN sample size", run.metric.sample_size.to_string()),
                    (
                        "Avg NN distance",
                        format!("{:.4}", run.metric.average_distance),
                    ),
                    ("File size", format!("{:.2} MB", run.artifact.size_mb())),
                    ("Duration", format!("{:.2?}", start.elapsed())),
                ],
            );

            println!("{}", RunOutcome::success(&run).to_result_line());
            0
        }
        Err(e) => {
            error!("{}", e);
            println!("{}", RunOutcome::failure(&e).to_result_line());
            1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    #[test]
    fn test_missing_arguments_is_a_usage_error() {
        let err = Cli::try_parse_from(["cloud-report"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
        assert!(err.to_string().contains("Usage"));
    }

    #[test]
    fn test_missing_output_is_a_usage_error() {
        let err = Cli::try_parse_from(["cloud-report", "scan.xyz"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn test_full_invocation_parses() {
        let cli = Cli::try_parse_from([
            "cloud-report",
            "scan.xyz",
            "report.pdf",
            "--seed",
            "42",
            "--sample-size",
            "500",
            "-vv",
        ])
        .unwrap();
        assert_eq!(cli.input, PathBuf::from("scan.xyz"));
        assert_eq!(cli.output, PathBuf::from("report.pdf"));
        assert_eq!(cli.seed, Some(42));
        assert_eq!(cli.sample_size, Some(500));
        assert_eq!(cli.verbose, 2);
    }
}
