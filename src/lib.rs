//! Point cloud analysis and report generation pipeline.
//!
//! This crate provides tools for:
//! - Parsing loose ASCII XYZ/TXT/CSV point cloud files
//! - Computing per-axis extent/mean/std-dev statistics
//! - Estimating the average nearest-neighbor distance via a KD-tree
//! - Rendering a Z histogram and a Z-colored 3D scatter as PNG buffers
//! - Assembling a single-page PDF report with a machine-readable result
//!
//! # Example
//!
//! ```no_run
//! use cloud_report::{config::AnalysisConfig, pipeline};
//! use std::path::Path;
//!
//! let config = AnalysisConfig::default();
//! let run = pipeline::run(Path::new("scan.xyz"), Path::new("report.pdf"), &config).unwrap();
//! println!("{} points analyzed", run.summary.count);
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod pipeline;
pub mod processors;
pub mod report;
pub mod visualization;

pub use config::AnalysisConfig;
pub use core::loaders::{load_xyz_file, PointCloud};
pub use processors::{NeighborMetric, StatisticsSummary};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
