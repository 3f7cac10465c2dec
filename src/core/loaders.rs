//! Loader for ASCII XYZ point cloud files.
//!
//! The accepted format is deliberately loose: whitespace- or comma-delimited
//! text where each line carrying at least three leading numeric tokens is one
//! 3D point. `#`-prefixed lines are comments, blank lines are ignored, and
//! lines that fail to parse (headers, stray text, short rows) are skipped
//! without aborting the load.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors that can occur during file loading.
#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("no valid points found in {0}")]
    NoValidPoints(PathBuf),
}

/// Result type for loader operations.
pub type Result<T> = std::result::Result<T, LoaderError>;

/// Container for 3D point cloud data.
///
/// Coordinates are stored in structure-of-arrays layout and kept in file
/// order. The cloud is not mutated after a successful load.
#[derive(Debug, Clone)]
pub struct PointCloud {
    /// X coordinates of all points.
    pub x: Vec<f64>,
    /// Y coordinates of all points.
    pub y: Vec<f64>,
    /// Z coordinates of all points.
    pub z: Vec<f64>,
}

impl PointCloud {
    /// Creates a new empty point cloud.
    pub fn new() -> Self {
        Self {
            x: Vec::new(),
            y: Vec::new(),
            z: Vec::new(),
        }
    }

    /// Creates a new point cloud with pre-allocated capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            x: Vec::with_capacity(capacity),
            y: Vec::with_capacity(capacity),
            z: Vec::with_capacity(capacity),
        }
    }

    /// Returns the number of points in the cloud.
    #[inline]
    pub fn len(&self) -> usize {
        self.x.len()
    }

    /// Returns true if the point cloud is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Adds a point to the cloud.
    #[inline]
    pub fn push(&mut self, x: f64, y: f64, z: f64) {
        self.x.push(x);
        self.y.push(y);
        self.z.push(z);
    }

    /// Converts the point cloud to a vector of [x, y, z] coordinate arrays.
    pub fn to_coords(&self) -> Vec<[f64; 3]> {
        let n = self.len();
        let mut coords = Vec::with_capacity(n);
        for i in 0..n {
            coords.push([self.x[i], self.y[i], self.z[i]]);
        }
        coords
    }
}

impl Default for PointCloud {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-load data quality counters.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoadStats {
    /// Data lines that were silently skipped (short rows, failed numeric
    /// parse). Comments and blank lines are not counted.
    pub skipped_lines: usize,
}

/// Load a point cloud from an ASCII XYZ/TXT/CSV file.
///
/// Each non-comment, non-blank line is tokenized by splitting on whitespace
/// after normalizing comma separators. The first three tokens become the
/// point coordinates; tokens beyond the third (intensity columns and the
/// like) are ignored. Lines with fewer than three tokens or with a
/// non-numeric leading token are skipped and counted in [`LoadStats`].
///
/// # Errors
///
/// Returns [`LoaderError::NoValidPoints`] if no line yields a point, or
/// [`LoaderError::Io`] if the file cannot be read.
pub fn load_xyz_file<P: AsRef<Path>>(path: P) -> Result<(PointCloud, LoadStats)> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let reader = BufReader::new(file);

    let mut cloud = PointCloud::with_capacity(10_000);
    let mut stats = LoadStats::default();

    for line in reader.lines() {
        let line = line?;
        let trimmed = line.trim();

        // Skip blank lines and comments
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        match parse_data_line(trimmed) {
            Some((x, y, z)) => cloud.push(x, y, z),
            None => stats.skipped_lines += 1,
        }
    }

    if cloud.is_empty() {
        return Err(LoaderError::NoValidPoints(path.to_path_buf()));
    }

    Ok((cloud, stats))
}

/// Parse a single data line into a coordinate triple.
///
/// Returns `None` for lines with fewer than three tokens or where any of the
/// first three tokens fails numeric parsing.
fn parse_data_line(line: &str) -> Option<(f64, f64, f64)> {
    let normalized = line.replace(',', " ");
    let mut tokens = normalized.split_whitespace();

    let x: f64 = tokens.next()?.parse().ok()?;
    let y: f64 = tokens.next()?.parse().ok()?;
    let z: f64 = tokens.next()?.parse().ok()?;

    Some((x, y, z))
}
