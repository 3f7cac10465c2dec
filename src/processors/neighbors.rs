//! Average nearest-neighbor distance over a sampled working set.
//!
//! Brute-force all-pairs search is O(n^2) and infeasible for large clouds, so
//! the metric is computed with a `kiddo` KD-tree:
//!
//! 1. Draw a working set: all points if the cloud fits the sample budget,
//!    otherwise a uniform sample without replacement.
//! 2. Build a [`KdTree`] over the working set only.
//! 3. For every working point, query its two nearest neighbors. The point
//!    itself is indexed, so the first hit is the point at distance zero and
//!    the second hit is the true nearest neighbor.
//! 4. Average the per-point distances (parallelized with rayon).
//!
//! Subsampling is stochastic: without a fixed seed, repeated runs on the same
//! input can differ slightly. Passing an explicit seed makes the sample, and
//! therefore the metric, bit-for-bit reproducible.

use kiddo::{KdTree, SquaredEuclidean};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::Serialize;
use thiserror::Error;

use crate::core::loaders::PointCloud;

/// Errors that can occur during the nearest-neighbor computation.
#[derive(Error, Debug)]
pub enum NeighborError {
    #[error("nearest-neighbor distance is undefined for {0} point(s); need at least 2")]
    InsufficientPoints(usize),
}

/// Result type for neighbor operations.
pub type Result<T> = std::result::Result<T, NeighborError>;

/// Average nearest-neighbor distance and the working set size it was
/// computed over (which may be smaller than the cloud due to subsampling).
#[derive(Debug, Clone, Copy, Serialize)]
pub struct NeighborMetric {
    /// Mean distance from each working-set point to its nearest neighbor.
    pub average_distance: f64,
    /// Number of points actually used for the computation.
    pub sample_size: usize,
}

/// Compute the average nearest-neighbor distance for a point cloud.
///
/// If the cloud holds more than `sample_size` points, exactly `sample_size`
/// points are drawn uniformly without replacement. `seed` fixes the draw for
/// reproducible runs; `None` seeds the generator from OS entropy.
///
/// Coincident duplicate points legitimately contribute a distance of zero;
/// they are not filtered.
///
/// # Errors
///
/// Returns [`NeighborError::InsufficientPoints`] if the working set holds
/// fewer than 2 points.
pub fn average_nearest_neighbor(
    cloud: &PointCloud,
    sample_size: usize,
    seed: Option<u64>,
) -> Result<NeighborMetric> {
    let working = select_working_set(cloud, sample_size, seed);
    average_nearest_neighbor_of(&working)
}

/// Compute the metric over an already-selected working set.
fn average_nearest_neighbor_of(coords: &[[f64; 3]]) -> Result<NeighborMetric> {
    let n = coords.len();
    if n < 2 {
        return Err(NeighborError::InsufficientPoints(n));
    }

    // The mutable tree accepts any number of coincident points; real scans of
    // flat surfaces routinely repeat the same coordinate.
    let mut tree: KdTree<f64, 3> = KdTree::with_capacity(n);
    for (i, coord) in coords.iter().enumerate() {
        tree.add(coord, i as u64);
    }

    // The queried point is itself indexed, so ask for two hits and keep the
    // second: the first is the self-match at distance zero.
    let total: f64 = coords
        .par_iter()
        .map(|coord| {
            let nearest = tree.nearest_n::<SquaredEuclidean>(coord, 2);
            nearest[1].distance.sqrt()
        })
        .sum();

    Ok(NeighborMetric {
        average_distance: total / n as f64,
        sample_size: n,
    })
}

/// Select the working set: the full cloud, or a uniform sample without
/// replacement when the cloud exceeds `sample_size`.
fn select_working_set(cloud: &PointCloud, sample_size: usize, seed: Option<u64>) -> Vec<[f64; 3]> {
    let n = cloud.len();

    if n <= sample_size {
        return cloud.to_coords();
    }

    let mut rng = match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => ChaCha8Rng::from_entropy(),
    };

    let indices = rand::seq::index::sample(&mut rng, n, sample_size);

    let mut coords = Vec::with_capacity(sample_size);
    for idx in indices.iter() {
        coords.push([cloud.x[idx], cloud.y[idx], cloud.z[idx]]);
    }
    coords
}
