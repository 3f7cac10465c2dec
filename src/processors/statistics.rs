//! Descriptive per-axis statistics for point clouds.
//!
//! Uses a two-pass accumulation (mean first, then centered variance) so the
//! results stay accurate for large coordinate magnitudes where a naive
//! sum-of-squares pass loses precision.

use serde::Serialize;

use crate::core::loaders::PointCloud;

/// Descriptive statistics for a single coordinate axis.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct AxisStats {
    /// Minimum coordinate value.
    pub min: f64,
    /// Maximum coordinate value.
    pub max: f64,
    /// Range of coordinate values (max - min).
    pub extent: f64,
    /// Arithmetic mean.
    pub mean: f64,
    /// Population standard deviation (divides by N).
    pub std_dev: f64,
}

/// Fixed-shape statistics record for a point cloud.
#[derive(Debug, Clone, Serialize)]
pub struct StatisticsSummary {
    /// Total number of points.
    pub count: usize,
    /// Statistics along the X axis.
    pub x: AxisStats,
    /// Statistics along the Y axis.
    pub y: AxisStats,
    /// Statistics along the Z axis.
    pub z: AxisStats,
}

/// Compute per-axis statistics for a point cloud.
///
/// The cloud is guaranteed non-empty after a successful parse, so the
/// per-axis reductions always have at least one value to work with.
pub fn calculate_statistics(cloud: &PointCloud) -> StatisticsSummary {
    StatisticsSummary {
        count: cloud.len(),
        x: axis_stats(&cloud.x),
        y: axis_stats(&cloud.y),
        z: axis_stats(&cloud.z),
    }
}

/// Two-pass min/max/mean/population-std-dev reduction over one axis.
fn axis_stats(values: &[f64]) -> AxisStats {
    debug_assert!(!values.is_empty(), "axis statistics require >= 1 value");

    let n = values.len() as f64;

    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    let mut sum = 0.0;
    for &v in values {
        if v < min {
            min = v;
        }
        if v > max {
            max = v;
        }
        sum += v;
    }
    let mean = sum / n;

    // Second pass: centered sum of squares
    let mut sq_sum = 0.0;
    for &v in values {
        let d = v - mean;
        sq_sum += d * d;
    }
    let std_dev = (sq_sum / n).sqrt();

    AxisStats {
        min,
        max,
        extent: max - min,
        mean,
        std_dev,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cloud_from_coords(coords: &[[f64; 3]]) -> PointCloud {
        let mut cloud = PointCloud::with_capacity(coords.len());
        for c in coords {
            cloud.push(c[0], c[1], c[2]);
        }
        cloud
    }

    #[test]
    fn test_basic_statistics() {
        let cloud = cloud_from_coords(&[
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
        ]);

        let stats = calculate_statistics(&cloud);

        assert_eq!(stats.count, 3);
        assert_eq!(stats.x.extent, 1.0);
        assert_eq!(stats.y.extent, 1.0);
        assert_eq!(stats.z.extent, 0.0);
        assert!((stats.x.mean - 1.0 / 3.0).abs() < 1e-12);
        assert_eq!(stats.z.mean, 0.0);
        assert_eq!(stats.z.std_dev, 0.0);
    }

    #[test]
    fn test_axis_invariants() {
        let cloud = cloud_from_coords(&[
            [-3.5, 10.0, 0.1],
            [2.25, -4.0, 0.2],
            [7.0, 6.5, 0.3],
            [0.0, 0.0, 0.4],
        ]);

        let stats = calculate_statistics(&cloud);

        for axis in [stats.x, stats.y, stats.z] {
            assert!(axis.min <= axis.mean);
            assert!(axis.mean <= axis.max);
            assert!((axis.extent - (axis.max - axis.min)).abs() < 1e-12);
            assert!(axis.std_dev >= 0.0);
        }
    }

    #[test]
    fn test_repeated_point_has_zero_std_dev() {
        let cloud = cloud_from_coords(&[[5.0, -2.0, 9.0]; 10]);

        let stats = calculate_statistics(&cloud);

        for axis in [stats.x, stats.y, stats.z] {
            assert_eq!(axis.extent, 0.0);
            assert_eq!(axis.std_dev, 0.0);
        }
        assert_eq!(stats.x.mean, 5.0);
        assert_eq!(stats.y.mean, -2.0);
        assert_eq!(stats.z.mean, 9.0);
    }

    #[test]
    fn test_population_std_dev_divides_by_n() {
        // Values 1, 2, 3: population variance = 2/3, sample variance = 1
        let cloud = cloud_from_coords(&[
            [1.0, 0.0, 0.0],
            [2.0, 0.0, 0.0],
            [3.0, 0.0, 0.0],
        ]);

        let stats = calculate_statistics(&cloud);
        assert!((stats.x.std_dev - (2.0f64 / 3.0).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_large_offset_precision() {
        // Large magnitude with tiny spread; two-pass keeps the spread visible
        let base = 1.0e9;
        let cloud = cloud_from_coords(&[
            [base, 0.0, 0.0],
            [base + 1.0, 0.0, 0.0],
            [base + 2.0, 0.0, 0.0],
        ]);

        let stats = calculate_statistics(&cloud);
        assert!((stats.x.mean - (base + 1.0)).abs() < 1e-6);
        assert!((stats.x.std_dev - (2.0f64 / 3.0).sqrt()).abs() < 1e-6);
    }
}
