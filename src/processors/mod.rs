//! Analysis algorithms for point clouds.

pub mod neighbors;
pub mod statistics;

// Re-export key types for convenience
pub use neighbors::{average_nearest_neighbor, NeighborError, NeighborMetric};
pub use statistics::{calculate_statistics, AxisStats, StatisticsSummary};
