//! Core data types and I/O operations.

pub mod loaders;

pub use loaders::{load_xyz_file, LoadStats, LoaderError, PointCloud};
