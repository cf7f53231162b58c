//! K-means clustering over numeric datasets, with an image color quantization
//! driver.
//!
//! The engine lives in [`api`]: configure a [`KMeansConfig`], build a
//! [`KMeans`], call `fit`, then read centers and per-cluster sample indices.
//! [`quantize`] flattens an image's pixels into a point table, clusters them,
//! and rebuilds the image from the cluster center colors.

pub mod api;
pub mod error;
pub mod quantize;
pub mod utils;

pub use api::{KMeans, KMeansConfig};
pub use error::{Error, Result};

// Internal implementation module (not part of the public API).
mod kmeans;
