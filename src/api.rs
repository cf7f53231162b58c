use crate::error::{Error, Result};
use crate::kmeans::{run_lloyd, FitResult};
use ndarray::{Array2, Axis};

/// Configuration for the K-means engine.
///
/// Built through validating `with_*` setters: every parameter is checked at the
/// point it is set, so an engine can only ever be constructed from a valid
/// configuration. Setters take a raw `f64` so values arriving from
/// loosely-typed sources are classified: a fractional value for an integer
/// parameter is a type error, an integral value out of range is a value error.
#[derive(Clone, Debug)]
pub struct KMeansConfig {
    n_clusters: usize,
    max_iterations: usize,
    distance_threshold: f32,
}

impl Default for KMeansConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl KMeansConfig {
    /// Default configuration: 5 clusters, 100 iterations, threshold 1e-4.
    pub fn new() -> Self {
        Self {
            n_clusters: 5,
            max_iterations: 100,
            distance_threshold: 1e-4,
        }
    }

    /// Sets the number of clusters. Must be an integer ≥ 2.
    pub fn with_n_clusters(mut self, value: f64) -> Result<Self> {
        let k = integer_param("n_clusters", value)?;
        if k < 2 {
            return Err(Error::InvalidValue {
                param: "n_clusters",
                reason: format!("must be at least 2, got {k}"),
            });
        }
        self.n_clusters = k as usize;
        Ok(self)
    }

    /// Sets the iteration cap. Must be an integer > 0.
    pub fn with_max_iterations(mut self, value: f64) -> Result<Self> {
        let iters = integer_param("max_iterations", value)?;
        if iters <= 0 {
            return Err(Error::InvalidValue {
                param: "max_iterations",
                reason: format!("must be positive, got {iters}"),
            });
        }
        self.max_iterations = iters as usize;
        Ok(self)
    }

    /// Sets the convergence tolerance on center movement. Must be a finite
    /// number > 0.
    pub fn with_distance_threshold(mut self, value: f64) -> Result<Self> {
        if !value.is_finite() {
            return Err(Error::InvalidType {
                param: "distance_threshold",
                expected: "a finite number",
            });
        }
        if value <= 0.0 {
            return Err(Error::InvalidValue {
                param: "distance_threshold",
                reason: format!("must be positive, got {value}"),
            });
        }
        self.distance_threshold = value as f32;
        Ok(self)
    }

    pub fn n_clusters(&self) -> usize {
        self.n_clusters
    }

    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    pub fn distance_threshold(&self) -> f32 {
        self.distance_threshold
    }
}

fn integer_param(param: &'static str, value: f64) -> Result<i64> {
    if !value.is_finite() || value.fract() != 0.0 {
        return Err(Error::InvalidType {
            param,
            expected: "an integer",
        });
    }
    Ok(value as i64)
}

/// K-means clustering engine.
///
/// `fit` borrows a dataset (rows are samples, columns are features), runs
/// Lloyd's iteration, and stores centers and per-cluster sample indices. The
/// result accessors return `None` until the first successful `fit`. An engine
/// instance is not meant for concurrent use; independent clusterings need
/// independent instances.
pub struct KMeans {
    config: KMeansConfig,
    result: Option<FitResult>,
}

impl KMeans {
    pub fn new(config: KMeansConfig) -> Self {
        Self {
            config,
            result: None,
        }
    }

    pub fn config(&self) -> &KMeansConfig {
        &self.config
    }

    /// Clusters `data` into `target_clusters` (or the configured `n_clusters`)
    /// groups.
    ///
    /// Fails with [`Error::InvalidInput`] when the dataset is empty in either
    /// dimension or the effective cluster count falls outside
    /// `2 ..= n_samples`. A successful call replaces any previous result; a
    /// failed call leaves it untouched.
    pub fn fit(&mut self, data: &Array2<f32>, target_clusters: Option<usize>) -> Result<()> {
        let k = target_clusters.unwrap_or(self.config.n_clusters);
        let result = run_lloyd(
            data,
            k,
            self.config.max_iterations,
            self.config.distance_threshold,
        )?;
        self.result = Some(result);
        Ok(())
    }

    /// Cluster centers from the last fit, shape (k, n_features).
    pub fn centers(&self) -> Option<&Array2<f32>> {
        self.result.as_ref().map(|r| &r.centers)
    }

    /// For each cluster index, the sample row indices assigned to it.
    pub fn assignments(&self) -> Option<&[Vec<usize>]> {
        self.result.as_ref().map(|r| r.assignments.as_slice())
    }

    /// Number of assignment+update passes the last fit executed.
    pub fn iterations(&self) -> Option<usize> {
        self.result.as_ref().map(|r| r.iterations)
    }

    /// Whether the last fit stopped on the distance threshold rather than the
    /// iteration cap.
    pub fn converged(&self) -> Option<bool> {
        self.result.as_ref().map(|r| r.converged)
    }

    /// The rows of `data` belonging to one cluster of the last fit.
    ///
    /// `data` must be the dataset passed to that fit; the engine does not keep
    /// a copy. Returns `None` before the first fit or for an out-of-range
    /// cluster index.
    pub fn cluster_points(&self, data: &Array2<f32>, cluster: usize) -> Option<Array2<f32>> {
        let members = self.result.as_ref()?.assignments.get(cluster)?;
        Some(data.select(Axis(0), members))
    }
}
