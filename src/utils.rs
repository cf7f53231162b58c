use ndarray::{concatenate, Array2, Axis};
use rand::Rng;

/// Generates a 2D point cloud of `n_points` scattered around (`cx`, `cy`).
pub fn gaussian_cluster(cx: f32, cy: f32, spread: f32, n_points: usize) -> Array2<f32> {
    let mut rng = rand::thread_rng();
    let mut data = Array2::<f32>::zeros((n_points, 2));

    for i in 0..n_points {
        data[(i, 0)] = cx + rng.gen_range(-spread..spread);
        data[(i, 1)] = cy + rng.gen_range(-spread..spread);
    }

    data
}

/// Stacks several point clouds into one dataset, row-wise.
pub fn stack_clusters(clusters: &[Array2<f32>]) -> Array2<f32> {
    let views: Vec<_> = clusters.iter().map(|c| c.view()).collect();
    concatenate(Axis(0), &views).expect("clusters share the same feature count")
}
