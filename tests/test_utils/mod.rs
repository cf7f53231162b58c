use ndarray::{Array2, ArrayView1};
use rand::Rng;

/// Create synthetic data with well-separated point clusters.
/// Returns (data, true_labels).
#[allow(dead_code)]
pub fn create_gaussian_clusters(
    num_clusters: usize,
    points_per_cluster: usize,
    dim: usize,
    separation: f32,
) -> (Array2<f32>, Vec<usize>) {
    let mut rng = rand::thread_rng();

    let total_points = num_clusters * points_per_cluster;
    let mut data = Array2::<f32>::zeros((total_points, dim));
    let mut true_labels = Vec::with_capacity(total_points);

    for cluster_id in 0..num_clusters {
        let center: Vec<f32> = (0..dim)
            .map(|d| (cluster_id as f32) * separation + (d as f32) * 0.1)
            .collect();

        for point_id in 0..points_per_cluster {
            let idx = cluster_id * points_per_cluster + point_id;
            true_labels.push(cluster_id);

            for d in 0..dim {
                let noise: f32 = rng.gen_range(-0.5..0.5);
                data[(idx, d)] = center[d] + noise;
            }
        }
    }

    (data, true_labels)
}

/// Per-feature means of the generating clusters above (noise-free centers).
#[allow(dead_code)]
pub fn true_cluster_centers(num_clusters: usize, dim: usize, separation: f32) -> Array2<f32> {
    let mut centers = Array2::<f32>::zeros((num_clusters, dim));
    for cluster_id in 0..num_clusters {
        for d in 0..dim {
            centers[(cluster_id, d)] = (cluster_id as f32) * separation + (d as f32) * 0.1;
        }
    }
    centers
}

/// Euclidean distance between two points.
#[allow(dead_code)]
pub fn euclidean_distance(a: ArrayView1<f32>, b: ArrayView1<f32>) -> f32 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y).powi(2))
        .sum::<f32>()
        .sqrt()
}

/// Within-cluster sum of squares over per-cluster assignment sets.
#[allow(dead_code)]
pub fn calculate_inertia(
    data: &Array2<f32>,
    centers: &Array2<f32>,
    assignments: &[Vec<usize>],
) -> f32 {
    let mut inertia = 0.0;
    for (cluster, members) in assignments.iter().enumerate() {
        for &idx in members {
            inertia += euclidean_distance(data.row(idx), centers.row(cluster)).powi(2);
        }
    }
    inertia
}

/// Verify every sample sits in the cluster whose center is nearest to it.
#[allow(dead_code)]
pub fn verify_optimal_assignment(
    data: &Array2<f32>,
    centers: &Array2<f32>,
    assignments: &[Vec<usize>],
) -> bool {
    for (cluster, members) in assignments.iter().enumerate() {
        for &idx in members {
            let assigned = euclidean_distance(data.row(idx), centers.row(cluster));
            for other in 0..centers.nrows() {
                let dist = euclidean_distance(data.row(idx), centers.row(other));
                if dist + 1e-5 < assigned {
                    return false;
                }
            }
        }
    }
    true
}
