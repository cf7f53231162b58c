use crate::error::{Error, Result};
use log::debug;
use ndarray::{Array2, ArrayView1};
use rand::seq::SliceRandom;
use rand::thread_rng;
use rand::Rng;
use wide::f32x8;

/// Outcome of one complete Lloyd's-algorithm run.
pub struct FitResult {
    /// Cluster centers, shape (k, n_features). Row `i` is the center of cluster `i`.
    pub centers: Array2<f32>,
    /// For each cluster index, the sample row indices assigned to it.
    /// The sets partition `0..n_samples`.
    pub assignments: Vec<Vec<usize>>,
    /// Number of assignment+update passes executed.
    pub iterations: usize,
    /// Whether every center moved at most `distance_threshold` in the last pass.
    pub converged: bool,
}

/// Runs Lloyd's iteration to convergence or the iteration cap.
///
/// Centers are seeded from `k` pairwise-distinct data points chosen uniformly
/// at random. Each pass assigns every sample to its nearest center (Euclidean
/// distance, first center wins ties) and recomputes centers as per-feature
/// means. The loop stops early once no center moves farther than `threshold`.
/// Reaching `max_iters` without converging is normal termination, not an error.
pub fn run_lloyd(
    data: &Array2<f32>,
    k: usize,
    max_iters: usize,
    threshold: f32,
) -> Result<FitResult> {
    let n = data.nrows();
    if n == 0 || data.ncols() == 0 {
        return Err(Error::InvalidInput(
            "dataset must contain at least one sample and one feature".to_string(),
        ));
    }
    if k < 2 {
        return Err(Error::InvalidInput(format!(
            "n_clusters must be at least 2, got {k}"
        )));
    }
    if k > n {
        return Err(Error::InvalidInput(format!(
            "n_clusters ({k}) exceeds n_samples ({n}); distinct seeds are impossible"
        )));
    }

    let mut rng = thread_rng();
    let mut centers = seed_initial_centers(data, k, &mut rng)?;
    let mut assignments: Vec<Vec<usize>> = vec![Vec::new(); k];
    let mut iterations = 0;
    let mut converged = false;

    for iter in 0..max_iters {
        assign_points(data, &centers, &mut assignments);

        let prev_centers = centers.clone();
        update_centers(data, &assignments, &mut centers);
        iterations = iter + 1;

        let shift = max_center_shift(&centers, &prev_centers);
        debug!("iteration {iter}: max center shift {shift:.6}");

        if shift <= threshold {
            debug!("converged after {iterations} iterations");
            converged = true;
            break;
        }
    }

    Ok(FitResult {
        centers,
        assignments,
        iterations,
        converged,
    })
}

/// Picks `k` pairwise-distinct points from `data` as initial centers.
///
/// Walks a random permutation of the row indices and keeps the first `k` rows
/// whose values differ from every row already kept, so duplicate samples can
/// never seed two clusters at the same point. Errors when the dataset holds
/// fewer than `k` distinct points.
pub fn seed_initial_centers<R: Rng>(
    data: &Array2<f32>,
    k: usize,
    rng: &mut R,
) -> Result<Array2<f32>> {
    let n = data.nrows();
    let mut order: Vec<usize> = (0..n).collect();
    order.shuffle(rng);

    let mut chosen: Vec<usize> = Vec::with_capacity(k);
    for idx in order {
        if chosen.iter().all(|&c| data.row(c) != data.row(idx)) {
            chosen.push(idx);
            if chosen.len() == k {
                break;
            }
        }
    }

    if chosen.len() < k {
        return Err(Error::InvalidInput(format!(
            "dataset has fewer than {k} distinct points; cannot seed {k} clusters"
        )));
    }

    let mut centers = Array2::<f32>::zeros((k, data.ncols()));
    for (i, &idx) in chosen.iter().enumerate() {
        centers.row_mut(i).assign(&data.row(idx));
    }
    Ok(centers)
}

/// Assigns every sample to its nearest center.
///
/// Deterministic for fixed centers: ties go to the lowest center index because
/// the scan uses a strict `<` comparison in index order.
pub fn assign_points(
    data: &Array2<f32>,
    centers: &Array2<f32>,
    assignments: &mut Vec<Vec<usize>>,
) {
    let k = centers.nrows();
    assignments.resize(k, Vec::new());
    for cluster in assignments.iter_mut() {
        cluster.clear();
    }

    for i in 0..data.nrows() {
        let best = nearest_center(&data.row(i), centers);
        assignments[best].push(i);
    }
}

/// Index of the center nearest to `point` (squared Euclidean distance).
pub fn nearest_center(point: &ArrayView1<f32>, centers: &Array2<f32>) -> usize {
    let mut best = 0;
    let mut best_dist = f32::INFINITY;

    for c in 0..centers.nrows() {
        let dist = squared_distance(point, &centers.row(c));
        if dist < best_dist {
            best_dist = dist;
            best = c;
        }
    }

    best
}

/// Recomputes each center as the per-feature mean of its assigned samples.
///
/// A cluster with no assigned samples keeps its previous center unchanged.
pub fn update_centers(data: &Array2<f32>, assignments: &[Vec<usize>], centers: &mut Array2<f32>) {
    let dim = data.ncols();

    for (c, members) in assignments.iter().enumerate() {
        if members.is_empty() {
            continue;
        }

        let mut sum = vec![0.0f32; dim];
        for &idx in members {
            for d in 0..dim {
                sum[d] += data[(idx, d)];
            }
        }

        let inv = 1.0 / members.len() as f32;
        for d in 0..dim {
            centers[(c, d)] = sum[d] * inv;
        }
    }
}

/// Largest Euclidean displacement of any center between two iterations.
pub fn max_center_shift(curr: &Array2<f32>, prev: &Array2<f32>) -> f32 {
    let mut max_shift = 0.0f32;
    for c in 0..curr.nrows() {
        let shift = squared_distance(&curr.row(c), &prev.row(c)).sqrt();
        if shift > max_shift {
            max_shift = shift;
        }
    }
    max_shift
}

/// Squared Euclidean distance between two points, SIMD-widened in 8-lane chunks.
#[inline]
pub fn squared_distance(a: &ArrayView1<f32>, b: &ArrayView1<f32>) -> f32 {
    match (a.as_slice(), b.as_slice()) {
        (Some(a), Some(b)) => squared_distance_slices(a, b),
        // Non-contiguous views take the scalar path.
        _ => a
            .iter()
            .zip(b.iter())
            .map(|(x, y)| (x - y) * (x - y))
            .sum(),
    }
}

#[inline]
fn squared_distance_slices(a: &[f32], b: &[f32]) -> f32 {
    let mut acc = f32x8::splat(0.0);
    let mut chunks_a = a.chunks_exact(8);
    let mut chunks_b = b.chunks_exact(8);

    for (ca, cb) in (&mut chunks_a).zip(&mut chunks_b) {
        let ca: [f32; 8] = ca.try_into().unwrap();
        let cb: [f32; 8] = cb.try_into().unwrap();
        let diff = f32x8::from(ca) - f32x8::from(cb);
        acc += diff * diff;
    }

    let mut tail = 0.0;
    for (x, y) in chunks_a.remainder().iter().zip(chunks_b.remainder()) {
        let diff = x - y;
        tail += diff * diff;
    }

    acc.reduce_add() + tail
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn distinct_points(n: usize, dim: usize) -> Array2<f32> {
        Array2::from_shape_vec((n, dim), (0..n * dim).map(|x| x as f32).collect()).unwrap()
    }

    fn inertia(data: &Array2<f32>, centers: &Array2<f32>, assignments: &[Vec<usize>]) -> f32 {
        let mut total = 0.0;
        for (c, members) in assignments.iter().enumerate() {
            for &idx in members {
                total += squared_distance(&data.row(idx), &centers.row(c));
            }
        }
        total
    }

    #[test]
    fn squared_distance_matches_scalar_for_long_vectors() {
        // 19 features: two full SIMD chunks plus a 3-element tail.
        let a = Array2::from_shape_vec((1, 19), (0..19).map(|x| x as f32 * 0.5).collect()).unwrap();
        let b =
            Array2::from_shape_vec((1, 19), (0..19).map(|x| x as f32 * -0.25).collect()).unwrap();

        let expected: f32 = a
            .row(0)
            .iter()
            .zip(b.row(0).iter())
            .map(|(x, y)| (x - y) * (x - y))
            .sum();
        let got = squared_distance(&a.row(0), &b.row(0));

        assert!((got - expected).abs() < 1e-3, "{got} vs {expected}");
    }

    #[test]
    fn seeding_picks_pairwise_distinct_centers() {
        let data = distinct_points(30, 3);
        let mut rng = thread_rng();

        let centers = seed_initial_centers(&data, 30, &mut rng).expect("seeding failed");

        for i in 0..30 {
            for j in (i + 1)..30 {
                assert_ne!(
                    centers.row(i),
                    centers.row(j),
                    "centers {i} and {j} are identical"
                );
            }
        }
    }

    #[test]
    fn seeding_skips_duplicate_samples() {
        // Only two distinct points, each repeated.
        let data = array![[1.0, 2.0], [1.0, 2.0], [7.0, 8.0], [7.0, 8.0], [1.0, 2.0]];
        let mut rng = thread_rng();

        let centers = seed_initial_centers(&data, 2, &mut rng).expect("seeding failed");
        assert_ne!(centers.row(0), centers.row(1));
    }

    #[test]
    fn seeding_fails_when_distinct_points_run_out() {
        let data = array![[3.0, 3.0], [3.0, 3.0], [3.0, 3.0]];
        let mut rng = thread_rng();

        let result = seed_initial_centers(&data, 2, &mut rng);
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn assignment_is_deterministic_for_fixed_centers() {
        let data = distinct_points(40, 4);
        let mut rng = thread_rng();
        let centers = seed_initial_centers(&data, 5, &mut rng).unwrap();

        let mut first = Vec::new();
        let mut second = Vec::new();
        assign_points(&data, &centers, &mut first);
        assign_points(&data, &centers, &mut second);

        assert_eq!(first, second);
    }

    #[test]
    fn assignment_ties_go_to_the_lowest_center_index() {
        // Point equidistant from two identical centers.
        let data = array![[0.0, 0.0]];
        let centers = array![[1.0, 0.0], [1.0, 0.0]];

        let mut assignments = Vec::new();
        assign_points(&data, &centers, &mut assignments);

        assert_eq!(assignments[0], vec![0]);
        assert!(assignments[1].is_empty());
    }

    #[test]
    fn empty_cluster_retains_previous_center() {
        let data = array![[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]];
        // Second center is far from every sample and receives no points.
        let mut centers = array![[0.5, 0.5], [100.0, 100.0]];

        let mut assignments = Vec::new();
        assign_points(&data, &centers, &mut assignments);
        assert!(assignments[1].is_empty());

        update_centers(&data, &assignments, &mut centers);
        assert_eq!(centers.row(1), array![100.0f32, 100.0].view());
    }

    #[test]
    fn inertia_is_non_increasing_across_passes() {
        let data = distinct_points(60, 3);
        let mut rng = thread_rng();
        let mut centers = seed_initial_centers(&data, 4, &mut rng).unwrap();
        let mut assignments = Vec::new();

        let mut previous = f32::INFINITY;
        for _ in 0..8 {
            assign_points(&data, &centers, &mut assignments);
            update_centers(&data, &assignments, &mut centers);

            let current = inertia(&data, &centers, &assignments);
            assert!(
                current <= previous + 1e-3,
                "inertia increased: {previous} -> {current}"
            );
            previous = current;
        }
    }

    #[test]
    fn run_lloyd_rejects_bad_cluster_counts() {
        let data = distinct_points(5, 2);

        assert!(matches!(
            run_lloyd(&data, 1, 10, 1e-4),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            run_lloyd(&data, 6, 10, 1e-4),
            Err(Error::InvalidInput(_))
        ));
    }
}
