use kmeans_quantizer::utils::{gaussian_cluster, stack_clusters};
use kmeans_quantizer::{KMeans, KMeansConfig};

fn report(title: &str, engine: &KMeans) {
    println!("\n=== {title} ===");
    let (Some(centers), Some(assignments)) = (engine.centers(), engine.assignments()) else {
        println!("engine has no fit result");
        return;
    };

    println!(
        "{} iterations (converged: {})",
        engine.iterations().unwrap_or(0),
        engine.converged().unwrap_or(false)
    );
    for (i, members) in assignments.iter().enumerate() {
        println!(
            "  cluster {i}: {} points, center ({:.3}, {:.3})",
            members.len(),
            centers[(i, 0)],
            centers[(i, 1)]
        );
    }
}

/// Five well-separated point clouds on a line; k-means should recover them.
fn separated_clusters() {
    let data = stack_clusters(&[
        gaussian_cluster(0.5, 0.0, 0.1, 512),
        gaussian_cluster(1.0, 0.0, 0.1, 512),
        gaussian_cluster(1.5, 0.0, 0.1, 512),
        gaussian_cluster(2.0, 0.0, 0.1, 512),
        gaussian_cluster(2.5, 0.0, 0.1, 512),
    ]);

    let mut engine = KMeans::new(KMeansConfig::new());
    engine.fit(&data, None).expect("fit failed");
    report("Separated clusters", &engine);
}

/// One merged blob carved into five arbitrary cells.
fn merged_clusters() {
    let data = gaussian_cluster(0.0, 0.0, 1.0, 512 * 5);

    let mut engine = KMeans::new(KMeansConfig::new());
    engine.fit(&data, None).expect("fit failed");
    report("Merged clusters", &engine);
}

fn main() {
    env_logger::init();
    separated_clusters();
    merged_clusters();
}
