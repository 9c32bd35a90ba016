use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::core::matrix::CommunityMatrix;
use crate::ordination::distance::{dissimilarity_matrix, wisconsin_sqrt, Dissimilarities};

/// Default number of random restarts
pub const DEFAULT_RESTARTS: usize = 20;

/// Default iteration budget per restart
pub const DEFAULT_MAX_ITERATIONS: usize = 200;

/// Default stress-improvement convergence tolerance
pub const DEFAULT_TOLERANCE: f64 = 1e-4;

/// Ordination distances below this are treated as coincident points
const MIN_DISTANCE: f64 = 1e-12;

/// Tunables for the NMDS solver
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct NmdsConfig {
    /// Random initial configurations to try, keeping the lowest stress
    pub restarts: usize,
    /// Majorization iteration budget per restart
    pub max_iterations: usize,
    /// Stop when the stress improvement drops below this
    pub tolerance: f64,
}

impl Default for NmdsConfig {
    fn default() -> Self {
        Self {
            restarts: DEFAULT_RESTARTS,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

/// A 2D ordination of sites by community dissimilarity.
///
/// `converged` is false when stress was still improving beyond the
/// tolerance at the iteration budget on every restart; the best-found
/// configuration is still returned (a warning result, not a failure).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NmdsResult {
    pub sites: Vec<String>,
    pub coordinates: Vec<[f64; 2]>,
    /// Kruskal stress-1 of the returned configuration
    pub stress: f64,
    pub converged: bool,
}

/// Non-metric multidimensional scaling of a community matrix into 2D.
///
/// Counts are square-root transformed and Wisconsin-standardized, pairwise
/// Bray–Curtis dissimilarities computed, then each random start is refined
/// by alternating isotonic regression (pool-adjacent-violators over pairs
/// in dissimilarity order) with Guttman majorization steps, minimizing
/// Kruskal stress-1. The lowest-stress configuration over all restarts is
/// returned, centered on the origin.
#[must_use]
pub fn ordinate(matrix: &CommunityMatrix, config: &NmdsConfig, seed: u64) -> NmdsResult {
    let sites = matrix.sites().to_vec();
    let n = sites.len();

    if n <= 2 {
        return trivial_result(matrix, sites);
    }

    let dissimilarities = dissimilarity_matrix(&wisconsin_sqrt(matrix));

    let mut best: Option<(Vec<[f64; 2]>, f64, bool)> = None;
    for restart in 0..config.restarts {
        let mut rng = StdRng::seed_from_u64(seed.wrapping_add(restart as u64));
        let (coords, stress, converged) = refine(&dissimilarities, config, &mut rng);
        if best.as_ref().map_or(true, |(_, s, _)| stress < *s) {
            best = Some((coords, stress, converged));
        }
    }

    // restarts >= 1 is enforced at config validation
    let (mut coordinates, stress, converged) = best.unwrap_or((vec![[0.0, 0.0]; n], 0.0, true));
    center(&mut coordinates);

    if !converged {
        tracing::warn!(
            stress,
            "ordination did not converge within the iteration budget; \
             returning best-found configuration"
        );
    }

    NmdsResult {
        sites,
        coordinates,
        stress,
        converged,
    }
}

/// With two or fewer sites the ordination is exact and stress-free
fn trivial_result(matrix: &CommunityMatrix, sites: Vec<String>) -> NmdsResult {
    let coordinates = match sites.len() {
        0 => Vec::new(),
        1 => vec![[0.0, 0.0]],
        _ => {
            let d = dissimilarity_matrix(&wisconsin_sqrt(matrix)).get(0, 1);
            vec![[-d / 2.0, 0.0], [d / 2.0, 0.0]]
        }
    };
    NmdsResult {
        sites,
        coordinates,
        stress: 0.0,
        converged: true,
    }
}

/// One random start refined to convergence or the iteration budget
fn refine(
    dissimilarities: &Dissimilarities,
    config: &NmdsConfig,
    rng: &mut StdRng,
) -> (Vec<[f64; 2]>, f64, bool) {
    let n = dissimilarities.n();

    let mut coords: Vec<[f64; 2]> = (0..n)
        .map(|_| [rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0)])
        .collect();

    // Pairs sorted by dissimilarity; rank order is fixed for the restart
    let mut pairs: Vec<(usize, usize, f64)> = dissimilarities.pairs().collect();
    pairs.sort_by(|a, b| a.2.partial_cmp(&b.2).unwrap_or(std::cmp::Ordering::Equal));

    let mut prev_stress = f64::INFINITY;
    let mut converged = false;
    let mut stress = 0.0;

    for _ in 0..config.max_iterations {
        let distances: Vec<f64> = pairs
            .iter()
            .map(|&(i, j, _)| euclidean(coords[i], coords[j]))
            .collect();

        // Monotone disparities over the dissimilarity ranks
        let fitted = isotonic_fit(&distances);

        stress = stress_1(&distances, &fitted);
        if (prev_stress - stress).abs() < config.tolerance {
            converged = true;
            break;
        }
        prev_stress = stress;

        coords = guttman_step(&coords, &pairs, &distances, &fitted);
    }

    (coords, stress, converged)
}

fn euclidean(a: [f64; 2], b: [f64; 2]) -> f64 {
    let dx = a[0] - b[0];
    let dy = a[1] - b[1];
    dx.hypot(dy)
}

/// Kruskal stress-1: `sqrt(Σ(d - d̂)² / Σ d²)`
fn stress_1(distances: &[f64], fitted: &[f64]) -> f64 {
    let numerator: f64 = distances
        .iter()
        .zip(fitted)
        .map(|(d, f)| (d - f) * (d - f))
        .sum();
    let denominator: f64 = distances.iter().map(|d| d * d).sum();
    if denominator > 0.0 {
        (numerator / denominator).sqrt()
    } else {
        0.0
    }
}

/// Pool-adjacent-violators: least-squares non-decreasing fit
fn isotonic_fit(values: &[f64]) -> Vec<f64> {
    // Merged blocks of (sum, count); a violation merges the newest block
    // into its predecessor until the means are non-decreasing
    let mut sums: Vec<f64> = Vec::with_capacity(values.len());
    let mut counts: Vec<usize> = Vec::with_capacity(values.len());

    for &v in values {
        sums.push(v);
        counts.push(1);
        while sums.len() > 1 {
            let k = sums.len();
            #[allow(clippy::cast_precision_loss)]
            let prev_mean = sums[k - 2] / counts[k - 2] as f64;
            #[allow(clippy::cast_precision_loss)]
            let last_mean = sums[k - 1] / counts[k - 1] as f64;
            if prev_mean > last_mean {
                sums[k - 2] += sums[k - 1];
                counts[k - 2] += counts[k - 1];
                sums.pop();
                counts.pop();
            } else {
                break;
            }
        }
    }

    let mut fitted = Vec::with_capacity(values.len());
    for (sum, count) in sums.into_iter().zip(counts) {
        #[allow(clippy::cast_precision_loss)]
        let mean = sum / count as f64;
        fitted.extend(std::iter::repeat(mean).take(count));
    }
    fitted
}

/// Majorization update: move every point toward the configuration whose
/// distances equal the disparities
fn guttman_step(
    coords: &[[f64; 2]],
    pairs: &[(usize, usize, f64)],
    distances: &[f64],
    fitted: &[f64],
) -> Vec<[f64; 2]> {
    let n = coords.len();
    let mut updated = vec![[0.0f64; 2]; n];

    for (pair_idx, &(i, j, _)) in pairs.iter().enumerate() {
        let ratio = if distances[pair_idx] > MIN_DISTANCE {
            fitted[pair_idx] / distances[pair_idx]
        } else {
            0.0
        };
        for axis in 0..2 {
            let delta = coords[i][axis] - coords[j][axis];
            updated[i][axis] += ratio * delta;
            updated[j][axis] -= ratio * delta;
        }
    }

    #[allow(clippy::cast_precision_loss)]
    let scale = 1.0 / n as f64;
    for point in &mut updated {
        point[0] *= scale;
        point[1] *= scale;
    }
    updated
}

fn center(coords: &mut [[f64; 2]]) {
    if coords.is_empty() {
        return;
    }
    #[allow(clippy::cast_precision_loss)]
    let n = coords.len() as f64;
    let cx: f64 = coords.iter().map(|c| c[0]).sum::<f64>() / n;
    let cy: f64 = coords.iter().map(|c| c[1]).sum::<f64>() / n;
    for c in coords {
        c[0] -= cx;
        c[1] -= cy;
    }
}
