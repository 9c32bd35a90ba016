use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::core::matrix::CommunityMatrix;
use crate::core::types::Grouping;

/// Pooled richness statistics at one prefix length
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccumulationPoint {
    pub sites_pooled: usize,
    pub mean_richness: f64,
    pub sd_richness: f64,
}

/// Species-accumulation curve: expected pooled richness as a function of
/// the number of sites combined, with variance from random site ordering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccumulationCurve {
    pub grouping: Grouping,
    pub trials: usize,
    pub points: Vec<AccumulationPoint>,
}

/// Pooled richness per prefix length for one random permutation of sites
fn trial_richness(matrix: &CommunityMatrix, seed: u64) -> Vec<u64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut order: Vec<usize> = (0..matrix.n_sites()).collect();
    order.shuffle(&mut rng);

    let mut seen = vec![false; matrix.n_units()];
    let mut pooled: u64 = 0;
    let mut richness = Vec::with_capacity(order.len());

    for site in order {
        for (unit, &count) in matrix.row(site).iter().enumerate() {
            if count > 0 && !seen[unit] {
                seen[unit] = true;
                pooled += 1;
            }
        }
        richness.push(pooled);
    }
    richness
}

/// Monte Carlo species-accumulation estimate over `trials` random
/// permutations of site order.
///
/// Each trial shuffles with an `StdRng` seeded deterministically from the
/// base seed and the trial index, so a given `(seed, trials)` pair always
/// reproduces the same curve. Trials are independent and run in parallel;
/// the mean/sd reduction is commutative, so scheduling order cannot change
/// the result. The standard deviation is the sample form (n−1).
#[must_use]
pub fn accumulation_curve(matrix: &CommunityMatrix, trials: usize, seed: u64) -> AccumulationCurve {
    let k = matrix.n_sites();
    if k == 0 || trials == 0 {
        return AccumulationCurve {
            grouping: matrix.grouping(),
            trials,
            points: Vec::new(),
        };
    }

    let zero = || (vec![0.0f64; k], vec![0.0f64; k]);
    let (sums, sum_squares) = (0..trials)
        .into_par_iter()
        .map(|trial| trial_richness(matrix, seed.wrapping_add(trial as u64)))
        .fold(zero, |(mut sums, mut squares), richness| {
            for (i, &r) in richness.iter().enumerate() {
                #[allow(clippy::cast_precision_loss)]
                let r = r as f64;
                sums[i] += r;
                squares[i] += r * r;
            }
            (sums, squares)
        })
        .reduce(zero, |(mut a_sum, mut a_sq), (b_sum, b_sq)| {
            for i in 0..k {
                a_sum[i] += b_sum[i];
                a_sq[i] += b_sq[i];
            }
            (a_sum, a_sq)
        });

    #[allow(clippy::cast_precision_loss)]
    let p = trials as f64;
    let points = (0..k)
        .map(|i| {
            let mean = sums[i] / p;
            let sd = if trials > 1 {
                ((sum_squares[i] - p * mean * mean).max(0.0) / (p - 1.0)).sqrt()
            } else {
                0.0
            };
            AccumulationPoint {
                sites_pooled: i + 1,
                mean_richness: mean,
                sd_richness: sd,
            }
        })
        .collect();

    AccumulationCurve {
        grouping: matrix.grouping(),
        trials,
        points,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::matrix::CommunityMatrixBuilder;
    use crate::core::record::{SpecimenRecord, UNKNOWN};
    use crate::core::types::UnitId;
    use approx::assert_relative_eq;

    fn record(id: &str, unit: &str, country: &str) -> SpecimenRecord {
        SpecimenRecord {
            id: id.to_string(),
            taxonomic_unit_id: UnitId::new(unit),
            family: UNKNOWN.to_string(),
            genus: UNKNOWN.to_string(),
            species: UNKNOWN.to_string(),
            country: country.to_string(),
            region: UNKNOWN.to_string(),
            latitude: None,
            longitude: None,
            elevation: None,
            zone: None,
        }
    }

    fn test_matrix() -> CommunityMatrix {
        let records = vec![
            record("1", "A", "P"),
            record("2", "B", "P"),
            record("3", "B", "Q"),
            record("4", "C", "Q"),
            record("5", "C", "R"),
            record("6", "D", "R"),
        ];
        CommunityMatrixBuilder::new(&records).by_country()
    }

    fn test_matrix_from(records: &[SpecimenRecord]) -> CommunityMatrix {
        CommunityMatrixBuilder::new(records).by_country()
    }

    #[test]
    fn test_same_seed_reproduces_curve() {
        let matrix = test_matrix();
        let a = accumulation_curve(&matrix, 50, 7);
        let b = accumulation_curve(&matrix, 50, 7);
        assert_eq!(a.points, b.points);
    }

    #[test]
    fn test_mean_monotone_and_ends_at_total_richness() {
        let matrix = test_matrix();
        let curve = accumulation_curve(&matrix, 100, 7);

        let mut prev = 0.0;
        for p in &curve.points {
            assert!(p.mean_richness >= prev - 1e-12);
            prev = p.mean_richness;
        }
        // Pooling every site always reaches the full unit set
        let last = curve.points.last().unwrap();
        assert_relative_eq!(last.mean_richness, 4.0, max_relative = 1e-12);
        assert_relative_eq!(last.sd_richness, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_different_seeds_agree_on_asymptote() {
        let matrix = test_matrix();
        let a = accumulation_curve(&matrix, 400, 1);
        let b = accumulation_curve(&matrix, 400, 99);

        // Mid-curve means converge to the same estimator as P grows
        for (pa, pb) in a.points.iter().zip(&b.points) {
            assert!((pa.mean_richness - pb.mean_richness).abs() < 0.25);
        }
    }

    #[test]
    fn test_empty_matrix() {
        let curve = accumulation_curve(&test_matrix_from(&[]), 10, 7);
        assert!(curve.points.is_empty());
    }

    #[test]
    fn test_single_trial_has_zero_sd() {
        let matrix = test_matrix();
        let curve = accumulation_curve(&matrix, 1, 7);
        for p in &curve.points {
            assert_eq!(p.sd_richness, 0.0);
        }
    }
}
