use serde::{Deserialize, Serialize};

use crate::core::matrix::CommunityMatrix;
use crate::diversity::metrics::rarefied_richness;

/// One point on a rarefaction curve
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RarefactionPoint {
    pub sample_size: u64,
    pub expected_richness: f64,
}

/// Expected richness versus subsample size for one site.
///
/// Monotonically non-decreasing in `sample_size`; the final point is at
/// `m = N` where expected richness equals the site's total richness.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RarefactionCurve {
    pub site_id: String,
    pub points: Vec<RarefactionPoint>,
}

/// Evaluate the closed-form rarefaction curve for one site on a
/// fixed-step grid of sample sizes from 1 to `N`.
///
/// `target_points` bounds the grid resolution; the grid always ends
/// exactly at `m = N`. Returns `None` for an empty site (the curve is
/// undefined, not flat zero).
#[must_use]
pub fn rarefaction_curve(
    site_id: &str,
    counts: &[u64],
    target_points: usize,
) -> Option<RarefactionCurve> {
    let total: u64 = counts.iter().sum();
    if total == 0 || target_points == 0 {
        return None;
    }

    let step = (total / target_points as u64).max(1);

    let mut points = Vec::new();
    let mut m = 1;
    while m <= total {
        // rarefied_richness is defined for every 1 <= m <= N
        if let Some(expected) = rarefied_richness(counts, m) {
            points.push(RarefactionPoint {
                sample_size: m,
                expected_richness: expected,
            });
        }
        m += step;
    }

    // Close the curve at the full sample size
    if points.last().map(|p| p.sample_size) != Some(total) {
        if let Some(expected) = rarefied_richness(counts, total) {
            points.push(RarefactionPoint {
                sample_size: total,
                expected_richness: expected,
            });
        }
    }

    Some(RarefactionCurve {
        site_id: site_id.to_string(),
        points,
    })
}

/// Rarefaction curves for every non-empty site in a matrix, in site order
#[must_use]
pub fn rarefaction_curves(matrix: &CommunityMatrix, target_points: usize) -> Vec<RarefactionCurve> {
    matrix
        .rows()
        .filter_map(|(site, counts)| rarefaction_curve(site, counts, target_points))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_curve_monotone_and_bounded() {
        let counts = [40u64, 25, 20, 10, 5];
        let curve = rarefaction_curve("site", &counts, 50).unwrap();

        let mut prev = 0.0;
        for p in &curve.points {
            assert!(p.expected_richness >= prev - 1e-12);
            assert!(p.expected_richness <= 5.0 + 1e-12);
            prev = p.expected_richness;
        }
    }

    #[test]
    fn test_curve_ends_at_full_richness() {
        let counts = [40u64, 25, 20, 10, 5];
        let curve = rarefaction_curve("site", &counts, 7).unwrap();

        let last = curve.points.last().unwrap();
        assert_eq!(last.sample_size, 100);
        assert_relative_eq!(last.expected_richness, 5.0, max_relative = 1e-12);
    }

    #[test]
    fn test_curve_starts_at_one() {
        let counts = [10u64, 10];
        let curve = rarefaction_curve("site", &counts, 100).unwrap();

        let first = &curve.points[0];
        assert_eq!(first.sample_size, 1);
        assert_relative_eq!(first.expected_richness, 1.0, max_relative = 1e-12);
    }

    #[test]
    fn test_empty_site_has_no_curve() {
        assert!(rarefaction_curve("site", &[0, 0], 10).is_none());
    }

    #[test]
    fn test_small_site_gets_every_size() {
        let counts = [2u64, 1];
        let curve = rarefaction_curve("site", &counts, 100).unwrap();
        let sizes: Vec<u64> = curve.points.iter().map(|p| p.sample_size).collect();
        assert_eq!(sizes, vec![1, 2, 3]);
    }
}
