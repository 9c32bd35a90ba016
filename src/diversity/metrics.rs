use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::matrix::CommunityMatrix;
use crate::core::types::Zone;
use crate::pipeline::DEFAULT_MIN_SITE_SPECIMENS;

/// Safely convert a count to f64 for index calculations
#[inline]
fn count_to_f64(count: u64) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    {
        count as f64
    }
}

/// Number of taxonomic units with a non-zero count
#[must_use]
pub fn richness(counts: &[u64]) -> usize {
    counts.iter().filter(|&&n| n > 0).count()
}

/// Shannon entropy `-Σ p_i ln(p_i)` over non-zero counts.
///
/// Returns `None` for an empty site (undefined, not zero) and 0.0 when
/// richness ≤ 1.
#[must_use]
pub fn shannon(counts: &[u64]) -> Option<f64> {
    let total: u64 = counts.iter().sum();
    if total == 0 {
        return None;
    }
    let n = count_to_f64(total);
    let h = counts
        .iter()
        .filter(|&&c| c > 0)
        .map(|&c| {
            let p = count_to_f64(c) / n;
            -p * p.ln()
        })
        .sum::<f64>();
    // A single-unit site has p = 1 and ln(1) = 0; clamp away the -0.0
    Some(h.max(0.0))
}

/// Gini–Simpson index `1 - Σ p_i²`, in [0, 1).
///
/// Returns `None` for an empty site.
#[must_use]
pub fn simpson(counts: &[u64]) -> Option<f64> {
    let total: u64 = counts.iter().sum();
    if total == 0 {
        return None;
    }
    let n = count_to_f64(total);
    let sum_sq = counts
        .iter()
        .filter(|&&c| c > 0)
        .map(|&c| {
            let p = count_to_f64(c) / n;
            p * p
        })
        .sum::<f64>();
    Some(1.0 - sum_sq)
}

/// Pielou evenness `H / ln(S)`.
///
/// Returns `None` when richness ≤ 1 (the ratio is undefined).
#[must_use]
pub fn pielou_evenness(counts: &[u64]) -> Option<f64> {
    let s = richness(counts);
    if s <= 1 {
        return None;
    }
    let h = shannon(counts)?;
    #[allow(clippy::cast_precision_loss)]
    let max_entropy = (s as f64).ln();
    Some(h / max_entropy)
}

/// Expected richness in a random subsample of size `m` drawn without
/// replacement (Hurlbert's rarefaction):
///
/// `E[S_m] = Σ_i [1 - C(N-n_i, m) / C(N, m)]`
///
/// The binomial ratio is evaluated as the telescoping product
/// `Π_{j=0..n_i-1} (N-m-j)/(N-j)` — the identity
/// `C(N-n_i, m)/C(N, m) = C(N-m, n_i)/C(N, n_i)` keeps every factor in
/// [0, 1], so the computation never overflows. The ratio is 0 when
/// `N - n_i < m`.
///
/// Returns `None` when `m > N` or `m = 0` (undefined, not zero).
#[must_use]
pub fn rarefied_richness(counts: &[u64], m: u64) -> Option<f64> {
    let total: u64 = counts.iter().sum();
    if m == 0 || m > total {
        return None;
    }

    let expected = counts
        .iter()
        .filter(|&&n| n > 0)
        .map(|&n| 1.0 - absence_probability(total, n, m))
        .sum::<f64>();
    Some(expected)
}

/// Probability that a unit with `n` of `total` specimens is absent from a
/// subsample of size `m`: `C(total-n, m) / C(total, m)`
fn absence_probability(total: u64, n: u64, m: u64) -> f64 {
    if total - n < m {
        return 0.0;
    }
    let mut ratio = 1.0;
    for j in 0..n {
        ratio *= count_to_f64(total - m - j) / count_to_f64(total - j);
    }
    ratio
}

/// Diversity indices for one site row.
///
/// Undefined statistics (rarefaction at `m > N`, indices on an empty
/// site) are `None`, distinguishable from a true zero. Computed once per
/// matrix snapshot; immutable thereafter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiversitySummary {
    pub site_id: String,
    pub specimen_count: u64,
    pub richness: usize,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rarefied_richness: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shannon: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub simpson: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pielou_evenness: Option<f64>,

    /// Zone assignment, present on country rows
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zone: Option<Zone>,
}

/// Computes per-site diversity summaries from one matrix snapshot.
pub struct DiversityEngine<'a> {
    matrix: &'a CommunityMatrix,
    /// Sites at or below this total are excluded from the table
    min_specimens: u64,
    /// Fixed reference sample size; `None` defers to the smallest
    /// qualifying site's total
    reference: Option<u64>,
}

impl<'a> DiversityEngine<'a> {
    pub fn new(matrix: &'a CommunityMatrix) -> Self {
        Self {
            matrix,
            min_specimens: DEFAULT_MIN_SITE_SPECIMENS,
            reference: None,
        }
    }

    pub fn with_policy(
        matrix: &'a CommunityMatrix,
        min_specimens: u64,
        reference: Option<u64>,
    ) -> Self {
        Self {
            matrix,
            min_specimens,
            reference,
        }
    }

    /// Reference sample size actually used: the configured value, or the
    /// smallest qualifying site's total
    #[must_use]
    pub fn reference_sample_size(&self) -> Option<u64> {
        if let Some(m) = self.reference {
            return Some(m);
        }
        (0..self.matrix.n_sites())
            .map(|i| self.matrix.row_total(i))
            .filter(|&n| n > self.min_specimens)
            .min()
    }

    /// One summary per qualifying site, in site order.
    ///
    /// `zones` supplies the per-country zone column for country matrices;
    /// pass `None` for zone or overall matrices.
    #[must_use]
    pub fn summaries(&self, zones: Option<&BTreeMap<String, Zone>>) -> Vec<DiversitySummary> {
        let reference = self.reference_sample_size();

        self.matrix
            .rows()
            .filter(|(_, counts)| counts.iter().sum::<u64>() > self.min_specimens)
            .map(|(site, counts)| {
                let specimen_count: u64 = counts.iter().sum();
                DiversitySummary {
                    site_id: site.to_string(),
                    specimen_count,
                    richness: richness(counts),
                    rarefied_richness: reference.and_then(|m| rarefied_richness(counts, m)),
                    shannon: shannon(counts),
                    simpson: simpson(counts),
                    pielou_evenness: pielou_evenness(counts),
                    zone: zones.and_then(|z| z.get(site).copied()),
                }
            })
            .collect()
    }
}
