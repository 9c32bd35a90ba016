use crate::core::matrix::CommunityMatrix;

/// Symmetric pairwise dissimilarities, stored row-major
#[derive(Debug, Clone)]
pub struct Dissimilarities {
    n: usize,
    values: Vec<f64>,
}

impl Dissimilarities {
    #[must_use]
    pub fn n(&self) -> usize {
        self.n
    }

    #[must_use]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.values[i * self.n + j]
    }

    /// Upper-triangle pairs (i, j, dissimilarity), i < j
    pub fn pairs(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        (0..self.n).flat_map(move |i| ((i + 1)..self.n).map(move |j| (i, j, self.get(i, j))))
    }
}

/// Square-root transform followed by Wisconsin double standardization:
/// each cell divided by its column maximum, then each row by its row
/// total. Downweights dominant units and unequal sampling effort before
/// dissimilarity computation.
#[must_use]
pub fn wisconsin_sqrt(matrix: &CommunityMatrix) -> Vec<Vec<f64>> {
    let n_units = matrix.n_units();
    let mut rows: Vec<Vec<f64>> = matrix
        .rows()
        .map(|(_, counts)| {
            counts
                .iter()
                .map(|&c| {
                    #[allow(clippy::cast_precision_loss)]
                    let c = c as f64;
                    c.sqrt()
                })
                .collect()
        })
        .collect();

    // Column maxima
    let mut col_max = vec![0.0f64; n_units];
    for row in &rows {
        for (j, &v) in row.iter().enumerate() {
            col_max[j] = col_max[j].max(v);
        }
    }
    for row in &mut rows {
        for (j, v) in row.iter_mut().enumerate() {
            if col_max[j] > 0.0 {
                *v /= col_max[j];
            }
        }
    }

    // Row totals
    for row in &mut rows {
        let total: f64 = row.iter().sum();
        if total > 0.0 {
            for v in row.iter_mut() {
                *v /= total;
            }
        }
    }

    rows
}

/// Bray–Curtis dissimilarity `Σ|x_ai - x_bi| / Σ(x_ai + x_bi)`.
///
/// Returns 0.0 when both vectors are all-zero (no shared material to
/// differ over).
#[must_use]
pub fn bray_curtis(a: &[f64], b: &[f64]) -> f64 {
    let mut diff = 0.0;
    let mut sum = 0.0;
    for (&x, &y) in a.iter().zip(b) {
        diff += (x - y).abs();
        sum += x + y;
    }
    if sum > 0.0 {
        diff / sum
    } else {
        0.0
    }
}

/// Pairwise Bray–Curtis dissimilarity over transformed rows
#[must_use]
pub fn dissimilarity_matrix(rows: &[Vec<f64>]) -> Dissimilarities {
    let n = rows.len();
    let mut values = vec![0.0f64; n * n];
    for i in 0..n {
        for j in (i + 1)..n {
            let d = bray_curtis(&rows[i], &rows[j]);
            values[i * n + j] = d;
            values[j * n + i] = d;
        }
    }
    Dissimilarities { n, values }
}
