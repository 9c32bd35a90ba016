//! Ordination of sites by community dissimilarity: Wisconsin/square-root
//! standardization, Bray–Curtis distances, and a 2D non-metric
//! multidimensional scaling solver with explicit iteration and seeding
//! control.

pub mod distance;
pub mod nmds;

pub use distance::{bray_curtis, dissimilarity_matrix, wisconsin_sqrt, Dissimilarities};
pub use nmds::{ordinate, NmdsConfig, NmdsResult};
