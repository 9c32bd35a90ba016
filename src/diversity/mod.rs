//! Diversity statistics: per-site indices, closed-form rarefaction
//! curves, and Monte Carlo species-accumulation curves.

pub mod accumulation;
pub mod metrics;
pub mod rarefaction;

pub use accumulation::{accumulation_curve, AccumulationCurve, AccumulationPoint};
pub use metrics::{DiversityEngine, DiversitySummary};
pub use rarefaction::{rarefaction_curves, RarefactionCurve, RarefactionPoint};
