//! Core data types: specimen records, latitude zones, and the dense
//! community matrix every downstream engine consumes.

pub mod matrix;
pub mod record;
pub mod types;
