//! # bindiv
//!
//! A library for computing community-ecology diversity statistics from
//! geotagged DNA-barcode specimen records.
//!
//! Specimen records clustered into barcode taxonomic units (BINs) arrive
//! with uneven metadata: some lack coordinates, some lack formal species
//! names, some lack the unit identifier entirely. `bindiv` cleans such a
//! record set, groups it by source country and by absolute-latitude zone,
//! and derives the statistics needed to examine a latitudinal diversity
//! gradient.
//!
//! ## Features
//!
//! - **Record cleaning**: mandatory-field filtering with sentinel fill-in
//!   for missing taxonomy, counted rather than raised
//! - **Zone classification**: latitude bands per record and per country
//!   (via mean latitude)
//! - **Dense community matrices**: site × unit counts with a shared
//!   column set across groupings
//! - **Diversity indices**: richness, Hurlbert rarefied richness,
//!   Shannon, Gini–Simpson, Pielou evenness
//! - **Curves**: closed-form rarefaction and seeded Monte Carlo species
//!   accumulation
//! - **Ordination**: 2D NMDS over Bray–Curtis dissimilarities with
//!   explicit iteration control
//! - **Zone network**: shared-unit counts between latitude zones
//!
//! ## Example
//!
//! ```rust
//! use bindiv::core::record::RawRecord;
//! use bindiv::core::types::Grouping;
//! use bindiv::{DiversityEngine, PipelineConfig, PipelineContext};
//!
//! let raw = vec![
//!     RawRecord::new("R1")
//!         .with_unit("BOLD:AAA0001")
//!         .with_country("Peru")
//!         .with_latitude(-12.5),
//!     RawRecord::new("R2")
//!         .with_unit("BOLD:AAA0002")
//!         .with_country("Peru")
//!         .with_latitude(-11.0),
//! ];
//!
//! let ctx = PipelineContext::build(&raw, PipelineConfig::default()).unwrap();
//! let matrix = ctx.matrix(Grouping::Country);
//!
//! let engine = DiversityEngine::with_policy(matrix, 0, None);
//! for row in engine.summaries(Some(ctx.country_zones())) {
//!     println!("{}: richness {}", row.site_id, row.richness);
//! }
//! ```
//!
//! ## Modules
//!
//! - [`core`]: Record, zone, and community-matrix types
//! - [`pipeline`]: Cleaning, classification, and per-run context
//! - [`parsing`]: TSV/CSV/JSON record-file parsers
//! - [`diversity`]: Indices, rarefaction, and accumulation curves
//! - [`ordination`]: Bray–Curtis distances and the NMDS solver
//! - [`network`]: Shared-unit network between zones
//! - [`cli`]: Command-line interface implementation

pub mod cli;
pub mod core;
pub mod diversity;
pub mod network;
pub mod ordination;
pub mod parsing;
pub mod pipeline;

// Re-export commonly used types for convenience
pub use core::matrix::{CommunityMatrix, CommunityMatrixBuilder};
pub use core::record::{RawRecord, SpecimenRecord};
pub use core::types::{Grouping, UnitId, Zone, ZoneThresholds};
pub use diversity::{DiversityEngine, DiversitySummary};
pub use network::ZoneNetwork;
pub use ordination::{ordinate, NmdsConfig, NmdsResult};
pub use pipeline::{ConfigError, PipelineConfig, PipelineContext};
