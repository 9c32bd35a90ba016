//! Pipeline assembly: configuration, record cleaning and classification,
//! and the per-run context holding the immutable matrix snapshots.
//!
//! A [`PipelineContext`] is constructed fresh per run from raw records and
//! a validated [`PipelineConfig`]; no state persists between runs.
//! Configuration errors are the only fatal condition — they are rejected
//! here, before any computation starts.

pub mod clean;
pub mod summary;
pub mod zones;

use std::collections::BTreeMap;

use thiserror::Error;

use crate::core::matrix::{CommunityMatrix, CommunityMatrixBuilder};
use crate::core::record::{RawRecord, SpecimenRecord};
use crate::core::types::{Grouping, ThresholdError, Zone, ZoneThresholds};
use crate::ordination::nmds::NmdsConfig;
use crate::pipeline::clean::clean_records;
use crate::pipeline::summary::SummaryCounts;

/// Default minimum specimen count for a site to enter diversity tables
pub const DEFAULT_MIN_SITE_SPECIMENS: u64 = 500;

/// Default number of points on a rarefaction curve grid
pub const DEFAULT_RAREFACTION_POINTS: usize = 100;

/// Default number of accumulation permutation trials
pub const DEFAULT_ACCUMULATION_TRIALS: usize = 200;

/// Default seed for all stochastic steps
pub const DEFAULT_SEED: u64 = 42;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error(transparent)]
    Thresholds(#[from] ThresholdError),

    #[error("rarefaction reference sample size must be positive")]
    ZeroRarefactionReference,

    #[error("rarefaction curve must have at least one grid point")]
    ZeroRarefactionPoints,

    #[error("accumulation curve needs at least one permutation trial")]
    ZeroAccumulationTrials,

    #[error("ordination needs at least one restart")]
    ZeroRestarts,

    #[error("ordination needs a positive iteration budget")]
    ZeroIterations,

    #[error("ordination tolerance must be positive and finite, got {0}")]
    BadTolerance(f64),
}

/// Tunables for one pipeline run.
///
/// Validated once at construction; every downstream engine reads from the
/// validated copy and cannot fail on configuration.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Latitude band boundaries
    pub zone_thresholds: ZoneThresholds,

    /// Sites at or below this specimen count are excluded from diversity
    /// tables. Small samples give unstable index estimates; this is an
    /// analysis policy, not a numerical necessity.
    pub min_site_specimens: u64,

    /// Reference sample size for rarefied richness; when `None`, the
    /// smallest qualifying site's total is used
    pub rarefaction_reference: Option<u64>,

    /// Target number of grid points per rarefaction curve
    pub rarefaction_points: usize,

    /// Permutation trials per accumulation curve
    pub accumulation_trials: usize,

    /// Base seed for accumulation trials and ordination restarts
    pub seed: u64,

    /// Ordination (NMDS) tunables
    pub nmds: NmdsConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            zone_thresholds: ZoneThresholds::default(),
            min_site_specimens: DEFAULT_MIN_SITE_SPECIMENS,
            rarefaction_reference: None,
            rarefaction_points: DEFAULT_RAREFACTION_POINTS,
            accumulation_trials: DEFAULT_ACCUMULATION_TRIALS,
            seed: DEFAULT_SEED,
            nmds: NmdsConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` for non-monotonic zone thresholds, zero
    /// sample sizes, or a zero iteration/trial/restart budget.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.zone_thresholds.validate()?;
        if self.rarefaction_reference == Some(0) {
            return Err(ConfigError::ZeroRarefactionReference);
        }
        if self.rarefaction_points == 0 {
            return Err(ConfigError::ZeroRarefactionPoints);
        }
        if self.accumulation_trials == 0 {
            return Err(ConfigError::ZeroAccumulationTrials);
        }
        if self.nmds.restarts == 0 {
            return Err(ConfigError::ZeroRestarts);
        }
        if self.nmds.max_iterations == 0 {
            return Err(ConfigError::ZeroIterations);
        }
        if !self.nmds.tolerance.is_finite() || self.nmds.tolerance <= 0.0 {
            return Err(ConfigError::BadTolerance(self.nmds.tolerance));
        }
        Ok(())
    }
}

/// One run's worth of cleaned data and matrix snapshots.
///
/// Holds only the inputs and outputs named by the data model: cleaned
/// records, the country→zone assignment, and the three community
/// matrices. Downstream engines borrow from here and never mutate.
#[derive(Debug)]
pub struct PipelineContext {
    config: PipelineConfig,
    records: Vec<SpecimenRecord>,
    country_zones: BTreeMap<String, Zone>,
    by_country: CommunityMatrix,
    by_zone: CommunityMatrix,
    overall: CommunityMatrix,
    total_raw: usize,
    dropped: usize,
}

impl PipelineContext {
    /// Clean, classify, and aggregate raw records under a validated
    /// configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the configuration is invalid; malformed
    /// records are filtered, never raised.
    pub fn build(raw: &[RawRecord], config: PipelineConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let report = clean_records(raw);
        let total_raw = report.total;
        let dropped = report.dropped;
        let mut records = report.records;

        zones::classify_records(&mut records, &config.zone_thresholds);
        let country_zones = zones::country_zones(&records, &config.zone_thresholds);

        let builder = CommunityMatrixBuilder::new(&records);
        let by_country = builder.by_country();
        let by_zone = builder.by_zone();
        let overall = builder.overall();

        Ok(Self {
            config,
            records,
            country_zones,
            by_country,
            by_zone,
            overall,
            total_raw,
            dropped,
        })
    }

    #[must_use]
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    #[must_use]
    pub fn records(&self) -> &[SpecimenRecord] {
        &self.records
    }

    #[must_use]
    pub fn country_zones(&self) -> &BTreeMap<String, Zone> {
        &self.country_zones
    }

    #[must_use]
    pub fn matrix(&self, grouping: Grouping) -> &CommunityMatrix {
        match grouping {
            Grouping::Country => &self.by_country,
            Grouping::Zone => &self.by_zone,
            Grouping::Overall => &self.overall,
        }
    }

    #[must_use]
    pub fn summary(&self) -> SummaryCounts {
        let report = clean::CleanReport {
            records: self.records.clone(),
            total: self.total_raw,
            dropped: self.dropped,
        };
        SummaryCounts::compute(&report)
    }
}
