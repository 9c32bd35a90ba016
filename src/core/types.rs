use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Identifier for a taxonomic unit (barcode cluster / BIN)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UnitId(pub String);

impl UnitId {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for UnitId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Absolute-latitude band used as the primary ecological grouping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Zone {
    Tropical,
    Subtropical,
    Temperate,
    Extreme,
}

impl Zone {
    /// All zones in latitude order, for stable iteration
    pub const ALL: [Self; 4] = [
        Self::Tropical,
        Self::Subtropical,
        Self::Temperate,
        Self::Extreme,
    ];
}

impl std::fmt::Display for Zone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Tropical => write!(f, "Tropical"),
            Self::Subtropical => write!(f, "Sub-tropical"),
            Self::Temperate => write!(f, "Temperate"),
            Self::Extreme => write!(f, "Extreme"),
        }
    }
}

/// Error raised when zone thresholds fail validation at pipeline construction
#[derive(Error, Debug)]
pub enum ThresholdError {
    #[error("zone thresholds must be strictly increasing: {0} < {1} < {2}")]
    NotIncreasing(f64, f64, f64),

    #[error("zone thresholds must be positive and finite, got {0}")]
    OutOfRange(f64),
}

/// Absolute-latitude boundaries between zone bands.
///
/// Boundaries are closed-lower/open-upper: a latitude exactly on a
/// boundary belongs to the lower band, so |lat| = 20 is Tropical and
/// |lat| = 60 is Temperate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoneThresholds {
    /// Upper bound of the tropical band (inclusive)
    pub tropical_max: f64,
    /// Upper bound of the sub-tropical band (inclusive)
    pub subtropical_max: f64,
    /// Upper bound of the temperate band (inclusive); above is Extreme
    pub temperate_max: f64,
}

impl Default for ZoneThresholds {
    fn default() -> Self {
        Self {
            tropical_max: 20.0,
            subtropical_max: 40.0,
            temperate_max: 60.0,
        }
    }
}

impl ZoneThresholds {
    /// Validate that boundaries are positive, finite, and strictly increasing.
    ///
    /// # Errors
    ///
    /// Returns `ThresholdError` when any boundary is non-positive or
    /// non-finite, or when the boundaries are not strictly increasing.
    pub fn validate(&self) -> Result<(), ThresholdError> {
        for bound in [self.tropical_max, self.subtropical_max, self.temperate_max] {
            if !bound.is_finite() || bound <= 0.0 {
                return Err(ThresholdError::OutOfRange(bound));
            }
        }
        if self.tropical_max >= self.subtropical_max || self.subtropical_max >= self.temperate_max {
            return Err(ThresholdError::NotIncreasing(
                self.tropical_max,
                self.subtropical_max,
                self.temperate_max,
            ));
        }
        Ok(())
    }

    /// Classify a latitude into its zone band by absolute value
    #[must_use]
    pub fn classify(&self, latitude: f64) -> Zone {
        let abs = latitude.abs();
        if abs <= self.tropical_max {
            Zone::Tropical
        } else if abs <= self.subtropical_max {
            Zone::Subtropical
        } else if abs <= self.temperate_max {
            Zone::Temperate
        } else {
            Zone::Extreme
        }
    }
}

/// Site grouping scheme for community matrices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Grouping {
    #[default]
    Country,
    Zone,
    Overall,
}

impl std::fmt::Display for Grouping {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Country => write!(f, "country"),
            Self::Zone => write!(f, "zone"),
            Self::Overall => write!(f, "overall"),
        }
    }
}
