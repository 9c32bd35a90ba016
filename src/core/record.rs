use serde::{Deserialize, Serialize};

use crate::core::types::{UnitId, Zone};

/// Sentinel value substituted for missing nominal fields
pub const UNKNOWN: &str = "Unknown";

/// A raw specimen record as delivered by the acquisition collaborator.
///
/// Every field except `id` may be absent. Cleaning turns this into a
/// [`SpecimenRecord`] or drops it entirely.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawRecord {
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub taxonomic_unit_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genus: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub species: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elevation: Option<f64>,
}

impl RawRecord {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.taxonomic_unit_id = Some(unit.into());
        self
    }

    #[must_use]
    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }

    #[must_use]
    pub fn with_latitude(mut self, latitude: f64) -> Self {
        self.latitude = Some(latitude);
        self
    }

    #[must_use]
    pub fn with_longitude(mut self, longitude: f64) -> Self {
        self.longitude = Some(longitude);
        self
    }

    #[must_use]
    pub fn with_taxonomy(
        mut self,
        family: impl Into<String>,
        genus: impl Into<String>,
        species: impl Into<String>,
    ) -> Self {
        self.family = Some(family.into());
        self.genus = Some(genus.into());
        self.species = Some(species.into());
        self
    }
}

/// A cleaned specimen record.
///
/// Invariant: `taxonomic_unit_id` and `country` are always non-empty;
/// nominal taxonomy fields fall back to the `"Unknown"` sentinel rather
/// than being absent. `zone` stays `None` until classification, and
/// remains `None` for records without a latitude.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpecimenRecord {
    pub id: String,
    pub taxonomic_unit_id: UnitId,
    pub family: String,
    pub genus: String,
    pub species: String,
    pub country: String,
    pub region: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elevation: Option<f64>,

    /// Latitude zone, assigned by the classifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zone: Option<Zone>,
}

impl SpecimenRecord {
    /// Whether the record carries a usable coordinate pair
    #[must_use]
    pub fn has_coordinates(&self) -> bool {
        self.latitude.is_some() && self.longitude.is_some()
    }
}
