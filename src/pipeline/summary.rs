use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::core::record::{SpecimenRecord, UNKNOWN};
use crate::pipeline::clean::CleanReport;

/// Headline counts over one cleaned record set.
///
/// The `"Unknown"` sentinel is not a name: it is excluded from the unique
/// family/genus/species counts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryCounts {
    pub total_records: usize,
    pub cleaned_records: usize,
    pub dropped_records: usize,
    pub unique_units: usize,
    pub unique_families: usize,
    pub unique_genera: usize,
    pub unique_species: usize,
    pub unique_countries: usize,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude_min: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude_max: Option<f64>,
}

impl SummaryCounts {
    #[must_use]
    pub fn compute(report: &CleanReport) -> Self {
        let records = &report.records;

        let mut units = BTreeSet::new();
        let mut families = BTreeSet::new();
        let mut genera = BTreeSet::new();
        let mut species = BTreeSet::new();
        let mut countries = BTreeSet::new();
        let mut lat_min: Option<f64> = None;
        let mut lat_max: Option<f64> = None;

        for r in records {
            units.insert(r.taxonomic_unit_id.as_str());
            if r.family != UNKNOWN {
                families.insert(r.family.as_str());
            }
            if r.genus != UNKNOWN {
                genera.insert(r.genus.as_str());
            }
            if r.species != UNKNOWN {
                species.insert(r.species.as_str());
            }
            countries.insert(r.country.as_str());

            if let Some(lat) = r.latitude {
                lat_min = Some(lat_min.map_or(lat, |m| m.min(lat)));
                lat_max = Some(lat_max.map_or(lat, |m| m.max(lat)));
            }
        }

        Self {
            total_records: report.total,
            cleaned_records: records.len(),
            dropped_records: report.dropped,
            unique_units: units.len(),
            unique_families: families.len(),
            unique_genera: genera.len(),
            unique_species: species.len(),
            unique_countries: countries.len(),
            latitude_min: lat_min,
            latitude_max: lat_max,
        }
    }
}

/// Record count in one integer-degree coordinate cell
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpatialCell {
    pub latitude: i32,
    pub longitude: i32,
    pub records: u64,
}

/// Record density on an integer-degree grid, for the mapping collaborator.
///
/// Coordinates are rounded on this presentation-facing copy only; the
/// community matrices used for diversity math keep the raw values.
#[must_use]
pub fn spatial_density(records: &[SpecimenRecord]) -> Vec<SpatialCell> {
    let mut cells: BTreeMap<(i32, i32), u64> = BTreeMap::new();

    for r in records {
        let (Some(lat), Some(lon)) = (r.latitude, r.longitude) else {
            continue;
        };
        #[allow(clippy::cast_possible_truncation)]
        let key = (lat.round() as i32, lon.round() as i32);
        *cells.entry(key).or_insert(0) += 1;
    }

    cells
        .into_iter()
        .map(|((latitude, longitude), records)| SpatialCell {
            latitude,
            longitude,
            records,
        })
        .collect()
}
