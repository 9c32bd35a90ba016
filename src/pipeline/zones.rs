use std::collections::BTreeMap;

use crate::core::record::SpecimenRecord;
use crate::core::types::{Zone, ZoneThresholds};

/// Assign a zone to every record with a latitude; records without one keep
/// `zone = None` and stay out of zone-based groupings.
pub fn classify_records(records: &mut [SpecimenRecord], thresholds: &ZoneThresholds) {
    for record in records.iter_mut() {
        record.zone = record.latitude.map(|lat| thresholds.classify(lat));
    }
}

/// Map each country to a single zone via the mean latitude of its records.
///
/// The same threshold function used per-record is applied to the
/// arithmetic mean of the country's valid latitudes — not a vote over the
/// member records' zones. Countries with no valid-latitude records are
/// omitted; their records still count in non-zone country aggregations.
#[must_use]
pub fn country_zones(
    records: &[SpecimenRecord],
    thresholds: &ZoneThresholds,
) -> BTreeMap<String, Zone> {
    let mut sums: BTreeMap<&str, (f64, u64)> = BTreeMap::new();

    for record in records {
        if let Some(lat) = record.latitude {
            let entry = sums.entry(record.country.as_str()).or_insert((0.0, 0));
            entry.0 += lat;
            entry.1 += 1;
        }
    }

    sums.into_iter()
        .map(|(country, (sum, n))| {
            #[allow(clippy::cast_precision_loss)]
            let mean = sum / n as f64;
            (country.to_string(), thresholds.classify(mean))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::record::UNKNOWN;
    use crate::core::types::UnitId;

    fn record(id: &str, country: &str, latitude: Option<f64>) -> SpecimenRecord {
        SpecimenRecord {
            id: id.to_string(),
            taxonomic_unit_id: UnitId::new("U1"),
            family: UNKNOWN.to_string(),
            genus: UNKNOWN.to_string(),
            species: UNKNOWN.to_string(),
            country: country.to_string(),
            region: UNKNOWN.to_string(),
            latitude,
            longitude: None,
            elevation: None,
            zone: None,
        }
    }

    #[test]
    fn test_classify_records() {
        let mut records = vec![
            record("1", "Peru", Some(-10.0)),
            record("2", "Norway", Some(65.0)),
            record("3", "Peru", None),
        ];
        classify_records(&mut records, &ZoneThresholds::default());

        assert_eq!(records[0].zone, Some(Zone::Tropical));
        assert_eq!(records[1].zone, Some(Zone::Extreme));
        assert_eq!(records[2].zone, None);
    }

    #[test]
    fn test_country_zone_from_mean_latitude() {
        // Mean of {10, 15, 25, 70} is 30 -> Sub-tropical, even though one
        // member record is itself Extreme
        let records = vec![
            record("1", "Atlantis", Some(10.0)),
            record("2", "Atlantis", Some(15.0)),
            record("3", "Atlantis", Some(25.0)),
            record("4", "Atlantis", Some(70.0)),
        ];
        let zones = country_zones(&records, &ZoneThresholds::default());

        assert_eq!(zones.get("Atlantis"), Some(&Zone::Subtropical));
    }

    #[test]
    fn test_country_without_latitudes_omitted() {
        let records = vec![
            record("1", "Atlantis", None),
            record("2", "Peru", Some(-10.0)),
        ];
        let zones = country_zones(&records, &ZoneThresholds::default());

        assert!(!zones.contains_key("Atlantis"));
        assert_eq!(zones.get("Peru"), Some(&Zone::Tropical));
    }

    #[test]
    fn test_country_mean_on_boundary() {
        // Mean of {10, 30} is 20 -> still Tropical under the closed-lower rule
        let records = vec![
            record("1", "Atlantis", Some(10.0)),
            record("2", "Atlantis", Some(30.0)),
        ];
        let zones = country_zones(&records, &ZoneThresholds::default());

        assert_eq!(zones.get("Atlantis"), Some(&Zone::Tropical));
    }
}
