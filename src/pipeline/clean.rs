use crate::core::record::{RawRecord, SpecimenRecord, UNKNOWN};
use crate::core::types::UnitId;

/// Result of cleaning a raw record set.
///
/// Dropping is a filtering policy, not an error: the dropped count is
/// carried here (and logged) rather than raised.
#[derive(Debug, Clone)]
pub struct CleanReport {
    /// Records satisfying the `SpecimenRecord` invariant
    pub records: Vec<SpecimenRecord>,
    /// Raw records seen
    pub total: usize,
    /// Records dropped for a missing unit identifier or country
    pub dropped: usize,
}

/// Treat empty and whitespace-only values as missing
fn present(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

fn or_unknown(value: &Option<String>) -> String {
    present(value).unwrap_or(UNKNOWN).to_string()
}

/// Filter and normalize raw records.
///
/// A record lacking a taxonomic-unit identifier or a country label is
/// dropped; these two fields are mandatory for all downstream work. Every
/// other nominal field falls back to the `"Unknown"` sentinel — a record
/// is never dropped for missing taxonomic labels below the unit level.
/// Zones are left unassigned; classification is a separate pass.
#[must_use]
pub fn clean_records(raw: &[RawRecord]) -> CleanReport {
    let mut records = Vec::with_capacity(raw.len());

    for r in raw {
        let (Some(unit), Some(country)) = (present(&r.taxonomic_unit_id), present(&r.country))
        else {
            continue;
        };

        records.push(SpecimenRecord {
            id: r.id.clone(),
            taxonomic_unit_id: UnitId::new(unit),
            family: or_unknown(&r.family),
            genus: or_unknown(&r.genus),
            species: or_unknown(&r.species),
            country: country.to_string(),
            region: or_unknown(&r.region),
            latitude: r.latitude.filter(|l| l.is_finite()),
            longitude: r.longitude.filter(|l| l.is_finite()),
            elevation: r.elevation.filter(|e| e.is_finite()),
            zone: None,
        });
    }

    let total = raw.len();
    let dropped = total - records.len();
    tracing::info!(total, kept = records.len(), dropped, "cleaned records");

    CleanReport {
        records,
        total,
        dropped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drops_missing_unit_or_country() {
        let raw = vec![
            RawRecord::new("1").with_unit("U1").with_country("Peru"),
            RawRecord::new("2").with_country("Peru"),
            RawRecord::new("3").with_unit("U2"),
            RawRecord::new("4"),
        ];
        let report = clean_records(&raw);

        assert_eq!(report.total, 4);
        assert_eq!(report.records.len(), 1);
        assert_eq!(report.dropped, 3);
        assert_eq!(report.records[0].id, "1");
    }

    #[test]
    fn test_whitespace_only_is_missing() {
        let raw = vec![RawRecord::new("1").with_unit("  ").with_country("Peru")];
        let report = clean_records(&raw);
        assert!(report.records.is_empty());
        assert_eq!(report.dropped, 1);
    }

    #[test]
    fn test_nominal_fields_fall_back_to_unknown() {
        let raw = vec![RawRecord::new("1").with_unit("U1").with_country("Peru")];
        let report = clean_records(&raw);

        let rec = &report.records[0];
        assert_eq!(rec.family, UNKNOWN);
        assert_eq!(rec.genus, UNKNOWN);
        assert_eq!(rec.species, UNKNOWN);
        assert_eq!(rec.region, UNKNOWN);
    }

    #[test]
    fn test_keeps_partial_taxonomy() {
        let raw = vec![RawRecord::new("1")
            .with_unit("U1")
            .with_country("Peru")
            .with_taxonomy("Formicidae", "Camponotus", "")];
        let report = clean_records(&raw);

        let rec = &report.records[0];
        assert_eq!(rec.family, "Formicidae");
        assert_eq!(rec.genus, "Camponotus");
        // Empty species string is missing, not a name
        assert_eq!(rec.species, UNKNOWN);
    }

    #[test]
    fn test_non_finite_coordinates_discarded() {
        let mut raw = RawRecord::new("1").with_unit("U1").with_country("Peru");
        raw.latitude = Some(f64::NAN);
        raw.longitude = Some(f64::INFINITY);
        let report = clean_records(&[raw]);

        let rec = &report.records[0];
        assert!(rec.latitude.is_none());
        assert!(rec.longitude.is_none());
    }

    #[test]
    fn test_trims_mandatory_fields() {
        let raw = vec![RawRecord::new("1").with_unit(" U1 ").with_country(" Peru ")];
        let report = clean_records(&raw);

        let rec = &report.records[0];
        assert_eq!(rec.taxonomic_unit_id.as_str(), "U1");
        assert_eq!(rec.country, "Peru");
    }
}
