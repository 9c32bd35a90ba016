use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::core::record::SpecimenRecord;
use crate::core::types::{Grouping, UnitId};

/// Site label for the single-row overall matrix
pub const OVERALL_SITE: &str = "overall";

/// A dense site × taxonomic-unit abundance matrix.
///
/// Rows are sites (countries, zones, or the synthetic overall site),
/// columns are the full set of taxonomic units observed anywhere in the
/// cleaned record set. Absent (site, unit) pairs are explicit zeros, so
/// every row shares the same column set and cross-site comparisons are
/// well-defined. Matrices are immutable snapshots: downstream engines
/// borrow them and never mutate in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommunityMatrix {
    grouping: Grouping,
    sites: Vec<String>,
    units: Vec<UnitId>,
    /// Row-major counts, `sites.len() * units.len()` entries
    counts: Vec<u64>,

    #[serde(skip)]
    site_index: HashMap<String, usize>,
}

impl CommunityMatrix {
    fn new(grouping: Grouping, sites: Vec<String>, units: Vec<UnitId>, counts: Vec<u64>) -> Self {
        debug_assert_eq!(counts.len(), sites.len() * units.len());
        let site_index = sites
            .iter()
            .enumerate()
            .map(|(i, s)| (s.clone(), i))
            .collect();
        Self {
            grouping,
            sites,
            units,
            counts,
            site_index,
        }
    }

    #[must_use]
    pub fn grouping(&self) -> Grouping {
        self.grouping
    }

    #[must_use]
    pub fn n_sites(&self) -> usize {
        self.sites.len()
    }

    #[must_use]
    pub fn n_units(&self) -> usize {
        self.units.len()
    }

    #[must_use]
    pub fn sites(&self) -> &[String] {
        &self.sites
    }

    #[must_use]
    pub fn units(&self) -> &[UnitId] {
        &self.units
    }

    /// Counts for one site row
    ///
    /// # Panics
    ///
    /// Panics if `row` is out of bounds.
    #[must_use]
    pub fn row(&self, row: usize) -> &[u64] {
        let n = self.units.len();
        &self.counts[row * n..(row + 1) * n]
    }

    /// Counts for a site by name, if present
    #[must_use]
    pub fn row_by_site(&self, site: &str) -> Option<&[u64]> {
        self.site_index.get(site).map(|&i| self.row(i))
    }

    /// Total specimens at one site (row sum)
    #[must_use]
    pub fn row_total(&self, row: usize) -> u64 {
        self.row(row).iter().sum()
    }

    /// Iterate (site name, row counts) pairs in site order
    pub fn rows(&self) -> impl Iterator<Item = (&str, &[u64])> {
        self.sites
            .iter()
            .enumerate()
            .map(|(i, s)| (s.as_str(), self.row(i)))
    }
}

/// Builds the per-country, per-zone, and overall community matrices from
/// one cleaned record set.
///
/// The unit column set is collected from the full record set up front, so
/// matrices built over a subset of records (the zone matrix excludes
/// records without a latitude) still carry every column.
pub struct CommunityMatrixBuilder<'a> {
    records: &'a [SpecimenRecord],
    units: Vec<UnitId>,
    unit_index: HashMap<UnitId, usize>,
}

impl<'a> CommunityMatrixBuilder<'a> {
    #[must_use]
    pub fn new(records: &'a [SpecimenRecord]) -> Self {
        let unit_set: BTreeSet<UnitId> = records
            .iter()
            .map(|r| r.taxonomic_unit_id.clone())
            .collect();
        let units: Vec<UnitId> = unit_set.into_iter().collect();
        let unit_index = units
            .iter()
            .enumerate()
            .map(|(i, u)| (u.clone(), i))
            .collect();
        Self {
            records,
            units,
            unit_index,
        }
    }

    /// One row per source country
    #[must_use]
    pub fn by_country(&self) -> CommunityMatrix {
        self.build(Grouping::Country, |r| Some(r.country.clone()))
    }

    /// One row per latitude zone; records without a zone are excluded
    #[must_use]
    pub fn by_zone(&self) -> CommunityMatrix {
        self.build(Grouping::Zone, |r| r.zone.map(|z| z.to_string()))
    }

    /// A single synthetic row pooling every record
    #[must_use]
    pub fn overall(&self) -> CommunityMatrix {
        self.build(Grouping::Overall, |_| Some(OVERALL_SITE.to_string()))
    }

    /// Group records by the site key, fold unit counts, then materialize
    /// the dense matrix. Records mapped to `None` are left out.
    fn build(
        &self,
        grouping: Grouping,
        site_key: impl Fn(&SpecimenRecord) -> Option<String>,
    ) -> CommunityMatrix {
        let mut site_counts: BTreeMap<String, Vec<u64>> = BTreeMap::new();

        for record in self.records {
            let Some(site) = site_key(record) else {
                continue;
            };
            let row = site_counts
                .entry(site)
                .or_insert_with(|| vec![0u64; self.units.len()]);
            // Index is always present: units were collected from the same records
            if let Some(&col) = self.unit_index.get(&record.taxonomic_unit_id) {
                row[col] += 1;
            }
        }

        let mut sites = Vec::with_capacity(site_counts.len());
        let mut counts = Vec::with_capacity(site_counts.len() * self.units.len());
        for (site, row) in site_counts {
            sites.push(site);
            counts.extend(row);
        }

        CommunityMatrix::new(grouping, sites, self.units.clone(), counts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::record::UNKNOWN;
    use crate::core::types::Zone;

    fn record(id: &str, unit: &str, country: &str, zone: Option<Zone>) -> SpecimenRecord {
        SpecimenRecord {
            id: id.to_string(),
            taxonomic_unit_id: UnitId::new(unit),
            family: UNKNOWN.to_string(),
            genus: UNKNOWN.to_string(),
            species: UNKNOWN.to_string(),
            country: country.to_string(),
            region: UNKNOWN.to_string(),
            latitude: None,
            longitude: None,
            elevation: None,
            zone,
        }
    }

    #[test]
    fn test_by_country_counts() {
        let records = vec![
            record("1", "U1", "Peru", None),
            record("2", "U1", "Peru", None),
            record("3", "U2", "Peru", None),
            record("4", "U2", "Chile", None),
        ];
        let matrix = CommunityMatrixBuilder::new(&records).by_country();

        assert_eq!(matrix.n_sites(), 2);
        assert_eq!(matrix.n_units(), 2);
        // BTreeMap keeps sites sorted: Chile, Peru
        assert_eq!(matrix.sites(), &["Chile".to_string(), "Peru".to_string()]);
        assert_eq!(matrix.row_by_site("Peru"), Some(&[2u64, 1][..]));
        assert_eq!(matrix.row_by_site("Chile"), Some(&[0u64, 1][..]));
    }

    #[test]
    fn test_row_sums_equal_specimen_counts() {
        let records = vec![
            record("1", "U1", "Peru", None),
            record("2", "U2", "Peru", None),
            record("3", "U3", "Chile", None),
        ];
        let matrix = CommunityMatrixBuilder::new(&records).by_country();

        let total: u64 = (0..matrix.n_sites()).map(|i| matrix.row_total(i)).sum();
        assert_eq!(total, 3);
    }

    #[test]
    fn test_by_zone_excludes_unzoned() {
        let records = vec![
            record("1", "U1", "Peru", Some(Zone::Tropical)),
            record("2", "U2", "Chile", Some(Zone::Temperate)),
            record("3", "U3", "Chile", None),
        ];
        let matrix = CommunityMatrixBuilder::new(&records).by_zone();

        assert_eq!(matrix.n_sites(), 2);
        // Unzoned record contributes no row...
        let total: u64 = (0..matrix.n_sites()).map(|i| matrix.row_total(i)).sum();
        assert_eq!(total, 2);
        // ...but its unit still appears as a zero-filled column
        assert_eq!(matrix.n_units(), 3);
    }

    #[test]
    fn test_overall_single_row() {
        let records = vec![
            record("1", "U1", "Peru", None),
            record("2", "U2", "Chile", None),
        ];
        let matrix = CommunityMatrixBuilder::new(&records).overall();

        assert_eq!(matrix.n_sites(), 1);
        assert_eq!(matrix.sites()[0], OVERALL_SITE);
        assert_eq!(matrix.row_total(0), 2);
    }

    #[test]
    fn test_dense_columns_identical_across_matrices() {
        let records = vec![
            record("1", "U1", "Peru", Some(Zone::Tropical)),
            record("2", "U2", "Chile", None),
        ];
        let builder = CommunityMatrixBuilder::new(&records);
        let by_country = builder.by_country();
        let by_zone = builder.by_zone();
        let overall = builder.overall();

        assert_eq!(by_country.units(), by_zone.units());
        assert_eq!(by_country.units(), overall.units());
    }
}
