//! Shared-unit network: a weighted undirected graph of zones linked by
//! counts of shared taxonomic units.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::core::matrix::CommunityMatrix;
use crate::core::types::Zone;

/// A zone vertex, sized by its unique-unit count
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkVertex {
    pub zone: Zone,
    pub unique_unit_count: usize,
}

/// An undirected edge between two distinct zones
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkEdge {
    pub zone_a: Zone,
    pub zone_b: Zone,
    pub shared_unit_count: usize,
}

/// Weighted graph of zones linked by shared taxonomic units.
///
/// One edge per unordered pair of distinct zones; self-pairs are not
/// edges (they supply the vertex size instead). Two edge views are
/// exposed: [`ZoneNetwork::dense_edges`] keeps the complete graph with
/// explicit zero-weight edges, [`ZoneNetwork::sparse_edges`] omits pairs
/// sharing nothing. The two give different downstream edge counts; pick
/// per the consumer's contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZoneNetwork {
    vertices: Vec<NetworkVertex>,
    edges: Vec<NetworkEdge>,
}

impl ZoneNetwork {
    /// Build the network from a per-zone community matrix.
    ///
    /// A zone's unit set is `{unit : count > 0}` in its matrix row;
    /// edge weight is the size of the pairwise intersection.
    #[must_use]
    pub fn build(matrix: &CommunityMatrix) -> Self {
        // Zones in latitude order, restricted to those present in the matrix
        let mut zones: Vec<(Zone, HashSet<usize>)> = Vec::new();
        for zone in Zone::ALL {
            if let Some(counts) = matrix.row_by_site(&zone.to_string()) {
                let units: HashSet<usize> = counts
                    .iter()
                    .enumerate()
                    .filter(|(_, &c)| c > 0)
                    .map(|(i, _)| i)
                    .collect();
                zones.push((zone, units));
            }
        }

        let vertices = zones
            .iter()
            .map(|(zone, units)| NetworkVertex {
                zone: *zone,
                unique_unit_count: units.len(),
            })
            .collect();

        let mut edges = Vec::new();
        for a in 0..zones.len() {
            for b in (a + 1)..zones.len() {
                let shared = zones[a].1.intersection(&zones[b].1).count();
                edges.push(NetworkEdge {
                    zone_a: zones[a].0,
                    zone_b: zones[b].0,
                    shared_unit_count: shared,
                });
            }
        }

        Self { vertices, edges }
    }

    #[must_use]
    pub fn vertices(&self) -> &[NetworkVertex] {
        &self.vertices
    }

    /// Complete graph: every unordered zone pair, zero-weight edges
    /// included
    #[must_use]
    pub fn dense_edges(&self) -> &[NetworkEdge] {
        &self.edges
    }

    /// Zero-weight edges omitted
    #[must_use]
    pub fn sparse_edges(&self) -> Vec<NetworkEdge> {
        self.edges
            .iter()
            .filter(|e| e.shared_unit_count > 0)
            .cloned()
            .collect()
    }

    /// Shared-unit count for a zone pair, in either order
    #[must_use]
    pub fn shared_count(&self, a: Zone, b: Zone) -> Option<usize> {
        self.edges
            .iter()
            .find(|e| (e.zone_a == a && e.zone_b == b) || (e.zone_a == b && e.zone_b == a))
            .map(|e| e.shared_unit_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::matrix::CommunityMatrixBuilder;
    use crate::core::record::{SpecimenRecord, UNKNOWN};
    use crate::core::types::UnitId;

    fn record(id: &str, unit: &str, zone: Zone) -> SpecimenRecord {
        SpecimenRecord {
            id: id.to_string(),
            taxonomic_unit_id: UnitId::new(unit),
            family: UNKNOWN.to_string(),
            genus: UNKNOWN.to_string(),
            species: UNKNOWN.to_string(),
            country: "X".to_string(),
            region: UNKNOWN.to_string(),
            latitude: None,
            longitude: None,
            elevation: None,
            zone: Some(zone),
        }
    }

    /// Tropical holds {A,B,C}, Temperate holds {B,C,D}
    fn two_zone_matrix() -> CommunityMatrix {
        let records = vec![
            record("1", "A", Zone::Tropical),
            record("2", "B", Zone::Tropical),
            record("3", "C", Zone::Tropical),
            record("4", "B", Zone::Temperate),
            record("5", "C", Zone::Temperate),
            record("6", "D", Zone::Temperate),
        ];
        CommunityMatrixBuilder::new(&records).by_zone()
    }

    #[test]
    fn test_shared_units_and_vertex_sizes() {
        let network = ZoneNetwork::build(&two_zone_matrix());

        assert_eq!(network.vertices().len(), 2);
        for v in network.vertices() {
            assert_eq!(v.unique_unit_count, 3);
        }
        assert_eq!(network.shared_count(Zone::Tropical, Zone::Temperate), Some(2));
    }

    #[test]
    fn test_symmetry() {
        let network = ZoneNetwork::build(&two_zone_matrix());
        assert_eq!(
            network.shared_count(Zone::Tropical, Zone::Temperate),
            network.shared_count(Zone::Temperate, Zone::Tropical),
        );
    }

    #[test]
    fn test_no_self_edges() {
        let network = ZoneNetwork::build(&two_zone_matrix());
        for e in network.dense_edges() {
            assert_ne!(e.zone_a, e.zone_b);
        }
    }

    #[test]
    fn test_dense_vs_sparse_edge_counts() {
        // Three zones; Extreme shares nothing with the others
        let records = vec![
            record("1", "A", Zone::Tropical),
            record("2", "A", Zone::Temperate),
            record("3", "E", Zone::Extreme),
        ];
        let matrix = CommunityMatrixBuilder::new(&records).by_zone();
        let network = ZoneNetwork::build(&matrix);

        // Complete graph over 3 vertices has 3 edges; only one is non-zero
        assert_eq!(network.dense_edges().len(), 3);
        assert_eq!(network.sparse_edges().len(), 1);
        assert_eq!(network.shared_count(Zone::Tropical, Zone::Extreme), Some(0));
    }

    #[test]
    fn test_one_edge_per_unordered_pair() {
        let network = ZoneNetwork::build(&two_zone_matrix());
        assert_eq!(network.dense_edges().len(), 1);
    }
}
