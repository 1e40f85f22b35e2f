// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Validation of newly created entities.

use serde::Serialize;

use osm_topology_core::{classify, Geometry, Graph, OsmId};

use crate::error::Result;

/// Identifier of the unclosed-area check.
pub const TAG_SUGGESTS_AREA: &str = "tag_suggests_area";

/// A warning about one entity. Presentation text is left to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    pub id: &'static str,
    pub entity: OsmId,
    /// The `key=value` that triggered the warning.
    pub suggestion: String,
}

/// Flags created lines whose tags suggest they should have been drawn as
/// closed areas.
pub fn validate_tag_suggests_area(created: &[OsmId], graph: &Graph) -> Result<Vec<ValidationIssue>> {
    let mut issues = Vec::new();
    for &id in created {
        let entity = graph.entity(id)?;
        if entity.geometry(graph) != Geometry::Line {
            continue;
        }
        if let Some(suggestion) = classify::tag_suggests_area(entity.tags()) {
            issues.push(ValidationIssue {
                id: TAG_SUGGESTS_AREA,
                entity: id,
                suggestion,
            });
        }
    }
    Ok(issues)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::*;
    use osm_topology_core::{NodeId, WayId};

    fn sample() -> Graph {
        graph([
            node(1, 0.0, 0.0),
            node(2, 0.001, 0.0),
            node(3, 0.001, 0.001),
            way_entity(10, &[1, 2, 3], &[("landuse", "forest"), ("shop", "bakery")]),
            way_entity(11, &[1, 2, 3, 1], &[("landuse", "forest")]),
            way_entity(12, &[1, 3], &[("tourism", "artwork")]),
            way_entity(13, &[2, 3], &[("building", "yes")]),
            way_entity(14, &[2, 3], &[("building", "house")]),
        ])
    }

    #[test]
    fn flags_unclosed_lines() {
        let g = sample();
        let created: Vec<OsmId> = (10..=14).map(|id| WayId(id).into()).collect();
        let issues = validate_tag_suggests_area(&created, &g).unwrap();

        let found: Vec<(OsmId, &str)> = issues
            .iter()
            .map(|i| (i.entity, i.suggestion.as_str()))
            .collect();
        assert_eq!(
            found,
            vec![
                (WayId(10).into(), "landuse=forest"),
                (WayId(13).into(), "building=yes"),
            ]
        );
        assert!(issues.iter().all(|i| i.id == TAG_SUGGESTS_AREA));
    }

    #[test]
    fn ignores_points() {
        let g = sample().replace(osm_topology_core::Node::new(
            NodeId(9),
            osm_topology_core::LonLat::new(0.0, 0.0).unwrap(),
            [("shop", "bakery")].into(),
        ));
        let issues = validate_tag_suggests_area(&[NodeId(9).into()], &g).unwrap();
        assert!(issues.is_empty());
    }

    #[test]
    fn missing_entity_fails() {
        let g = sample();
        assert!(validate_tag_suggests_area(&[WayId(99).into()], &g).is_err());
    }
}
