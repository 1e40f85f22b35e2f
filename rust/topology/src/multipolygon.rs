// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Multipolygon outer-ring detection and ring assembly.
//!
//! A *simple* multipolygon has exactly one outer way. In that case the outer
//! way is the authoritative carrier of the area, which editors use to decide
//! where tags live and how the area is drawn. Relations with several outer
//! ways are [`MultipolygonShape::Complex`]; they are valid data, just not
//! simple.

use serde::Serialize;

use osm_topology_core::{Graph, Relation, Way, WayId};

use crate::error::Result;
use crate::join::{join_ways, RingSequence};

/// Outer-way structure of a multipolygon relation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum MultipolygonShape {
    /// Exactly one outer way.
    Simple { outer: WayId },
    /// Several outer ways.
    Complex { outers: Vec<WayId> },
    /// No way qualifies as outer.
    NoOuter,
}

/// Outer and inner rings of a multipolygon relation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rings {
    pub outer: Vec<RingSequence>,
    pub inner: Vec<RingSequence>,
}

/// Ways that count as outer: role `outer`, or an unset role when the relation
/// has a single way member.
fn outer_candidates(relation: &Relation) -> Vec<WayId> {
    let sole_way = relation.way_members().count() == 1;
    relation
        .way_members()
        .filter(|m| m.role == "outer" || (m.role.is_empty() && sole_way))
        .filter_map(|m| m.way())
        .collect()
}

/// Describes the outer-way structure of `relation`.
pub fn classify_multipolygon(relation: &Relation) -> MultipolygonShape {
    let outers = outer_candidates(relation);
    match outers.as_slice() {
        [] => MultipolygonShape::NoOuter,
        [outer] => MultipolygonShape::Simple { outer: *outer },
        _ => MultipolygonShape::Complex { outers },
    }
}

/// Returns `true` if `way` is the sole outer member of exactly one
/// multipolygon relation.
pub fn is_simple_multipolygon_outer_member(way: WayId, graph: &Graph) -> Result<bool> {
    graph.way(way)?;
    let parents = graph.parent_multipolygons(way);
    let [parent] = parents.as_slice() else {
        return Ok(false);
    };
    Ok(classify_multipolygon(parent) == MultipolygonShape::Simple { outer: way })
}

/// Returns the outer way of the simple multipolygon that `way` belongs to.
///
/// `way` must have exactly one parent relation, which must be a multipolygon
/// with exactly one outer way. The result may be `way` itself. An outer way
/// that is listed but missing from the graph fails with `NotFound`.
pub fn simple_multipolygon_outer_member<'g>(
    way: WayId,
    graph: &'g Graph,
) -> Result<Option<&'g Way>> {
    graph.way(way)?;
    let parents = graph.parent_relations(way);
    let [parent] = parents.as_slice() else {
        return Ok(None);
    };
    if !parent.is_multipolygon() {
        return Ok(None);
    }
    match classify_multipolygon(parent) {
        MultipolygonShape::Simple { outer } => Ok(Some(graph.way(outer)?)),
        _ => Ok(None),
    }
}

/// Joins the outer and inner way members of `relation` into rings.
///
/// Members with role `inner` form the inner rings; every other way member
/// is treated as outer. Non-way members are ignored.
pub fn assemble_rings(relation: &Relation, graph: &Graph) -> Result<Rings> {
    let mut outer = Vec::new();
    let mut inner = Vec::new();
    for member in relation.way_members() {
        let Some(id) = member.way() else {
            continue;
        };
        let way = graph.way(id)?;
        if member.role == "inner" {
            inner.push(way);
        } else {
            outer.push(way);
        }
    }

    Ok(Rings {
        outer: join_ways(outer),
        inner: join_ways(inner),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::*;
    use osm_topology_core::RelationId;

    fn square(extra: Vec<osm_topology_core::Entity>) -> Graph {
        let mut entities = vec![
            node(1, 0.0, 0.0),
            node(2, 0.01, 0.0),
            node(3, 0.01, 0.01),
            node(4, 0.0, 0.01),
            node(5, 0.004, 0.004),
            node(6, 0.006, 0.004),
            node(7, 0.005, 0.006),
            way_entity(1, &[1, 2, 3], &[]),
            way_entity(2, &[3, 4, 1], &[]),
            way_entity(3, &[5, 6, 7, 5], &[]),
            way_entity(4, &[1, 2, 3, 4, 1], &[("building", "yes")]),
        ];
        entities.extend(extra);
        graph(entities)
    }

    #[test]
    fn sole_way_without_role_is_simple_outer() {
        let g = square(vec![relation(10, &[("way", 4, "")], &[("type", "multipolygon")])]);
        assert!(is_simple_multipolygon_outer_member(WayId(4), &g).unwrap());
        let outer = simple_multipolygon_outer_member(WayId(4), &g).unwrap();
        assert_eq!(outer.map(|w| w.id()), Some(WayId(4)));
    }

    #[test]
    fn two_outers_are_not_simple() {
        let g = square(vec![relation(
            10,
            &[("way", 1, "outer"), ("way", 2, "outer")],
            &[("type", "multipolygon")],
        )]);
        assert!(!is_simple_multipolygon_outer_member(WayId(1), &g).unwrap());
        assert!(simple_multipolygon_outer_member(WayId(1), &g).unwrap().is_none());

        let rel = g.relation(RelationId(10)).unwrap();
        assert_eq!(
            classify_multipolygon(rel),
            MultipolygonShape::Complex {
                outers: vec![WayId(1), WayId(2)]
            }
        );
    }

    #[test]
    fn inner_member_resolves_to_outer() {
        let g = square(vec![relation(
            10,
            &[("way", 4, "outer"), ("way", 3, "inner")],
            &[("type", "multipolygon")],
        )]);
        assert!(!is_simple_multipolygon_outer_member(WayId(3), &g).unwrap());
        let outer = simple_multipolygon_outer_member(WayId(3), &g).unwrap();
        assert_eq!(outer.map(|w| w.id()), Some(WayId(4)));
    }

    #[test]
    fn unset_role_beside_other_ways_is_not_outer() {
        let g = square(vec![relation(
            10,
            &[("way", 4, ""), ("way", 3, "inner")],
            &[("type", "multipolygon")],
        )]);
        let rel = g.relation(RelationId(10)).unwrap();
        assert_eq!(classify_multipolygon(rel), MultipolygonShape::NoOuter);
        assert!(!is_simple_multipolygon_outer_member(WayId(4), &g).unwrap());
    }

    #[test]
    fn multiple_parents_are_not_simple() {
        let g = square(vec![
            relation(10, &[("way", 4, "outer")], &[("type", "multipolygon")]),
            relation(11, &[("way", 4, "")], &[("type", "route")]),
        ]);
        // One multipolygon parent is enough for the membership predicate...
        assert!(is_simple_multipolygon_outer_member(WayId(4), &g).unwrap());
        // ...but resolving the outer way requires a single parent overall.
        assert!(simple_multipolygon_outer_member(WayId(4), &g).unwrap().is_none());
    }

    #[test]
    fn non_multipolygon_parent() {
        let g = square(vec![relation(10, &[("way", 4, "outer")], &[("type", "boundary")])]);
        assert!(!is_simple_multipolygon_outer_member(WayId(4), &g).unwrap());
        assert!(simple_multipolygon_outer_member(WayId(4), &g).unwrap().is_none());
    }

    #[test]
    fn missing_outer_way_is_not_found() {
        let g = square(vec![relation(
            10,
            &[("way", 3, "inner"), ("way", 99, "outer")],
            &[("type", "multipolygon")],
        )]);
        assert!(simple_multipolygon_outer_member(WayId(3), &g).is_err());
        assert!(is_simple_multipolygon_outer_member(WayId(99), &g).is_err());
    }

    #[test]
    fn assembles_outer_and_inner_rings() {
        let g = square(vec![relation(
            10,
            &[("way", 1, "outer"), ("way", 3, "inner"), ("way", 2, "outer")],
            &[("type", "multipolygon")],
        )]);
        let rings = assemble_rings(g.relation(RelationId(10)).unwrap(), &g).unwrap();

        assert_eq!(rings.outer.len(), 1);
        assert!(rings.outer[0].closed);
        assert_eq!(rings.outer[0].way_ids(), vec![WayId(1), WayId(2)]);
        assert_eq!(rings.inner.len(), 1);
        assert!(rings.inner[0].closed);
    }

    #[test]
    fn shape_serializes_with_tag() {
        let json = serde_json::to_value(MultipolygonShape::Simple { outer: WayId(4) }).unwrap();
        assert_eq!(json["shape"], "simple");
        assert_eq!(json["outer"], 4);
    }
}
