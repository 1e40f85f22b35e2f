// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Angularly ordered view of the roads meeting at a vertex.
//!
//! Each road segment that leaves the vertex is one [`IncidentWay`] ("leg").
//! A way passing through the vertex contributes two legs, one in each
//! direction; a way ending there contributes one. Legs are ordered clockwise
//! from north so that neighbouring roads are neighbours in the list.

use serde::Serialize;

use osm_topology_core::{classify, Graph, NodeId, Way, WayId};

use crate::config::TopologyConfig;
use crate::error::{Error, Result};

/// Which way a leg leaves the vertex, relative to the way's node order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WayDirection {
    /// Towards the next node in the way.
    Forward,
    /// Towards the previous node in the way.
    Backward,
}

/// One direction out of the vertex along one way.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IncidentWay {
    pub way: WayId,
    /// The neighbouring node along the way.
    pub node: NodeId,
    pub direction: WayDirection,
    /// Bearing from the vertex to `node`, degrees `[0, 360)` clockwise from
    /// north.
    pub bearing: f64,
}

/// All legs at a junction vertex, ordered by bearing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Intersection {
    pub vertex: NodeId,
    pub ways: Vec<IncidentWay>,
}

impl Intersection {
    /// Builds the intersection at `vertex`.
    ///
    /// Fails with `NotFound` when the vertex or a neighbouring node is
    /// missing, and with `NotAJunction` when fewer than two distinct ways
    /// remain after filtering.
    pub fn build(graph: &Graph, vertex: NodeId, config: &TopologyConfig) -> Result<Self> {
        let origin = graph.node(vertex)?.loc();

        let mut legs = Vec::new();
        for way in graph.parent_ways(vertex) {
            if config.roads_only && !is_road(way) {
                continue;
            }
            for (neighbour, direction) in neighbours(way, vertex) {
                if neighbour == vertex {
                    continue;
                }
                let loc = graph.node(neighbour)?.loc();
                // A neighbour on the same spot has no bearing.
                if origin.distance_m(loc) == 0.0 {
                    continue;
                }
                legs.push(IncidentWay {
                    way: way.id(),
                    node: neighbour,
                    direction,
                    bearing: origin.bearing_to(loc),
                });
            }
        }

        legs.sort_by(|a, b| {
            a.bearing
                .total_cmp(&b.bearing)
                .then(a.way.cmp(&b.way))
                .then(a.direction.cmp(&b.direction))
        });

        let intersection = Self { vertex, ways: legs };
        let distinct = intersection.way_ids().len();
        if distinct < 2 {
            tracing::debug!(vertex = %vertex, ways = distinct, "Vertex is not a junction");
            return Err(Error::NotAJunction(vertex));
        }
        Ok(intersection)
    }

    /// Distinct way ids at the vertex, ascending.
    pub fn way_ids(&self) -> Vec<WayId> {
        let mut ids: Vec<WayId> = self.ways.iter().map(|l| l.way).collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }

    /// Legs belonging to `way`, in angular order.
    pub fn legs_of(&self, way: WayId) -> impl Iterator<Item = &IncidentWay> {
        self.ways.iter().filter(move |l| l.way == way)
    }

    pub fn contains_way(&self, way: WayId) -> bool {
        self.ways.iter().any(|l| l.way == way)
    }
}

/// Routable highways that are not drawn as areas.
fn is_road(way: &Way) -> bool {
    classify::is_routable_highway(way.tags()) && !way.is_area()
}

/// Neighbouring nodes of every occurrence of `vertex` in `way`. Closed ways
/// wrap around, and their closing node is not visited twice.
fn neighbours(way: &Way, vertex: NodeId) -> Vec<(NodeId, WayDirection)> {
    let nodes = way.nodes();
    let closed = way.is_closed();
    let len = if closed { nodes.len() - 1 } else { nodes.len() };

    let mut out = Vec::new();
    for i in (0..len).filter(|&i| nodes[i] == vertex) {
        if i + 1 < nodes.len() {
            out.push((nodes[i + 1], WayDirection::Forward));
        }
        if i > 0 {
            out.push((nodes[i - 1], WayDirection::Backward));
        } else if closed {
            out.push((nodes[len - 1], WayDirection::Backward));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::*;
    use approx::assert_relative_eq;

    #[test]
    fn crossing_has_four_sorted_legs() {
        let g = crossing(&[], &[]);
        let ix = Intersection::build(&g, NodeId(0), &TopologyConfig::default()).unwrap();

        assert_eq!(ix.ways.len(), 4);
        assert_eq!(ix.way_ids(), vec![WayId(1), WayId(2)]);
        let bearings: Vec<f64> = ix.ways.iter().map(|l| l.bearing).collect();
        assert!(bearings.windows(2).all(|w| w[0] <= w[1]));

        // North first, then east, south, west.
        let nodes: Vec<NodeId> = ix.ways.iter().map(|l| l.node).collect();
        assert_eq!(nodes, vec![NodeId(1), NodeId(2), NodeId(3), NodeId(4)]);
        assert_relative_eq!(ix.ways[1].bearing, 90.0, epsilon = 1e-6);
    }

    #[test]
    fn through_way_has_legs_in_both_directions() {
        let g = crossing(&[], &[]);
        let ix = Intersection::build(&g, NodeId(0), &TopologyConfig::default()).unwrap();
        let dirs: Vec<WayDirection> = ix.legs_of(WayId(1)).map(|l| l.direction).collect();
        // Way 1 runs south → north through the vertex.
        assert_eq!(dirs, vec![WayDirection::Forward, WayDirection::Backward]);
    }

    #[test]
    fn interior_node_is_not_a_junction() {
        let g = graph([
            node(1, 0.0, 0.0),
            node(2, 0.0, 0.001),
            node(3, 0.0, 0.002),
            way_entity(1, &[1, 2, 3], &[("highway", "residential")]),
        ]);
        let err = Intersection::build(&g, NodeId(2), &TopologyConfig::default()).unwrap_err();
        assert_eq!(err, Error::NotAJunction(NodeId(2)));
    }

    #[test]
    fn non_roads_are_filtered() {
        let g = graph([
            node(0, 0.0, 0.0),
            node(1, 0.0, 0.001),
            node(2, 0.001, 0.0),
            way_entity(1, &[0, 1], &[("highway", "residential")]),
            way_entity(2, &[0, 2], &[("highway", "footway")]),
        ]);
        let config = TopologyConfig::default();
        assert!(Intersection::build(&g, NodeId(0), &config).is_err());

        let all = TopologyConfig {
            roads_only: false,
            ..TopologyConfig::default()
        };
        let ix = Intersection::build(&g, NodeId(0), &all).unwrap();
        assert_eq!(ix.ways.len(), 2);
    }

    #[test]
    fn closed_way_wraps_around() {
        let g = graph([
            node(1, 0.0, 0.0),
            node(2, 0.001, 0.0),
            node(3, 0.001, 0.001),
            node(4, 0.0, -0.001),
            way_entity(1, &[1, 2, 3, 1], &[("highway", "residential")]),
            way_entity(2, &[1, 4], &[("highway", "residential")]),
        ]);
        let ix = Intersection::build(&g, NodeId(1), &TopologyConfig::default()).unwrap();
        let ring: Vec<(NodeId, WayDirection)> =
            ix.legs_of(WayId(1)).map(|l| (l.node, l.direction)).collect();
        assert_eq!(ring.len(), 2);
        assert!(ring.contains(&(NodeId(2), WayDirection::Forward)));
        assert!(ring.contains(&(NodeId(3), WayDirection::Backward)));
    }

    #[test]
    fn zero_length_segments_are_skipped() {
        let nodes = [NodeId(1), NodeId(1), NodeId(2)];
        let way = osm_topology_core::Way::new(WayId(1), nodes.to_vec(), Default::default()).unwrap();
        let legs: Vec<NodeId> = neighbours(&way, NodeId(1))
            .into_iter()
            .map(|(n, _)| n)
            .filter(|&n| n != NodeId(1))
            .collect();
        assert_eq!(legs, vec![NodeId(2)]);
    }

    #[test]
    fn coincident_neighbour_is_skipped() {
        let g = crossing(&[], &[])
            .replace(node_value(5, 0.0, 0.0))
            .replace(way(3, &[0, 5], &[("highway", "residential")]));
        let ix = Intersection::build(&g, NodeId(0), &TopologyConfig::default()).unwrap();
        assert_eq!(ix.ways.len(), 4);
        assert!(!ix.contains_way(WayId(3)));
    }

    #[test]
    fn equal_bearings_order_by_way_id() {
        // Ways 7 and 5 both leave due north.
        let g = graph([
            node(0, 0.0, 0.0),
            node(1, 0.0, 0.001),
            node(2, 0.0, 0.002),
            node(3, 0.001, 0.0),
            way_entity(7, &[0, 2], &[("highway", "residential")]),
            way_entity(5, &[0, 1], &[("highway", "residential")]),
            way_entity(6, &[3, 0], &[("highway", "residential")]),
        ]);
        let ix = Intersection::build(&g, NodeId(0), &TopologyConfig::default()).unwrap();
        let order: Vec<WayId> = ix.ways.iter().map(|l| l.way).collect();
        assert_eq!(order, vec![WayId(5), WayId(7), WayId(6)]);
        assert_eq!(ix.ways[0].bearing, ix.ways[1].bearing);
    }

    #[test]
    fn missing_vertex_is_not_found() {
        let g = crossing(&[], &[]);
        let err = Intersection::build(&g, NodeId(42), &TopologyConfig::default()).unwrap_err();
        assert!(matches!(err, Error::Core(_)));
    }
}
