// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # OSM Topology
//!
//! Structural analysis on top of [`osm_topology_core`] graph snapshots.
//!
//! - **Way joining**: glue way fragments into rings and routes ([`join`])
//! - **Multipolygons**: find the outer way of simple multipolygons and
//!   assemble rings ([`multipolygon`])
//! - **Intersections**: angularly ordered legs at a vertex ([`Intersection`])
//! - **Turns**: every maneuver from an entry way, with one-way and mapped
//!   restriction flags ([`turn`])
//! - **Restrictions**: read `type=restriction` relations and infer implicit
//!   ones from one-way conflicts ([`restriction`])
//! - **Lanes** and the **tag-suggests-area** validation
//!
//! Every function takes the snapshot it works on; nothing is cached between
//! calls, so results always reflect the graph passed in.
//!
//! ## Quick Start
//!
//! ```rust
//! use osm_topology::{Intersection, Maneuver, TopologyConfig};
//! use osm_topology_core::{Graph, LonLat, Node, NodeId, Tags, Way, WayId};
//!
//! let node = |id, lon, lat| Node::new(NodeId(id), LonLat::new(lon, lat).unwrap(), Tags::new());
//! let road = |id, a, b| {
//!     Way::new(WayId(id), vec![NodeId(a), NodeId(b)], Tags::from([("highway", "residential")]))
//!         .unwrap()
//! };
//! let graph = Graph::from_entities([
//!     node(0, 0.0, 0.0).into(),
//!     node(1, 0.0, -0.001).into(),
//!     node(2, 0.001, 0.0).into(),
//!     road(1, 1, 0).into(),
//!     road(2, 0, 2).into(),
//! ]);
//!
//! let config = TopologyConfig::default();
//! let junction = Intersection::build(&graph, NodeId(0), &config).unwrap();
//! let turns = junction.turns(&graph, WayId(1), &config).unwrap();
//! assert_eq!(turns[0].maneuver, Maneuver::Right);
//! ```

pub mod config;
pub mod error;
pub mod intersection;
pub mod join;
pub mod lanes;
pub mod multipolygon;
pub mod restriction;
pub mod turn;
pub mod validation;

pub use config::TopologyConfig;
pub use error::{Error, Result};
pub use intersection::{IncidentWay, Intersection, WayDirection};
pub use join::{join_members, join_ways, JoinedWay, RingSequence};
pub use lanes::{ByDirection, LaneAccess, LaneSpeed, Lanes, TurnIndication};
pub use multipolygon::{
    assemble_rings, classify_multipolygon, is_simple_multipolygon_outer_member,
    simple_multipolygon_outer_member, MultipolygonShape, Rings,
};
pub use restriction::{
    explicit_restrictions_at, infer_restriction, restriction_kind_for, Restriction,
    RestrictionKind, RestrictionSource, Via,
};
pub use turn::{Maneuver, Turn, TurnLeg, TurnRestriction};
pub use validation::{validate_tag_suggests_area, ValidationIssue};

#[cfg(test)]
pub(crate) mod test_support {
    use osm_topology_core::{
        Entity, Graph, LonLat, Member, Node, NodeId, OsmId, Relation, RelationId, Way, WayId,
    };

    pub fn node_value(id: i64, lon: f64, lat: f64) -> Node {
        Node::new(NodeId(id), LonLat::new(lon, lat).unwrap(), Default::default())
    }

    pub fn node(id: i64, lon: f64, lat: f64) -> Entity {
        node_value(id, lon, lat).into()
    }

    pub fn way(id: i64, nodes: &[i64], tags: &[(&str, &str)]) -> Way {
        Way::new(
            WayId(id),
            nodes.iter().map(|&n| NodeId(n)).collect(),
            tags.iter().copied().collect(),
        )
        .unwrap()
    }

    pub fn way_entity(id: i64, nodes: &[i64], tags: &[(&str, &str)]) -> Entity {
        way(id, nodes, tags).into()
    }

    /// Members are `(kind, id, role)` with kind `"node"`, `"way"` or
    /// `"relation"`.
    pub fn relation_value(
        id: i64,
        members: &[(&str, i64, &str)],
        tags: &[(&str, &str)],
    ) -> Relation {
        let members = members
            .iter()
            .map(|&(kind, ref_id, role)| {
                let target = match kind {
                    "node" => OsmId::Node(NodeId(ref_id)),
                    "way" => OsmId::Way(WayId(ref_id)),
                    _ => OsmId::Relation(RelationId(ref_id)),
                };
                Member::new(target, role)
            })
            .collect();
        Relation::new(RelationId(id), members, tags.iter().copied().collect())
    }

    pub fn relation(id: i64, members: &[(&str, i64, &str)], tags: &[(&str, &str)]) -> Entity {
        relation_value(id, members, tags).into()
    }

    pub fn graph(entities: impl IntoIterator<Item = Entity>) -> Graph {
        Graph::from_entities(entities)
    }

    fn road_tags<'a>(extra: &[(&'a str, &'a str)]) -> Vec<(&'a str, &'a str)> {
        let mut tags = vec![("highway", "residential")];
        tags.extend_from_slice(extra);
        tags
    }

    /// Node 0 at the origin with neighbours 1 (north), 2 (east), 3 (south)
    /// and 4 (west).
    fn compass() -> Vec<Entity> {
        vec![
            node(0, 0.0, 0.0),
            node(1, 0.0, 0.001),
            node(2, 0.001, 0.0),
            node(3, 0.0, -0.001),
            node(4, -0.001, 0.0),
        ]
    }

    /// Two through roads crossing at node 0: way 1 runs south to north, way 2
    /// west to east.
    pub fn crossing(way1: &[(&str, &str)], way2: &[(&str, &str)]) -> Graph {
        let mut entities = compass();
        entities.push(way_entity(1, &[3, 0, 1], &road_tags(way1)));
        entities.push(way_entity(2, &[4, 0, 2], &road_tags(way2)));
        graph(entities)
    }

    /// Four roads ending at node 0: way 1 from the south, then ways 2, 3 and
    /// 4 leaving north, east and west.
    pub fn four_arms(extra: &[(&str, &str)]) -> Graph {
        let tags = road_tags(extra);
        let mut entities = compass();
        entities.push(way_entity(1, &[3, 0], &tags));
        entities.push(way_entity(2, &[0, 1], &tags));
        entities.push(way_entity(3, &[0, 2], &tags));
        entities.push(way_entity(4, &[0, 4], &tags));
        graph(entities)
    }
}
