// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Immutable entity values: nodes, ways, relations and changesets.
//!
//! Entities are validated when they are constructed, so the topology
//! algorithms never see a way with fewer than two nodes or a node with an
//! impossible coordinate. Shared behaviour across kinds lives on the closed
//! [`Entity`] variant and dispatches with a `match`.

use serde::{Deserialize, Serialize};

use crate::classify::{self, Oneway};
use crate::coord::LonLat;
use crate::error::{Error, Result};
use crate::graph::Graph;
use crate::id::{EntityKind, NodeId, OsmId, RelationId, WayId};
use crate::tags::Tags;

/// A point on the map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    id: NodeId,
    loc: LonLat,
    tags: Tags,
}

impl Node {
    pub fn new(id: NodeId, loc: LonLat, tags: Tags) -> Self {
        Self { id, loc, tags }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn loc(&self) -> LonLat {
        self.loc
    }

    pub fn tags(&self) -> &Tags {
        &self.tags
    }
}

/// Where a node sits on a way, for nodes at either end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Affix {
    Prefix,
    Suffix,
}

/// An ordered list of nodes forming a line or, when closed, a ring.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Way {
    id: WayId,
    nodes: Vec<NodeId>,
    tags: Tags,
}

impl Way {
    /// Creates a way. At least two node references are required.
    pub fn new(id: WayId, nodes: Vec<NodeId>, tags: Tags) -> Result<Self> {
        if nodes.len() < 2 {
            return Err(Error::DegenerateWay(id, nodes.len()));
        }
        Ok(Self { id, nodes, tags })
    }

    pub fn id(&self) -> WayId {
        self.id
    }

    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    pub fn tags(&self) -> &Tags {
        &self.tags
    }

    pub fn first(&self) -> NodeId {
        self.nodes[0]
    }

    pub fn last(&self) -> NodeId {
        self.nodes[self.nodes.len() - 1]
    }

    /// A way is closed when it ends where it starts and has room for at
    /// least a triangle.
    pub fn is_closed(&self) -> bool {
        self.nodes.len() >= 3 && self.first() == self.last()
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.nodes.contains(&node)
    }

    /// Returns `true` if `node` is the first or last node of an open way.
    pub fn is_endpoint(&self, node: NodeId) -> bool {
        !self.is_closed() && (self.first() == node || self.last() == node)
    }

    /// Tells whether `node` is the first or last node of the way.
    pub fn affix(&self, node: NodeId) -> Option<Affix> {
        if self.first() == node {
            Some(Affix::Prefix)
        } else if self.last() == node {
            Some(Affix::Suffix)
        } else {
            None
        }
    }

    /// Positions at which `node` occurs, in order.
    pub fn positions(&self, node: NodeId) -> Vec<usize> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, &n)| n == node)
            .map(|(i, _)| i)
            .collect()
    }

    /// Returns `true` when `a` and `b` are consecutive somewhere in the way.
    pub fn are_adjacent(&self, a: NodeId, b: NodeId) -> bool {
        self.nodes
            .windows(2)
            .any(|pair| (pair[0] == a && pair[1] == b) || (pair[0] == b && pair[1] == a))
    }

    /// Too few distinct nodes to draw: fewer than 3 for an area, 2 for a line.
    pub fn is_degenerate(&self) -> bool {
        let mut distinct = self.nodes.clone();
        distinct.sort_unstable();
        distinct.dedup();
        distinct.len() < if self.is_area() { 3 } else { 2 }
    }

    /// `area=yes` always makes an area; otherwise only closed ways whose tags
    /// are in the area-key table (and not `area=no`) qualify.
    pub fn is_area(&self) -> bool {
        if self.tags.is("area", "yes") {
            return true;
        }
        if !self.is_closed() || self.tags.is("area", "no") {
            return false;
        }
        classify::has_area_tags(&self.tags)
    }

    pub fn oneway(&self) -> Oneway {
        classify::oneway(&self.tags)
    }

    /// Returns a copy with the node order reversed. Tags are unchanged.
    pub fn reversed(&self) -> Way {
        let mut nodes = self.nodes.clone();
        nodes.reverse();
        Way {
            id: self.id,
            nodes,
            tags: self.tags.clone(),
        }
    }
}

/// One member of a relation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: OsmId,
    pub role: String,
}

impl Member {
    pub fn new(id: impl Into<OsmId>, role: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            role: role.into(),
        }
    }

    pub fn kind(&self) -> EntityKind {
        self.id.kind()
    }

    /// Returns the way id when the member is a way.
    pub fn way(&self) -> Option<WayId> {
        match self.id {
            OsmId::Way(id) => Some(id),
            _ => None,
        }
    }

    /// Returns the node id when the member is a node.
    pub fn node(&self) -> Option<NodeId> {
        match self.id {
            OsmId::Node(id) => Some(id),
            _ => None,
        }
    }
}

/// A tagged, ordered group of member entities with roles.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Relation {
    id: RelationId,
    members: Vec<Member>,
    tags: Tags,
}

impl Relation {
    pub fn new(id: RelationId, members: Vec<Member>, tags: Tags) -> Self {
        Self { id, members, tags }
    }

    pub fn id(&self) -> RelationId {
        self.id
    }

    pub fn members(&self) -> &[Member] {
        &self.members
    }

    pub fn tags(&self) -> &Tags {
        &self.tags
    }

    pub fn is_multipolygon(&self) -> bool {
        self.tags.is("type", "multipolygon")
    }

    pub fn is_restriction(&self) -> bool {
        self.tags.is("type", "restriction")
    }

    /// First member referencing `id`.
    pub fn member_by_id(&self, id: impl Into<OsmId>) -> Option<&Member> {
        let id = id.into();
        self.members.iter().find(|m| m.id == id)
    }

    /// All members carrying `role`, in member order.
    pub fn members_by_role<'a>(&'a self, role: &'a str) -> impl Iterator<Item = &'a Member> + 'a {
        self.members.iter().filter(move |m| m.role == role)
    }

    /// Way members in member order.
    pub fn way_members(&self) -> impl Iterator<Item = &Member> {
        self.members.iter().filter(|m| m.kind() == EntityKind::Way)
    }
}

/// An upload batch's metadata. Not part of the graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Changeset {
    pub id: i64,
    pub tags: Tags,
}

impl Changeset {
    pub fn new(id: i64, tags: Tags) -> Self {
        Self { id, tags }
    }

    pub fn comment(&self) -> Option<&str> {
        self.tags.get("comment")
    }

    pub fn created_by(&self) -> Option<&str> {
        self.tags.get("created_by")
    }
}

/// How an entity is drawn and validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Geometry {
    /// A standalone node.
    Point,
    /// A node that is part of at least one way.
    Vertex,
    Line,
    Area,
    Relation,
}

/// Closed variant over the three entity kinds that live in a graph.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Entity {
    Node(Node),
    Way(Way),
    Relation(Relation),
}

impl Entity {
    pub fn id(&self) -> OsmId {
        match self {
            Entity::Node(n) => OsmId::Node(n.id),
            Entity::Way(w) => OsmId::Way(w.id),
            Entity::Relation(r) => OsmId::Relation(r.id),
        }
    }

    pub fn kind(&self) -> EntityKind {
        self.id().kind()
    }

    pub fn tags(&self) -> &Tags {
        match self {
            Entity::Node(n) => &n.tags,
            Entity::Way(w) => &w.tags,
            Entity::Relation(r) => &r.tags,
        }
    }

    /// Returns `true` if any tag key is interesting.
    pub fn has_interesting_tags(&self) -> bool {
        self.tags().keys().any(classify::is_interesting_tag)
    }

    /// Classifies the entity's geometry within `graph`.
    pub fn geometry(&self, graph: &Graph) -> Geometry {
        match self {
            Entity::Node(n) => {
                if graph.is_poi(n.id) {
                    Geometry::Point
                } else {
                    Geometry::Vertex
                }
            }
            Entity::Way(w) => {
                if w.is_area() {
                    Geometry::Area
                } else {
                    Geometry::Line
                }
            }
            Entity::Relation(r) => {
                if r.is_multipolygon() {
                    Geometry::Area
                } else {
                    Geometry::Relation
                }
            }
        }
    }

    pub fn as_node(&self) -> Option<&Node> {
        match self {
            Entity::Node(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_way(&self) -> Option<&Way> {
        match self {
            Entity::Way(w) => Some(w),
            _ => None,
        }
    }

    pub fn as_relation(&self) -> Option<&Relation> {
        match self {
            Entity::Relation(r) => Some(r),
            _ => None,
        }
    }
}

impl From<Node> for Entity {
    fn from(n: Node) -> Self {
        Entity::Node(n)
    }
}

impl From<Way> for Entity {
    fn from(w: Way) -> Self {
        Entity::Way(w)
    }
}

impl From<Relation> for Entity {
    fn from(r: Relation) -> Self {
        Entity::Relation(r)
    }
}
