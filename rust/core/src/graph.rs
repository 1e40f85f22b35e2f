// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Immutable graph snapshots of map entities.
//!
//! A [`Graph`] owns every entity of one editor state together with its
//! upward adjacency indices (node → ways that use it, entity → relations
//! that list it). The indices are computed when the snapshot is built and
//! belong to that snapshot; there is no global lookup table.
//!
//! ## Snapshots
//!
//! Entity storage and indices sit behind `Arc`s, so cloning a graph is cheap
//! and a clone shares everything with its origin. [`Graph::replace`] and
//! [`Graph::remove`] return a *new* snapshot: the maps are copied on write
//! (`Arc::make_mut`) while unchanged entities stay shared. Queries running
//! against the previous snapshot keep seeing a consistent view.

use std::sync::Arc;

use rustc_hash::{FxHashMap, FxHashSet};

use crate::entity::{Entity, Node, Relation, Way};
use crate::error::{Error, Result};
use crate::id::{NodeId, OsmId, RelationId, WayId};

/// A read-only snapshot of map entities and their adjacency.
///
/// # Example
///
/// ```
/// use osm_topology_core::{Graph, LonLat, Node, NodeId, Tags, Way, WayId};
///
/// let a = Node::new(NodeId(1), LonLat::new(0.0, 0.0).unwrap(), Tags::new());
/// let b = Node::new(NodeId(2), LonLat::new(0.0, 0.001).unwrap(), Tags::new());
/// let w = Way::new(WayId(1), vec![NodeId(1), NodeId(2)], Tags::new()).unwrap();
/// let graph = Graph::from_entities([a.into(), b.into(), w.into()]);
///
/// assert_eq!(graph.parent_ways(NodeId(1)).len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Graph {
    // Entity storage
    entities: Arc<FxHashMap<OsmId, Arc<Entity>>>,

    // Upward adjacency: child → parents
    parent_ways: Arc<FxHashMap<NodeId, FxHashSet<WayId>>>,
    parent_relations: Arc<FxHashMap<OsmId, FxHashSet<RelationId>>>,
}

impl Graph {
    /// Creates a new, empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a snapshot from entity values. Later entities with the same id
    /// replace earlier ones.
    pub fn from_entities(entities: impl IntoIterator<Item = Entity>) -> Self {
        let mut storage: FxHashMap<OsmId, Arc<Entity>> = FxHashMap::default();
        for entity in entities {
            storage.insert(entity.id(), Arc::new(entity));
        }

        let mut graph = Self {
            entities: Arc::new(storage),
            ..Self::default()
        };
        let all: Vec<Arc<Entity>> = graph.entities.values().cloned().collect();
        for entity in &all {
            graph.link(entity);
        }
        graph
    }

    // --- Entity lookup ---

    /// Returns the entity for `id`, or `NotFound`.
    pub fn entity(&self, id: impl Into<OsmId>) -> Result<&Entity> {
        let id = id.into();
        self.has_entity(id).ok_or(Error::NotFound(id))
    }

    /// Returns the entity for `id`, if present.
    pub fn has_entity(&self, id: impl Into<OsmId>) -> Option<&Entity> {
        self.entities.get(&id.into()).map(|e| e.as_ref())
    }

    pub fn node(&self, id: NodeId) -> Result<&Node> {
        self.has_entity(id)
            .and_then(Entity::as_node)
            .ok_or(Error::NotFound(id.into()))
    }

    pub fn way(&self, id: WayId) -> Result<&Way> {
        self.has_entity(id)
            .and_then(Entity::as_way)
            .ok_or(Error::NotFound(id.into()))
    }

    pub fn relation(&self, id: RelationId) -> Result<&Relation> {
        self.has_entity(id)
            .and_then(Entity::as_relation)
            .ok_or(Error::NotFound(id.into()))
    }

    /// Returns the number of entities in the snapshot.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Iterates all entities in unspecified order.
    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values().map(|e| e.as_ref())
    }

    /// Returns all ways, ordered by id.
    pub fn ways(&self) -> Vec<&Way> {
        let mut ways: Vec<&Way> = self.entities().filter_map(Entity::as_way).collect();
        ways.sort_by_key(|w| w.id());
        ways
    }

    /// Returns all relations, ordered by id.
    pub fn relations(&self) -> Vec<&Relation> {
        let mut rels: Vec<&Relation> = self.entities().filter_map(Entity::as_relation).collect();
        rels.sort_by_key(|r| r.id());
        rels
    }

    // --- Upward traversal ---

    /// Ways that reference `node`, ordered by id.
    pub fn parent_ways(&self, node: NodeId) -> Vec<&Way> {
        let Some(ids) = self.parent_ways.get(&node) else {
            return Vec::new();
        };
        let mut ids: Vec<WayId> = ids.iter().copied().collect();
        ids.sort_unstable();
        ids.into_iter()
            .filter_map(|id| self.way(id).ok())
            .collect()
    }

    /// Relations that list `id` as a member, ordered by id.
    pub fn parent_relations(&self, id: impl Into<OsmId>) -> Vec<&Relation> {
        let Some(ids) = self.parent_relations.get(&id.into()) else {
            return Vec::new();
        };
        let mut ids: Vec<RelationId> = ids.iter().copied().collect();
        ids.sort_unstable();
        ids.into_iter()
            .filter_map(|id| self.relation(id).ok())
            .collect()
    }

    /// Parent relations tagged `type=multipolygon`.
    pub fn parent_multipolygons(&self, id: impl Into<OsmId>) -> Vec<&Relation> {
        self.parent_relations(id)
            .into_iter()
            .filter(|r| r.is_multipolygon())
            .collect()
    }

    // --- Downward traversal ---

    /// Resolves the nodes of a way in order, failing on the first missing one.
    pub fn child_nodes(&self, way: &Way) -> Result<Vec<&Node>> {
        way.nodes().iter().map(|&id| self.node(id)).collect()
    }

    /// A node with no parent ways is a point of interest.
    pub fn is_poi(&self, node: NodeId) -> bool {
        self.parent_ways.get(&node).map_or(true, |ways| ways.is_empty())
    }

    /// A node used by more than one way, or visited twice by a single way
    /// (the closing node of a ring does not count twice).
    pub fn is_shared(&self, node: NodeId) -> bool {
        let parents = self.parent_ways(node);
        match parents.as_slice() {
            [] => false,
            [way] => {
                let mut visits = way.positions(node).len();
                if way.is_closed() && way.first() == node {
                    visits -= 1;
                }
                visits > 1
            }
            _ => true,
        }
    }

    /// Checks that every node of every way and every relation member
    /// resolves. Reports the first dangling reference in id order.
    pub fn validate(&self) -> Result<()> {
        let mut ids: Vec<OsmId> = self.entities.keys().copied().collect();
        ids.sort_unstable();
        for id in ids {
            match self.entity(id)? {
                Entity::Node(_) => {}
                Entity::Way(w) => {
                    for &n in w.nodes() {
                        self.node(n)?;
                    }
                }
                Entity::Relation(r) => {
                    for m in r.members() {
                        self.entity(m.id)?;
                    }
                }
            }
        }
        Ok(())
    }

    // --- Snapshot derivation ---

    /// Returns a new snapshot with `entity` inserted or replacing the entity
    /// with the same id. `self` is left untouched.
    pub fn replace(&self, entity: impl Into<Entity>) -> Graph {
        let entity = Arc::new(entity.into());
        let mut next = self.clone();
        if let Some(old) = next.entities.get(&entity.id()).cloned() {
            next.unlink(&old);
        }
        Arc::make_mut(&mut next.entities).insert(entity.id(), entity.clone());
        next.link(&entity);
        next
    }

    /// Returns a new snapshot without `id`. Removing a missing id yields an
    /// equivalent snapshot.
    pub fn remove(&self, id: impl Into<OsmId>) -> Graph {
        let id = id.into();
        let mut next = self.clone();
        if let Some(old) = Arc::make_mut(&mut next.entities).remove(&id) {
            next.unlink(&old);
        }
        next
    }

    // --- Adjacency index helpers ---

    fn link(&mut self, entity: &Entity) {
        match entity {
            Entity::Node(_) => {}
            Entity::Way(w) => {
                let index = Arc::make_mut(&mut self.parent_ways);
                for &n in w.nodes() {
                    index.entry(n).or_default().insert(w.id());
                }
            }
            Entity::Relation(r) => {
                let index = Arc::make_mut(&mut self.parent_relations);
                for m in r.members() {
                    index.entry(m.id).or_default().insert(r.id());
                }
            }
        }
    }

    fn unlink(&mut self, entity: &Entity) {
        match entity {
            Entity::Node(_) => {}
            Entity::Way(w) => {
                let index = Arc::make_mut(&mut self.parent_ways);
                for n in w.nodes() {
                    if let Some(parents) = index.get_mut(n) {
                        parents.remove(&w.id());
                        if parents.is_empty() {
                            index.remove(n);
                        }
                    }
                }
            }
            Entity::Relation(r) => {
                let index = Arc::make_mut(&mut self.parent_relations);
                for m in r.members() {
                    if let Some(parents) = index.get_mut(&m.id) {
                        parents.remove(&r.id());
                        if parents.is_empty() {
                            index.remove(&m.id);
                        }
                    }
                }
            }
        }
    }
}
