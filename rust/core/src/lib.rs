// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # OSM Topology Core
//!
//! Entity model, tag classification and immutable graph snapshots for an
//! OpenStreetMap editor.
//!
//! ## Overview
//!
//! - **Entities**: validated [`Node`], [`Way`] and [`Relation`] values keyed
//!   by typed OSM ids
//! - **Tags**: an ordered key-value mapping plus pure predicates
//!   ([`classify`]) for one-way, pavement, interesting keys and area hints
//! - **Graph**: a cheap-to-clone [`Graph`] snapshot with parent-way and
//!   parent-relation indices
//!
//! ## Quick Start
//!
//! ```rust
//! use osm_topology_core::{Graph, LonLat, Node, NodeId, Tags, Way, WayId};
//!
//! let a = Node::new(NodeId(1), LonLat::new(13.40, 52.52).unwrap(), Tags::new());
//! let b = Node::new(NodeId(2), LonLat::new(13.41, 52.52).unwrap(), Tags::new());
//! let road = Way::new(
//!     WayId(1),
//!     vec![NodeId(1), NodeId(2)],
//!     Tags::from([("highway", "residential"), ("oneway", "yes")]),
//! )
//! .unwrap();
//!
//! let graph = Graph::from_entities([a.into(), b.into(), road.into()]);
//! let parents = graph.parent_ways(NodeId(2));
//! assert!(parents[0].oneway().is_oneway());
//! ```

pub mod classify;
pub mod coord;
pub mod entity;
pub mod error;
pub mod graph;
pub mod id;
pub mod tags;

pub use classify::Oneway;
pub use coord::{normalize_delta, LonLat};
pub use entity::{Affix, Changeset, Entity, Geometry, Member, Node, Relation, Way};
pub use error::{Error, Result};
pub use graph::Graph;
pub use id::{EntityKind, NodeId, OsmId, RelationId, WayId};
pub use tags::Tags;
