// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Entity identifiers.
//!
//! Nodes, ways and relations each get a distinct id type so they cannot be
//! mixed up at compile time. [`OsmId`] is the type-disambiguated union used
//! wherever any entity may be referenced (relation members, graph lookups).
//! Negative ids denote entities created locally that have not been uploaded.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Id of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub i64);

/// Id of a way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WayId(pub i64);

/// Id of a relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RelationId(pub i64);

/// An id that can reference any entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum OsmId {
    Node(NodeId),
    Way(WayId),
    Relation(RelationId),
}

impl OsmId {
    /// Returns the entity kind of this id.
    pub fn kind(&self) -> EntityKind {
        match self {
            OsmId::Node(_) => EntityKind::Node,
            OsmId::Way(_) => EntityKind::Way,
            OsmId::Relation(_) => EntityKind::Relation,
        }
    }

    /// Returns the numeric part of the id.
    pub fn inner(&self) -> i64 {
        match self {
            OsmId::Node(NodeId(id)) | OsmId::Way(WayId(id)) | OsmId::Relation(RelationId(id)) => {
                *id
            }
        }
    }

    /// Returns `true` for ids of entities that only exist locally.
    pub fn is_new(&self) -> bool {
        self.inner() < 0
    }
}

/// Discriminant for entity kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Node = 0,
    Way = 1,
    Relation = 2,
}

impl EntityKind {
    /// Returns the kind name as used in relation member lists.
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Node => "node",
            EntityKind::Way => "way",
            EntityKind::Relation => "relation",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

impl fmt::Display for WayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "w{}", self.0)
    }
}

impl fmt::Display for RelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "r{}", self.0)
    }
}

impl fmt::Display for OsmId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OsmId::Node(id) => id.fmt(f),
            OsmId::Way(id) => id.fmt(f),
            OsmId::Relation(id) => id.fmt(f),
        }
    }
}

impl FromStr for OsmId {
    type Err = Error;

    /// Parses the `n123` / `w-4` / `r7` form.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let kind = match chars.next() {
            Some('n') => EntityKind::Node,
            Some('w') => EntityKind::Way,
            Some('r') => EntityKind::Relation,
            _ => return Err(Error::InvalidId(s.to_string())),
        };
        let id: i64 = chars
            .as_str()
            .parse()
            .map_err(|_| Error::InvalidId(s.to_string()))?;
        Ok(match kind {
            EntityKind::Node => OsmId::Node(NodeId(id)),
            EntityKind::Way => OsmId::Way(WayId(id)),
            EntityKind::Relation => OsmId::Relation(RelationId(id)),
        })
    }
}

// Conversion impls from specific ids to OsmId
impl From<NodeId> for OsmId {
    fn from(id: NodeId) -> Self {
        OsmId::Node(id)
    }
}

impl From<WayId> for OsmId {
    fn from(id: WayId) -> Self {
        OsmId::Way(id)
    }
}

impl From<RelationId> for OsmId {
    fn from(id: RelationId) -> Self {
        OsmId::Relation(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_uses_kind_prefix() {
        assert_eq!(OsmId::from(NodeId(1)).to_string(), "n1");
        assert_eq!(OsmId::from(WayId(-3)).to_string(), "w-3");
        assert_eq!(OsmId::from(RelationId(42)).to_string(), "r42");
    }

    #[test]
    fn parse_round_trips_display() {
        for id in [
            OsmId::Node(NodeId(17)),
            OsmId::Way(WayId(-1)),
            OsmId::Relation(RelationId(900)),
        ] {
            assert_eq!(id.to_string().parse::<OsmId>().unwrap(), id);
        }
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(matches!("x12".parse::<OsmId>(), Err(Error::InvalidId(_))));
        assert!(matches!("w".parse::<OsmId>(), Err(Error::InvalidId(_))));
        assert!(matches!("n1.5".parse::<OsmId>(), Err(Error::InvalidId(_))));
        assert!(matches!("".parse::<OsmId>(), Err(Error::InvalidId(_))));
    }

    #[test]
    fn same_number_different_kind_is_distinct() {
        assert_ne!(OsmId::from(NodeId(5)), OsmId::from(WayId(5)));
        assert_eq!(OsmId::from(WayId(5)).kind(), EntityKind::Way);
    }

    #[test]
    fn negative_ids_are_new() {
        assert!(OsmId::from(NodeId(-2)).is_new());
        assert!(!OsmId::from(NodeId(2)).is_new());
    }

    #[test]
    fn kind_ordering() {
        assert!(EntityKind::Node < EntityKind::Way);
        assert!(EntityKind::Way < EntityKind::Relation);
        assert_eq!(EntityKind::Relation.to_string(), "relation");
    }
}
