// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Turn restrictions: mapped `type=restriction` relations and restrictions
//! inferred from one-way conflicts.
//!
//! Both kinds share the [`Restriction`] value. Inference never contradicts
//! the map: when a restriction relation already covers a from / via / to
//! triple, nothing is inferred for it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use osm_topology_core::{EntityKind, Graph, NodeId, Relation, RelationId, WayId};

use crate::config::TopologyConfig;
use crate::error::{Error, Result};
use crate::intersection::Intersection;
use crate::turn::{Maneuver, Turn};

/// The `restriction=*` values understood here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RestrictionKind {
    NoLeftTurn,
    NoRightTurn,
    NoStraightOn,
    NoUTurn,
    NoEntry,
    NoExit,
    OnlyLeftTurn,
    OnlyRightTurn,
    OnlyStraightOn,
    OnlyUTurn,
}

impl RestrictionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RestrictionKind::NoLeftTurn => "no_left_turn",
            RestrictionKind::NoRightTurn => "no_right_turn",
            RestrictionKind::NoStraightOn => "no_straight_on",
            RestrictionKind::NoUTurn => "no_u_turn",
            RestrictionKind::NoEntry => "no_entry",
            RestrictionKind::NoExit => "no_exit",
            RestrictionKind::OnlyLeftTurn => "only_left_turn",
            RestrictionKind::OnlyRightTurn => "only_right_turn",
            RestrictionKind::OnlyStraightOn => "only_straight_on",
            RestrictionKind::OnlyUTurn => "only_u_turn",
        }
    }

    /// `only_*` restrictions allow one exit and forbid the rest.
    pub fn is_only(&self) -> bool {
        matches!(
            self,
            RestrictionKind::OnlyLeftTurn
                | RestrictionKind::OnlyRightTurn
                | RestrictionKind::OnlyStraightOn
                | RestrictionKind::OnlyUTurn
        )
    }
}

impl fmt::Display for RestrictionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RestrictionKind {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s {
            "no_left_turn" => RestrictionKind::NoLeftTurn,
            "no_right_turn" => RestrictionKind::NoRightTurn,
            "no_straight_on" => RestrictionKind::NoStraightOn,
            "no_u_turn" => RestrictionKind::NoUTurn,
            "no_entry" => RestrictionKind::NoEntry,
            "no_exit" => RestrictionKind::NoExit,
            "only_left_turn" => RestrictionKind::OnlyLeftTurn,
            "only_right_turn" => RestrictionKind::OnlyRightTurn,
            "only_straight_on" => RestrictionKind::OnlyStraightOn,
            "only_u_turn" => RestrictionKind::OnlyUTurn,
            _ => return Err(()),
        })
    }
}

/// What connects the from and to ways.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Via {
    Node(NodeId),
    Ways(Vec<WayId>),
}

/// Where a restriction comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RestrictionSource {
    /// A mapped `type=restriction` relation.
    Explicit(RelationId),
    /// Derived from one-way tagging.
    Inferred,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Restriction {
    pub from: WayId,
    pub via: Via,
    pub to: WayId,
    pub kind: RestrictionKind,
    pub source: RestrictionSource,
}

impl Restriction {
    /// Reads a restriction relation.
    ///
    /// Requires `type=restriction`, a known `restriction` value, exactly one
    /// `from` way, exactly one `to` way, and either a single `via` node or
    /// one or more `via` ways. Returns `None` for anything else.
    pub fn from_relation(relation: &Relation) -> Option<Self> {
        if !relation.is_restriction() {
            return None;
        }
        let kind: RestrictionKind = relation.tags().get("restriction")?.parse().ok()?;

        let from = single_way(relation, "from")?;
        let to = single_way(relation, "to")?;

        let vias: Vec<_> = relation.members_by_role("via").collect();
        let via = match vias.as_slice() {
            [] => return None,
            [only] if only.kind() == EntityKind::Node => Via::Node(only.node()?),
            _ => Via::Ways(
                vias.iter()
                    .map(|m| m.way())
                    .collect::<Option<Vec<_>>>()?,
            ),
        };

        Some(Self {
            from,
            via,
            to,
            kind,
            source: RestrictionSource::Explicit(relation.id()),
        })
    }

    /// The mapped relation, for explicit restrictions.
    pub fn relation(&self) -> Option<RelationId> {
        match self.source {
            RestrictionSource::Explicit(id) => Some(id),
            RestrictionSource::Inferred => None,
        }
    }

    /// The via node, for restrictions that pass through a single node.
    pub fn via_node(&self) -> Option<NodeId> {
        match self.via {
            Via::Node(n) => Some(n),
            Via::Ways(_) => None,
        }
    }
}

fn single_way(relation: &Relation, role: &str) -> Option<WayId> {
    let mut members = relation.members_by_role(role);
    let first = members.next()?;
    if members.next().is_some() {
        return None;
    }
    first.way()
}

/// Valid restriction relations whose via node is `vertex`, in relation id
/// order.
pub fn explicit_restrictions_at(graph: &Graph, vertex: NodeId) -> Vec<Restriction> {
    graph
        .parent_relations(vertex)
        .into_iter()
        .filter_map(Restriction::from_relation)
        .filter(|r| r.via_node() == Some(vertex))
        .collect()
}

/// The `no_*` restriction that forbids `turn`'s maneuver.
pub fn restriction_kind_for(turn: &Turn) -> RestrictionKind {
    match turn.maneuver {
        Maneuver::Straight => RestrictionKind::NoStraightOn,
        Maneuver::Left => RestrictionKind::NoLeftTurn,
        Maneuver::Right => RestrictionKind::NoRightTurn,
        Maneuver::UTurn | Maneuver::Reverse => RestrictionKind::NoUTurn,
    }
}

/// Infers a restriction from `from_way` onto `to_way` at `vertex` when every
/// way onto `to_way` runs against its one-way direction.
///
/// `from_way` must end at the vertex, as in a mapped restriction, so there is
/// a single approach. Returns `None` when `to_way` is two-way or reversible,
/// when the vertex is not a junction, when `from_way` has no leg or more than
/// one leg at the vertex, or when a restriction relation already covers the
/// same from / via / to.
pub fn infer_restriction(
    graph: &Graph,
    vertex: NodeId,
    from_way: WayId,
    to_way: WayId,
    config: &TopologyConfig,
) -> Result<Option<Restriction>> {
    graph.node(vertex)?;
    graph.way(from_way)?;
    let to = graph.way(to_way)?;

    if from_way == to_way || !to.oneway().is_directional() {
        return Ok(None);
    }

    let intersection = match Intersection::build(graph, vertex, config) {
        Ok(ix) => ix,
        Err(Error::NotAJunction(_)) => return Ok(None),
        Err(e) => return Err(e),
    };
    if intersection.legs_of(from_way).count() != 1 || !intersection.contains_way(to_way) {
        return Ok(None);
    }

    let turns = intersection.turns(graph, from_way, config)?;
    let onto: Vec<&Turn> = turns.iter().filter(|t| t.to.way == to_way).collect();
    if onto.is_empty() || !onto.iter().all(|t| t.restricted_by_oneway) {
        return Ok(None);
    }

    let mapped = explicit_restrictions_at(graph, vertex)
        .iter()
        .any(|r| r.from == from_way && r.to == to_way);
    if mapped {
        return Ok(None);
    }

    let kind = restriction_kind_for(onto[0]);
    tracing::debug!(
        from = %from_way,
        via = %vertex,
        to = %to_way,
        kind = %kind,
        "Inferred turn restriction"
    );
    Ok(Some(Restriction {
        from: from_way,
        via: Via::Node(vertex),
        to: to_way,
        kind,
        source: RestrictionSource::Inferred,
    }))
}
