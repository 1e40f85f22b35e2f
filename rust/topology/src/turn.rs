// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Turn enumeration at an intersection.
//!
//! A turn pairs an approach leg of the entry way with any other leg at the
//! vertex, so a way passing through offers its far side as an exit. Its signed angle is the change of heading, positive counter-clockwise:
//! positive deltas are left turns, negative deltas right turns.

use serde::Serialize;

use osm_topology_core::{normalize_delta, Graph, NodeId, Oneway, OsmId, RelationId, WayId};

use crate::config::TopologyConfig;
use crate::error::{Error, Result};
use crate::intersection::{IncidentWay, Intersection, WayDirection};
use crate::restriction::{explicit_restrictions_at, Restriction, RestrictionKind};

/// Geometric class of a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Maneuver {
    Straight,
    Left,
    Right,
    UTurn,
    /// Leaving along the same segment the turn arrived on.
    Reverse,
}

/// One end of a turn: a way and the neighbouring node on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TurnLeg {
    pub way: WayId,
    pub node: NodeId,
    pub direction: WayDirection,
}

impl From<&IncidentWay> for TurnLeg {
    fn from(leg: &IncidentWay) -> Self {
        Self {
            way: leg.way,
            node: leg.node,
            direction: leg.direction,
        }
    }
}

/// A mapped restriction that applies to a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TurnRestriction {
    pub relation: RelationId,
    pub kind: RestrictionKind,
    /// Set when an `only_*` restriction towards another exit rules this turn
    /// out.
    pub indirect: bool,
}

impl TurnRestriction {
    /// Whether the restriction forbids the turn it is attached to.
    pub fn forbids(&self) -> bool {
        self.indirect || !self.kind.is_only()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Turn {
    /// Entry way and the node the turn arrives from.
    pub from: TurnLeg,
    /// The via node.
    pub vertex: NodeId,
    /// Exit way and the node the turn leaves towards.
    pub to: TurnLeg,
    pub maneuver: Maneuver,
    /// Heading change in degrees, `(-180, 180]`, positive to the left.
    pub angle: f64,
    /// The exit runs against its way's one-way direction.
    pub restricted_by_oneway: bool,
    pub restriction: Option<TurnRestriction>,
}

impl Turn {
    /// The turn is forbidden by one-way tagging or a mapped restriction.
    pub fn is_restricted(&self) -> bool {
        self.restricted_by_oneway || self.restriction.map_or(false, |r| r.forbids())
    }
}

impl Intersection {
    /// Enumerates every turn from `entry_way` at this intersection,
    /// approaches and exits both in angular order. The approach leg itself is
    /// never an exit.
    ///
    /// Fails with `NotFound` when `entry_way` has no leg here.
    pub fn turns(
        &self,
        graph: &Graph,
        entry_way: WayId,
        config: &TopologyConfig,
    ) -> Result<Vec<Turn>> {
        let approaches: Vec<&IncidentWay> = self.legs_of(entry_way).collect();
        if approaches.is_empty() {
            return Err(Error::Core(osm_topology_core::Error::NotFound(
                OsmId::Way(entry_way),
            )));
        }
        let entry_oneway = graph.way(entry_way)?.oneway();
        let restrictions = explicit_restrictions_at(graph, self.vertex);

        let mut turns = Vec::new();
        for entry in &approaches {
            for exit in self.ways.iter().filter(|l| !same_leg(l, entry)) {
                let exit_oneway = graph.way(exit.way)?.oneway();
                let angle = normalize_delta(entry.bearing + 180.0 - exit.bearing);
                let both_oneway = entry_oneway.is_oneway() && exit_oneway.is_oneway();

                turns.push(Turn {
                    from: TurnLeg::from(*entry),
                    vertex: self.vertex,
                    to: TurnLeg::from(exit),
                    maneuver: classify_turn(entry, exit, angle, both_oneway, config),
                    angle,
                    restricted_by_oneway: leaves_against(exit.direction, exit_oneway),
                    restriction: attached_restriction(&restrictions, entry_way, exit.way),
                });
            }
        }
        Ok(turns)
    }
}

/// A restriction naming this exit wins over an `only_*` restriction that
/// points elsewhere.
fn attached_restriction(
    restrictions: &[Restriction],
    entry_way: WayId,
    exit_way: WayId,
) -> Option<TurnRestriction> {
    let from_entry = || restrictions.iter().filter(move |r| r.from == entry_way);

    let direct = from_entry().find(|r| r.to == exit_way).map(|r| (r, false));
    let only_elsewhere = || {
        from_entry()
            .find(|r| r.to != exit_way && r.kind.is_only())
            .map(|r| (r, true))
    };
    let (r, indirect) = direct.or_else(only_elsewhere)?;
    Some(TurnRestriction {
        relation: r.relation()?,
        kind: r.kind,
        indirect,
    })
}

fn classify_turn(
    entry: &IncidentWay,
    exit: &IncidentWay,
    angle: f64,
    both_oneway: bool,
    config: &TopologyConfig,
) -> Maneuver {
    if exit.node == entry.node {
        Maneuver::Reverse
    } else if angle.abs() <= config.straight_tolerance_deg {
        Maneuver::Straight
    } else if angle.abs() >= 180.0 - config.u_turn_tolerance(both_oneway) {
        Maneuver::UTurn
    } else if angle > 0.0 {
        Maneuver::Left
    } else {
        Maneuver::Right
    }
}

fn same_leg(a: &IncidentWay, b: &IncidentWay) -> bool {
    (a.way, a.node, a.direction) == (b.way, b.node, b.direction)
}

/// Leaving the vertex along `direction` breaks a fixed one-way direction.
fn leaves_against(direction: WayDirection, oneway: Oneway) -> bool {
    matches!(
        (direction, oneway),
        (WayDirection::Forward, Oneway::Backward) | (WayDirection::Backward, Oneway::Forward)
    )
}
