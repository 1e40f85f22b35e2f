// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Tunable thresholds for intersection and turn analysis.

use serde::{Deserialize, Serialize};

/// Angle thresholds and filters used when building intersections and
/// classifying turns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TopologyConfig {
    /// Turns within this many degrees of straight ahead are `Straight`.
    pub straight_tolerance_deg: f64,
    /// Turns within this many degrees of a full reversal are `UTurn`.
    pub u_turn_tolerance_deg: f64,
    /// U-turn tolerance when both the entry and exit way are one-way, so
    /// dual carriageways that meet at an angle still read as a U-turn.
    pub oneway_pair_u_turn_tolerance_deg: f64,
    /// Only routable, non-area highways take part in intersections.
    pub roads_only: bool,
}

impl TopologyConfig {
    /// Load configuration from `OSM_TOPOLOGY_*` environment variables,
    /// falling back to the defaults for anything unset or unparsable.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            straight_tolerance_deg: env_or(
                "OSM_TOPOLOGY_STRAIGHT_TOLERANCE_DEG",
                defaults.straight_tolerance_deg,
            ),
            u_turn_tolerance_deg: env_or(
                "OSM_TOPOLOGY_U_TURN_TOLERANCE_DEG",
                defaults.u_turn_tolerance_deg,
            ),
            oneway_pair_u_turn_tolerance_deg: env_or(
                "OSM_TOPOLOGY_ONEWAY_PAIR_U_TURN_TOLERANCE_DEG",
                defaults.oneway_pair_u_turn_tolerance_deg,
            ),
            roads_only: env_or("OSM_TOPOLOGY_ROADS_ONLY", defaults.roads_only),
        }
    }

    /// The U-turn tolerance that applies to a pair of ways.
    pub fn u_turn_tolerance(&self, both_oneway: bool) -> f64 {
        if both_oneway {
            self.oneway_pair_u_turn_tolerance_deg
        } else {
            self.u_turn_tolerance_deg
        }
    }
}

impl Default for TopologyConfig {
    fn default() -> Self {
        Self {
            straight_tolerance_deg: 22.0,
            u_turn_tolerance_deg: 23.0,
            oneway_pair_u_turn_tolerance_deg: 40.0,
            roads_only: true,
        }
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
