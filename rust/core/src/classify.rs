// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Pure predicates over tag mappings.
//!
//! Every rule here is a fixed table so that the topology algorithms interpret
//! raw tags identically: one-way semantics, pavement, which keys carry
//! meaning, and which tags suggest that a way should be a closed area.

use serde::{Deserialize, Serialize};

use crate::tags::Tags;

/// Direction of travel allowed along a way, relative to its node order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Oneway {
    /// Travel only in node order.
    Forward,
    /// Travel only against node order (`oneway=-1`).
    Backward,
    /// Travel in both directions.
    TwoWay,
    /// One-way, but the direction changes over time.
    Reversible,
}

impl Oneway {
    /// Returns `true` for every variant that limits travel to one direction
    /// at a time.
    pub fn is_oneway(&self) -> bool {
        !matches!(self, Oneway::TwoWay)
    }

    /// Returns `true` when the direction is fixed and known.
    pub fn is_directional(&self) -> bool {
        matches!(self, Oneway::Forward | Oneway::Backward)
    }
}

/// Tags that imply `oneway=yes` when no explicit `oneway` value is set.
const IMPLIED_ONEWAY: &[(&str, &[&str])] = &[
    (
        "aerialway",
        &[
            "chair_lift",
            "drag_lift",
            "j-bar",
            "magic_carpet",
            "mixed_lift",
            "platter",
            "rope_tow",
            "t-bar",
            "zip_line",
        ],
    ),
    ("highway", &["motorway"]),
    ("junction", &["circular", "roundabout"]),
    ("man_made", &["goods_conveyor", "piste:halfpipe"]),
    ("piste:type", &["downhill", "sled", "yes"]),
    (
        "waterway",
        &[
            "canal",
            "ditch",
            "drain",
            "fish_pass",
            "river",
            "stream",
            "tidal_channel",
        ],
    ),
];

/// Classifies the one-way semantics of a tag mapping.
///
/// An explicit `oneway` value wins. Values that are not recognised fall
/// through to the implied tables, as if `oneway` were absent.
pub fn oneway(tags: &Tags) -> Oneway {
    match tags.get("oneway") {
        Some("yes" | "true" | "1") => return Oneway::Forward,
        Some("-1" | "reverse") => return Oneway::Backward,
        Some("no" | "false" | "0") => return Oneway::TwoWay,
        Some("reversible" | "alternating") => return Oneway::Reversible,
        _ => {}
    }

    let implied = IMPLIED_ONEWAY
        .iter()
        .any(|(key, values)| tags.is_any(key, values));
    if implied {
        Oneway::Forward
    } else {
        Oneway::TwoWay
    }
}

const PAVED_SURFACES: &[&str] = &[
    "paved",
    "asphalt",
    "concrete",
    "concrete:lanes",
    "concrete:plates",
    "paving_stones",
    "sett",
    "chipseal",
];

/// Highway classes that are paved by convention when no surface is mapped.
const PAVED_HIGHWAYS: &[&str] = &[
    "motorway",
    "motorway_link",
    "trunk",
    "trunk_link",
    "primary",
    "primary_link",
    "secondary",
    "secondary_link",
    "tertiary",
    "tertiary_link",
    "unclassified",
    "residential",
    "living_street",
    "service",
    "busway",
];

/// Returns `true` if the tags describe a paved way.
///
/// An explicit `surface` always decides. Without one, `tracktype=grade1`
/// and the conventional paved highway classes count as paved.
pub fn is_paved(tags: &Tags) -> bool {
    if let Some(surface) = tags.get("surface") {
        return PAVED_SURFACES.contains(&surface);
    }
    if tags.is("tracktype", "grade1") {
        return true;
    }
    tags.is_any("highway", PAVED_HIGHWAYS)
}

/// Returns `false` for keys that carry only provenance or import metadata.
pub fn is_interesting_tag(key: &str) -> bool {
    !matches!(key, "attribution" | "created_by" | "source" | "odbl")
        && !key.starts_with("source:")
        && !key.starts_with("tiger:")
        && !key.starts_with("odbl:")
}

/// Number of tags with interesting keys.
pub fn interesting_tag_count(tags: &Tags) -> usize {
    tags.keys().filter(|k| is_interesting_tag(k)).count()
}

/// Keys whose presence suggests that an unclosed way should have been an
/// area, in priority order.
const AREA_SUGGESTION_KEYS: &[&str] = &["landuse", "amenities", "tourism", "shop"];

/// Returns the first `key=value` that suggests the entity should be a closed
/// area, or `None`.
///
/// The priority order is `landuse`, `amenities`, `tourism` (except
/// `tourism=artwork`, which is often mapped as a line), `shop`, and finally
/// `building=yes`.
pub fn tag_suggests_area(tags: &Tags) -> Option<String> {
    if tags.is_empty() {
        return None;
    }

    for &key in AREA_SUGGESTION_KEYS {
        let Some(value) = tags.get(key) else {
            continue;
        };
        if key == "tourism" && value == "artwork" {
            continue;
        }
        return Some(format!("{key}={value}"));
    }

    if tags.is("building", "yes") {
        return Some("building=yes".to_string());
    }
    None
}

/// How a key in the area table treats its values.
enum AreaRule {
    /// Every value is an area except these.
    Except(&'static [&'static str]),
    /// Only these values are areas.
    Only(&'static [&'static str]),
}

const AREA_KEYS: &[(&str, AreaRule)] = &[
    ("aeroway", AreaRule::Except(&["jet_bridge", "parking_position", "runway", "taxilane", "taxiway"])),
    ("amenity", AreaRule::Except(&[])),
    ("area:highway", AreaRule::Except(&[])),
    ("building", AreaRule::Except(&[])),
    ("building:part", AreaRule::Except(&[])),
    ("craft", AreaRule::Except(&[])),
    ("highway", AreaRule::Only(&["pedestrian", "rest_area", "services"])),
    ("historic", AreaRule::Except(&[])),
    ("landuse", AreaRule::Except(&[])),
    ("leisure", AreaRule::Except(&["slipway", "track"])),
    (
        "man_made",
        AreaRule::Except(&["breakwater", "cutline", "dyke", "embankment", "goods_conveyor", "groyne", "pipeline"]),
    ),
    ("military", AreaRule::Except(&[])),
    (
        "natural",
        AreaRule::Except(&["arete", "cliff", "coastline", "earth_bank", "ridge", "tree_row", "valley"]),
    ),
    ("office", AreaRule::Except(&[])),
    ("place", AreaRule::Except(&[])),
    ("power", AreaRule::Except(&["cable", "line", "minor_line"])),
    ("shop", AreaRule::Except(&[])),
    ("tourism", AreaRule::Except(&[])),
    ("waterway", AreaRule::Only(&["boatyard", "dock", "riverbank"])),
];

/// Returns `true` if a closed way with these tags should be read as an area.
///
/// `area=yes` and `area=no` are handled by [`crate::Way::is_area`]; this only
/// consults the key table.
pub fn has_area_tags(tags: &Tags) -> bool {
    AREA_KEYS.iter().any(|(key, rule)| match tags.get(key) {
        None | Some("no") => false,
        Some(value) => match rule {
            AreaRule::Except(values) => !values.contains(&value),
            AreaRule::Only(values) => values.contains(&value),
        },
    })
}

const ROUTABLE_HIGHWAYS: &[&str] = &[
    "motorway",
    "motorway_link",
    "trunk",
    "trunk_link",
    "primary",
    "primary_link",
    "secondary",
    "secondary_link",
    "tertiary",
    "tertiary_link",
    "unclassified",
    "residential",
    "living_street",
    "service",
    "road",
    "track",
    "busway",
    "bus_guideway",
];

/// Returns `true` for highways that vehicles can drive on, i.e. the ways that
/// participate in turn analysis.
pub fn is_routable_highway(tags: &Tags) -> bool {
    tags.is_any("highway", ROUTABLE_HIGHWAYS)
}
