// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Lane metadata of highway ways.
//!
//! Reads the lane count, the split of lanes per direction, `turn:lanes`,
//! `maxspeed` and per-lane access tags. Missing tags fall back to what is
//! conventional for the highway class; values that cannot be read become
//! `Unknown` rather than errors.

use regex::Regex;
use serde::Serialize;

use osm_topology_core::{Oneway, Tags, Way};

lazy_static::lazy_static! {
    static ref MAXSPEED: Regex =
        Regex::new(r"^([0-9][.0-9]*)(?: ?(?:km/h|kmh|kph|mph|knots))?$").unwrap();
}

/// One indication of a `turn:lanes` entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnIndication {
    Left,
    SlightLeft,
    SharpLeft,
    Through,
    Right,
    SlightRight,
    SharpRight,
    Reverse,
    MergeToLeft,
    MergeToRight,
    None,
    Unknown,
}

impl TurnIndication {
    fn parse(s: &str) -> Self {
        match s {
            "left" => TurnIndication::Left,
            "slight_left" => TurnIndication::SlightLeft,
            "sharp_left" => TurnIndication::SharpLeft,
            "through" => TurnIndication::Through,
            "right" => TurnIndication::Right,
            "slight_right" => TurnIndication::SlightRight,
            "sharp_right" => TurnIndication::SharpRight,
            "reverse" => TurnIndication::Reverse,
            "merge_to_left" => TurnIndication::MergeToLeft,
            "merge_to_right" => TurnIndication::MergeToRight,
            "none" => TurnIndication::None,
            _ => TurnIndication::Unknown,
        }
    }
}

/// Speed limit of one lane in `maxspeed:lanes`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LaneSpeed {
    /// Same as the way's `maxspeed`, or left empty.
    Same,
    /// Explicitly no limit.
    NoLimit,
    Limit(u32),
    Unknown,
}

/// Access value of one lane in `psv:lanes`, `bicycleway:lanes` and friends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LaneAccess {
    Yes,
    No,
    Designated,
    /// A marked lane; only meaningful for `bicycleway:lanes`.
    Lane,
    Unknown,
}

/// A tag read from its plain, `:forward` and `:backward` variants.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ByDirection<T> {
    pub unspecified: Option<T>,
    pub forward: Option<T>,
    pub backward: Option<T>,
}

impl<T> ByDirection<T> {
    fn read(tags: &Tags, key: &str, parse: impl Fn(&str) -> T) -> Self {
        Self {
            unspecified: tags.get(key).filter(|v| !v.is_empty()).map(&parse),
            forward: tags
                .get(&format!("{key}:forward"))
                .filter(|v| !v.is_empty())
                .map(&parse),
            backward: tags
                .get(&format!("{key}:backward"))
                .filter(|v| !v.is_empty())
                .map(&parse),
        }
    }
}

/// Lane layout of a highway way.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Lanes {
    pub count: u32,
    pub oneway: bool,
    pub forward: u32,
    pub backward: u32,
    /// Center turn lanes usable from both directions (0 or 1).
    pub both_ways: u32,
    pub maxspeed: Option<u32>,
    pub turn_lanes: ByDirection<Vec<Vec<TurnIndication>>>,
    pub maxspeed_lanes: ByDirection<Vec<LaneSpeed>>,
    pub psv_lanes: ByDirection<Vec<LaneAccess>>,
    pub bus_lanes: ByDirection<Vec<LaneAccess>>,
    pub taxi_lanes: ByDirection<Vec<LaneAccess>>,
    pub hov_lanes: ByDirection<Vec<LaneAccess>>,
    pub hgv_lanes: ByDirection<Vec<LaneAccess>>,
    pub bicycleway_lanes: ByDirection<Vec<LaneAccess>>,
}

impl Lanes {
    /// Reads the lane layout of `way`, or `None` if it is not a highway.
    pub fn from_way(way: &Way) -> Option<Self> {
        let tags = way.tags();
        tags.get("highway")?;

        let oneway = way.oneway();
        let count = lane_count(tags, oneway.is_oneway());
        let maxspeed = parse_maxspeed(tags);
        let (forward, backward, both_ways) = lane_directions(tags, oneway, count);

        Some(Self {
            count,
            oneway: oneway.is_oneway(),
            forward,
            backward,
            both_ways,
            maxspeed,
            turn_lanes: ByDirection::read(tags, "turn:lanes", parse_turn_lanes),
            maxspeed_lanes: ByDirection::read(tags, "maxspeed:lanes", |v| {
                parse_maxspeed_lanes(v, maxspeed)
            }),
            psv_lanes: ByDirection::read(tags, "psv:lanes", |v| parse_access_lanes(v, false)),
            bus_lanes: ByDirection::read(tags, "bus:lanes", |v| parse_access_lanes(v, false)),
            taxi_lanes: ByDirection::read(tags, "taxi:lanes", |v| parse_access_lanes(v, false)),
            hov_lanes: ByDirection::read(tags, "hov:lanes", |v| parse_access_lanes(v, false)),
            hgv_lanes: ByDirection::read(tags, "hgv:lanes", |v| parse_access_lanes(v, false)),
            bicycleway_lanes: ByDirection::read(tags, "bicycleway:lanes", |v| {
                parse_access_lanes(v, true)
            }),
        })
    }
}

/// Leading integer of a tag value, ignoring anything after it (`"2;3"` → 2).
fn leading_int(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let digits = s
        .char_indices()
        .take_while(|&(i, c)| c.is_ascii_digit() || (i == 0 && (c == '-' || c == '+')))
        .count();
    s[..digits].parse().ok()
}

fn lane_count(tags: &Tags, oneway: bool) -> u32 {
    if let Some(count) = tags.get("lanes").and_then(leading_int) {
        if count > 0 {
            return u32::try_from(count).unwrap_or(u32::MAX);
        }
    }
    match (tags.get("highway"), oneway) {
        (Some("trunk" | "motorway"), true) => 2,
        (Some("trunk" | "motorway"), false) => 4,
        (_, true) => 1,
        (_, false) => 2,
    }
}

fn parse_maxspeed(tags: &Tags) -> Option<u32> {
    let value = tags.get("maxspeed")?;
    let number = MAXSPEED.captures(value)?.get(1)?.as_str();
    number.split('.').next()?.parse().ok()
}

/// Splits `count` lanes into `(forward, backward, both_ways)`.
fn lane_directions(tags: &Tags, oneway: Oneway, count: u32) -> (u32, u32, u32) {
    let read = |key: &str| {
        tags.get(key)
            .and_then(leading_int)
            .map(|n| u32::try_from(n.max(0)).unwrap_or(u32::MAX))
    };
    let both_ways = u32::from(read("lanes:both_ways").map_or(false, |n| n > 0));

    match oneway {
        Oneway::Backward => return (0, count, 0),
        Oneway::Forward | Oneway::Reversible => return (count, 0, 0),
        Oneway::TwoWay => {}
    }

    let available = count.saturating_sub(both_ways);
    match (read("lanes:forward"), read("lanes:backward")) {
        (None, None) => {
            let backward = available / 2;
            (available - backward, backward, both_ways)
        }
        (None, Some(backward)) => {
            let backward = backward.min(available);
            (available - backward, backward, both_ways)
        }
        (Some(forward), None) => {
            let forward = forward.min(available);
            (forward, available - forward, both_ways)
        }
        (Some(forward), Some(backward)) => (forward, backward, both_ways),
    }
}

fn parse_turn_lanes(value: &str) -> Vec<Vec<TurnIndication>> {
    value
        .split('|')
        .map(|lane| {
            let lane = if lane.is_empty() { "none" } else { lane };
            lane.split(';').map(TurnIndication::parse).collect()
        })
        .collect()
}

fn parse_maxspeed_lanes(value: &str, maxspeed: Option<u32>) -> Vec<LaneSpeed> {
    value
        .split('|')
        .map(|lane| {
            if lane == "none" {
                return LaneSpeed::NoLimit;
            }
            if lane.is_empty() {
                return LaneSpeed::Same;
            }
            match leading_int(lane).and_then(|n| u32::try_from(n).ok()) {
                Some(speed) if Some(speed) == maxspeed => LaneSpeed::Same,
                Some(speed) => LaneSpeed::Limit(speed),
                None => LaneSpeed::Unknown,
            }
        })
        .collect()
}

fn parse_access_lanes(value: &str, allow_lane: bool) -> Vec<LaneAccess> {
    value
        .split('|')
        .map(|lane| match lane {
            "" | "no" => LaneAccess::No,
            "yes" => LaneAccess::Yes,
            "designated" => LaneAccess::Designated,
            "lane" if allow_lane => LaneAccess::Lane,
            _ => LaneAccess::Unknown,
        })
        .collect()
}
