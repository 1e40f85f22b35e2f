// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Joining way fragments into contiguous node sequences.
//!
//! Multipolygon rings and route relations are usually split over several
//! ways. [`join_ways`] glues fragments that share endpoint nodes into maximal
//! sequences, closing rings where the fragments allow it. Every input way
//! ends up in exactly one output sequence; fragments that cannot be attached
//! anywhere form their own open sequence.

use serde::Serialize;

use osm_topology_core::{Graph, NodeId, Relation, Way, WayId};

use crate::error::Result;

/// A way used by a [`RingSequence`], with the direction it was traversed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct JoinedWay {
    pub way: WayId,
    /// `true` when the way's nodes appear in the sequence in reverse order.
    pub reversed: bool,
}

/// An ordered run of nodes assembled from one or more ways.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RingSequence {
    pub nodes: Vec<NodeId>,
    pub closed: bool,
    /// Source ways in sequence order.
    pub ways: Vec<JoinedWay>,
}

impl RingSequence {
    fn seed(way: &Way) -> Self {
        let mut seq = Self {
            nodes: way.nodes().to_vec(),
            closed: false,
            ways: vec![JoinedWay {
                way: way.id(),
                reversed: false,
            }],
        };
        seq.update_closed();
        seq
    }

    pub fn first(&self) -> NodeId {
        self.nodes[0]
    }

    pub fn last(&self) -> NodeId {
        self.nodes[self.nodes.len() - 1]
    }

    /// Ids of the source ways, in sequence order.
    pub fn way_ids(&self) -> Vec<WayId> {
        self.ways.iter().map(|w| w.way).collect()
    }

    fn reverse(&mut self) {
        self.nodes.reverse();
        self.ways.reverse();
        for w in &mut self.ways {
            w.reversed = !w.reversed;
        }
    }

    /// How `way` could attach to this sequence, if at all. The order of the
    /// checks fixes the tie-break between candidates that fit both ends.
    fn attachment(&self, way: &Way) -> Option<Attach> {
        if way.first() == self.last() {
            Some(Attach::Append)
        } else if way.last() == self.last() {
            Some(Attach::AppendReversed)
        } else if way.last() == self.first() {
            Some(Attach::Prepend)
        } else if way.first() == self.first() {
            Some(Attach::PrependReversed)
        } else {
            None
        }
    }

    fn attach(&mut self, way: &Way, how: Attach) {
        let nodes = way.nodes();
        match how {
            Attach::Append => {
                self.nodes.extend_from_slice(&nodes[1..]);
                self.ways.push(JoinedWay {
                    way: way.id(),
                    reversed: false,
                });
            }
            Attach::AppendReversed => {
                self.nodes.extend(nodes.iter().rev().skip(1));
                self.ways.push(JoinedWay {
                    way: way.id(),
                    reversed: true,
                });
            }
            Attach::Prepend => {
                let mut joined = nodes[..nodes.len() - 1].to_vec();
                joined.append(&mut self.nodes);
                self.nodes = joined;
                self.ways.insert(
                    0,
                    JoinedWay {
                        way: way.id(),
                        reversed: false,
                    },
                );
            }
            Attach::PrependReversed => {
                let mut joined: Vec<NodeId> = nodes.iter().rev().copied().collect();
                joined.pop();
                joined.append(&mut self.nodes);
                self.nodes = joined;
                self.ways.insert(
                    0,
                    JoinedWay {
                        way: way.id(),
                        reversed: true,
                    },
                );
            }
        }
        self.update_closed();
    }

    fn update_closed(&mut self) {
        self.closed = self.nodes.len() >= 3 && self.first() == self.last();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Attach {
    Append,
    AppendReversed,
    Prepend,
    PrependReversed,
}

/// Joins ways into maximal sequences.
///
/// The first unconsumed way seeds a sequence, which then takes the first
/// remaining way (in input order) that attaches at either end, until it
/// closes or nothing attaches.
pub fn join_ways<'a>(ways: impl IntoIterator<Item = &'a Way>) -> Vec<RingSequence> {
    join(ways.into_iter().collect(), false)
}

/// Joins the way members of `relation`, keeping member order where possible.
///
/// Node and relation members are ignored. A way member missing from `graph`
/// fails with `NotFound`.
pub fn join_members(relation: &Relation, graph: &Graph) -> Result<Vec<RingSequence>> {
    let ways = relation
        .way_members()
        .filter_map(|m| m.way())
        .map(|id| graph.way(id))
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(join(ways, true))
}

fn join(mut remaining: Vec<&Way>, prefer_forward: bool) -> Vec<RingSequence> {
    let mut sequences = Vec::new();

    while !remaining.is_empty() {
        let seed = remaining.remove(0);
        let mut seq = RingSequence::seed(seed);

        if prefer_forward && !seq.closed {
            if let Some(next) = remaining.first() {
                let at_end = next.first() == seq.last() || next.last() == seq.last();
                let at_start = next.first() == seq.first() || next.last() == seq.first();
                if !at_end && at_start {
                    seq.reverse();
                }
            }
        }

        while !seq.closed {
            let found = remaining
                .iter()
                .enumerate()
                .find_map(|(i, way)| seq.attachment(way).map(|how| (i, how)));
            let Some((idx, how)) = found else {
                break;
            };
            let way = remaining.remove(idx);
            seq.attach(way, how);
        }

        if !seq.closed {
            tracing::debug!(
                ways = ?seq.way_ids(),
                first = %seq.first(),
                last = %seq.last(),
                "Joined ways form an open sequence"
            );
        }
        sequences.push(seq);
    }

    sequences
}
