// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the entity model and graph.

use crate::id::{OsmId, WayId};

/// Result type alias for entity and graph operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building entities or resolving ids.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// A referenced entity is missing from the graph snapshot.
    #[error("entity not found: {0}")]
    NotFound(OsmId),

    /// A way needs at least two node references.
    #[error("way {0} has {1} node(s), at least 2 are required")]
    DegenerateWay(WayId, usize),

    /// Coordinates must be finite and within the WGS84 range.
    #[error("invalid coordinate: lon {lon}, lat {lat}")]
    InvalidCoordinate { lon: f64, lat: f64 },

    /// Textual id that is not of the `n1` / `w1` / `r1` form.
    #[error("invalid entity id: {0:?}")]
    InvalidId(String),
}
