// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for topology operations.

use osm_topology_core::NodeId;

/// Result type alias for topology operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during topology operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// Lookup or validation failure in the underlying graph.
    #[error(transparent)]
    Core(#[from] osm_topology_core::Error),

    /// Fewer than two distinct ways meet at the vertex.
    #[error("node {0} is not a junction")]
    NotAJunction(NodeId),
}
