//! Connection types for the graph.
//!
//! A connection is identified by its (output, input) endpoint pair; the
//! connection list never holds two identical pairs.

use crate::core::error::NodeId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An endpoint of a connection (node + port).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Endpoint {
    /// The node ID.
    pub node_id: NodeId,
    /// The port name on that node.
    pub port_name: String,
}

impl Endpoint {
    /// Create a new endpoint.
    pub fn new(node_id: NodeId, port_name: impl Into<String>) -> Self {
        Self {
            node_id,
            port_name: port_name.into(),
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.node_id, self.port_name)
    }
}

/// A directed connection from an output port to an input port.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Connection {
    /// Source endpoint (output port).
    pub from: Endpoint,
    /// Target endpoint (input port).
    pub to: Endpoint,
}

impl Connection {
    /// Create a new connection.
    pub fn new(from: Endpoint, to: Endpoint) -> Self {
        Self { from, to }
    }

    /// Whether either endpoint belongs to the given node.
    pub fn touches(&self, node_id: NodeId) -> bool {
        self.from.node_id == node_id || self.to.node_id == node_id
    }
}

impl fmt::Display for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.from, self.to)
    }
}
