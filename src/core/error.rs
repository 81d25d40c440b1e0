//! Error types for Tangle.
//!
//! Uses thiserror for structured errors with context. Errors are designed to:
//! - Be serializable for sending to a frontend
//! - Include actionable information (which node, which port)
//! - Stay local and synchronous; nothing here is retried

use crate::core::port::PortDirection;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// Unique identifier for a node in the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub Uuid);

impl NodeId {
    /// Create a new random node ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a node ID from a UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", &self.0.to_string()[..8])
    }
}

/// Top-level error type for Tangle.
///
/// This enum encompasses all error categories and enables automatic
/// conversion from the specific error types.
#[derive(Error, Debug)]
pub enum TangleError {
    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),

    #[error("Layout error: {0}")]
    Layout(#[from] LayoutError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

/// Errors related to graph structure and operations.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GraphError {
    #[error("Node {0} not found")]
    NodeNotFound(NodeId),

    #[error("Port '{name}' already exists on the {direction} side of node {node_id}")]
    DuplicatePortName {
        node_id: NodeId,
        direction: PortDirection,
        name: String,
    },

    #[error("Port '{port}' not found on node {node_id}")]
    PortNotFound { node_id: NodeId, port: String },

    #[error("Connection must run from an output port into an input port, got {from} -> {to}")]
    InvalidDirection {
        from: PortDirection,
        to: PortDirection,
    },

    #[error("Cannot connect node {0} to itself")]
    SelfConnection(NodeId),

    #[error("Connection {from_node}.{from_port} -> {to_node}.{to_port} already exists")]
    DuplicateConnection {
        from_node: NodeId,
        from_port: String,
        to_node: NodeId,
        to_port: String,
    },

    #[error("Input port '{port}' on node {node_id} accepts a single connection")]
    InputOccupied { node_id: NodeId, port: String },

    #[error("Node type '{0}' is not registered")]
    UnregisteredType(String),

    #[error("Node type '{0}' is already registered")]
    DuplicateTypeIdentifier(String),

    #[error("Connection would create a cycle through nodes {from} and {to}")]
    CyclicGraph { from: NodeId, to: NodeId },

    #[error("Group port '{port}' on node {node_id} has no member binding")]
    PortNotBound { node_id: NodeId, port: String },

    #[error("Node {0} is not a group node")]
    NotAGroup(NodeId),

    #[error("Node {0} is not a backdrop node")]
    NotABackdrop(NodeId),
}

/// Errors from the layout engine.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LayoutError {
    #[error("Cannot layer a cyclic graph; unresolved nodes: {nodes:?}")]
    CyclicGraph { nodes: Vec<NodeId> },
}

/// Result type alias for Tangle operations.
pub type TangleResult<T> = Result<T, TangleError>;

/// Result type alias for graph operations.
pub type GraphResult<T> = Result<T, GraphError>;

/// Result type alias for layout operations.
pub type LayoutResult<T> = Result<T, LayoutError>;
