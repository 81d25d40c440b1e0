//! Core types for the Tangle node-graph model.
//!
//! This module contains the foundational types that make up the graph:
//! - Port declarations and references
//! - The node record and color type
//! - Error types

pub mod error;
pub mod node;
pub mod port;

// Re-export commonly used types
pub use error::{GraphError, GraphResult, LayoutError, NodeId, TangleError, TangleResult};
pub use node::{Color, Node};
pub use port::{Port, PortDecl, PortDirection, PortRef, PortSelector};
