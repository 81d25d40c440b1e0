//! # Tangle - Node-graph Data Model
//!
//! Tangle is the data-model core of a node-graph editor: typed ports,
//! directed connections with cardinality rules, group/backdrop container
//! nodes, and a deterministic layered auto-layout. Rendering and input
//! handling are external collaborators that read this model; the model
//! never invokes drawing code.
//!
//! ## Features
//!
//! - **Typed ports**: named input/output ports with single/multi connection
//!   cardinality and opaque rendering hints
//! - **Validated connections**: direction, self-loop, duplicate and cycle
//!   checks at connect time; single-connection inputs use replace semantics
//! - **Containers**: group nodes whose ports proxy to member ports, and
//!   backdrops that wrap nodes visually
//! - **Auto-layout**: longest-path layering with barycenter crossing
//!   reduction, deterministic for a given graph
//! - **Snapshots**: JSON save/load of the full graph state
//!
//! ## Quick Start
//!
//! ```rust
//! use tangle::prelude::*;
//!
//! // Create a graph over the built-in node types
//! let mut graph = NodeGraph::with_registry(NodeRegistry::with_builtins());
//!
//! // Create and connect nodes
//! let source = graph.create_node("basic.source", Some("producer")).unwrap();
//! let process = graph.create_node("basic.process", None).unwrap();
//!
//! let out = graph.node(source).unwrap().output("out_a").unwrap();
//! let inp = graph.node(process).unwrap().input("in_c").unwrap();
//! graph.connect(&out, &inp).unwrap();
//!
//! // Position everything
//! LayoutEngine::new().layout(&mut graph).unwrap();
//! assert_eq!(graph.position(source).unwrap().x, 0.0);
//! ```
//!
//! ## Architecture
//!
//! - [`core`]: port declarations, the node record, error types
//! - [`graph`]: graph structure, containers, topology analysis, layout,
//!   serialization
//! - [`nodes`]: node type registry and built-in templates

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod core;
pub mod graph;
pub mod nodes;

/// Prelude module for convenient imports.
///
/// Import everything commonly needed with:
/// ```rust
/// use tangle::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use crate::core::error::{
        GraphError, GraphResult, LayoutError, LayoutResult, NodeId, TangleError, TangleResult,
    };
    pub use crate::core::node::{Color, Node};
    pub use crate::core::port::{Port, PortDecl, PortDirection, PortRef, PortSelector};

    // Graph
    pub use crate::graph::connection::{Connection, Endpoint};
    pub use crate::graph::container::{Backdrop, Container, GroupBindings, Region};
    pub use crate::graph::layout::LayoutEngine;
    pub use crate::graph::serialization::{SerializedConnection, SerializedGraph, SerializedNode};
    pub use crate::graph::structure::{NodeGraph, NodeOverrides, Position};
    pub use crate::graph::topology::TopologyAnalyzer;

    // Registry
    pub use crate::nodes::registry::{NodeRegistry, NodeTemplate, RegistryEntry};
}

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::prelude::*;

    #[test]
    fn test_version() {
        assert!(!super::VERSION.is_empty());
        assert_eq!(super::NAME, "tangle");
    }

    #[test]
    fn test_basic_graph_creation() {
        let mut graph = NodeGraph::with_registry(NodeRegistry::with_builtins());

        let a = graph.create_node("basic.source", None).unwrap();
        let b = graph.create_node("widget.text", None).unwrap();

        let out = graph.node(a).unwrap().output(0usize).unwrap();
        let inp = graph.node(b).unwrap().input(0usize).unwrap();
        assert!(graph.connect(&out, &inp).is_ok());
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.connection_count(), 1);
    }

    #[test]
    fn test_registry_with_builtins() {
        let registry = NodeRegistry::with_builtins();

        assert!(registry.contains("basic.source"));
        assert!(registry.contains("basic.process"));
        assert!(registry.contains("Backdrop"));
        assert!(!registry.is_empty());
    }
}
