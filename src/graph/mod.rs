//! Graph module: structure, connections, containers, topology and layout.
//!
//! The node graph is a directed acyclic graph where nodes expose named
//! ports and edges run from output ports into input ports.

pub mod connection;
pub mod container;
pub mod layout;
pub mod serialization;
pub mod structure;
pub mod topology;

// Re-export commonly used types
pub use connection::{Connection, Endpoint};
pub use container::{Backdrop, Container, GroupBindings, Region};
pub use layout::LayoutEngine;
pub use structure::{NodeGraph, NodeOverrides, Position};
pub use topology::TopologyAnalyzer;
