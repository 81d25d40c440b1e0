//! Graph serialization for saving and loading.
//!
//! Snapshots are self-contained: node port lists and container data travel
//! with the snapshot, so restoring does not re-run template factories. The
//! registry is attached to the restored graph for subsequent create calls.

use crate::core::error::{GraphError, GraphResult, NodeId};
use crate::core::node::{Color, Node};
use crate::core::port::{PortDecl, PortDirection};
use crate::graph::connection::{Connection, Endpoint};
use crate::graph::container::Container;
use crate::graph::structure::{NodeGraph, Position};
use crate::nodes::registry::NodeRegistry;
use serde::{Deserialize, Serialize};

/// Serializable representation of a graph node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerializedNode {
    /// Node ID
    pub id: NodeId,
    /// Node type ID (registry key)
    pub type_id: String,
    /// Display name
    pub name: String,
    /// Body color
    pub color: Color,
    /// Whether the node is disabled
    pub disabled: bool,
    /// Optional icon reference
    pub icon: Option<String>,
    /// Position in the editor plane
    pub position: Position,
    /// Ordered input port declarations
    pub inputs: Vec<PortDecl>,
    /// Ordered output port declarations
    pub outputs: Vec<PortDecl>,
    /// Container capability, when present
    pub container: Option<Container>,
}

/// Serializable representation of a connection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerializedConnection {
    /// From node ID
    pub from_node: NodeId,
    /// From port name
    pub from_port: String,
    /// To node ID
    pub to_node: NodeId,
    /// To port name
    pub to_port: String,
}

impl From<&Connection> for SerializedConnection {
    fn from(conn: &Connection) -> Self {
        Self {
            from_node: conn.from.node_id,
            from_port: conn.from.port_name.clone(),
            to_node: conn.to.node_id,
            to_port: conn.to.port_name.clone(),
        }
    }
}

impl From<Connection> for SerializedConnection {
    fn from(conn: Connection) -> Self {
        Self::from(&conn)
    }
}

/// Serializable representation of a complete graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerializedGraph {
    /// Snapshot format version
    pub version: String,
    /// All nodes
    pub nodes: Vec<SerializedNode>,
    /// All connections
    pub connections: Vec<SerializedConnection>,
}

impl SerializedGraph {
    /// Current format version.
    pub const VERSION: &'static str = "1.0.0";

    /// Snapshot a graph.
    pub fn from_graph(graph: &NodeGraph) -> Self {
        let nodes = graph
            .nodes()
            .map(|node| SerializedNode {
                id: node.id,
                type_id: node.type_id.clone(),
                name: node.name.clone(),
                color: node.color,
                disabled: node.disabled,
                icon: node.icon.clone(),
                position: graph.position(node.id).unwrap_or_default(),
                inputs: node.inputs().iter().map(|p| p.decl.clone()).collect(),
                outputs: node.outputs().iter().map(|p| p.decl.clone()).collect(),
                container: node.container.clone(),
            })
            .collect();

        let connections = graph.connections().iter().map(Into::into).collect();

        Self {
            version: Self::VERSION.to_string(),
            nodes,
            connections,
        }
    }

    /// Restore a graph from this snapshot, attaching the given registry.
    ///
    /// Every connection endpoint must name a node and port present in the
    /// snapshot; a dangling endpoint fails with `NodeNotFound` or
    /// `PortNotFound`, and a second connection into a single-connection
    /// input fails with `InputOccupied`. Beyond that, connections are
    /// restored verbatim without re-running the connect validation ladder,
    /// so the layout engine's own cycle check is the safety net for
    /// snapshots produced elsewhere.
    pub fn into_graph(self, registry: NodeRegistry) -> GraphResult<NodeGraph> {
        let mut graph = NodeGraph::with_registry(registry);

        for snap in self.nodes {
            let mut node = Node::new(snap.type_id, snap.name).with_id(snap.id);
            node.color = snap.color;
            node.disabled = snap.disabled;
            node.icon = snap.icon;
            node.container = snap.container;
            for decl in snap.inputs.into_iter().chain(snap.outputs) {
                node.add_port(decl)?;
            }
            let id = graph.insert_node(node);
            graph.set_position(id, snap.position)?;
        }

        for conn in self.connections {
            check_endpoint(&graph, conn.from_node, PortDirection::Output, &conn.from_port)?;
            let multi = check_endpoint(&graph, conn.to_node, PortDirection::Input, &conn.to_port)?;

            let to = Endpoint::new(conn.to_node, conn.to_port);
            if !multi && graph.input_source(&to).is_some() {
                return Err(GraphError::InputOccupied {
                    node_id: to.node_id,
                    port: to.port_name,
                });
            }
            graph.restore_connection(Connection::new(
                Endpoint::new(conn.from_node, conn.from_port),
                to,
            ));
        }

        Ok(graph)
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Check that a snapshot endpoint exists; returns the port's multi flag.
fn check_endpoint(
    graph: &NodeGraph,
    node_id: NodeId,
    direction: PortDirection,
    port: &str,
) -> GraphResult<bool> {
    let node = graph.node(node_id)?;
    node.port(direction, port)
        .map(|p| p.is_multi())
        .ok_or_else(|| GraphError::PortNotFound {
            node_id,
            port: port.to_string(),
        })
}
