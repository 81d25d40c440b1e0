//! Graph structure and node management.
//!
//! The NodeGraph is the central data structure that holds all nodes, their
//! connections, and the node type registry. It uses a centralized approach
//! for:
//! - Easy serialization
//! - Graph-wide validation
//! - Deterministic iteration (insertion order = creation order)

use crate::core::error::{GraphError, GraphResult, NodeId};
use crate::core::node::{Color, Node};
use crate::core::port::{PortDirection, PortRef};
use crate::graph::connection::{Connection, Endpoint};
use crate::graph::container::{Backdrop, Container, Region, BACKDROP_MARGIN};
use crate::nodes::registry::NodeRegistry;
use indexmap::IndexMap;
use log::debug;

/// Position of a node in the editor plane.
#[derive(Debug, Clone, Copy, Default, serde::Serialize, serde::Deserialize, PartialEq)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Field overrides applied when creating a node.
#[derive(Debug, Clone, Default)]
pub struct NodeOverrides {
    /// Display name override.
    pub name: Option<String>,
    /// Body color override.
    pub color: Option<Color>,
    /// Icon reference override.
    pub icon: Option<String>,
}

/// The main node-graph structure.
///
/// Owns the node map (IndexMap, so iteration follows creation order), the
/// connection list, per-node positions, and the type registry. Containers
/// and the layout engine hold node ids only; this struct is the single
/// owner of graph state.
#[derive(Debug, Clone)]
pub struct NodeGraph {
    /// All nodes in the graph, indexed by ID.
    nodes: IndexMap<NodeId, Node>,
    /// All connections in the graph, stored as resolved member-port pairs.
    connections: Vec<Connection>,
    /// Node positions, maintained alongside the node map.
    positions: IndexMap<NodeId, Position>,
    /// Node type registry.
    registry: NodeRegistry,
}

impl NodeGraph {
    /// Create a new empty graph with an empty registry.
    pub fn new() -> Self {
        Self::with_registry(NodeRegistry::new())
    }

    /// Create a new empty graph over an existing registry.
    pub fn with_registry(registry: NodeRegistry) -> Self {
        Self {
            nodes: IndexMap::new(),
            connections: Vec::new(),
            positions: IndexMap::new(),
            registry,
        }
    }

    /// The node type registry.
    pub fn registry(&self) -> &NodeRegistry {
        &self.registry
    }

    /// Mutable access to the node type registry.
    pub fn registry_mut(&mut self) -> &mut NodeRegistry {
        &mut self.registry
    }

    // ========================================================================
    // Node Management
    // ========================================================================

    /// Create a node from a registered type and insert it.
    ///
    /// Fails with `UnregisteredType` when the type id is unknown. The new
    /// node gets a fresh unique id; `name` overrides the template's default
    /// display name.
    pub fn create_node(&mut self, type_id: &str, name: Option<&str>) -> GraphResult<NodeId> {
        self.create_node_with(
            type_id,
            NodeOverrides {
                name: name.map(str::to_string),
                ..NodeOverrides::default()
            },
        )
    }

    /// Create a node from a registered type, applying field overrides.
    pub fn create_node_with(
        &mut self,
        type_id: &str,
        overrides: NodeOverrides,
    ) -> GraphResult<NodeId> {
        let mut node = self.registry.create(type_id)?;

        if let Some(name) = overrides.name {
            node.name = name;
        }
        if let Some(color) = overrides.color {
            node.color = color;
        }
        if let Some(icon) = overrides.icon {
            node.icon = Some(icon);
        }

        Ok(self.insert_node(node))
    }

    /// Insert an already-built node, returning its id.
    pub fn insert_node(&mut self, node: Node) -> NodeId {
        let id = node.id;
        debug!("insert node {} ({})", id, node.type_id);
        self.nodes.insert(id, node);
        self.positions.insert(id, Position::default());
        id
    }

    /// Remove a node from the graph.
    ///
    /// Also removes every connection touching it and drops the node from
    /// group binding tables and backdrop member sets. Re-removal fails with
    /// `NodeNotFound`.
    pub fn remove_node(&mut self, id: NodeId) -> GraphResult<Node> {
        let node = self
            .nodes
            .shift_remove(&id)
            .ok_or(GraphError::NodeNotFound(id))?;

        let before = self.connections.len();
        self.connections.retain(|conn| !conn.touches(id));
        self.positions.shift_remove(&id);
        for other in self.nodes.values_mut() {
            match other.container {
                Some(Container::Group(ref mut bindings)) => bindings.remove_member(id),
                Some(Container::Backdrop(ref mut backdrop)) => {
                    backdrop.members.retain(|m| *m != id)
                }
                None => {}
            }
        }
        debug!(
            "removed node {} and {} connection(s)",
            id,
            before - self.connections.len()
        );
        Ok(node)
    }

    /// Get a reference to a node.
    pub fn node(&self, id: NodeId) -> GraphResult<&Node> {
        self.nodes.get(&id).ok_or(GraphError::NodeNotFound(id))
    }

    /// Get a mutable reference to a node.
    pub fn node_mut(&mut self, id: NodeId) -> GraphResult<&mut Node> {
        self.nodes.get_mut(&id).ok_or(GraphError::NodeNotFound(id))
    }

    /// Check if a node exists.
    pub fn has_node(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// All nodes in creation order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// All node IDs in creation order.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.keys().copied()
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Ids of currently disabled nodes, in creation order.
    pub fn disabled_nodes(&self) -> Vec<NodeId> {
        self.nodes
            .values()
            .filter(|n| n.disabled)
            .map(|n| n.id)
            .collect()
    }

    // ========================================================================
    // Positions
    // ========================================================================

    /// Current position of a node.
    pub fn position(&self, id: NodeId) -> GraphResult<Position> {
        self.positions
            .get(&id)
            .copied()
            .ok_or(GraphError::NodeNotFound(id))
    }

    /// Move a node.
    pub fn set_position(&mut self, id: NodeId, position: Position) -> GraphResult<()> {
        if !self.nodes.contains_key(&id) {
            return Err(GraphError::NodeNotFound(id));
        }
        self.positions.insert(id, position);
        Ok(())
    }

    // ========================================================================
    // Connection Management
    // ========================================================================

    /// Create a connection from an output port into an input port.
    ///
    /// Group ports are resolved through their binding tables before any
    /// check runs, so the connection list only ever stores member-port
    /// pairs. A single-connection input that is already wired has its
    /// existing connection removed atomically before the new one is added
    /// (replace semantics). The edge is rejected with `CyclicGraph` if it
    /// would close a cycle.
    pub fn connect(&mut self, from: &PortRef, to: &PortRef) -> GraphResult<Connection> {
        let from = self.resolve_port(from)?;
        let to = self.resolve_port(to)?;

        if from.direction != PortDirection::Output || to.direction != PortDirection::Input {
            return Err(GraphError::InvalidDirection {
                from: from.direction,
                to: to.direction,
            });
        }

        if from.node_id == to.node_id {
            return Err(GraphError::SelfConnection(from.node_id));
        }

        // Existence checks on the resolved ports
        let to_multi = self.port_exists(&to)?;
        self.port_exists(&from)?;

        let connection = Connection::new(
            Endpoint::new(from.node_id, from.name.clone()),
            Endpoint::new(to.node_id, to.name.clone()),
        );

        if self.connections.contains(&connection) {
            return Err(GraphError::DuplicateConnection {
                from_node: from.node_id,
                from_port: from.name,
                to_node: to.node_id,
                to_port: to.name,
            });
        }

        if self.would_create_cycle(from.node_id, to.node_id) {
            return Err(GraphError::CyclicGraph {
                from: from.node_id,
                to: to.node_id,
            });
        }

        // Replace semantics for single-connection inputs: the existing
        // connection goes away in the same operation that adds the new one.
        if !to_multi {
            if let Some(old) = self.input_source(&connection.to).cloned() {
                debug!("replacing {} with {}", old, connection);
                self.connections.retain(|c| *c != old);
            }
        }

        self.connections.push(connection.clone());
        Ok(connection)
    }

    /// Remove the connection between the two ports if present.
    ///
    /// A missing pair is a successful no-op, so repeated disconnect
    /// gestures stay idempotent. Returns whether a connection was removed.
    pub fn disconnect(&mut self, from: &PortRef, to: &PortRef) -> bool {
        // Best-effort group resolution; an unresolvable port cannot name an
        // existing connection, so that also ends as a no-op.
        let from = self.resolve_port(from).unwrap_or_else(|_| from.clone());
        let to = self.resolve_port(to).unwrap_or_else(|_| to.clone());

        let target = Connection::new(
            Endpoint::new(from.node_id, from.name),
            Endpoint::new(to.node_id, to.name),
        );

        let before = self.connections.len();
        self.connections.retain(|c| *c != target);
        before != self.connections.len()
    }

    /// Push a connection verbatim when restoring a snapshot.
    ///
    /// Skips the connect validation ladder; callers are the snapshot layer
    /// only, which has already checked endpoint existence.
    pub(crate) fn restore_connection(&mut self, connection: Connection) {
        if !self.connections.contains(&connection) {
            self.connections.push(connection);
        }
    }

    /// All connections, in creation order.
    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    /// Number of connections.
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// All connections leaving a node.
    pub fn connections_from(&self, node_id: NodeId) -> impl Iterator<Item = &Connection> {
        self.connections
            .iter()
            .filter(move |c| c.from.node_id == node_id)
    }

    /// All connections entering a node.
    pub fn connections_to(&self, node_id: NodeId) -> impl Iterator<Item = &Connection> {
        self.connections
            .iter()
            .filter(move |c| c.to.node_id == node_id)
    }

    /// Whether an input port has at least one incoming connection.
    pub fn is_input_connected(&self, node_id: NodeId, port: &str) -> bool {
        self.input_source(&Endpoint::new(node_id, port)).is_some()
    }

    /// The connection currently feeding an input endpoint, if any.
    pub fn input_source(&self, to: &Endpoint) -> Option<&Connection> {
        self.connections.iter().find(|c| c.to == *to)
    }

    // ========================================================================
    // Group / Backdrop Containers
    // ========================================================================

    /// Bind a group port to a member port.
    ///
    /// The group port must be declared on the group node and the member port
    /// must exist with the same direction. Connections aimed at the group
    /// port afterwards land on the member port.
    pub fn bind_group_port(
        &mut self,
        group_id: NodeId,
        group_port: &str,
        member: PortRef,
    ) -> GraphResult<()> {
        // Validate member side first; the bindings borrow comes later.
        self.port_exists(&member)?;

        let group = self.node(group_id)?;
        if !group.is_group() {
            return Err(GraphError::NotAGroup(group_id));
        }
        let declared = group
            .port(PortDirection::Input, group_port)
            .or_else(|| group.port(PortDirection::Output, group_port))
            .ok_or_else(|| GraphError::PortNotFound {
                node_id: group_id,
                port: group_port.to_string(),
            })?;
        if declared.direction() != member.direction {
            return Err(GraphError::InvalidDirection {
                from: declared.direction(),
                to: member.direction,
            });
        }

        match self.node_mut(group_id)?.container {
            Some(Container::Group(ref mut bindings)) => {
                bindings.bind(group_port, member);
                Ok(())
            }
            _ => Err(GraphError::NotAGroup(group_id)),
        }
    }

    /// Wrap nodes in a backdrop.
    ///
    /// Records the member set (replacing any previous one) and computes the
    /// bounding region of the members' current positions plus a margin.
    /// Member nodes are not moved and connections are untouched.
    pub fn wrap_nodes(&mut self, backdrop_id: NodeId, members: &[NodeId]) -> GraphResult<Region> {
        let mut positions = Vec::with_capacity(members.len());
        for &member in members {
            positions.push(self.position(member)?);
        }
        let region = Region::enclosing(&positions, BACKDROP_MARGIN);

        let node = self.node_mut(backdrop_id)?;
        match node.container {
            Some(Container::Backdrop(ref mut backdrop)) => {
                *backdrop = Backdrop {
                    members: members.to_vec(),
                    region,
                };
                Ok(region)
            }
            _ => Err(GraphError::NotABackdrop(backdrop_id)),
        }
    }

    /// Resolve a port reference through group indirection.
    ///
    /// Group ports are followed until a non-group member port is reached,
    /// so a group bound to another group's port still resolves to the
    /// innermost member. A declared but unbound group port fails with
    /// `PortNotBound`, as does a binding chain that loops back on itself.
    /// Non-group references come back unchanged.
    fn resolve_port(&self, port: &PortRef) -> GraphResult<PortRef> {
        let mut current = port.clone();
        let mut seen: Vec<PortRef> = Vec::new();

        loop {
            let node = self.node(current.node_id)?;
            let Some(Container::Group(bindings)) = &node.container else {
                return Ok(current);
            };

            // The group must actually declare the port being addressed.
            if node.port(current.direction, &current.name).is_none() {
                return Err(GraphError::PortNotFound {
                    node_id: current.node_id,
                    port: current.name,
                });
            }
            if seen.contains(&current) {
                return Err(GraphError::PortNotBound {
                    node_id: current.node_id,
                    port: current.name,
                });
            }

            let member = bindings
                .resolve(&current.name)
                .cloned()
                .ok_or_else(|| GraphError::PortNotBound {
                    node_id: current.node_id,
                    port: current.name.clone(),
                })?;
            seen.push(current);
            current = member;
        }
    }

    /// Check that a resolved port exists; returns its multi flag.
    fn port_exists(&self, port: &PortRef) -> GraphResult<bool> {
        let node = self.node(port.node_id)?;
        node.port(port.direction, &port.name)
            .map(|p| p.is_multi())
            .ok_or_else(|| GraphError::PortNotFound {
                node_id: port.node_id,
                port: port.name.clone(),
            })
    }

    // ========================================================================
    // Graph Analysis
    // ========================================================================

    /// Check if adding an edge from_node -> to_node would create a cycle.
    fn would_create_cycle(&self, from_node: NodeId, to_node: NodeId) -> bool {
        // If from_node is reachable from to_node, the new edge closes a loop
        self.is_reachable(to_node, from_node)
    }

    /// Check if `target` is reachable from `start` following connections.
    pub fn is_reachable(&self, start: NodeId, target: NodeId) -> bool {
        if start == target {
            return true;
        }

        let mut visited = std::collections::HashSet::new();
        let mut queue = std::collections::VecDeque::new();
        queue.push_back(start);

        while let Some(current) = queue.pop_front() {
            if current == target {
                return true;
            }

            if visited.insert(current) {
                for conn in self.connections_from(current) {
                    queue.push_back(conn.to.node_id);
                }
            }
        }

        false
    }

    /// All nodes downstream of the given node (its descendants).
    pub fn downstream(&self, node_id: NodeId) -> Vec<NodeId> {
        self.walk(node_id, |g, id| {
            g.connections_from(id).map(|c| c.to.node_id).collect()
        })
    }

    /// All nodes upstream of the given node (its ancestors).
    pub fn upstream(&self, node_id: NodeId) -> Vec<NodeId> {
        self.walk(node_id, |g, id| {
            g.connections_to(id).map(|c| c.from.node_id).collect()
        })
    }

    fn walk(&self, start: NodeId, next: impl Fn(&Self, NodeId) -> Vec<NodeId>) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut visited = std::collections::HashSet::new();
        let mut queue: std::collections::VecDeque<NodeId> = next(self, start).into();

        while let Some(current) = queue.pop_front() {
            if visited.insert(current) {
                result.push(current);
                queue.extend(next(self, current));
            }
        }

        result
    }

    /// Nodes with no incoming connections, in creation order.
    pub fn source_nodes(&self) -> Vec<NodeId> {
        self.nodes
            .keys()
            .filter(|&id| !self.connections.iter().any(|c| c.to.node_id == *id))
            .copied()
            .collect()
    }

    /// Nodes with no outgoing connections, in creation order.
    pub fn sink_nodes(&self) -> Vec<NodeId> {
        self.nodes
            .keys()
            .filter(|&id| !self.connections.iter().any(|c| c.from.node_id == *id))
            .copied()
            .collect()
    }

    /// Check if the graph is empty.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Clear all nodes and connections. The registry is kept.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.connections.clear();
        self.positions.clear();
    }
}

impl Default for NodeGraph {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::container::GroupBindings;

    fn relay() -> Node {
        let mut node = Node::new("test.relay", "relay");
        node.add_input("in").unwrap();
        node.add_output("out").unwrap();
        node
    }

    fn connect_chain(graph: &mut NodeGraph, from: NodeId, to: NodeId) {
        let from_port = graph.node(from).unwrap().output("out").unwrap();
        let to_port = graph.node(to).unwrap().input("in").unwrap();
        graph.connect(&from_port, &to_port).unwrap();
    }

    #[test]
    fn test_add_remove_node() {
        let mut graph = NodeGraph::new();

        let id = graph.insert_node(relay());
        assert_eq!(graph.node_count(), 1);
        assert!(graph.has_node(id));
        assert_eq!(graph.position(id).unwrap(), Position::default());

        graph.remove_node(id).unwrap();
        assert_eq!(graph.node_count(), 0);
        assert!(matches!(
            graph.remove_node(id),
            Err(GraphError::NodeNotFound(_))
        ));
    }

    #[test]
    fn test_connect_and_disconnect() {
        let mut graph = NodeGraph::new();
        let a = graph.insert_node(relay());
        let b = graph.insert_node(relay());

        let out = PortRef::output(a, "out");
        let inp = PortRef::input(b, "in");
        graph.connect(&out, &inp).unwrap();
        assert_eq!(graph.connection_count(), 1);
        assert!(graph.is_input_connected(b, "in"));

        assert!(graph.disconnect(&out, &inp));
        assert_eq!(graph.connection_count(), 0);

        // Second disconnect is a successful no-op
        assert!(!graph.disconnect(&out, &inp));
    }

    #[test]
    fn test_duplicate_connection_rejected() {
        let mut graph = NodeGraph::new();
        let a = graph.insert_node(relay());
        let b = graph.insert_node(relay());

        let out = PortRef::output(a, "out");
        let inp = PortRef::input(b, "in");
        graph.connect(&out, &inp).unwrap();

        let err = graph.connect(&out, &inp).unwrap_err();
        assert!(matches!(err, GraphError::DuplicateConnection { .. }));
        assert_eq!(graph.connection_count(), 1);
    }

    #[test]
    fn test_invalid_direction_and_self_connection() {
        let mut graph = NodeGraph::new();
        let a = graph.insert_node(relay());
        let b = graph.insert_node(relay());

        let err = graph
            .connect(&PortRef::input(b, "in"), &PortRef::output(a, "out"))
            .unwrap_err();
        assert!(matches!(err, GraphError::InvalidDirection { .. }));

        let err = graph
            .connect(&PortRef::output(a, "out"), &PortRef::input(a, "in"))
            .unwrap_err();
        assert_eq!(err, GraphError::SelfConnection(a));
    }

    #[test]
    fn test_single_input_replace_semantics() {
        let mut graph = NodeGraph::new();
        let a = graph.insert_node(relay());
        let b = graph.insert_node(relay());
        let c = graph.insert_node(relay());

        let target = PortRef::input(c, "in");
        graph.connect(&PortRef::output(a, "out"), &target).unwrap();
        graph.connect(&PortRef::output(b, "out"), &target).unwrap();

        // Exactly one incoming connection, pointing at the newest output
        let incoming: Vec<_> = graph.connections_to(c).collect();
        assert_eq!(incoming.len(), 1);
        assert_eq!(incoming[0].from.node_id, b);
    }

    #[test]
    fn test_multi_input_accumulates() {
        let mut graph = NodeGraph::new();
        let a = graph.insert_node(relay());
        let b = graph.insert_node(relay());

        let mut merge = Node::new("test.merge", "merge");
        merge.add_input_multi("in").unwrap();
        let m = graph.insert_node(merge);

        let target = PortRef::input(m, "in");
        graph.connect(&PortRef::output(a, "out"), &target).unwrap();
        graph.connect(&PortRef::output(b, "out"), &target).unwrap();

        assert_eq!(graph.connections_to(m).count(), 2);
    }

    #[test]
    fn test_remove_node_cascades_connections() {
        let mut graph = NodeGraph::new();
        let a = graph.insert_node(relay());
        let b = graph.insert_node(relay());
        let c = graph.insert_node(relay());
        connect_chain(&mut graph, a, b);
        connect_chain(&mut graph, b, c);

        graph.remove_node(b).unwrap();
        assert_eq!(graph.connection_count(), 0);
        assert!(!graph.connections().iter().any(|conn| conn.touches(b)));
    }

    #[test]
    fn test_remove_node_prunes_container_references() {
        let mut graph = NodeGraph::new();
        let member = graph.insert_node(relay());
        let feeder = graph.insert_node(relay());

        let mut group = Node::new("group.relay", "group").with_container(
            Container::Group(GroupBindings::new()),
        );
        group.add_input("in").unwrap();
        let g = graph.insert_node(group);
        graph
            .bind_group_port(g, "in", PortRef::input(member, "in"))
            .unwrap();

        let backdrop =
            Node::new("backdrop", "backdrop").with_container(Container::Backdrop(Backdrop::default()));
        let bd = graph.insert_node(backdrop);
        graph.wrap_nodes(bd, &[member, feeder]).unwrap();

        graph.remove_node(member).unwrap();

        // The binding fell away with the member, so its port is unbound again
        let err = graph
            .connect(&PortRef::output(feeder, "out"), &PortRef::input(g, "in"))
            .unwrap_err();
        assert!(matches!(err, GraphError::PortNotBound { .. }));

        match &graph.node(bd).unwrap().container {
            Some(Container::Backdrop(data)) => assert_eq!(data.members, vec![feeder]),
            other => panic!("expected backdrop container, got {:?}", other),
        }
    }

    #[test]
    fn test_cycle_rejected_at_connect() {
        let mut graph = NodeGraph::new();
        let a = graph.insert_node(relay());
        let b = graph.insert_node(relay());
        let c = graph.insert_node(relay());
        connect_chain(&mut graph, a, b);
        connect_chain(&mut graph, b, c);

        let err = graph
            .connect(&PortRef::output(c, "out"), &PortRef::input(a, "in"))
            .unwrap_err();
        assert!(matches!(err, GraphError::CyclicGraph { .. }));
    }

    #[test]
    fn test_rewire_across_chain() {
        // a -> b -> c; rewiring c's input to come straight from a replaces
        // the b -> c edge and leaves the graph acyclic.
        let mut graph = NodeGraph::new();
        let a = graph.insert_node(relay());
        let b = graph.insert_node(relay());
        let c = graph.insert_node(relay());
        connect_chain(&mut graph, a, b);
        connect_chain(&mut graph, b, c);

        graph
            .connect(&PortRef::output(a, "out"), &PortRef::input(c, "in"))
            .unwrap();
        let incoming: Vec<_> = graph.connections_to(c).collect();
        assert_eq!(incoming.len(), 1);
        assert_eq!(incoming[0].from.node_id, a);
    }

    #[test]
    fn test_upstream_downstream() {
        let mut graph = NodeGraph::new();
        let a = graph.insert_node(relay());
        let b = graph.insert_node(relay());
        let c = graph.insert_node(relay());
        connect_chain(&mut graph, a, b);
        connect_chain(&mut graph, b, c);

        let down = graph.downstream(a);
        assert_eq!(down.len(), 2);
        assert!(down.contains(&b) && down.contains(&c));

        let up = graph.upstream(c);
        assert_eq!(up.len(), 2);
        assert!(up.contains(&a) && up.contains(&b));

        assert_eq!(graph.source_nodes(), vec![a]);
        assert_eq!(graph.sink_nodes(), vec![c]);
    }

    #[test]
    fn test_group_port_pass_through() {
        let mut graph = NodeGraph::new();
        let member = graph.insert_node(relay());
        let feeder = graph.insert_node(relay());

        let mut group = Node::new("group.relay", "group").with_container(
            Container::Group(GroupBindings::new()),
        );
        group.add_input("in").unwrap();
        let g = graph.insert_node(group);

        graph
            .bind_group_port(g, "in", PortRef::input(member, "in"))
            .unwrap();

        graph
            .connect(&PortRef::output(feeder, "out"), &PortRef::input(g, "in"))
            .unwrap();

        // Connection is stored against the member port, not the group shell
        let conn = &graph.connections()[0];
        assert_eq!(conn.to.node_id, member);
        assert_eq!(conn.to.port_name, "in");
        assert_eq!(graph.connections_to(g).count(), 0);
    }

    #[test]
    fn test_nested_groups_resolve_to_member() {
        let mut graph = NodeGraph::new();
        let member = graph.insert_node(relay());
        let feeder = graph.insert_node(relay());

        let mut inner = Node::new("group.relay", "inner").with_container(
            Container::Group(GroupBindings::new()),
        );
        inner.add_input("in").unwrap();
        let inner = graph.insert_node(inner);

        let mut outer = Node::new("group.relay", "outer").with_container(
            Container::Group(GroupBindings::new()),
        );
        outer.add_input("in").unwrap();
        let outer = graph.insert_node(outer);

        graph
            .bind_group_port(inner, "in", PortRef::input(member, "in"))
            .unwrap();
        graph
            .bind_group_port(outer, "in", PortRef::input(inner, "in"))
            .unwrap();

        graph
            .connect(&PortRef::output(feeder, "out"), &PortRef::input(outer, "in"))
            .unwrap();

        // Resolution walks the whole chain; neither group shell appears in
        // the connection list
        let conn = &graph.connections()[0];
        assert_eq!(conn.to.node_id, member);
        assert_eq!(graph.connections_to(inner).count(), 0);
        assert_eq!(graph.connections_to(outer).count(), 0);
    }

    #[test]
    fn test_group_binding_loop_is_unresolvable() {
        let mut graph = NodeGraph::new();
        let feeder = graph.insert_node(relay());

        let mut group = Node::new("group.relay", "group").with_container(
            Container::Group(GroupBindings::new()),
        );
        group.add_input("in").unwrap();
        let g = graph.insert_node(group);

        // A group port bound to itself never reaches a member port
        graph
            .bind_group_port(g, "in", PortRef::input(g, "in"))
            .unwrap();

        let err = graph
            .connect(&PortRef::output(feeder, "out"), &PortRef::input(g, "in"))
            .unwrap_err();
        assert!(matches!(err, GraphError::PortNotBound { .. }));
    }

    #[test]
    fn test_bind_group_port_direction_mismatch() {
        let mut graph = NodeGraph::new();
        let member = graph.insert_node(relay());

        let mut group = Node::new("group.relay", "group").with_container(
            Container::Group(GroupBindings::new()),
        );
        group.add_input("in").unwrap();
        let g = graph.insert_node(group);

        // Group input must bind to a member input, not output
        let err = graph
            .bind_group_port(g, "in", PortRef::output(member, "out"))
            .unwrap_err();
        assert!(matches!(err, GraphError::InvalidDirection { .. }));

        let plain = graph.insert_node(relay());
        let err = graph
            .bind_group_port(plain, "in", PortRef::input(member, "in"))
            .unwrap_err();
        assert_eq!(err, GraphError::NotAGroup(plain));
    }

    #[test]
    fn test_unbound_group_port() {
        let mut graph = NodeGraph::new();
        let feeder = graph.insert_node(relay());

        let mut group = Node::new("group.relay", "group").with_container(
            Container::Group(GroupBindings::new()),
        );
        group.add_input("in").unwrap();
        let g = graph.insert_node(group);

        let err = graph
            .connect(&PortRef::output(feeder, "out"), &PortRef::input(g, "in"))
            .unwrap_err();
        assert!(matches!(err, GraphError::PortNotBound { .. }));
    }

    #[test]
    fn test_wrap_nodes() {
        let mut graph = NodeGraph::new();
        let a = graph.insert_node(relay());
        let b = graph.insert_node(relay());
        graph.set_position(a, Position::new(0.0, 0.0)).unwrap();
        graph.set_position(b, Position::new(200.0, 100.0)).unwrap();

        let backdrop =
            Node::new("backdrop", "backdrop").with_container(Container::Backdrop(Backdrop::default()));
        let bd = graph.insert_node(backdrop);

        let region = graph.wrap_nodes(bd, &[a, b]).unwrap();
        assert_eq!(region.x, -BACKDROP_MARGIN);
        assert_eq!(region.width, 200.0 + 2.0 * BACKDROP_MARGIN);

        match &graph.node(bd).unwrap().container {
            Some(Container::Backdrop(data)) => assert_eq!(data.members, vec![a, b]),
            other => panic!("expected backdrop container, got {:?}", other),
        }

        // Membership is advisory: members connect as usual
        connect_chain(&mut graph, a, b);
        assert_eq!(graph.connection_count(), 1);

        // Re-wrapping replaces the member set
        graph.wrap_nodes(bd, &[b]).unwrap();
        match &graph.node(bd).unwrap().container {
            Some(Container::Backdrop(data)) => assert_eq!(data.members, vec![b]),
            other => panic!("expected backdrop container, got {:?}", other),
        }
    }

    #[test]
    fn test_wrap_requires_backdrop() {
        let mut graph = NodeGraph::new();
        let a = graph.insert_node(relay());
        let plain = graph.insert_node(relay());

        let err = graph.wrap_nodes(plain, &[a]).unwrap_err();
        assert_eq!(err, GraphError::NotABackdrop(plain));
    }
}
