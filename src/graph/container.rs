//! Container capabilities: group pass-through and backdrop wrapping.
//!
//! Containers are data attached to a base node record, not subclasses. A
//! group holds an indirection table from its own port names to member ports;
//! the graph resolves through that table before any connection check runs,
//! so the connection list only ever stores resolved member-port pairs. A
//! backdrop holds an advisory member set and a bounding region.

use crate::core::error::NodeId;
use crate::core::port::PortRef;
use crate::graph::structure::Position;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Margin added around member nodes when a backdrop wraps them.
pub const BACKDROP_MARGIN: f64 = 40.0;

/// Container capability attached to a node.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Container {
    /// Ports on the container proxy to ports on member nodes.
    Group(GroupBindings),
    /// Purely visual grouping; no port semantics.
    Backdrop(Backdrop),
}

/// Indirection table from group port names to member ports.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct GroupBindings {
    bindings: IndexMap<String, PortRef>,
}

impl GroupBindings {
    /// Create an empty binding table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a group port name to a member port. Rebinding replaces the
    /// previous target.
    pub fn bind(&mut self, group_port: impl Into<String>, member: PortRef) {
        self.bindings.insert(group_port.into(), member);
    }

    /// Resolve a group port name to its member port.
    pub fn resolve(&self, group_port: &str) -> Option<&PortRef> {
        self.bindings.get(group_port)
    }

    /// Drop every binding that targets the given node.
    pub fn remove_member(&mut self, node_id: NodeId) {
        self.bindings.retain(|_, member| member.node_id != node_id);
    }

    /// Iterate over all bindings in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PortRef)> {
        self.bindings.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Member node ids referenced by the bindings.
    pub fn member_ids(&self) -> Vec<NodeId> {
        let mut ids: Vec<NodeId> = Vec::new();
        for member in self.bindings.values() {
            if !ids.contains(&member.node_id) {
                ids.push(member.node_id);
            }
        }
        ids
    }
}

/// Backdrop state: advisory membership plus the wrapped region.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Backdrop {
    /// Member node ids; membership never affects connection validity.
    pub members: Vec<NodeId>,
    /// Bounding region computed at wrap time.
    pub region: Region,
}

/// Axis-aligned bounding region.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Region {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Region {
    /// Compute the region enclosing the given positions plus a margin.
    ///
    /// Returns the default (empty) region when no positions are supplied.
    pub fn enclosing(positions: &[Position], margin: f64) -> Self {
        let Some(first) = positions.first() else {
            return Self::default();
        };

        let mut min_x = first.x;
        let mut min_y = first.y;
        let mut max_x = first.x;
        let mut max_y = first.y;
        for pos in &positions[1..] {
            min_x = min_x.min(pos.x);
            min_y = min_y.min(pos.y);
            max_x = max_x.max(pos.x);
            max_y = max_y.max(pos.y);
        }

        Self {
            x: min_x - margin,
            y: min_y - margin,
            width: (max_x - min_x) + 2.0 * margin,
            height: (max_y - min_y) + 2.0 * margin,
        }
    }
}
