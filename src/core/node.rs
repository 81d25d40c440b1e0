//! Node record and color type.
//!
//! A node is a plain record: identity, type id, display state, and its
//! ordered input/output ports. Group and backdrop behavior is composed onto
//! the record through the optional container capability rather than through
//! a subclass chain.

use crate::core::error::{GraphError, GraphResult, NodeId};
use crate::core::port::{Port, PortDecl, PortDirection, PortRef, PortSelector};
use crate::graph::container::Container;
use serde::{Deserialize, Serialize};

/// RGB color value.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    /// Create a color from RGB components.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse a hex color string.
    ///
    /// Supports formats: "#RGB", "#RRGGBB"
    pub fn from_hex(hex: &str) -> Result<Self, String> {
        let hex = hex.trim_start_matches('#');
        if !hex.is_ascii() {
            return Err(format!("Invalid hex color: #{}", hex));
        }

        match hex.len() {
            3 => {
                let r = u8::from_str_radix(&hex[0..1], 16).map_err(|e| e.to_string())? * 17;
                let g = u8::from_str_radix(&hex[1..2], 16).map_err(|e| e.to_string())? * 17;
                let b = u8::from_str_radix(&hex[2..3], 16).map_err(|e| e.to_string())? * 17;
                Ok(Self::rgb(r, g, b))
            }
            6 => {
                let r = u8::from_str_radix(&hex[0..2], 16).map_err(|e| e.to_string())?;
                let g = u8::from_str_radix(&hex[2..4], 16).map_err(|e| e.to_string())?;
                let b = u8::from_str_radix(&hex[4..6], 16).map_err(|e| e.to_string())?;
                Ok(Self::rgb(r, g, b))
            }
            _ => Err(format!("Invalid hex color: #{}", hex)),
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        // Neutral grey, matches an unstyled node in most renderers
        Self::rgb(60, 60, 60)
    }
}

/// A node instance in the graph.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Node {
    /// Unique identifier, assigned at creation.
    pub id: NodeId,
    /// Type identifier used for registry lookup (e.g. "basic.source").
    pub type_id: String,
    /// Display name; mutable and not required to be unique.
    pub name: String,
    /// Node body color.
    pub color: Color,
    /// Disabled nodes are excluded from layout layering.
    pub disabled: bool,
    /// Optional icon reference (path or resource key, renderer-owned).
    pub icon: Option<String>,
    /// Ordered input ports.
    inputs: Vec<Port>,
    /// Ordered output ports.
    outputs: Vec<Port>,
    /// Group or backdrop capability, when this node is a container.
    pub container: Option<Container>,
}

impl Node {
    /// Create a new node of the given type with a fresh id.
    pub fn new(type_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: NodeId::new(),
            type_id: type_id.into(),
            name: name.into(),
            color: Color::default(),
            disabled: false,
            icon: None,
            inputs: Vec::new(),
            outputs: Vec::new(),
            container: None,
        }
    }

    /// Create with a specific ID (used when restoring snapshots).
    pub fn with_id(mut self, id: NodeId) -> Self {
        self.id = id;
        self
    }

    /// Attach a container capability.
    pub fn with_container(mut self, container: Container) -> Self {
        self.container = Some(container);
        self
    }

    // ========================================================================
    // Port Management
    // ========================================================================

    /// Append a port from a full declaration.
    pub fn add_port(&mut self, decl: PortDecl) -> GraphResult<PortRef> {
        let side = match decl.direction {
            PortDirection::Input => &mut self.inputs,
            PortDirection::Output => &mut self.outputs,
        };

        if side.iter().any(|p| p.name() == decl.name) {
            return Err(GraphError::DuplicatePortName {
                node_id: self.id,
                direction: decl.direction,
                name: decl.name,
            });
        }

        let port_ref = PortRef::new(self.id, decl.direction, decl.name.clone());
        side.push(Port::new(decl));
        Ok(port_ref)
    }

    /// Append a single-connection input port.
    pub fn add_input(&mut self, name: impl Into<String>) -> GraphResult<PortRef> {
        self.add_port(PortDecl::input(name))
    }

    /// Append a multi-connection input port.
    pub fn add_input_multi(&mut self, name: impl Into<String>) -> GraphResult<PortRef> {
        self.add_port(PortDecl::input(name).multi())
    }

    /// Append an output port.
    pub fn add_output(&mut self, name: impl Into<String>) -> GraphResult<PortRef> {
        self.add_port(PortDecl::output(name))
    }

    /// Look up an input port by index or name.
    pub fn input(&self, selector: impl Into<PortSelector>) -> GraphResult<PortRef> {
        self.lookup(&self.inputs, PortDirection::Input, selector.into())
    }

    /// Look up an output port by index or name.
    pub fn output(&self, selector: impl Into<PortSelector>) -> GraphResult<PortRef> {
        self.lookup(&self.outputs, PortDirection::Output, selector.into())
    }

    fn lookup(
        &self,
        side: &[Port],
        direction: PortDirection,
        selector: PortSelector,
    ) -> GraphResult<PortRef> {
        let port = match &selector {
            PortSelector::Index(i) => side.get(*i),
            PortSelector::Name(name) => side.iter().find(|p| p.name() == name.as_str()),
        };

        port.map(|p| PortRef::new(self.id, direction, p.name()))
            .ok_or_else(|| GraphError::PortNotFound {
                node_id: self.id,
                port: match selector {
                    PortSelector::Index(i) => format!("{}[{}]", direction, i),
                    PortSelector::Name(name) => name,
                },
            })
    }

    /// Get the port instance behind a reference, if it belongs to this node.
    pub fn port(&self, direction: PortDirection, name: &str) -> Option<&Port> {
        let side = match direction {
            PortDirection::Input => &self.inputs,
            PortDirection::Output => &self.outputs,
        };
        side.iter().find(|p| p.name() == name)
    }

    /// Ordered input ports.
    pub fn inputs(&self) -> &[Port] {
        &self.inputs
    }

    /// Ordered output ports.
    pub fn outputs(&self) -> &[Port] {
        &self.outputs
    }

    // ========================================================================
    // Mutators
    // ========================================================================

    /// Set the node body color.
    pub fn set_color(&mut self, r: u8, g: u8, b: u8) {
        self.color = Color::rgb(r, g, b);
    }

    /// Set the display name.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Enable or disable the node.
    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    /// Set the icon reference.
    pub fn set_icon(&mut self, icon: impl Into<String>) {
        self.icon = Some(icon.into());
    }

    /// Whether this node carries the group capability.
    pub fn is_group(&self) -> bool {
        matches!(self.container, Some(Container::Group(_)))
    }

    /// Whether this node carries the backdrop capability.
    pub fn is_backdrop(&self) -> bool {
        matches!(self.container, Some(Container::Backdrop(_)))
    }
}
