//! Port declarations and references.
//!
//! Ports define the interface of a node - the named attachment points through
//! which connections are made. A `PortDecl` is the schema form used when
//! declaring node templates; a `Port` is the instance materialized on a node.

use crate::core::error::NodeId;
use crate::core::node::Color;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction of a port (input or output).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum PortDirection {
    Input,
    Output,
}

impl fmt::Display for PortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PortDirection::Input => write!(f, "input"),
            PortDirection::Output => write!(f, "output"),
        }
    }
}

/// Declaration of a node port (input or output).
///
/// The data-type tag is a free-form compatibility hint, never strictly
/// enforced by the model. Color and painter id are rendering hints the model
/// stores opaquely and never acts on.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PortDecl {
    /// Unique name within the node and direction
    pub name: String,
    /// Human-readable name (used in UI)
    pub display_name: String,
    /// Direction (input or output)
    pub direction: PortDirection,
    /// Whether this port accepts more than one connection.
    /// Inputs default to single-connection; outputs are always multi.
    pub multi: bool,
    /// Free-form data-type tag, compatibility hint only
    pub data_tag: Option<String>,
    /// Color hint for rendering
    pub color: Option<Color>,
    /// Opaque identifier of a custom draw callback, resolved by the renderer
    pub painter: Option<String>,
}

impl PortDecl {
    /// Create a new input port declaration (single-connection by default).
    pub fn input(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            display_name: Self::name_to_display(&name),
            name,
            direction: PortDirection::Input,
            multi: false,
            data_tag: None,
            color: None,
            painter: None,
        }
    }

    /// Create a new output port declaration. Outputs are always multi.
    pub fn output(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            display_name: Self::name_to_display(&name),
            name,
            direction: PortDirection::Output,
            multi: true,
            data_tag: None,
            color: None,
            painter: None,
        }
    }

    /// Allow multiple connections on this port.
    pub fn multi(mut self) -> Self {
        self.multi = true;
        self
    }

    /// Set the display name.
    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = display_name.into();
        self
    }

    /// Set the free-form data-type tag.
    pub fn with_data_tag(mut self, tag: impl Into<String>) -> Self {
        self.data_tag = Some(tag.into());
        self
    }

    /// Set the color hint.
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    /// Set the opaque painter callback id.
    pub fn with_painter(mut self, painter: impl Into<String>) -> Self {
        self.painter = Some(painter.into());
        self
    }

    /// Convert snake_case name to Title Case display name.
    pub(crate) fn name_to_display(name: &str) -> String {
        name.split('_')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    None => String::new(),
                    Some(first) => first.to_uppercase().chain(chars).collect(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// A port instance on a node.
///
/// Carries the declaration data; the set of connected peers lives in the
/// graph's connection list, not here, so the graph stays the single owner of
/// connectivity state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Port {
    pub decl: PortDecl,
}

impl Port {
    /// Materialize a port from its declaration.
    pub fn new(decl: PortDecl) -> Self {
        Self { decl }
    }

    /// Port name.
    pub fn name(&self) -> &str {
        &self.decl.name
    }

    /// Port direction.
    pub fn direction(&self) -> PortDirection {
        self.decl.direction
    }

    /// Whether this port accepts multiple connections.
    pub fn is_multi(&self) -> bool {
        self.decl.multi
    }
}

/// Value handle addressing a port in graph operations.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PortRef {
    /// Owning node.
    pub node_id: NodeId,
    /// Direction of the port.
    pub direction: PortDirection,
    /// Port name within that node and direction.
    pub name: String,
}

impl PortRef {
    /// Create a new port reference.
    pub fn new(node_id: NodeId, direction: PortDirection, name: impl Into<String>) -> Self {
        Self {
            node_id,
            direction,
            name: name.into(),
        }
    }

    /// Reference an input port.
    pub fn input(node_id: NodeId, name: impl Into<String>) -> Self {
        Self::new(node_id, PortDirection::Input, name)
    }

    /// Reference an output port.
    pub fn output(node_id: NodeId, name: impl Into<String>) -> Self {
        Self::new(node_id, PortDirection::Output, name)
    }
}

impl fmt::Display for PortRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}[{}]", self.node_id, self.direction, self.name)
    }
}

/// Selector for looking up a port on a node by index or by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PortSelector {
    Index(usize),
    Name(String),
}

impl From<usize> for PortSelector {
    fn from(index: usize) -> Self {
        PortSelector::Index(index)
    }
}

impl From<&str> for PortSelector {
    fn from(name: &str) -> Self {
        PortSelector::Name(name.to_string())
    }
}

impl From<String> for PortSelector {
    fn from(name: String) -> Self {
        PortSelector::Name(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_decl_builder() {
        let decl = PortDecl::input("in_port")
            .with_data_tag("image")
            .with_color(Color::rgb(200, 10, 0))
            .with_painter("triangle");

        assert_eq!(decl.name, "in_port");
        assert_eq!(decl.display_name, "In Port");
        assert_eq!(decl.direction, PortDirection::Input);
        assert!(!decl.multi);
        assert_eq!(decl.data_tag.as_deref(), Some("image"));
        assert_eq!(decl.painter.as_deref(), Some("triangle"));
    }

    #[test]
    fn test_outputs_are_multi() {
        let decl = PortDecl::output("out");
        assert!(decl.multi);

        let decl = PortDecl::input("in");
        assert!(!decl.multi);
        assert!(decl.multi().multi);
    }

    #[test]
    fn test_name_to_display() {
        assert_eq!(PortDecl::name_to_display("in_port"), "In Port");
        assert_eq!(PortDecl::name_to_display("out"), "Out");
    }

    #[test]
    fn test_port_selector_from() {
        assert_eq!(PortSelector::from(2), PortSelector::Index(2));
        assert_eq!(
            PortSelector::from("out"),
            PortSelector::Name("out".to_string())
        );
    }
}
