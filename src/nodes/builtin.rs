//! Built-in node templates.
//!
//! A small set of ready-made types used by the demo binary and the tests:
//! basic producer/processor nodes, a few widget-flavored relays, a
//! pass-through group and the backdrop.

use crate::core::error::GraphResult;
use crate::core::node::{Color, Node};
use crate::core::port::PortDecl;
use crate::graph::container::{Backdrop, Container, GroupBindings};
use crate::nodes::registry::NodeRegistry;

/// Register all built-in node types.
pub fn register_all(registry: &mut NodeRegistry) {
    let results = [
        registry.register("basic.source", source, None),
        registry.register("basic.process", process, None),
        registry.register("widget.text", text_input, None),
        registry.register("widget.checkbox", checkbox, None),
        registry.register("widget.menu", dropdown_menu, None),
        registry.register("group.passthrough", passthrough_group, None),
        registry.register("backdrop", backdrop, Some("Backdrop")),
    ];
    for result in results {
        result.expect("builtin type ids are distinct");
    }
}

/// Producer with two outputs and no inputs.
fn source() -> GraphResult<Node> {
    let mut node = Node::new("basic.source", "source");
    node.set_color(25, 58, 51);
    node.add_output("out_a")?;
    node.add_port(PortDecl::output("out_b").with_painter("square"))?;
    Ok(node)
}

/// Processor with three inputs and two outputs.
fn process() -> GraphResult<Node> {
    let mut node = Node::new("basic.process", "process");
    node.set_color(50, 8, 25);
    node.add_port(PortDecl::input("in_a").with_color(Color::rgb(200, 10, 0)))?;
    node.add_input("in_b")?;
    node.add_input("in_c")?;
    node.add_output("out_a")?;
    node.add_output("out_b")?;
    Ok(node)
}

/// Single-line text relay.
fn text_input() -> GraphResult<Node> {
    relay("widget.text", "text")
}

/// Checkbox relay.
fn checkbox() -> GraphResult<Node> {
    relay("widget.checkbox", "checkbox")
}

/// Dropdown menu relay.
fn dropdown_menu() -> GraphResult<Node> {
    relay("widget.menu", "menu")
}

fn relay(type_id: &str, name: &str) -> GraphResult<Node> {
    let mut node = Node::new(type_id, name);
    node.add_input("in")?;
    node.add_output("out")?;
    Ok(node)
}

/// Group with one pass-through input and output.
///
/// The ports proxy to member ports once bound through
/// `NodeGraph::bind_group_port`.
fn passthrough_group() -> GraphResult<Node> {
    let mut node =
        Node::new("group.passthrough", "group").with_container(Container::Group(GroupBindings::new()));
    node.set_color(8, 25, 50);
    node.add_input("in")?;
    node.add_output("out")?;
    Ok(node)
}

/// Backdrop: portless visual container.
fn backdrop() -> GraphResult<Node> {
    Ok(Node::new("backdrop", "backdrop").with_container(Container::Backdrop(Backdrop::default())))
}
