//! Tangle CLI - Node-graph Data Model
//!
//! This is a demonstration CLI for the Tangle library.

use tangle::prelude::*;

fn main() {
    env_logger::init();

    println!("Tangle - node-graph data model v{}", tangle::VERSION);
    println!();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage(&args[0]);
        return;
    }

    match args[1].as_str() {
        "list" => list_types(),
        "info" => {
            if args.len() < 3 {
                eprintln!("Error: Please specify a node type id");
                return;
            }
            type_info(&args[2]);
        }
        "demo" => {
            if let Err(err) = run_demo() {
                eprintln!("Demo failed: {}", err);
            }
        }
        "help" | "--help" | "-h" => print_usage(&args[0]),
        _ => {
            eprintln!("Unknown command: {}", args[1]);
            print_usage(&args[0]);
        }
    }
}

fn print_usage(program: &str) {
    println!("Usage: {} <command> [options]", program);
    println!();
    println!("Commands:");
    println!("  list              List all built-in node types");
    println!("  info <type>       Show the ports of a node type");
    println!("  demo              Build a demo graph and auto-layout it");
    println!("  help              Show this help message");
}

fn list_types() {
    let registry = NodeRegistry::with_builtins();

    println!("Built-in node types:");
    for (type_id, entry) in registry.entries() {
        match &entry.alias {
            Some(alias) => println!("  {}  (alias: {})", type_id, alias),
            None => println!("  {}", type_id),
        }
    }
}

fn type_info(type_id: &str) {
    let registry = NodeRegistry::with_builtins();

    let node = match registry.create(type_id) {
        Ok(node) => node,
        Err(err) => {
            eprintln!("Error: {}", err);
            return;
        }
    };

    println!("{} ({})", node.name, node.type_id);
    println!("  inputs:");
    for port in node.inputs() {
        let multi = if port.is_multi() { " [multi]" } else { "" };
        println!("    {}{}", port.name(), multi);
    }
    println!("  outputs:");
    for port in node.outputs() {
        println!("    {}", port.name());
    }
}

/// Rebuild the classic demo scene: a disabled source feeding a processor
/// and a checkbox, a text node feeding a group, an auto-layout pass and a
/// backdrop around part of the result.
fn run_demo() -> TangleResult<()> {
    let mut graph = NodeGraph::with_registry(NodeRegistry::with_builtins());

    let source = graph.create_node("basic.source", Some("producer"))?;
    let text = graph.create_node("widget.text", Some("text node"))?;
    let checkbox = graph.create_node("widget.checkbox", Some("checkbox node"))?;
    let menu = graph.create_node("widget.menu", Some("menu node"))?;
    let icon = graph.create_node_with(
        "basic.process",
        NodeOverrides {
            name: Some("icon node".to_string()),
            color: Some(Color::from_hex("#0a1e20").map_err(TangleError::Other)?),
            icon: Some("pear.png".to_string()),
        },
    )?;
    let group = graph.create_node("group.passthrough", Some("group node"))?;

    // Wire the scene
    let port = |graph: &NodeGraph, id, dir: &str, sel: &str| -> TangleResult<PortRef> {
        let node = graph.node(id)?;
        Ok(match dir {
            "out" => node.output(sel)?,
            _ => node.input(sel)?,
        })
    };

    graph.connect(
        &port(&graph, source, "out", "out_a")?,
        &port(&graph, icon, "in", "in_c")?,
    )?;
    graph.connect(
        &port(&graph, source, "out", "out_b")?,
        &port(&graph, checkbox, "in", "in")?,
    )?;
    // Replaces the source feed on the checkbox input
    graph.connect(
        &port(&graph, text, "out", "out")?,
        &port(&graph, checkbox, "in", "in")?,
    )?;
    graph.bind_group_port(group, "in", port(&graph, menu, "in", "in")?)?;
    graph.connect(
        &port(&graph, text, "out", "out")?,
        &port(&graph, group, "in", "in")?,
    )?;
    graph.connect(
        &port(&graph, icon, "out", "out_b")?,
        &port(&graph, menu, "in", "in")?,
    )?;

    graph.node_mut(source)?.set_disabled(true);

    LayoutEngine::new().layout(&mut graph)?;

    let backdrop = graph.create_node("Backdrop", None)?;
    let region = graph.wrap_nodes(backdrop, &[icon, menu])?;

    println!("Nodes:");
    for node in graph.nodes() {
        if node.id == backdrop {
            continue;
        }
        let pos = graph.position(node.id)?;
        let state = if node.disabled { " (disabled)" } else { "" };
        println!(
            "  {:<14} {:<16} at ({:>6.1}, {:>6.1}){}",
            node.name, node.type_id, pos.x, pos.y, state
        );
    }

    println!();
    println!("Connections:");
    for conn in graph.connections() {
        let name = |id: NodeId| -> TangleResult<String> { Ok(graph.node(id)?.name.clone()) };
        println!(
            "  {}.{} -> {}.{}",
            name(conn.from.node_id)?,
            conn.from.port_name,
            name(conn.to.node_id)?,
            conn.to.port_name
        );
    }

    println!();
    println!(
        "Backdrop wraps {} node(s) in a {:.0}x{:.0} region",
        2, region.width, region.height
    );

    println!();
    println!("Snapshot:");
    println!("{}", SerializedGraph::from_graph(&graph).to_json()?);

    Ok(())
}
