//! Automatic layered layout.
//!
//! Positions nodes so that every enabled node sits in a later layer than
//! all of its enabled predecessors (longest-path layering), then reduces
//! edge crossings within each layer with a few barycenter passes. The
//! result depends only on the connection set, the disabled flags, and
//! creation order, so re-running on an unchanged graph reproduces the same
//! positions exactly.

use crate::core::error::{LayoutResult, NodeId};
use crate::graph::structure::{NodeGraph, Position};
use crate::graph::topology::TopologyAnalyzer;
use indexmap::IndexMap;
use log::debug;
use std::collections::HashMap;

/// Horizontal distance between consecutive layers.
pub const LAYER_SPACING: f64 = 240.0;

/// Vertical distance between nodes within a layer.
pub const NODE_SPACING: f64 = 120.0;

/// Number of barycenter sweeps (each sweep goes down then up).
const BARYCENTER_PASSES: usize = 4;

/// Engine that assigns 2-D positions from the connection topology.
#[derive(Debug, Clone)]
pub struct LayoutEngine {
    layer_spacing: f64,
    node_spacing: f64,
}

impl LayoutEngine {
    /// Create an engine with the default spacing constants.
    pub fn new() -> Self {
        Self {
            layer_spacing: LAYER_SPACING,
            node_spacing: NODE_SPACING,
        }
    }

    /// Override the spacing constants.
    pub fn with_spacing(mut self, layer_spacing: f64, node_spacing: f64) -> Self {
        self.layer_spacing = layer_spacing;
        self.node_spacing = node_spacing;
        self
    }

    /// Longest-path layer of every enabled node.
    ///
    /// Sources sit at layer 0; every other node at 1 + the maximum layer of
    /// its predecessors. Disabled nodes are absent from the result.
    pub fn layers(&self, graph: &NodeGraph) -> LayoutResult<IndexMap<NodeId, usize>> {
        let analyzer = TopologyAnalyzer::new(graph);
        let sorted = analyzer.topological_sort()?;
        let preds = analyzer.enabled_predecessors();

        let mut layers: IndexMap<NodeId, usize> = IndexMap::new();
        for node in sorted {
            let layer = preds[&node]
                .iter()
                .map(|p| layers[p] + 1)
                .max()
                .unwrap_or(0);
            layers.insert(node, layer);
        }

        Ok(layers)
    }

    /// Compute and apply positions for all enabled nodes.
    ///
    /// Disabled nodes keep their current positions. Fails with
    /// `CyclicGraph` when the enabled subgraph cannot be layered.
    pub fn layout(&self, graph: &mut NodeGraph) -> LayoutResult<()> {
        let layers = self.layers(graph)?;
        if layers.is_empty() {
            return Ok(());
        }

        let analyzer = TopologyAnalyzer::new(graph);
        let adjacency = analyzer.enabled_adjacency();
        let preds = analyzer.enabled_predecessors();

        // Creation index is the universal tie-breaker
        let creation: HashMap<NodeId, usize> = graph
            .node_ids()
            .enumerate()
            .map(|(i, id)| (id, i))
            .collect();

        // Initial within-layer order = creation order
        let layer_count = layers.values().max().map_or(0, |m| m + 1);
        let mut order: Vec<Vec<NodeId>> = vec![Vec::new(); layer_count];
        for (&node, &layer) in &layers {
            order[layer].push(node);
        }
        for layer in &mut order {
            layer.sort_by_key(|n| creation[n]);
        }

        for pass in 0..BARYCENTER_PASSES {
            let mut changed = false;
            // Downward sweep: order by predecessor positions
            for layer_idx in 1..order.len() {
                changed |= self.sweep(&mut order, layer_idx, &preds, &creation);
            }
            // Upward sweep: order by successor positions
            for layer_idx in (0..order.len().saturating_sub(1)).rev() {
                changed |= self.sweep(&mut order, layer_idx, &adjacency, &creation);
            }
            if !changed {
                debug!("barycenter stable after {} pass(es)", pass + 1);
                break;
            }
        }

        for (layer_idx, layer) in order.iter().enumerate() {
            for (slot, &node) in layer.iter().enumerate() {
                let position = Position::new(
                    layer_idx as f64 * self.layer_spacing,
                    slot as f64 * self.node_spacing,
                );
                graph
                    .set_position(node, position)
                    .expect("layered node exists");
            }
        }

        debug!(
            "layout placed {} node(s) across {} layer(s)",
            layers.len(),
            order.len()
        );
        Ok(())
    }

    /// Reorder one layer by the barycenter of each node's neighbors.
    ///
    /// Neighbor slots are taken from the neighbors' own layers, so long
    /// edges spanning several layers still pull nodes into line. Nodes
    /// without neighbors keep their current slot. Returns whether the
    /// order changed.
    fn sweep(
        &self,
        order: &mut [Vec<NodeId>],
        layer_idx: usize,
        neighbors: &IndexMap<NodeId, Vec<NodeId>>,
        creation: &HashMap<NodeId, usize>,
    ) -> bool {
        let slots: HashMap<NodeId, usize> = order
            .iter()
            .flat_map(|layer| layer.iter().enumerate().map(|(i, &n)| (n, i)))
            .collect();

        let layer = &mut order[layer_idx];
        let mut keyed: Vec<(f64, usize, NodeId)> = layer
            .iter()
            .enumerate()
            .map(|(slot, &node)| {
                let refs = &neighbors[&node];
                let barycenter = if refs.is_empty() {
                    slot as f64
                } else {
                    refs.iter().map(|n| slots[n] as f64).sum::<f64>() / refs.len() as f64
                };
                (barycenter, creation[&node], node)
            })
            .collect();

        keyed.sort_by(|a, b| {
            a.0.partial_cmp(&b.0)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.1.cmp(&b.1))
        });

        let reordered: Vec<NodeId> = keyed.into_iter().map(|(_, _, n)| n).collect();
        if reordered != *layer {
            *layer = reordered;
            true
        } else {
            false
        }
    }
}

impl Default for LayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}
