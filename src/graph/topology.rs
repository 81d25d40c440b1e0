//! Topological analysis of the enabled subgraph.
//!
//! The layout engine works on node-to-node edges: multiple port connections
//! between the same pair of nodes collapse into one edge, and disabled
//! nodes drop out together with every edge touching them. All orderings
//! here follow creation order so downstream consumers stay deterministic.

use crate::core::error::{LayoutError, LayoutResult, NodeId};
use crate::graph::structure::NodeGraph;
use indexmap::IndexMap;
use std::collections::VecDeque;

/// Analyzer for graph topology.
pub struct TopologyAnalyzer<'a> {
    graph: &'a NodeGraph,
}

impl<'a> TopologyAnalyzer<'a> {
    /// Create a new analyzer for the given graph.
    pub fn new(graph: &'a NodeGraph) -> Self {
        Self { graph }
    }

    /// Enabled node ids in creation order.
    pub fn enabled_nodes(&self) -> Vec<NodeId> {
        self.graph
            .nodes()
            .filter(|n| !n.disabled)
            .map(|n| n.id)
            .collect()
    }

    /// Collapsed node-to-node adjacency over the enabled subgraph.
    ///
    /// Keys appear in creation order and cover every enabled node; edge
    /// targets are deduplicated in first-seen order.
    pub fn enabled_adjacency(&self) -> IndexMap<NodeId, Vec<NodeId>> {
        let mut adjacency: IndexMap<NodeId, Vec<NodeId>> = IndexMap::new();
        for id in self.enabled_nodes() {
            adjacency.insert(id, Vec::new());
        }

        for conn in self.graph.connections() {
            let from = conn.from.node_id;
            let to = conn.to.node_id;
            if !adjacency.contains_key(&from) || !adjacency.contains_key(&to) {
                continue;
            }
            let targets = adjacency.get_mut(&from).expect("key present");
            if !targets.contains(&to) {
                targets.push(to);
            }
        }

        adjacency
    }

    /// Predecessors of each enabled node, collapsed and deduplicated.
    pub fn enabled_predecessors(&self) -> IndexMap<NodeId, Vec<NodeId>> {
        let adjacency = self.enabled_adjacency();
        let mut preds: IndexMap<NodeId, Vec<NodeId>> = IndexMap::new();
        for &id in adjacency.keys() {
            preds.insert(id, Vec::new());
        }
        for (&from, targets) in &adjacency {
            for to in targets {
                preds.get_mut(to).expect("key present").push(from);
            }
        }
        preds
    }

    /// Topological order of the enabled subgraph (Kahn's algorithm).
    ///
    /// Ties are broken by creation order. Fails with `CyclicGraph` naming
    /// the unresolved nodes when the subgraph contains a cycle.
    pub fn topological_sort(&self) -> LayoutResult<Vec<NodeId>> {
        let adjacency = self.enabled_adjacency();

        let mut in_degree: IndexMap<NodeId, usize> = IndexMap::new();
        for &id in adjacency.keys() {
            in_degree.insert(id, 0);
        }
        for targets in adjacency.values() {
            for to in targets {
                *in_degree.get_mut(to).expect("key present") += 1;
            }
        }

        let mut queue: VecDeque<NodeId> = in_degree
            .iter()
            .filter(|(_, degree)| **degree == 0)
            .map(|(&id, _)| id)
            .collect();

        let mut result = Vec::with_capacity(adjacency.len());

        while let Some(node) = queue.pop_front() {
            result.push(node);

            for &neighbor in &adjacency[&node] {
                let degree = in_degree.get_mut(&neighbor).expect("key present");
                *degree -= 1;
                if *degree == 0 {
                    queue.push_back(neighbor);
                }
            }
        }

        if result.len() != adjacency.len() {
            let remaining: Vec<NodeId> = in_degree
                .iter()
                .filter(|(_, degree)| **degree > 0)
                .map(|(&id, _)| id)
                .collect();

            return Err(LayoutError::CyclicGraph { nodes: remaining });
        }

        Ok(result)
    }

    /// Check if the enabled subgraph has any cycles.
    pub fn has_cycle(&self) -> bool {
        self.topological_sort().is_err()
    }
}
