// SPDX-License-Identifier: MIT OR Apache-2.0
//! Walking the layout tree.
//!
//! The layout builder places rooms breadth-first from the entrance, so
//! [`Walk`] yields nodes in that order.

use crate::graph::RoomNodeGraph;
use crate::node::{RoomNode, RoomNodeId};
use std::collections::{HashSet, VecDeque};

impl RoomNodeGraph {
    /// The first entrance node
    pub fn entrance(&self) -> Option<&RoomNode> {
        self.nodes().find(|n| n.is_entrance())
    }

    /// Children of a node, in edge order. Unknown IDs yield nothing.
    pub fn children(&self, id: RoomNodeId) -> impl Iterator<Item = &RoomNode> {
        self.node(id)
            .into_iter()
            .flat_map(|n| n.child_ids().iter())
            .filter_map(move |&c| self.node(c))
    }

    /// Parents of a node, in edge order. Unknown IDs yield nothing.
    pub fn parents(&self, id: RoomNodeId) -> impl Iterator<Item = &RoomNode> {
        self.node(id)
            .into_iter()
            .flat_map(|n| n.parent_ids().iter())
            .filter_map(move |&p| self.node(p))
    }

    /// Breadth-first walk over everything reachable from `start`
    pub fn walk(&self, start: RoomNodeId) -> Walk<'_> {
        Walk::new(self, start)
    }

    /// IDs of nodes not reachable from the entrance
    pub fn unreachable_nodes(&self) -> Vec<RoomNodeId> {
        let reached: HashSet<RoomNodeId> = match self.entrance() {
            Some(entrance) => self.walk(entrance.id).map(|n| n.id).collect(),
            None => HashSet::new(),
        };
        self.node_ids().filter(|id| !reached.contains(id)).collect()
    }
}

/// Breadth-first iterator over a room node graph
pub struct Walk<'a> {
    graph: &'a RoomNodeGraph,
    queue: VecDeque<RoomNodeId>,
    visited: HashSet<RoomNodeId>,
}

impl<'a> Walk<'a> {
    fn new(graph: &'a RoomNodeGraph, start: RoomNodeId) -> Self {
        let mut queue = VecDeque::new();
        let mut visited = HashSet::new();
        if graph.contains(start) {
            queue.push_back(start);
            visited.insert(start);
        }
        Self { graph, queue, visited }
    }
}

impl<'a> Iterator for Walk<'a> {
    type Item = &'a RoomNode;

    fn next(&mut self) -> Option<Self::Item> {
        let graph = self.graph;
        while let Some(id) = self.queue.pop_front() {
            let Some(node) = graph.node(id) else {
                continue;
            };
            for &child in node.child_ids() {
                if self.visited.insert(child) {
                    self.queue.push_back(child);
                }
            }
            return Some(node);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::room_type::create_dungeon_catalog;

    #[test]
    fn test_walk_is_breadth_first() {
        let catalog = create_dungeon_catalog();
        let mut graph = RoomNodeGraph::default();
        let mut add = |name: &str| graph.create_node([0.0, 0.0], catalog.get(name).unwrap().clone());
        let entrance = add("Entrance");
        let c1 = add("Corridor");
        let c2 = add("Corridor");
        let room = add("Medium Room");
        let boss = add("Boss Room");
        let stray = add("Large Room");

        graph.connect(entrance, c1).unwrap();
        graph.connect(entrance, c2).unwrap();
        graph.connect(c1, room).unwrap();
        graph.connect(c2, boss).unwrap();

        let order: Vec<_> = graph.walk(entrance).map(|n| n.id).collect();
        assert_eq!(order, vec![entrance, c1, c2, room, boss]);

        assert_eq!(graph.entrance().map(|n| n.id), Some(entrance));
        assert_eq!(graph.children(entrance).map(|n| n.id).collect::<Vec<_>>(), vec![c1, c2]);
        assert_eq!(graph.parents(boss).map(|n| n.id).collect::<Vec<_>>(), vec![c2]);
        assert_eq!(graph.unreachable_nodes(), vec![stray]);
    }

    #[test]
    fn test_walk_from_unknown_node() {
        let graph = RoomNodeGraph::default();
        assert_eq!(graph.walk(RoomNodeId::new()).count(), 0);
        assert!(graph.entrance().is_none());
        assert_eq!(graph.children(RoomNodeId::new()).count(), 0);
    }
}
