// SPDX-License-Identifier: MIT OR Apache-2.0
//! Room node graph: owns the nodes and is the only place edges are edited.

use crate::config::GraphConfig;
use crate::node::{RoomNode, RoomNodeId};
use crate::room_type::RoomType;
use crate::validity::{self, EdgeRejection};
use std::collections::HashMap;

/// A dungeon layout graph
#[derive(Debug, Clone)]
pub struct RoomNodeGraph {
    /// Graph name
    pub name: String,
    /// Limits used by the edge validity rules
    config: GraphConfig,
    /// Nodes in creation order
    nodes: Vec<RoomNode>,
    /// Position of each node in `nodes`, derived from `nodes`
    index: HashMap<RoomNodeId, usize>,
}

impl RoomNodeGraph {
    /// Create a new empty graph
    pub fn new(name: impl Into<String>, config: GraphConfig) -> Self {
        Self {
            name: name.into(),
            config,
            nodes: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Limits used by the edge validity rules
    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    /// Create an unconnected node and return its ID.
    ///
    /// `position` is the editor's placement hint; it is stored, never read.
    pub fn create_node(&mut self, position: [f32; 2], room_type: RoomType) -> RoomNodeId {
        let node = RoomNode::new(room_type).with_position(position[0], position[1]);
        let id = node.id;

        tracing::debug!("Created {} node {}", node.room_type.name, id);
        self.index.insert(id, self.nodes.len());
        self.nodes.push(node);
        self.assert_consistent();
        id
    }

    /// Get a node by ID
    pub fn node(&self, id: RoomNodeId) -> Option<&RoomNode> {
        self.index.get(&id).and_then(|&slot| self.nodes.get(slot))
    }

    /// Whether a node exists
    pub fn contains(&self, id: RoomNodeId) -> bool {
        self.index.contains_key(&id)
    }

    /// Get all nodes in creation order
    pub fn nodes(&self) -> impl Iterator<Item = &RoomNode> {
        self.nodes.iter()
    }

    /// Get all node IDs in creation order
    pub fn node_ids(&self) -> impl Iterator<Item = RoomNodeId> + '_ {
        self.nodes.iter().map(|n| n.id)
    }

    /// Get the number of nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Get the number of parent→child edges
    pub fn edge_count(&self) -> usize {
        self.nodes.iter().map(|n| n.child_ids().len()).sum()
    }

    /// Get all edges as `(parent, child)` pairs
    pub fn edges(&self) -> impl Iterator<Item = (RoomNodeId, RoomNodeId)> + '_ {
        self.nodes
            .iter()
            .flat_map(|n| n.child_ids().iter().map(move |&c| (n.id, c)))
    }

    /// The boss room currently connected into the graph, if any
    pub fn connected_boss_room(&self) -> Option<&RoomNode> {
        self.nodes
            .iter()
            .find(|n| n.is_boss_room() && !n.parent_ids().is_empty())
    }

    /// Add the edge `from → to`.
    ///
    /// Every validity rule is checked before either list is touched; on
    /// rejection the graph is unchanged.
    pub fn connect(&mut self, from: RoomNodeId, to: RoomNodeId) -> Result<(), GraphError> {
        let from_node = self.node(from).ok_or(GraphError::NodeNotFound(from))?;

        if let Err(reason) = from_node.check_child(to, self) {
            tracing::debug!("Rejected edge {} -> {}: {}", from, to, reason);
            return Err(reason.into());
        }

        let (Some(from_slot), Some(to_slot)) = (self.slot(from), self.slot(to)) else {
            return Err(GraphError::NodeNotFound(to));
        };
        self.nodes[from_slot].add_child_id(to);
        self.nodes[to_slot].add_parent_id(from);

        tracing::debug!("Connected {} -> {}", from, to);
        self.assert_consistent();
        Ok(())
    }

    /// Remove the edge `from → to`.
    ///
    /// Returns whether an edge was removed; a missing edge or node is a no-op.
    pub fn disconnect(&mut self, from: RoomNodeId, to: RoomNodeId) -> bool {
        let removed = self.unlink(from, to);
        self.assert_consistent();
        removed
    }

    /// Remove a node and every edge touching it
    pub fn delete_node(&mut self, id: RoomNodeId) -> Option<RoomNode> {
        let removed = self.remove_node(id);
        self.assert_consistent();
        removed
    }

    /// Change a node's room type.
    ///
    /// Unconnected nodes accept any type. A connected node only accepts a
    /// type under which all of its existing edges would still be valid.
    pub fn set_room_type(&mut self, id: RoomNodeId, room_type: RoomType) -> Result<(), GraphError> {
        let node = self.node(id).ok_or(GraphError::NodeNotFound(id))?;
        validity::check_retype(node, room_type.kind, self)?;

        let slot = self.slot(id).ok_or(GraphError::NodeNotFound(id))?;
        tracing::debug!("Node {} type {} -> {}", id, self.nodes[slot].room_type.name, room_type.name);
        self.nodes[slot].room_type = room_type;
        self.assert_consistent();
        Ok(())
    }

    /// Move a node's placement hint. Returns `false` if the node is unknown.
    pub fn set_position(&mut self, id: RoomNodeId, position: [f32; 2]) -> bool {
        match self.slot(id) {
            Some(slot) => {
                self.nodes[slot].position = position;
                true
            }
            None => false,
        }
    }

    /// Rebuild the ID lookup from the node list
    pub fn rebuild_index(&mut self) {
        self.index.clear();
        for (slot, node) in self.nodes.iter().enumerate() {
            self.index.insert(node.id, slot);
        }
    }

    /// Drop both ends of an edge without the consistency check, so composite
    /// operations can check once at the end
    pub(crate) fn unlink(&mut self, from: RoomNodeId, to: RoomNodeId) -> bool {
        let mut removed = false;
        if let Some(slot) = self.slot(from) {
            removed |= self.nodes[slot].remove_child_id(to);
        }
        if let Some(slot) = self.slot(to) {
            removed |= self.nodes[slot].remove_parent_id(from);
        }

        if removed {
            tracing::debug!("Disconnected {} -> {}", from, to);
        }
        removed
    }

    /// Sever every edge of a node and remove it, without the consistency check
    pub(crate) fn remove_node(&mut self, id: RoomNodeId) -> Option<RoomNode> {
        let node = self.node(id)?;
        let parents = node.parent_ids().to_vec();
        let children = node.child_ids().to_vec();

        for parent in parents {
            self.unlink(parent, id);
        }
        for child in children {
            self.unlink(id, child);
        }

        let slot = self.slot(id)?;
        let removed = self.nodes.remove(slot);
        self.rebuild_index();

        tracing::debug!("Deleted {} node {}", removed.room_type.name, id);
        Some(removed)
    }

    pub(crate) fn slot(&self, id: RoomNodeId) -> Option<usize> {
        self.index.get(&id).copied()
    }

    pub(crate) fn index(&self) -> &HashMap<RoomNodeId, usize> {
        &self.index
    }

    pub(crate) fn nodes_mut(&mut self) -> &mut Vec<RoomNode> {
        &mut self.nodes
    }

    /// Internal invariants must hold after every public mutation.
    ///
    /// Debug builds only. Release builds rely on the repair that runs on load.
    pub(crate) fn assert_consistent(&self) {
        if cfg!(debug_assertions) {
            let issues = self.check_consistency();
            assert!(issues.is_empty(), "room node graph invariants broken: {issues:?}");
        }
    }
}

impl Default for RoomNodeGraph {
    fn default() -> Self {
        Self::new("Untitled", GraphConfig::default())
    }
}

/// Error from a graph mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    /// Node not found
    #[error("Node not found: {0}")]
    NodeNotFound(RoomNodeId),

    /// Edge validity rule failed
    #[error("Edge rejected: {0}")]
    Rejected(#[from] EdgeRejection),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::room_type::{create_dungeon_catalog, RoomTypeCatalog};

    fn graph_with(max_child_corridors: usize) -> (RoomTypeCatalog, RoomNodeGraph) {
        (
            create_dungeon_catalog(),
            RoomNodeGraph::new("test", GraphConfig::with_max_child_corridors(max_child_corridors)),
        )
    }

    fn add(graph: &mut RoomNodeGraph, catalog: &RoomTypeCatalog, type_name: &str) -> RoomNodeId {
        graph.create_node([0.0, 0.0], catalog.get(type_name).unwrap().clone())
    }

    #[test]
    fn test_create_and_lookup() {
        let (catalog, mut graph) = graph_with(3);
        let a = add(&mut graph, &catalog, "Entrance");
        let b = add(&mut graph, &catalog, "Corridor");

        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.node_ids().collect::<Vec<_>>(), vec![a, b]);
        assert_eq!(graph.node(b).map(|n| n.room_type.name.as_str()), Some("Corridor"));
        assert!(graph.node(RoomNodeId::new()).is_none());
    }

    #[test]
    fn test_connect_is_symmetric() {
        let (catalog, mut graph) = graph_with(3);
        let entrance = add(&mut graph, &catalog, "Entrance");
        let corridor = add(&mut graph, &catalog, "Corridor");

        graph.connect(entrance, corridor).unwrap();

        assert_eq!(graph.node(entrance).unwrap().child_ids(), &[corridor]);
        assert_eq!(graph.node(corridor).unwrap().parent_ids(), &[entrance]);
        assert_eq!(graph.edges().collect::<Vec<_>>(), vec![(entrance, corridor)]);
    }

    #[test]
    fn test_connect_unknown_source() {
        let (catalog, mut graph) = graph_with(3);
        let corridor = add(&mut graph, &catalog, "Corridor");
        let ghost = RoomNodeId::new();

        assert_eq!(graph.connect(ghost, corridor), Err(GraphError::NodeNotFound(ghost)));
        assert_eq!(
            graph.connect(corridor, ghost),
            Err(GraphError::Rejected(EdgeRejection::Missing(ghost)))
        );
    }

    #[test]
    fn test_rejected_connect_leaves_lists_untouched() {
        let (catalog, mut graph) = graph_with(3);
        let corridor = add(&mut graph, &catalog, "Corridor");
        let room_a = add(&mut graph, &catalog, "Small Room");
        let room_b = add(&mut graph, &catalog, "Medium Room");
        graph.connect(corridor, room_a).unwrap();

        let before_from = graph.node(corridor).unwrap().clone();
        let before_to = graph.node(room_b).unwrap().clone();

        assert!(graph.connect(corridor, room_b).is_err());
        assert_eq!(graph.node(corridor).unwrap(), &before_from);
        assert_eq!(graph.node(room_b).unwrap(), &before_to);
    }

    #[test]
    fn test_second_corridor_from_entrance_rejected() {
        let (catalog, mut graph) = graph_with(1);
        let entrance = add(&mut graph, &catalog, "Entrance");
        let c1 = add(&mut graph, &catalog, "Corridor");
        let c2 = add(&mut graph, &catalog, "Corridor");

        assert_eq!(graph.connect(entrance, c1), Ok(()));
        assert_eq!(
            graph.connect(entrance, c2),
            Err(GraphError::Rejected(EdgeRejection::CorridorFanOutExceeded { max: 1 }))
        );
        assert!(graph.node(c2).unwrap().parent_ids().is_empty());
    }

    #[test]
    fn test_corridor_accepts_one_room() {
        let (catalog, mut graph) = graph_with(1);
        let entrance = add(&mut graph, &catalog, "Entrance");
        let c1 = add(&mut graph, &catalog, "Corridor");
        let room_a = add(&mut graph, &catalog, "Small Room");
        let room_b = add(&mut graph, &catalog, "Large Room");
        graph.connect(entrance, c1).unwrap();

        assert_eq!(graph.connect(c1, room_a), Ok(()));
        assert_eq!(
            graph.connect(c1, room_b),
            Err(GraphError::Rejected(EdgeRejection::SingleChildExceeded))
        );
    }

    #[test]
    fn test_second_boss_room_rejected() {
        let (catalog, mut graph) = graph_with(3);
        let entrance = add(&mut graph, &catalog, "Entrance");
        let c1 = add(&mut graph, &catalog, "Corridor");
        let c2 = add(&mut graph, &catalog, "Corridor");
        let b1 = add(&mut graph, &catalog, "Boss Room");
        let b2 = add(&mut graph, &catalog, "Boss Room");
        graph.connect(entrance, c1).unwrap();
        graph.connect(entrance, c2).unwrap();

        assert_eq!(graph.connect(c1, b1), Ok(()));
        assert_eq!(
            graph.connect(c2, b2),
            Err(GraphError::Rejected(EdgeRejection::BossRoomAlreadyConnected))
        );
        assert_eq!(graph.connected_boss_room().map(|n| n.id), Some(b1));
    }

    #[test]
    fn test_disconnect_is_idempotent() {
        let (catalog, mut graph) = graph_with(3);
        let entrance = add(&mut graph, &catalog, "Entrance");
        let corridor = add(&mut graph, &catalog, "Corridor");
        graph.connect(entrance, corridor).unwrap();

        assert!(graph.disconnect(entrance, corridor));
        let once = graph.clone();
        assert!(!graph.disconnect(entrance, corridor));

        assert_eq!(graph.nodes().collect::<Vec<_>>(), once.nodes().collect::<Vec<_>>());
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn test_delete_cascades() {
        let (catalog, mut graph) = graph_with(3);
        let entrance = add(&mut graph, &catalog, "Entrance");
        let c1 = add(&mut graph, &catalog, "Corridor");
        let room = add(&mut graph, &catalog, "Small Room");
        graph.connect(entrance, c1).unwrap();
        graph.connect(c1, room).unwrap();

        let removed = graph.delete_node(c1).unwrap();

        assert_eq!(removed.id, c1);
        assert!(removed.parent_ids().is_empty() && removed.child_ids().is_empty());
        assert!(graph.node(c1).is_none());
        assert!(!graph.node_ids().any(|id| id == c1));
        assert!(graph.node(room).unwrap().parent_ids().is_empty());
        assert!(graph.node(entrance).unwrap().child_ids().is_empty());
        assert_eq!(graph.node_ids().collect::<Vec<_>>(), vec![entrance, room]);
    }

    #[test]
    fn test_delete_unknown_is_noop() {
        let (catalog, mut graph) = graph_with(3);
        add(&mut graph, &catalog, "Entrance");
        assert!(graph.delete_node(RoomNodeId::new()).is_none());
        assert_eq!(graph.node_count(), 1);
    }

    #[test]
    fn test_set_room_type() {
        let (catalog, mut graph) = graph_with(3);
        let entrance = add(&mut graph, &catalog, "Entrance");
        let corridor = add(&mut graph, &catalog, "Corridor");
        let placeholder = add(&mut graph, &catalog, "None");

        let room = catalog.get("Medium Room").unwrap().clone();
        assert_eq!(graph.set_room_type(placeholder, room), Ok(()));
        assert_eq!(graph.node(placeholder).unwrap().room_type.name, "Medium Room");

        graph.connect(entrance, corridor).unwrap();
        let none = catalog.none_type().unwrap().clone();
        assert_eq!(
            graph.set_room_type(corridor, none),
            Err(GraphError::Rejected(EdgeRejection::UnassignedTarget))
        );
        assert!(graph.node(corridor).unwrap().is_corridor());
    }

    #[test]
    fn test_set_position_leaves_edges_alone() {
        let (catalog, mut graph) = graph_with(3);
        let entrance = add(&mut graph, &catalog, "Entrance");
        let corridor = add(&mut graph, &catalog, "Corridor");
        graph.connect(entrance, corridor).unwrap();

        assert!(graph.set_position(corridor, [3.0, -1.5]));
        assert_eq!(graph.node(corridor).unwrap().position, [3.0, -1.5]);
        assert_eq!(graph.node(corridor).unwrap().parent_ids(), &[entrance]);
        assert!(!graph.set_position(RoomNodeId::new(), [1.0, 1.0]));
    }

    #[test]
    fn test_rebuild_index_after_bulk_change() {
        let (catalog, mut graph) = graph_with(3);
        let a = add(&mut graph, &catalog, "Entrance");
        let b = add(&mut graph, &catalog, "Corridor");

        graph.nodes_mut().reverse();
        graph.rebuild_index();

        assert_eq!(graph.node(a).unwrap().id, a);
        assert_eq!(graph.node(b).unwrap().id, b);
        assert_eq!(graph.node_ids().collect::<Vec<_>>(), vec![b, a]);
    }
}
