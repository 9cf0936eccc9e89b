// SPDX-License-Identifier: MIT OR Apache-2.0
//! Operations on the editor's current selection.

use crate::graph::RoomNodeGraph;
use crate::node::{RoomNode, RoomNodeId};
use std::collections::HashSet;

impl RoomNodeGraph {
    /// Remove every edge whose two ends are both selected.
    ///
    /// Returns the number of edges removed.
    pub fn disconnect_selected_edges(&mut self, selected: &HashSet<RoomNodeId>) -> usize {
        let doomed: Vec<(RoomNodeId, RoomNodeId)> = self
            .edges()
            .filter(|(parent, child)| selected.contains(parent) && selected.contains(child))
            .collect();

        let removed = doomed
            .into_iter()
            .filter(|&(parent, child)| self.unlink(parent, child))
            .count();
        self.assert_consistent();

        tracing::debug!("Disconnected {} selected edges", removed);
        removed
    }

    /// Delete every selected node that `protected` does not shield.
    ///
    /// The deletion set is fixed before anything is removed. Returns the
    /// removed nodes in graph order.
    pub fn delete_selected_nodes(
        &mut self,
        selected: &HashSet<RoomNodeId>,
        protected: impl Fn(&RoomNode) -> bool,
    ) -> Vec<RoomNode> {
        let doomed: Vec<RoomNodeId> = self
            .nodes()
            .filter(|n| selected.contains(&n.id) && !protected(n))
            .map(|n| n.id)
            .collect();

        let removed: Vec<RoomNode> = doomed
            .into_iter()
            .filter_map(|id| self.remove_node(id))
            .collect();
        self.assert_consistent();

        tracing::debug!("Deleted {} selected nodes", removed.len());
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GraphConfig;
    use crate::room_type::create_dungeon_catalog;

    /// Entrance -> C1 -> Room, Entrance -> C2
    fn build() -> (RoomNodeGraph, [RoomNodeId; 4]) {
        let catalog = create_dungeon_catalog();
        let mut graph = RoomNodeGraph::default();
        let mut add = |name: &str| graph.create_node([0.0, 0.0], catalog.get(name).unwrap().clone());
        let ids = [add("Entrance"), add("Corridor"), add("Small Room"), add("Corridor")];
        let [entrance, c1, room, c2] = ids;
        graph.connect(entrance, c1).unwrap();
        graph.connect(c1, room).unwrap();
        graph.connect(entrance, c2).unwrap();
        (graph, ids)
    }

    #[test]
    fn test_disconnect_only_fully_selected_edges() {
        let (mut graph, [entrance, c1, room, c2]) = build();
        let selected: HashSet<_> = [entrance, c1, room].into_iter().collect();

        assert_eq!(graph.disconnect_selected_edges(&selected), 2);

        assert_eq!(graph.node(entrance).unwrap().child_ids(), &[c2]);
        assert!(graph.node(c1).unwrap().child_ids().is_empty());
        assert!(graph.node(room).unwrap().parent_ids().is_empty());
        assert_eq!(graph.node_count(), 4);
    }

    #[test]
    fn test_disconnect_empty_selection() {
        let (mut graph, _) = build();
        assert_eq!(graph.disconnect_selected_edges(&HashSet::new()), 0);
        assert_eq!(graph.edge_count(), 3);
    }

    #[test]
    fn test_delete_selected_spares_protected() {
        let (mut graph, [entrance, c1, room, c2]) = build();
        let selected: HashSet<_> = [entrance, c1, room].into_iter().collect();

        let removed = graph.delete_selected_nodes(&selected, RoomNode::is_entrance);

        assert_eq!(removed.iter().map(|n| n.id).collect::<Vec<_>>(), vec![c1, room]);
        assert_eq!(graph.node_ids().collect::<Vec<_>>(), vec![entrance, c2]);
        assert_eq!(graph.node(entrance).unwrap().child_ids(), &[c2]);
    }

    #[test]
    fn test_delete_selected_hub_and_spokes() {
        let catalog = create_dungeon_catalog();
        let mut graph = RoomNodeGraph::new("hub", GraphConfig::with_max_child_corridors(6));
        let entrance = graph.create_node([0.0, 0.0], catalog.get("Entrance").unwrap().clone());
        let hub = graph.create_node([1.0, 0.0], catalog.get("Large Room").unwrap().clone());
        let feeder = graph.create_node([0.5, 0.0], catalog.get("Corridor").unwrap().clone());
        graph.connect(entrance, feeder).unwrap();
        graph.connect(feeder, hub).unwrap();
        let spokes: Vec<_> = (0..6u8)
            .map(|i| {
                let c = graph.create_node([2.0, f32::from(i)], catalog.get("Corridor").unwrap().clone());
                graph.connect(hub, c).unwrap();
                c
            })
            .collect();

        let mut selected: HashSet<_> = spokes.iter().copied().collect();
        selected.insert(hub);
        let removed = graph.delete_selected_nodes(&selected, RoomNode::is_entrance);

        assert_eq!(removed.len(), 7);
        assert_eq!(graph.node_ids().collect::<Vec<_>>(), vec![entrance, feeder]);
        assert!(graph.node(feeder).unwrap().child_ids().is_empty());
        assert_eq!(graph.edge_count(), 1);
        assert!(graph.check_consistency().is_empty());
    }

    #[test]
    fn test_delete_selected_ignores_unknown_ids() {
        let (mut graph, [_, c1, _, _]) = build();
        let selected: HashSet<_> = [c1, RoomNodeId::new()].into_iter().collect();

        let removed = graph.delete_selected_nodes(&selected, |_| false);

        assert_eq!(removed.len(), 1);
        assert_eq!(graph.node_count(), 3);
        assert!(graph.check_consistency().is_empty());
    }
}
