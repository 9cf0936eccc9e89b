// SPDX-License-Identifier: MIT OR Apache-2.0
//! Room nodes of the dungeon layout graph.

use crate::graph::RoomNodeGraph;
use crate::room_type::{RoomKind, RoomType};
use crate::validity::{self, EdgeRejection};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Unique identifier for a room node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomNodeId(pub Uuid);

impl RoomNodeId {
    /// Create a new random node ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RoomNodeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RoomNodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for RoomNodeId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// A room or corridor vertex of the layout graph.
///
/// Adjacency is stored on both ends: every id in `child_ids` names a node
/// whose `parent_ids` holds this node's id. Only [`RoomNodeGraph`] edits the
/// lists, so the two sides never drift apart.
#[derive(Debug, Clone, PartialEq)]
pub struct RoomNode {
    /// Unique instance ID
    pub id: RoomNodeId,
    /// Room type
    pub room_type: RoomType,
    /// Placement hint from the editor, passed through untouched
    pub position: [f32; 2],
    parent_ids: Vec<RoomNodeId>,
    child_ids: Vec<RoomNodeId>,
}

impl RoomNode {
    /// Create a new unconnected node
    pub fn new(room_type: RoomType) -> Self {
        Self::with_id(RoomNodeId::new(), room_type)
    }

    /// Create a new unconnected node with a known ID
    pub fn with_id(id: RoomNodeId, room_type: RoomType) -> Self {
        Self {
            id,
            room_type,
            position: [0.0, 0.0],
            parent_ids: Vec::new(),
            child_ids: Vec::new(),
        }
    }

    /// Set the position
    pub fn with_position(mut self, x: f32, y: f32) -> Self {
        self.position = [x, y];
        self
    }

    /// Topological role of this node's type
    pub fn kind(&self) -> RoomKind {
        self.room_type.kind
    }

    /// Whether this node is an entrance
    pub fn is_entrance(&self) -> bool {
        self.room_type.is_entrance()
    }

    /// Whether this node is a corridor
    pub fn is_corridor(&self) -> bool {
        self.room_type.is_corridor()
    }

    /// Whether this node is a boss room
    pub fn is_boss_room(&self) -> bool {
        self.room_type.is_boss_room()
    }

    /// IDs of the nodes leading into this one
    pub fn parent_ids(&self) -> &[RoomNodeId] {
        &self.parent_ids
    }

    /// IDs of the nodes this one leads to
    pub fn child_ids(&self) -> &[RoomNodeId] {
        &self.child_ids
    }

    /// Whether the node has any parent or child
    pub fn has_edges(&self) -> bool {
        !self.parent_ids.is_empty() || !self.child_ids.is_empty()
    }

    /// Check whether `candidate` may become a child of this node.
    ///
    /// Pure: never mutates the graph, so editors may call it to grey out
    /// invalid targets.
    pub fn check_child(
        &self,
        candidate: RoomNodeId,
        graph: &RoomNodeGraph,
    ) -> Result<(), EdgeRejection> {
        validity::check_edge(self, candidate, graph)
    }

    /// Whether `candidate` may become a child of this node
    pub fn can_append_child(&self, candidate: RoomNodeId, graph: &RoomNodeGraph) -> bool {
        self.check_child(candidate, graph).is_ok()
    }

    pub(crate) fn add_child_id(&mut self, id: RoomNodeId) {
        if !self.child_ids.contains(&id) {
            self.child_ids.push(id);
        }
    }

    pub(crate) fn add_parent_id(&mut self, id: RoomNodeId) {
        if !self.parent_ids.contains(&id) {
            self.parent_ids.push(id);
        }
    }

    pub(crate) fn remove_child_id(&mut self, id: RoomNodeId) -> bool {
        let before = self.child_ids.len();
        self.child_ids.retain(|c| *c != id);
        self.child_ids.len() != before
    }

    pub(crate) fn remove_parent_id(&mut self, id: RoomNodeId) -> bool {
        let before = self.parent_ids.len();
        self.parent_ids.retain(|p| *p != id);
        self.parent_ids.len() != before
    }

    /// Raw list access for loading and repair, which must be able to hold
    /// states the public mutators refuse.
    pub(crate) fn lists_mut(&mut self) -> (&mut Vec<RoomNodeId>, &mut Vec<RoomNodeId>) {
        (&mut self.parent_ids, &mut self.child_ids)
    }
}
