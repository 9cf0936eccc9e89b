// SPDX-License-Identifier: MIT OR Apache-2.0
//! Flat, serializable form of a room node graph.
//!
//! A snapshot is an ordered list of node records that name their room type
//! and list both ends of every edge. Graphs are rebuilt from snapshots
//! against a room type catalog.

use crate::config::GraphConfig;
use crate::graph::RoomNodeGraph;
use crate::node::{RoomNode, RoomNodeId};
use crate::room_type::RoomTypeCatalog;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Current snapshot format version
pub const SNAPSHOT_FORMAT_VERSION: u32 = 1;

/// One node of a snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    /// Node ID
    pub id: RoomNodeId,
    /// Room type name, resolved against the catalog on load
    pub room_type: String,
    /// Placement hint
    #[serde(default)]
    pub position: [f32; 2],
    /// Parent IDs
    #[serde(default)]
    pub parent_ids: Vec<RoomNodeId>,
    /// Child IDs
    #[serde(default)]
    pub child_ids: Vec<RoomNodeId>,
}

/// Serializable room node graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    /// Format version
    #[serde(default = "current_version")]
    pub version: u32,
    /// Graph name
    pub name: String,
    /// Graph limits
    #[serde(default)]
    pub config: GraphConfig,
    /// Nodes in graph order
    pub nodes: Vec<NodeRecord>,
}

fn current_version() -> u32 {
    SNAPSHOT_FORMAT_VERSION
}

impl GraphSnapshot {
    /// Serialize to RON format
    pub fn to_ron(&self) -> Result<String, ron::Error> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
    }

    /// Deserialize from RON format
    pub fn from_ron(s: &str) -> Result<Self, ron::error::SpannedError> {
        ron::from_str(s)
    }

    /// Save snapshot to file
    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        let ron_str = self.to_ron().map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, ron_str)
    }

    /// Load snapshot from file
    pub fn load(path: &Path) -> std::io::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_ron(&contents)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))
    }
}

/// Error when rebuilding a graph from a snapshot
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SnapshotError {
    /// Snapshot written by a newer format
    #[error("Snapshot version {0} is newer than supported version {max}", max = SNAPSHOT_FORMAT_VERSION)]
    UnsupportedVersion(u32),

    /// Room type missing from the catalog
    #[error("Node {node} has unknown room type '{name}'")]
    UnknownRoomType {
        /// Node carrying the type
        node: RoomNodeId,
        /// Unresolved type name
        name: String,
    },

    /// Two records share an ID
    #[error("Duplicate node ID: {0}")]
    DuplicateNodeId(RoomNodeId),
}

impl RoomNodeGraph {
    /// Flatten the graph into a snapshot
    pub fn to_snapshot(&self) -> GraphSnapshot {
        GraphSnapshot {
            version: SNAPSHOT_FORMAT_VERSION,
            name: self.name.clone(),
            config: *self.config(),
            nodes: self
                .nodes()
                .map(|n| NodeRecord {
                    id: n.id,
                    room_type: n.room_type.name.clone(),
                    position: n.position,
                    parent_ids: n.parent_ids().to_vec(),
                    child_ids: n.child_ids().to_vec(),
                })
                .collect(),
        }
    }

    /// Rebuild a graph from a snapshot.
    ///
    /// Edges are taken as recorded, then the graph is repaired so that
    /// half-edges or stale references in the data cannot break invariants.
    pub fn from_snapshot(
        snapshot: GraphSnapshot,
        catalog: &RoomTypeCatalog,
    ) -> Result<Self, SnapshotError> {
        let mut graph = Self::from_snapshot_unrepaired(snapshot, catalog)?;
        let fixes = graph.repair();
        if fixes > 0 {
            tracing::warn!("Repaired {} problems while loading graph '{}'", fixes, graph.name);
        }
        tracing::info!("Loaded graph '{}' with {} nodes", graph.name, graph.node_count());
        Ok(graph)
    }

    /// Rebuild a graph from a snapshot exactly as recorded.
    ///
    /// The result may break structural invariants. Inspect it with
    /// [`RoomNodeGraph::check_consistency`] and call [`RoomNodeGraph::repair`]
    /// before editing it.
    pub fn from_snapshot_unrepaired(
        snapshot: GraphSnapshot,
        catalog: &RoomTypeCatalog,
    ) -> Result<Self, SnapshotError> {
        if snapshot.version > SNAPSHOT_FORMAT_VERSION {
            return Err(SnapshotError::UnsupportedVersion(snapshot.version));
        }

        let mut graph = Self::new(snapshot.name, snapshot.config);
        let mut seen = HashSet::new();

        for record in snapshot.nodes {
            if !seen.insert(record.id) {
                return Err(SnapshotError::DuplicateNodeId(record.id));
            }
            let room_type = catalog.get(&record.room_type).ok_or_else(|| {
                SnapshotError::UnknownRoomType {
                    node: record.id,
                    name: record.room_type.clone(),
                }
            })?;

            let mut node = RoomNode::with_id(record.id, room_type.clone())
                .with_position(record.position[0], record.position[1]);
            let (parents, children) = node.lists_mut();
            *parents = record.parent_ids;
            *children = record.child_ids;
            graph.nodes_mut().push(node);
        }

        graph.rebuild_index();
        Ok(graph)
    }
}
