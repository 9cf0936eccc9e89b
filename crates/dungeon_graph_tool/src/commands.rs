// SPDX-License-Identifier: MIT OR Apache-2.0
//! Graph file commands.
//!
//! Every command opens a graph file, applies one graph operation and writes
//! the file back, so the graph model is the only thing deciding what is valid.

use dungeon_graph::{
    create_dungeon_catalog, ConsistencyIssue, GraphConfig, GraphError, GraphSnapshot, RoomNode,
    RoomNodeGraph, RoomNodeId, RoomType, RoomTypeCatalog, SnapshotError,
};
use std::collections::HashSet;
use std::path::Path;

/// Error type for command execution
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// File error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Snapshot could not be turned into a graph
    #[error("Invalid graph file: {0}")]
    Snapshot(#[from] SnapshotError),

    /// Graph refused the operation
    #[error("{0}")]
    Graph(#[from] GraphError),

    /// JSON export failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Room type not in the catalog
    #[error("Unknown room type: {0}")]
    UnknownRoomType(String),

    /// No node matches the given ID or prefix
    #[error("No node matches '{0}'")]
    UnknownNode(String),

    /// Several nodes match the given prefix
    #[error("'{0}' matches more than one node")]
    AmbiguousNode(String),

    /// Catalog has no entrance type
    #[error("Catalog has no entrance type")]
    NoEntranceType,
}

/// Result of a consistency check
#[derive(Debug, Default)]
pub struct CheckReport {
    /// Broken structural invariants
    pub issues: Vec<ConsistencyIssue>,
    /// Nodes the layout builder would never reach
    pub unreachable: Vec<RoomNodeId>,
}

impl CheckReport {
    /// Whether nothing needs attention
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty() && self.unreachable.is_empty()
    }
}

/// Catalog and configuration shared by all commands
pub struct Session {
    catalog: RoomTypeCatalog,
    config: GraphConfig,
}

impl Session {
    /// Create a session
    pub fn new(catalog: RoomTypeCatalog, config: GraphConfig) -> Self {
        Self { catalog, config }
    }

    /// Create a session from optional config and catalog files
    pub fn load(config: Option<&Path>, catalog: Option<&Path>) -> Result<Self, CommandError> {
        let config = match config {
            Some(path) => GraphConfig::load(path)?,
            None => GraphConfig::default(),
        };
        let catalog = match catalog {
            Some(path) => {
                let contents = std::fs::read_to_string(path)?;
                RoomTypeCatalog::from_ron(&contents).map_err(|e| {
                    std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
                })?
            }
            None => create_dungeon_catalog(),
        };
        tracing::debug!("Catalog has {} room types", catalog.len());
        Ok(Self::new(catalog, config))
    }

    fn room_type(&self, name: &str) -> Result<RoomType, CommandError> {
        self.catalog
            .get(name)
            .cloned()
            .ok_or_else(|| CommandError::UnknownRoomType(name.to_string()))
    }

    fn open(&self, path: &Path) -> Result<RoomNodeGraph, CommandError> {
        let snapshot = GraphSnapshot::load(path)?;
        Ok(RoomNodeGraph::from_snapshot(snapshot, &self.catalog)?)
    }

    fn store(&self, graph: &RoomNodeGraph, path: &Path) -> Result<(), CommandError> {
        graph.to_snapshot().save(path)?;
        tracing::debug!("Saved graph '{}' to {:?}", graph.name, path);
        Ok(())
    }

    /// Create a graph file holding a single entrance
    pub fn new_graph(&self, path: &Path, name: &str) -> Result<RoomNodeId, CommandError> {
        let entrance = self
            .catalog
            .entrance_type()
            .cloned()
            .ok_or(CommandError::NoEntranceType)?;

        let mut graph = RoomNodeGraph::new(name, self.config);
        let id = graph.create_node([0.0, 0.0], entrance);
        self.store(&graph, path)?;

        tracing::info!("Created graph '{}' at {:?}", name, path);
        Ok(id)
    }

    /// Add an unconnected node
    pub fn add_node(
        &self,
        path: &Path,
        type_name: &str,
        position: [f32; 2],
    ) -> Result<RoomNodeId, CommandError> {
        let room_type = self.room_type(type_name)?;
        let mut graph = self.open(path)?;
        let id = graph.create_node(position, room_type);
        self.store(&graph, path)?;
        Ok(id)
    }

    /// Connect two nodes
    pub fn connect(&self, path: &Path, from: &str, to: &str) -> Result<(), CommandError> {
        let mut graph = self.open(path)?;
        let from = resolve_id(&graph, from)?;
        let to = resolve_id(&graph, to)?;
        graph.connect(from, to)?;
        self.store(&graph, path)
    }

    /// Disconnect two nodes. Returns whether an edge existed.
    pub fn disconnect(&self, path: &Path, from: &str, to: &str) -> Result<bool, CommandError> {
        let mut graph = self.open(path)?;
        let from = resolve_id(&graph, from)?;
        let to = resolve_id(&graph, to)?;
        let removed = graph.disconnect(from, to);
        if removed {
            self.store(&graph, path)?;
        }
        Ok(removed)
    }

    /// Change a node's room type
    pub fn retype(&self, path: &Path, id: &str, type_name: &str) -> Result<(), CommandError> {
        let room_type = self.room_type(type_name)?;
        let mut graph = self.open(path)?;
        let id = resolve_id(&graph, id)?;
        graph.set_room_type(id, room_type)?;
        self.store(&graph, path)
    }

    /// Delete nodes; entrances are never deleted
    pub fn delete(&self, path: &Path, ids: &[String]) -> Result<Vec<RoomNode>, CommandError> {
        let mut graph = self.open(path)?;
        let selected = ids
            .iter()
            .map(|text| resolve_id(&graph, text))
            .collect::<Result<HashSet<_>, _>>()?;

        let removed = graph.delete_selected_nodes(&selected, RoomNode::is_entrance);
        if removed.len() < selected.len() {
            tracing::warn!("Kept {} protected nodes", selected.len() - removed.len());
        }
        self.store(&graph, path)?;
        Ok(removed)
    }

    /// Remove every edge between the given nodes
    pub fn cut(&self, path: &Path, ids: &[String]) -> Result<usize, CommandError> {
        let mut graph = self.open(path)?;
        let selected = ids
            .iter()
            .map(|text| resolve_id(&graph, text))
            .collect::<Result<HashSet<_>, _>>()?;

        let removed = graph.disconnect_selected_edges(&selected);
        self.store(&graph, path)?;
        Ok(removed)
    }

    /// Describe the graph, breadth-first from the entrance
    pub fn list(&self, path: &Path) -> Result<Vec<String>, CommandError> {
        let graph = self.open(path)?;
        let mut lines = vec![format!(
            "{} ({} nodes, {} edges, max {} corridors per room)",
            graph.name,
            graph.node_count(),
            graph.edge_count(),
            graph.config().max_child_corridors
        )];

        let reachable: Vec<&RoomNode> = match graph.entrance() {
            Some(entrance) => graph.walk(entrance.id).collect(),
            None => Vec::new(),
        };
        let unreachable = graph.unreachable_nodes();

        lines.extend(reachable.into_iter().map(describe));
        lines.extend(
            unreachable
                .into_iter()
                .filter_map(|id| graph.node(id))
                .map(|n| format!("{}  (unreachable)", describe(n))),
        );
        Ok(lines)
    }

    /// Check a graph file without changing it
    pub fn check(&self, path: &Path) -> Result<CheckReport, CommandError> {
        let snapshot = GraphSnapshot::load(path)?;
        let graph = RoomNodeGraph::from_snapshot_unrepaired(snapshot, &self.catalog)?;
        Ok(CheckReport {
            issues: graph.check_consistency(),
            unreachable: graph.unreachable_nodes(),
        })
    }

    /// Repair a graph file in place. Returns the number of fixes.
    pub fn repair(&self, path: &Path) -> Result<usize, CommandError> {
        let snapshot = GraphSnapshot::load(path)?;
        let mut graph = RoomNodeGraph::from_snapshot_unrepaired(snapshot, &self.catalog)?;
        let fixes = graph.repair();
        if fixes > 0 {
            self.store(&graph, path)?;
        }
        Ok(fixes)
    }

    /// Export a graph file as JSON
    pub fn export_json(&self, path: &Path) -> Result<String, CommandError> {
        let graph = self.open(path)?;
        Ok(serde_json::to_string_pretty(&graph.to_snapshot())?)
    }

    /// Room types offered to users, with their catalog index
    pub fn type_lines(&self) -> Vec<String> {
        self.catalog
            .display_types()
            .into_iter()
            .map(|entry| format!("{:>3}  {}", entry.catalog_index, entry.name))
            .collect()
    }
}

/// Resolve a full node ID or a unique prefix of one
pub fn resolve_id(graph: &RoomNodeGraph, text: &str) -> Result<RoomNodeId, CommandError> {
    if let Ok(id) = text.parse::<RoomNodeId>() {
        return if graph.contains(id) {
            Ok(id)
        } else {
            Err(CommandError::UnknownNode(text.to_string()))
        };
    }

    let prefix = text.to_ascii_lowercase();
    let mut matches = graph
        .node_ids()
        .filter(|id| id.to_string().starts_with(&prefix));
    match (matches.next(), matches.next()) {
        (Some(id), None) => Ok(id),
        (Some(_), Some(_)) => Err(CommandError::AmbiguousNode(text.to_string())),
        (None, _) => Err(CommandError::UnknownNode(text.to_string())),
    }
}

fn short(id: RoomNodeId) -> String {
    id.to_string().chars().take(8).collect()
}

fn describe(node: &RoomNode) -> String {
    let join = |ids: &[RoomNodeId]| ids.iter().map(|&id| short(id)).collect::<Vec<_>>().join(",");
    format!(
        "{}  {:<18} parents=[{}] children=[{}]",
        short(node.id),
        node.room_type.name,
        join(node.parent_ids()),
        join(node.child_ids())
    )
}
