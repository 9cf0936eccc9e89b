// SPDX-License-Identifier: MIT OR Apache-2.0
//! Room node graph model for dungeon layout authoring.
//!
//! A dungeon layout is a tree of room nodes rooted at an entrance, where
//! rooms and corridors alternate. This crate owns that tree while it is being
//! edited:
//! - Room type catalog with a closed set of topological roles
//! - Graph container with an ID lookup
//! - Edge validity rules with a reason for every rejection
//! - Bulk operations on a selection
//! - Consistency checks, self-repair and a flat snapshot form
//!
//! ## Architecture
//!
//! Every edge change goes through [`RoomNodeGraph`]; nodes never edit each
//! other. Front ends hold the graph they are editing and pass it explicitly.

pub mod room_type;
pub mod config;
pub mod node;
pub mod validity;
pub mod graph;
pub mod selection;
pub mod traversal;
pub mod consistency;
pub mod snapshot;

pub use room_type::{create_dungeon_catalog, DisplayEntry, RoomKind, RoomType, RoomTypeCatalog};
pub use config::GraphConfig;
pub use node::{RoomNode, RoomNodeId};
pub use validity::EdgeRejection;
pub use graph::{GraphError, RoomNodeGraph};
pub use traversal::Walk;
pub use consistency::ConsistencyIssue;
pub use snapshot::{GraphSnapshot, NodeRecord, SnapshotError};
