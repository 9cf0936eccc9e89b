// SPDX-License-Identifier: MIT OR Apache-2.0
//! Edge validity rules.
//!
//! A parent→child edge is accepted only if it keeps the graph in the shape the
//! dungeon layout builder expects:
//! - rooms and corridors alternate along every path
//! - every node has a single parent, so the layout is a tree rooted at the entrance
//! - a room branches into at most `max_child_corridors` corridors
//! - a corridor leads into exactly one room
//! - at most one boss room is connected
//!
//! Rules are evaluated in a fixed order and the first violation is reported.

use crate::graph::RoomNodeGraph;
use crate::node::{RoomNode, RoomNodeId};
use crate::room_type::RoomKind;

/// Reason an edge was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum EdgeRejection {
    /// Target node does not exist
    #[error("Target node not found: {0}")]
    Missing(RoomNodeId),

    /// Another boss room is already connected
    #[error("A boss room is already connected")]
    BossRoomAlreadyConnected,

    /// Target has no room type assigned yet
    #[error("Target is an unassigned placeholder")]
    UnassignedTarget,

    /// Edge already exists
    #[error("Duplicate edge")]
    DuplicateEdge,

    /// Edge from a node to itself
    #[error("Self-loop not allowed")]
    SelfLoop,

    /// Target is already the parent of the source
    #[error("Edge would create a 2-cycle")]
    TwoCycle,

    /// Target already has a parent
    #[error("Target already has a parent")]
    TargetHasParent,

    /// Corridor leading into a corridor
    #[error("Corridors cannot connect to corridors")]
    CorridorToCorridor,

    /// Room leading directly into a room
    #[error("Rooms must be connected through a corridor")]
    RoomToRoom,

    /// Room already branches into the maximum number of corridors
    #[error("Corridor fan-out exceeded (max {max})")]
    CorridorFanOutExceeded {
        /// Configured maximum
        max: usize,
    },

    /// Target is an entrance
    #[error("Cannot target the entrance")]
    EntranceTarget,

    /// Corridor already leads into a room
    #[error("Corridor may lead into only one room")]
    SingleChildExceeded,
}

/// Evaluate every rule for the edge `from → candidate`
pub fn check_edge(
    from: &RoomNode,
    candidate: RoomNodeId,
    graph: &RoomNodeGraph,
) -> Result<(), EdgeRejection> {
    let target = graph
        .node(candidate)
        .ok_or(EdgeRejection::Missing(candidate))?;

    if target.is_boss_room() && graph.connected_boss_room().is_some() {
        return Err(EdgeRejection::BossRoomAlreadyConnected);
    }

    if target.kind().is_none() {
        return Err(EdgeRejection::UnassignedTarget);
    }

    if from.child_ids().contains(&candidate) {
        return Err(EdgeRejection::DuplicateEdge);
    }

    if from.id == candidate {
        return Err(EdgeRejection::SelfLoop);
    }

    if from.parent_ids().contains(&candidate) {
        return Err(EdgeRejection::TwoCycle);
    }

    if !target.parent_ids().is_empty() {
        return Err(EdgeRejection::TargetHasParent);
    }

    check_alternation(from.kind(), target.kind())?;

    let max = graph.config().max_child_corridors;
    if target.is_corridor() && from.child_ids().len() >= max {
        return Err(EdgeRejection::CorridorFanOutExceeded { max });
    }

    if target.is_entrance() {
        return Err(EdgeRejection::EntranceTarget);
    }

    if !target.is_corridor() && !from.child_ids().is_empty() {
        return Err(EdgeRejection::SingleChildExceeded);
    }

    Ok(())
}

/// Check that changing `node` to `kind` keeps all of its edges valid
pub fn check_retype(
    node: &RoomNode,
    kind: RoomKind,
    graph: &RoomNodeGraph,
) -> Result<(), EdgeRejection> {
    if !node.has_edges() {
        return Ok(());
    }

    if !node.parent_ids().is_empty() {
        match kind {
            RoomKind::None => return Err(EdgeRejection::UnassignedTarget),
            RoomKind::Entrance => return Err(EdgeRejection::EntranceTarget),
            RoomKind::BossRoom => {
                let other_boss = graph
                    .connected_boss_room()
                    .is_some_and(|boss| boss.id != node.id);
                if other_boss {
                    return Err(EdgeRejection::BossRoomAlreadyConnected);
                }
            }
            RoomKind::Corridor | RoomKind::StandardRoom => {}
        }
    }

    for &parent_id in node.parent_ids() {
        let parent = graph
            .node(parent_id)
            .ok_or(EdgeRejection::Missing(parent_id))?;
        check_alternation(parent.kind(), kind)?;
    }

    for &child_id in node.child_ids() {
        let child = graph
            .node(child_id)
            .ok_or(EdgeRejection::Missing(child_id))?;
        check_alternation(kind, child.kind())?;
    }

    // Alternation holds, so the children are all rooms or all corridors
    let children = node.child_ids().len();
    if kind.is_corridor() {
        if children > 1 {
            return Err(EdgeRejection::SingleChildExceeded);
        }
    } else {
        let max = graph.config().max_child_corridors;
        if children > max {
            return Err(EdgeRejection::CorridorFanOutExceeded { max });
        }
    }

    Ok(())
}

/// Rules on an existing edge that depend only on the two kinds: alternation,
/// then the entrance target
pub(crate) fn check_edge_kinds(parent: RoomKind, child: RoomKind) -> Result<(), EdgeRejection> {
    check_alternation(parent, child)?;
    if child.is_entrance() {
        return Err(EdgeRejection::EntranceTarget);
    }
    Ok(())
}

/// Most children a node of `kind` may lead to
pub(crate) fn child_limit(kind: RoomKind, max_child_corridors: usize) -> usize {
    if kind.is_corridor() {
        1
    } else {
        max_child_corridors
    }
}

/// Edges must alternate between corridors and rooms
fn check_alternation(parent: RoomKind, child: RoomKind) -> Result<(), EdgeRejection> {
    match (parent.is_corridor(), child.is_corridor()) {
        (true, true) => Err(EdgeRejection::CorridorToCorridor),
        (false, false) => Err(EdgeRejection::RoomToRoom),
        (true, false) | (false, true) => Ok(()),
    }
}
