// SPDX-License-Identifier: MIT OR Apache-2.0
//! Structural consistency checks and self-repair.
//!
//! The public mutators never produce any of these issues. They show up when a
//! graph is loaded from hand-edited or stale data, which is why loading always
//! ends with [`RoomNodeGraph::repair`].

use crate::graph::RoomNodeGraph;
use crate::node::{RoomNode, RoomNodeId};
use crate::validity::{self, EdgeRejection};
use std::collections::{HashMap, HashSet};

/// A broken structural invariant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsistencyIssue {
    /// Two nodes share an ID
    DuplicateId(RoomNodeId),
    /// The ID lookup does not match the node list
    StaleIndex,
    /// A node lists an ID that is not in the graph
    DanglingReference {
        /// Node holding the reference
        node: RoomNodeId,
        /// ID that could not be resolved
        missing: RoomNodeId,
    },
    /// An edge recorded on one end only
    HalfEdge {
        /// Parent end
        parent: RoomNodeId,
        /// Child end
        child: RoomNodeId,
    },
    /// A node lists itself as parent or child
    SelfLoop(RoomNodeId),
    /// A node lists the same neighbour twice
    DuplicateEntry(RoomNodeId),
    /// A boss room connected while another one already is
    ExtraConnectedBossRoom(RoomNodeId),
    /// An unassigned placeholder with a parent
    UnassignedWithParent(RoomNodeId),
    /// A node with more than one parent
    MultipleParents(RoomNodeId),
    /// A recorded edge that breaks alternation or leads into an entrance
    InvalidEdge {
        /// Parent end
        parent: RoomNodeId,
        /// Child end
        child: RoomNodeId,
        /// Rule the edge breaks
        reason: EdgeRejection,
    },
    /// A node leading to more children than its kind allows
    TooManyChildren {
        /// Overfull node
        node: RoomNodeId,
        /// Children allowed for its kind
        limit: usize,
    },
}

impl RoomNodeGraph {
    /// List every broken structural invariant
    pub fn check_consistency(&self) -> Vec<ConsistencyIssue> {
        let mut issues = Vec::new();

        let mut by_id: HashMap<RoomNodeId, &RoomNode> = HashMap::new();
        for node in self.nodes() {
            if by_id.insert(node.id, node).is_some() {
                issues.push(ConsistencyIssue::DuplicateId(node.id));
            }
        }

        let index = self.index();
        let index_fresh = index.len() == self.node_count()
            && self
                .nodes()
                .enumerate()
                .all(|(slot, n)| index.get(&n.id) == Some(&slot));
        if !index_fresh {
            issues.push(ConsistencyIssue::StaleIndex);
        }

        let max = self.config().max_child_corridors;
        let mut connected_bosses = 0;
        for node in self.nodes() {
            let id = node.id;

            if has_duplicates(node.parent_ids()) || has_duplicates(node.child_ids()) {
                issues.push(ConsistencyIssue::DuplicateEntry(id));
            }

            let limit = validity::child_limit(node.kind(), max);
            if node.child_ids().len() > limit {
                issues.push(ConsistencyIssue::TooManyChildren { node: id, limit });
            }

            for &child_id in node.child_ids() {
                if child_id == id {
                    issues.push(ConsistencyIssue::SelfLoop(id));
                    continue;
                }
                match by_id.get(&child_id) {
                    None => issues.push(ConsistencyIssue::DanglingReference {
                        node: id,
                        missing: child_id,
                    }),
                    Some(child) if !child.parent_ids().contains(&id) => {
                        issues.push(ConsistencyIssue::HalfEdge { parent: id, child: child_id });
                    }
                    Some(_) => {}
                }
            }

            for &parent_id in node.parent_ids() {
                if parent_id == id {
                    issues.push(ConsistencyIssue::SelfLoop(id));
                    continue;
                }
                match by_id.get(&parent_id) {
                    None => issues.push(ConsistencyIssue::DanglingReference {
                        node: id,
                        missing: parent_id,
                    }),
                    Some(parent) if !parent.child_ids().contains(&id) => {
                        issues.push(ConsistencyIssue::HalfEdge { parent: parent_id, child: id });
                    }
                    // Unassigned children are reported once below
                    Some(_) if node.kind().is_none() => {}
                    Some(parent) => {
                        let verdict = if closes_two_cycle(node, parent_id) {
                            Err(EdgeRejection::TwoCycle)
                        } else {
                            validity::check_edge_kinds(parent.kind(), node.kind())
                        };
                        if let Err(reason) = verdict {
                            issues.push(ConsistencyIssue::InvalidEdge {
                                parent: parent_id,
                                child: id,
                                reason,
                            });
                        }
                    }
                }
            }

            if node.parent_ids().is_empty() {
                continue;
            }
            if node.kind().is_none() {
                issues.push(ConsistencyIssue::UnassignedWithParent(id));
            }
            if node.parent_ids().len() > 1 {
                issues.push(ConsistencyIssue::MultipleParents(id));
            }
            if node.is_boss_room() {
                connected_bosses += 1;
                if connected_bosses > 1 {
                    issues.push(ConsistencyIssue::ExtraConnectedBossRoom(id));
                }
            }
        }

        issues
    }

    /// Restore every structural invariant, returning the number of fixes.
    ///
    /// Where a choice is needed the earliest entry wins: the first node with a
    /// given ID, the first parent of a node, the first children of a node and
    /// the first connected boss room. Of two edges forming a 2-cycle, the one
    /// leaving the lower ID is kept.
    pub fn repair(&mut self) -> usize {
        let mut fixes = 0;

        let mut seen = HashSet::new();
        let before = self.node_count();
        self.nodes_mut().retain(|n| seen.insert(n.id));
        if self.node_count() != before {
            tracing::warn!("Dropped {} nodes with duplicate IDs", before - self.node_count());
            fixes += before - self.node_count();
        }
        self.rebuild_index();

        // Duplicates, self-loops and references to unknown nodes
        let ids: HashSet<RoomNodeId> = self.node_ids().collect();
        for node in self.nodes_mut() {
            let id = node.id;
            let (parents, children) = node.lists_mut();
            let pruned = prune(parents, |p| p != id && ids.contains(&p))
                + prune(children, |c| c != id && ids.contains(&c));
            if pruned > 0 {
                tracing::warn!("Pruned {} invalid references from node {}", pruned, id);
                fixes += pruned;
            }
        }

        // Half-edges
        let recorded_by_parent: HashSet<(RoomNodeId, RoomNodeId)> = self.edges().collect();
        let recorded_by_child: HashSet<(RoomNodeId, RoomNodeId)> = self
            .nodes()
            .flat_map(|n| n.parent_ids().iter().map(move |&p| (p, n.id)))
            .collect();
        for node in self.nodes_mut() {
            let id = node.id;
            let (parents, children) = node.lists_mut();
            let pruned = prune(parents, |p| recorded_by_parent.contains(&(p, id)))
                + prune(children, |c| recorded_by_child.contains(&(id, c)));
            if pruned > 0 {
                tracing::warn!("Pruned {} half-edges from node {}", pruned, id);
                fixes += pruned;
            }
        }

        // Edges into placeholders, 2-cycles, broken alternation, entrance targets
        let mut cuts = Vec::new();
        for node in self.nodes() {
            for &parent_id in node.parent_ids() {
                let invalid = node.kind().is_none()
                    || closes_two_cycle(node, parent_id)
                    || self
                        .node(parent_id)
                        .is_some_and(|p| validity::check_edge_kinds(p.kind(), node.kind()).is_err());
                if invalid {
                    cuts.push((parent_id, node.id));
                }
            }
        }
        fixes += self.cut_edges(cuts);

        // Extra parents
        let cuts: Vec<_> = self
            .nodes()
            .flat_map(|n| n.parent_ids().iter().skip(1).map(move |&p| (p, n.id)))
            .collect();
        fixes += self.cut_edges(cuts);

        // Children past the limit of their parent's kind
        let max = self.config().max_child_corridors;
        let cuts: Vec<_> = self
            .nodes()
            .flat_map(|n| {
                let limit = validity::child_limit(n.kind(), max);
                n.child_ids().iter().skip(limit).map(move |&c| (n.id, c))
            })
            .collect();
        fixes += self.cut_edges(cuts);

        // Extra connected boss rooms
        let cuts: Vec<_> = self
            .nodes()
            .filter(|n| n.is_boss_room() && !n.parent_ids().is_empty())
            .skip(1)
            .flat_map(|n| n.parent_ids().iter().map(move |&p| (p, n.id)))
            .collect();
        fixes += self.cut_edges(cuts);

        debug_assert!(self.check_consistency().is_empty(), "repair left issues behind");
        fixes
    }

    fn cut_edges(&mut self, cuts: Vec<(RoomNodeId, RoomNodeId)>) -> usize {
        let mut cut = 0;
        for (parent, child) in cuts {
            if self.unlink(parent, child) {
                tracing::warn!("Cut edge {} -> {}", parent, child);
                cut += 1;
            }
        }
        cut
    }
}

/// Whether `parent → node` is the edge dropped from a recorded 2-cycle
fn closes_two_cycle(node: &RoomNode, parent: RoomNodeId) -> bool {
    parent > node.id && node.child_ids().contains(&parent)
}

fn has_duplicates(ids: &[RoomNodeId]) -> bool {
    let mut seen = HashSet::new();
    ids.iter().any(|id| !seen.insert(*id))
}

/// Keep the first occurrence of every ID accepted by `keep`
fn prune(ids: &mut Vec<RoomNodeId>, keep: impl Fn(RoomNodeId) -> bool) -> usize {
    let before = ids.len();
    let mut seen = HashSet::new();
    ids.retain(|&id| keep(id) && seen.insert(id));
    before - ids.len()
}
