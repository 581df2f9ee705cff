// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Batching of pending structural operations.
//!
//! Requests raised during one unit of work are queued as [`PendingOp`]s and
//! resolved into a single deterministic plan at the commit boundary:
//! inserts first, then moves, then deletes, every operation re-deriving its
//! target coordinates from current, already-shifted state. Deletes sharing
//! one flush additionally go through a merge step so the outcome does not
//! depend on the order they were requested in: a delete nested inside
//! another pending delete is discarded, and the surviving gap closures are
//! applied right-to-left per tree, which nets out to one cumulative shift.
//!
//! Moves run before deletes on purpose: a host framework that nullifies
//! parent references instead of cascading raises move-to-root requests for
//! the orphans, and those must detach before the enclosing delete range is
//! removed.

use alloc::vec::Vec;

use canopy_store::{Placement, RowId, Store};
use log::debug;

use crate::engine::{self, Position};
use crate::error::TreeError;

/// One structural request captured during a unit of work.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum PendingOp {
    /// Insert a new node at `position` relative to `target`.
    Insert {
        /// Anchor node, or `None` for a fresh root tree.
        target: Option<RowId>,
        /// Where the new node lands relative to `target`.
        position: Position,
    },
    /// Reparent `node` (with its subtree) relative to `target`.
    Move {
        /// The node being moved.
        node: RowId,
        /// Anchor node, or `None` to re-anchor as a fresh root tree.
        target: Option<RowId>,
        /// Where the node lands relative to `target`.
        position: Position,
    },
    /// Delete `node` and its whole subtree.
    Delete {
        /// The subtree root to remove.
        node: RowId,
    },
}

/// What one flush changed.
#[derive(Clone, Debug, Default)]
pub struct Summary {
    /// Ids of rows created by pending inserts, in plan order.
    pub inserted: Vec<RowId>,
    /// Nodes that were reparented.
    pub moved: Vec<RowId>,
    /// Delete targets actually applied (nested requests merge away),
    /// ascending by `(tree, left)`.
    pub deleted: Vec<RowId>,
    /// Total rows removed by the applied deletes.
    pub removed_rows: usize,
}

impl Summary {
    /// True if the flush changed nothing.
    pub fn is_empty(&self) -> bool {
        self.inserted.is_empty() && self.moved.is_empty() && self.deleted.is_empty()
    }
}

/// Apply a batch of pending operations as one deterministic plan.
///
/// An error leaves the store mid-plan; the enclosing transaction is expected
/// to roll back (moves are validated when enqueued, so a failure here is a
/// batch-level inconsistency, not a user mistake).
pub(crate) fn flush<S: Store>(store: &mut S, ops: &[PendingOp]) -> Result<Summary, TreeError> {
    let mut summary = Summary::default();
    let mut deletes: Vec<RowId> = Vec::new();

    for op in ops {
        match *op {
            PendingOp::Insert { target, position } => {
                summary.inserted.push(engine::insert(store, target, position)?);
            }
            PendingOp::Move { .. } => {}
            PendingOp::Delete { node } => deletes.push(node),
        }
    }
    for op in ops {
        if let PendingOp::Move {
            node,
            target,
            position,
        } = *op
        {
            engine::move_node(store, node, target, position)?;
            summary.moved.push(node);
        }
    }

    // Capture delete spans only now, after inserts and moves have shifted
    // the trees.
    let mut spans: Vec<(RowId, Placement)> = Vec::with_capacity(deletes.len());
    for node in deletes {
        let row = store.read(node).ok_or(TreeError::UnknownNode(node))?;
        spans.push((node, row.placement));
    }
    spans.sort_by_key(|(_, p)| (p.tree, p.left, core::cmp::Reverse(p.right)));

    // A span contained in the previously kept one is already covered by it.
    let mut kept: Vec<(RowId, Placement)> = Vec::with_capacity(spans.len());
    for (id, span) in spans {
        if let Some((_, last)) = kept.last()
            && last.contains(&span)
        {
            continue;
        }
        kept.push((id, span));
    }

    // Right-to-left per tree, so every remaining threshold stays valid and
    // the net effect equals one cumulative shift per tree.
    for (_, span) in kept.iter().rev() {
        summary.removed_rows += store.remove_range(span.tree, span.left, span.right);
        engine::close_gap(store, span.tree, span.right, span.width());
    }
    summary.deleted.extend(kept.iter().map(|(id, _)| *id));

    debug!(
        "flush: {inserts} inserts, {moves} moves, {deletes} deletes ({rows} rows removed)",
        inserts = summary.inserted.len(),
        moves = summary.moved.len(),
        deletes = summary.deleted.len(),
        rows = summary.removed_rows,
    );
    Ok(summary)
}
