// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The range shift engine: insert, delete, and move primitives.
//!
//! Every mutation here follows the same scheme: resolve an insertion point
//! (the boundary value at which a slot opens), widen the destination tree by
//! bulk shifts, write the affected rows, and close gaps left behind. All
//! arithmetic happens against *current* store state, so primitives compose:
//! a caller applying several of them in sequence always works in
//! already-shifted coordinates.
//!
//! A move detaches its subtree by negating the members' coordinates. Bulk
//! shifts only ever use positive thresholds, so a detached subtree is
//! invisible to them while the source gap closes and the destination widens;
//! the members are then rewritten from the subtree's relative shape.

use alloc::vec::Vec;

use canopy_store::{NodeRow, Placement, RowId, Store, TreeId};
use log::trace;

use crate::error::TreeError;
use crate::query::{QueryOpts, Relation, project};

/// Where a node lands relative to its target.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Position {
    /// First child of the target, before any existing child.
    FirstChild,
    /// Last child of the target, after any existing child.
    LastChild,
    /// Sibling immediately before the target.
    LeftSibling,
    /// Sibling immediately after the target.
    RightSibling,
}

/// A resolved insertion point: the boundary value `at` in `tree` where a
/// slot opens, plus the depth and parent the new arrival takes on.
#[derive(Copy, Clone, Debug)]
pub(crate) struct Anchor {
    pub(crate) tree: TreeId,
    pub(crate) at: i64,
    pub(crate) depth: i64,
    pub(crate) parent: Option<RowId>,
}

impl Anchor {
    const fn fresh_root(tree: TreeId) -> Self {
        Self {
            tree,
            at: 1,
            depth: 0,
            parent: None,
        }
    }
}

/// Next unused tree id: one past the highest in the store, queried inside
/// the mutating transaction. Ids freed below the maximum are not reused.
pub(crate) fn fresh_tree<S: Store>(store: &S) -> TreeId {
    TreeId(store.max_tree_id().map_or(1, |t| t.0 + 1))
}

/// Resolve the insertion point for `position` relative to `target`.
///
/// `target = None` anchors a fresh single-node tree, and so does a sibling
/// position relative to a root: there is no slot beside a root inside its
/// own tree.
pub(crate) fn resolve_anchor<S: Store>(
    store: &S,
    target: Option<RowId>,
    position: Position,
) -> Result<Anchor, TreeError> {
    let Some(tid) = target else {
        return Ok(Anchor::fresh_root(fresh_tree(store)));
    };
    let t = store.read(tid).ok_or(TreeError::UnknownNode(tid))?;
    let anchor = match position {
        Position::FirstChild => Anchor {
            tree: t.tree(),
            at: t.left() + 1,
            depth: t.depth() + 1,
            parent: Some(t.id),
        },
        Position::LastChild => Anchor {
            tree: t.tree(),
            at: t.right(),
            depth: t.depth() + 1,
            parent: Some(t.id),
        },
        Position::LeftSibling | Position::RightSibling => match t.parent {
            None => Anchor::fresh_root(fresh_tree(store)),
            Some(parent) => {
                let at = if position == Position::LeftSibling {
                    t.left()
                } else {
                    t.right() + 1
                };
                Anchor {
                    tree: t.tree(),
                    at,
                    depth: t.depth(),
                    parent: Some(parent),
                }
            }
        },
    };
    Ok(anchor)
}

/// Open a `width`-wide slot at boundary `at`: rows with `left >= at` and
/// rows with `right >= at` each shift up independently, so an ancestor that
/// merely contains `at` grows while everything after `at` slides over.
pub(crate) fn widen<S: Store>(store: &mut S, tree: TreeId, at: i64, width: i64) {
    store.shift_left(tree, at, width);
    store.shift_right(tree, at, width);
}

/// Close the gap left by a vacated `[.., after]` range of width `width`.
pub(crate) fn close_gap<S: Store>(store: &mut S, tree: TreeId, after: i64, width: i64) {
    store.shift_left(tree, after + 1, -width);
    store.shift_right(tree, after + 1, -width);
}

/// Insert a new node at `position` relative to `target` and return its id.
///
/// `target = None` creates a single-node tree under a fresh tree id.
pub fn insert<S: Store>(
    store: &mut S,
    target: Option<RowId>,
    position: Position,
) -> Result<RowId, TreeError> {
    let anchor = resolve_anchor(store, target, position)?;
    widen(store, anchor.tree, anchor.at, 2);
    let id = store.allocate(
        anchor.parent,
        Placement::new(anchor.tree, anchor.at, anchor.at + 1, anchor.depth),
    );
    trace!(
        "insert {id:?}: tree {tree:?} at {at} depth {depth}",
        tree = anchor.tree,
        at = anchor.at,
        depth = anchor.depth,
    );
    Ok(id)
}

/// Delete `node` and its whole subtree; returns the number of rows removed.
pub fn delete<S: Store>(store: &mut S, node: RowId) -> Result<usize, TreeError> {
    let row = store.read(node).ok_or(TreeError::UnknownNode(node))?;
    let span = row.placement;
    let removed = store.remove_range(span.tree, span.left, span.right);
    close_gap(store, span.tree, span.right, span.width());
    trace!(
        "delete {node:?}: removed {removed} rows from tree {tree:?}",
        tree = span.tree,
    );
    Ok(removed)
}

/// The rows of `row`'s subtree (itself included), ordered by `left`.
pub(crate) fn subtree_rows<S: Store>(store: &S, row: &NodeRow) -> Vec<NodeRow> {
    let pred = project(
        Relation::Descendants,
        core::slice::from_ref(row),
        QueryOpts {
            include_self: true,
            disjoint: true,
        },
    );
    store.select(&pred)
}

/// Reparent `node` (and its whole subtree) to `position` relative to
/// `target`; `target = None` re-anchors the subtree as a fresh tree.
///
/// Rejects a target that is the node itself or one of its descendants with
/// [`TreeError::InvalidMove`], leaving the store untouched.
pub fn move_node<S: Store>(
    store: &mut S,
    node: RowId,
    target: Option<RowId>,
    position: Position,
) -> Result<(), TreeError> {
    let row = store.read(node).ok_or(TreeError::UnknownNode(node))?;
    if let Some(tid) = target {
        let t = store.read(tid).ok_or(TreeError::UnknownNode(tid))?;
        let own_subtree = project(
            Relation::Descendants,
            core::slice::from_ref(&row),
            QueryOpts {
                include_self: true,
                disjoint: true,
            },
        );
        if own_subtree.matches(&t) {
            return Err(TreeError::InvalidMove { node, target: tid });
        }
    }

    let src = row.placement;
    let width = src.width();
    let members = subtree_rows(store, &row);

    // Relative shape of the subtree, replayed at the destination.
    let shape: Vec<(RowId, i64, i64, i64)> = members
        .iter()
        .map(|m| {
            (
                m.id,
                m.left() - src.left,
                m.right() - src.left,
                m.depth() - src.depth,
            )
        })
        .collect();

    // Detach: negate the members' coordinates so the bulk shifts below
    // cannot touch them.
    for m in &members {
        store.set_placement(
            m.id,
            Placement::new(src.tree, -m.left(), -m.right(), m.depth()),
        );
    }
    close_gap(store, src.tree, src.right, width);

    // Resolve the insertion point against the already-shifted state; for a
    // same-tree move the target's own coordinates may just have changed.
    let anchor = resolve_anchor(store, target, position)?;
    widen(store, anchor.tree, anchor.at, width);

    for (id, off_left, off_right, rel_depth) in &shape {
        store.set_placement(
            *id,
            Placement::new(
                anchor.tree,
                anchor.at + off_left,
                anchor.at + off_right,
                anchor.depth + rel_depth,
            ),
        );
    }
    store.set_parent(node, anchor.parent);
    trace!(
        "move {node:?}: {rows} rows to tree {tree:?} at {at}",
        rows = shape.len(),
        tree = anchor.tree,
        at = anchor.at,
    );
    Ok(())
}
