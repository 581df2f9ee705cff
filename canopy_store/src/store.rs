// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Store trait for relational backends.

use alloc::vec::Vec;

use crate::predicate::Predicate;
use crate::types::{NodeRow, Placement, RowId, TreeId};

/// Relational backend abstraction used by the shift engine and projections.
///
/// Implementations are expected to run inside a caller-supplied transaction
/// scope; nothing here commits or rolls back. The engine only needs ordered
/// range reads, conditional bulk shifts of the form "rows matching a
/// threshold get `column += delta`", and single-row writes.
///
/// Bulk shifts are always issued with a positive threshold. Rows whose range
/// columns are temporarily negative (a detached subtree mid-move) must
/// therefore never match a shift.
pub trait Store {
    /// Allocate a new row and return its store-assigned id.
    fn allocate(&mut self, parent: Option<RowId>, placement: Placement) -> RowId;

    /// Read one row by id.
    fn read(&self, id: RowId) -> Option<NodeRow>;

    /// Rows matching `pred`, ordered by ascending `left`.
    ///
    /// Cross-tree ordering is unspecified; callers that query several trees
    /// and care about grouping order by `tree` themselves.
    fn select(&self, pred: &Predicate) -> Vec<NodeRow>;

    /// Bulk shift: rows in `tree` with `left >= at` get `left += delta`.
    fn shift_left(&mut self, tree: TreeId, at: i64, delta: i64);

    /// Bulk shift: rows in `tree` with `right >= at` get `right += delta`.
    fn shift_right(&mut self, tree: TreeId, at: i64, delta: i64);

    /// Overwrite one row's placement.
    fn set_placement(&mut self, id: RowId, placement: Placement);

    /// Overwrite one row's parent reference.
    fn set_parent(&mut self, id: RowId, parent: Option<RowId>);

    /// Remove all rows in `tree` with `left` in `[left, right]`.
    /// Returns the number of rows removed.
    fn remove_range(&mut self, tree: TreeId, left: i64, right: i64) -> usize;

    /// Highest tree id present, or `None` for an empty store.
    fn max_tree_id(&self) -> Option<TreeId>;

    /// Every row in the store, ordered by `(tree, left)`. Used by the
    /// invariant checker and by tests.
    fn snapshot(&self) -> Vec<NodeRow>;
}
