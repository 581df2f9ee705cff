// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-memory store with linear scans. Small and simple; the reference
//! backend for tests, benches, and embedded use.

use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use crate::predicate::Predicate;
use crate::store::Store;
use crate::types::{NodeRow, Placement, RowId, TreeId};

/// In-memory store backed by an id-ordered map, with linear scans.
#[derive(Clone, Default)]
pub struct MemStore {
    rows: BTreeMap<i64, NodeRow>,
    next_id: i64,
}

impl MemStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rows currently stored.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the store holds no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl core::fmt::Debug for MemStore {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let trees = self
            .rows
            .values()
            .filter(|r| r.parent.is_none())
            .count();
        f.debug_struct("MemStore")
            .field("rows", &self.rows.len())
            .field("trees", &trees)
            .field("next_id", &self.next_id)
            .finish_non_exhaustive()
    }
}

impl Store for MemStore {
    fn allocate(&mut self, parent: Option<RowId>, placement: Placement) -> RowId {
        self.next_id += 1;
        let id = RowId(self.next_id);
        self.rows.insert(
            id.0,
            NodeRow {
                id,
                parent,
                placement,
            },
        );
        id
    }

    fn read(&self, id: RowId) -> Option<NodeRow> {
        self.rows.get(&id.0).copied()
    }

    fn select(&self, pred: &Predicate) -> Vec<NodeRow> {
        let mut out: Vec<NodeRow> = self
            .rows
            .values()
            .filter(|r| pred.matches(r))
            .copied()
            .collect();
        out.sort_by_key(NodeRow::left);
        out
    }

    fn shift_left(&mut self, tree: TreeId, at: i64, delta: i64) {
        for r in self.rows.values_mut() {
            if r.placement.tree == tree && r.placement.left >= at {
                r.placement.left += delta;
            }
        }
    }

    fn shift_right(&mut self, tree: TreeId, at: i64, delta: i64) {
        for r in self.rows.values_mut() {
            if r.placement.tree == tree && r.placement.right >= at {
                r.placement.right += delta;
            }
        }
    }

    fn set_placement(&mut self, id: RowId, placement: Placement) {
        if let Some(r) = self.rows.get_mut(&id.0) {
            r.placement = placement;
        }
    }

    fn set_parent(&mut self, id: RowId, parent: Option<RowId>) {
        if let Some(r) = self.rows.get_mut(&id.0) {
            r.parent = parent;
        }
    }

    fn remove_range(&mut self, tree: TreeId, left: i64, right: i64) -> usize {
        let before = self.rows.len();
        self.rows.retain(|_, r| {
            !(r.placement.tree == tree && r.placement.left >= left && r.placement.left <= right)
        });
        before - self.rows.len()
    }

    fn max_tree_id(&self) -> Option<TreeId> {
        self.rows.values().map(|r| r.placement.tree).max()
    }

    fn snapshot(&self) -> Vec<NodeRow> {
        let mut out: Vec<NodeRow> = self.rows.values().copied().collect();
        out.sort_by_key(|r| (r.tree(), r.left()));
        out
    }
}
