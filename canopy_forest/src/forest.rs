// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The [`Forest`] façade: direct operations, lifecycle hooks, and queries
//! over one store.

use alloc::vec::Vec;

use canopy_store::{NodeRow, RowId, Store, Violation, check};

use crate::coordinator::{self, PendingOp, Summary};
use crate::engine::{self, Position};
use crate::error::TreeError;
use crate::query::{QueryOpts, Relation, project};

/// A forest of nested-set trees kept consistent over a [`Store`].
///
/// Structural changes come in two flavors. Direct operations ([`insert`],
/// [`delete`], [`move_node`]) apply immediately. Lifecycle hooks
/// ([`on_node_created`] and friends) queue [`PendingOp`]s instead, to be
/// resolved as one deterministic plan by [`commit`]; this is the shape a
/// host persistence framework wants, where many entity changes accumulate
/// before a single flush.
///
/// [`insert`]: Forest::insert
/// [`delete`]: Forest::delete
/// [`move_node`]: Forest::move_node
/// [`on_node_created`]: Forest::on_node_created
/// [`commit`]: Forest::commit
#[derive(Debug)]
pub struct Forest<S: Store> {
    store: S,
    pending: Vec<PendingOp>,
    validate: bool,
}

impl<S: Store> Forest<S> {
    /// Wrap a store. Post-commit invariant validation starts enabled.
    pub fn new(store: S) -> Self {
        Self {
            store,
            pending: Vec::new(),
            validate: true,
        }
    }

    /// Toggle the full invariant sweep after every commit.
    ///
    /// The sweep is quadratic in forest size; large deployments turn it off
    /// outside of tests and debugging.
    pub fn set_validate(&mut self, validate: bool) {
        self.validate = validate;
    }

    /// Shared access to the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Unwrap the store, dropping any pending operations.
    pub fn into_store(self) -> S {
        self.store
    }

    /// The operations queued for the next [`commit`](Self::commit).
    pub fn pending(&self) -> &[PendingOp] {
        &self.pending
    }

    // --- direct operations ---

    /// Insert a new node at `position` relative to `target`.
    ///
    /// `target = None` creates a single-node tree under a fresh tree id.
    pub fn insert(
        &mut self,
        target: Option<RowId>,
        position: Position,
    ) -> Result<RowId, TreeError> {
        engine::insert(&mut self.store, target, position)
    }

    /// Delete `node` and its whole subtree; returns the rows removed.
    pub fn delete(&mut self, node: RowId) -> Result<usize, TreeError> {
        engine::delete(&mut self.store, node)
    }

    /// Reparent `node` (with its subtree) to `position` relative to
    /// `target`; `target = None` re-anchors it as a fresh tree.
    pub fn move_node(
        &mut self,
        node: RowId,
        target: Option<RowId>,
        position: Position,
    ) -> Result<(), TreeError> {
        engine::move_node(&mut self.store, node, target, position)
    }

    // --- lifecycle hooks ---

    /// A new entity appeared under `parent`: queue an insert as its last
    /// child (`parent = None` queues a fresh root tree).
    ///
    /// The created row's id comes back in [`Summary::inserted`], in hook
    /// order.
    pub fn on_node_created(&mut self, parent: Option<RowId>) {
        self.pending.push(PendingOp::Insert {
            target: parent,
            position: Position::LastChild,
        });
    }

    /// An entity's parent reference changed: queue a move to the last-child
    /// slot under `new_parent` (`None` queues a move-to-root).
    ///
    /// The target is validated immediately so the caller learns about an
    /// invalid move at the point of the change, not at flush; on error
    /// nothing is queued.
    pub fn on_parent_changed(
        &mut self,
        node: RowId,
        new_parent: Option<RowId>,
    ) -> Result<(), TreeError> {
        let row = self.store.read(node).ok_or(TreeError::UnknownNode(node))?;
        if let Some(tid) = new_parent {
            let t = self.store.read(tid).ok_or(TreeError::UnknownNode(tid))?;
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
        self.pending.push(PendingOp::Move {
            node,
            target: new_parent,
            position: Position::LastChild,
        });
        Ok(())
    }

    /// An entity was removed: queue deletion of its subtree. Deletes queued
    /// in one unit of work merge, so the result is submission-order
    /// independent.
    pub fn on_node_deleted(&mut self, node: RowId) {
        self.pending.push(PendingOp::Delete { node });
    }

    /// Flush all pending operations as one plan.
    ///
    /// The queue is consumed even on failure; an error means the enclosing
    /// transaction should roll back. With validation enabled a full
    /// invariant sweep runs afterwards and any finding is returned as
    /// [`TreeError::InvariantViolation`].
    pub fn commit(&mut self) -> Result<Summary, TreeError> {
        let ops = core::mem::take(&mut self.pending);
        let summary = coordinator::flush(&mut self.store, &ops)?;
        if self.validate && !summary.is_empty() {
            let violations = check(&self.store.snapshot());
            if !violations.is_empty() {
                return Err(TreeError::InvariantViolation(violations));
            }
        }
        Ok(summary)
    }

    // --- queries ---

    /// Select `relation` of the given reference nodes, ordered by `left`.
    pub fn select(
        &self,
        relation: Relation,
        refs: &[RowId],
        opts: QueryOpts,
    ) -> Result<Vec<NodeRow>, TreeError> {
        let mut rows = Vec::with_capacity(refs.len());
        for id in refs {
            rows.push(self.store.read(*id).ok_or(TreeError::UnknownNode(*id))?);
        }
        Ok(self.store.select(&project(relation, &rows, opts)))
    }

    /// Ancestors of `node`, nearest the root first.
    pub fn ancestors(&self, node: RowId) -> Result<Vec<NodeRow>, TreeError> {
        self.select(Relation::Ancestors, &[node], QueryOpts::default())
    }

    /// The subtree below `node` in preorder, `node` itself excluded.
    pub fn descendants(&self, node: RowId) -> Result<Vec<NodeRow>, TreeError> {
        self.select(Relation::Descendants, &[node], QueryOpts::default())
    }

    /// Direct children of `node` in sibling order.
    pub fn children(&self, node: RowId) -> Result<Vec<NodeRow>, TreeError> {
        self.select(Relation::Children, &[node], QueryOpts::default())
    }

    /// The parent of `node`, if it has one.
    pub fn parent(&self, node: RowId) -> Result<Option<NodeRow>, TreeError> {
        let mut rows = self.select(Relation::Parent, &[node], QueryOpts::default())?;
        Ok(rows.pop())
    }

    /// Siblings of `node`, itself excluded.
    pub fn siblings(&self, node: RowId) -> Result<Vec<NodeRow>, TreeError> {
        self.select(Relation::Siblings, &[node], QueryOpts::default())
    }

    /// Leaves of `node`'s subtree, `node` itself included when it is one.
    pub fn leaves(&self, node: RowId) -> Result<Vec<NodeRow>, TreeError> {
        self.select(Relation::Leaves, &[node], QueryOpts::default())
    }

    /// The root of `node`'s tree.
    pub fn root_of(&self, node: RowId) -> Result<NodeRow, TreeError> {
        let mut rows = self.select(Relation::Root, &[node], QueryOpts::default())?;
        rows.pop().ok_or(TreeError::UnknownNode(node))
    }

    /// Run the full invariant sweep over the current store contents.
    pub fn check(&self) -> Vec<Violation> {
        check(&self.store.snapshot())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use canopy_store::MemStore;

    fn forest() -> (Forest<MemStore>, RowId, RowId, RowId, RowId) {
        let mut f = Forest::new(MemStore::new());
        let root = f.insert(None, Position::LastChild).unwrap();
        let a = f.insert(Some(root), Position::LastChild).unwrap();
        let b = f.insert(Some(root), Position::LastChild).unwrap();
        let c = f.insert(Some(b), Position::LastChild).unwrap();
        (f, root, a, b, c)
    }

    #[test]
    fn hooks_flush_on_commit() {
        let (mut f, root, ..) = forest();
        f.on_node_created(Some(root));
        f.on_node_created(Some(root));
        assert_eq!(f.pending().len(), 2);

        let summary = f.commit().unwrap();
        assert_eq!(summary.inserted.len(), 2);
        assert!(f.pending().is_empty());

        let kids = f.children(root).unwrap();
        assert_eq!(kids.len(), 4);
        // Hook inserts land as last children, in hook order.
        assert_eq!(kids[2].id, summary.inserted[0]);
        assert_eq!(kids[3].id, summary.inserted[1]);
        assert_eq!(f.check(), vec![]);
    }

    #[test]
    fn parent_change_is_validated_at_the_hook() {
        let (mut f, _, _, b, c) = forest();
        assert_eq!(
            f.on_parent_changed(b, Some(c)),
            Err(TreeError::InvalidMove { node: b, target: c })
        );
        assert!(f.pending().is_empty());

        f.on_parent_changed(c, None).unwrap();
        let summary = f.commit().unwrap();
        assert_eq!(summary.moved, vec![c]);
        let cr = f.store().read(c).unwrap();
        assert_eq!(cr.parent, None);
        assert_eq!(cr.depth(), 0);
    }

    #[test]
    fn empty_commit_is_a_noop() {
        let (mut f, ..) = forest();
        let before = f.store().snapshot();
        let summary = f.commit().unwrap();
        assert!(summary.is_empty());
        assert_eq!(f.store().snapshot(), before);
    }

    #[test]
    fn query_surface() {
        let (f, root, a, b, c) = forest();
        let anc: Vec<RowId> = f.ancestors(c).unwrap().iter().map(|r| r.id).collect();
        assert_eq!(anc, vec![root, b]);

        let desc: Vec<RowId> = f.descendants(root).unwrap().iter().map(|r| r.id).collect();
        assert_eq!(desc, vec![a, b, c]);

        assert_eq!(f.parent(c).unwrap().map(|r| r.id), Some(b));
        assert_eq!(f.parent(root).unwrap(), None);

        let sib: Vec<RowId> = f.siblings(a).unwrap().iter().map(|r| r.id).collect();
        assert_eq!(sib, vec![b]);

        let leaves: Vec<RowId> = f.leaves(root).unwrap().iter().map(|r| r.id).collect();
        assert_eq!(leaves, vec![a, c]);

        assert_eq!(f.root_of(c).unwrap().id, root);
    }

    #[test]
    fn unknown_reference_is_an_error() {
        let (f, ..) = forest();
        let bogus = RowId(9999);
        assert_eq!(f.ancestors(bogus), Err(TreeError::UnknownNode(bogus)));
    }
}
