// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Row identity and the nested-set range model.

/// Identity of one row in the node relation.
///
/// Assigned by the store on allocation and immutable for the lifetime of the
/// row. `RowId`s are never reused within one store.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct RowId(pub i64);

/// Partition key naming which disjoint tree a row belongs to.
///
/// A forest of root-disjoint trees shares one table; every row in one tree
/// carries the same `TreeId`, and exactly one row per tree has depth 0.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct TreeId(pub i64);

/// The derived `(tree, left, right, depth)` quadruple of one node.
///
/// `left` and `right` encode subtree membership as interval containment:
/// every descendant's interval lies strictly inside `(left, right)`, every
/// ancestor's interval strictly contains it, and any two intervals in one
/// tree are either nested or disjoint, never partially overlapping.
///
/// A placement is derived state. It is recomputed by the shift engine on
/// every structural mutation and is never written directly by callers.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Placement {
    /// Tree partition this node belongs to.
    pub tree: TreeId,
    /// Preorder entry boundary. Positive; 1 for the root.
    pub left: i64,
    /// Preorder exit boundary. Always `left + 1 + 2 * descendants`.
    pub right: i64,
    /// Number of ancestors. 0 for the root.
    pub depth: i64,
}

impl Placement {
    /// Create a placement from its four components.
    pub const fn new(tree: TreeId, left: i64, right: i64, depth: i64) -> Self {
        Self {
            tree,
            left,
            right,
            depth,
        }
    }

    /// Placement of a single-node root tree.
    pub const fn root(tree: TreeId) -> Self {
        Self::new(tree, 1, 2, 0)
    }

    /// Width of the interval, `right - left + 1`. Always even; 2 for a leaf.
    pub const fn width(&self) -> i64 {
        self.right - self.left + 1
    }

    /// Number of nodes in the subtree rooted here, including this node.
    pub const fn node_count(&self) -> i64 {
        self.width() / 2
    }

    /// Whether this node has no descendants (`right == left + 1`).
    pub const fn is_leaf(&self) -> bool {
        self.right == self.left + 1
    }

    /// Whether `other` lies inside this subtree, self included.
    pub fn contains(&self, other: &Self) -> bool {
        self.tree == other.tree && self.left <= other.left && other.right <= self.right
    }

    /// Whether `other` is a proper descendant interval of this one.
    pub fn strictly_contains(&self, other: &Self) -> bool {
        self.tree == other.tree && self.left < other.left && other.right < self.right
    }

    /// Whether the two intervals share no boundary values.
    pub fn is_disjoint_from(&self, other: &Self) -> bool {
        self.tree != other.tree || self.right < other.left || other.right < self.left
    }
}

/// One row of the node relation.
///
/// `parent` is the only structural field callers may set directly; every
/// write to it (including to `None`) is a move request and must route through
/// the shift engine before the transaction completes.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct NodeRow {
    /// Store-assigned identity.
    pub id: RowId,
    /// Parent reference; `None` marks a tree root.
    pub parent: Option<RowId>,
    /// Derived nested-set placement.
    pub placement: Placement,
}

impl NodeRow {
    /// Tree partition of this row.
    pub const fn tree(&self) -> TreeId {
        self.placement.tree
    }

    /// `left` boundary of this row.
    pub const fn left(&self) -> i64 {
        self.placement.left
    }

    /// `right` boundary of this row.
    pub const fn right(&self) -> i64 {
        self.placement.right
    }

    /// Depth (ancestor count) of this row.
    pub const fn depth(&self) -> i64 {
        self.placement.depth
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn width_and_counts() {
        let leaf = Placement::new(TreeId(1), 2, 3, 1);
        assert!(leaf.is_leaf());
        assert_eq!(leaf.width(), 2);
        assert_eq!(leaf.node_count(), 1);

        let inner = Placement::new(TreeId(1), 4, 7, 1);
        assert!(!inner.is_leaf());
        assert_eq!(inner.width(), 4);
        assert_eq!(inner.node_count(), 2);
    }

    #[test]
    fn containment() {
        let root = Placement::new(TreeId(1), 1, 8, 0);
        let b = Placement::new(TreeId(1), 4, 7, 1);
        let c = Placement::new(TreeId(1), 5, 6, 2);
        let a = Placement::new(TreeId(1), 2, 3, 1);

        assert!(root.contains(&b));
        assert!(root.contains(&root));
        assert!(!root.strictly_contains(&root));
        assert!(b.strictly_contains(&c));
        assert!(a.is_disjoint_from(&b));
        assert!(!a.is_disjoint_from(&root));
    }

    #[test]
    fn cross_tree_is_disjoint() {
        let a = Placement::root(TreeId(1));
        let b = Placement::root(TreeId(2));
        assert!(a.is_disjoint_from(&b));
        assert!(!a.contains(&b));
    }
}
