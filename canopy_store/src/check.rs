// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pure invariant checker for nested-set forests.
//!
//! [`check`] validates a snapshot of the node relation against the encoding
//! invariants and returns every violation found. It has no side effects and
//! performs no store access; tests run it after every scenario, and the
//! forest layer can run it defensively before commit.
//!
//! The descendant-count pass is quadratic in tree size. This is test and
//! debug tooling, not a hot path.

use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use thiserror::Error;

use crate::types::{NodeRow, RowId, TreeId};

/// One violation of the nested-set invariants.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum Violation {
    /// `left >= right`.
    #[error("node {id:?}: left {left} is not below right {right}")]
    InvertedRange {
        /// Offending row.
        id: RowId,
        /// Its `left`.
        left: i64,
        /// Its `right`.
        right: i64,
    },
    /// `right - left` is even; nested-set spans are always odd.
    #[error("node {id:?}: span {left}..{right} has even length")]
    EvenSpan {
        /// Offending row.
        id: RowId,
        /// Its `left`.
        left: i64,
        /// Its `right`.
        right: i64,
    },
    /// The parent reference points at a row that is not in the snapshot.
    #[error("node {id:?}: parent {parent:?} is missing")]
    MissingParent {
        /// Offending row.
        id: RowId,
        /// The dangling reference.
        parent: RowId,
    },
    /// Child and parent live in different trees.
    #[error("node {id:?}: tree differs from parent {parent:?}")]
    TreeMismatch {
        /// Offending row.
        id: RowId,
        /// Its parent.
        parent: RowId,
    },
    /// The child's range is not strictly inside its parent's range.
    #[error("node {id:?}: range is not strictly inside parent {parent:?}")]
    OutsideParent {
        /// Offending row.
        id: RowId,
        /// Its parent.
        parent: RowId,
    },
    /// `depth` is not one more than the parent's (or non-zero for a root).
    #[error("node {id:?}: depth {depth}, expected {expected}")]
    WrongDepth {
        /// Offending row.
        id: RowId,
        /// Stored depth.
        depth: i64,
        /// Depth implied by the parent chain.
        expected: i64,
    },
    /// A tree has no root or several roots.
    #[error("tree {tree:?}: {roots} parentless rows, expected exactly 1")]
    RootCount {
        /// Offending tree.
        tree: TreeId,
        /// Number of parentless rows found.
        roots: usize,
    },
    /// The root's range does not span the whole tree from 1.
    #[error("tree {tree:?}: root spans {left}..{right}, expected 1..{expected}")]
    RootSpan {
        /// Offending tree.
        tree: TreeId,
        /// Root `left`.
        left: i64,
        /// Root `right`.
        right: i64,
        /// `2 * tree size`.
        expected: i64,
    },
    /// Two rows in one tree share a `left` value.
    #[error("tree {tree:?}: duplicate left value {left}")]
    DuplicateLeft {
        /// Offending tree.
        tree: TreeId,
        /// The repeated boundary.
        left: i64,
    },
    /// Two ranges overlap without either containing the other.
    #[error("nodes {a:?} and {b:?}: ranges partially overlap")]
    PartialOverlap {
        /// First row (lower `left`).
        a: RowId,
        /// Second row.
        b: RowId,
    },
    /// The span width disagrees with the number of rows inside it.
    #[error("node {id:?}: span encodes {encoded} descendants, snapshot has {found}")]
    WrongDescendantCount {
        /// Offending row.
        id: RowId,
        /// `(right - left - 1) / 2`.
        encoded: i64,
        /// Rows strictly inside the span.
        found: i64,
    },
}

/// Validate a snapshot and return every violation found.
///
/// An empty result means the snapshot is a well-formed nested-set forest.
pub fn check(rows: &[NodeRow]) -> Vec<Violation> {
    let mut out = Vec::new();
    let by_id: BTreeMap<RowId, &NodeRow> = rows.iter().map(|r| (r.id, r)).collect();

    let mut trees: BTreeMap<TreeId, Vec<&NodeRow>> = BTreeMap::new();
    for row in rows {
        trees.entry(row.tree()).or_default().push(row);
    }
    for members in trees.values_mut() {
        members.sort_by_key(|r| r.left());
    }

    for row in rows {
        let p = row.placement;
        if p.left >= p.right {
            out.push(Violation::InvertedRange {
                id: row.id,
                left: p.left,
                right: p.right,
            });
            continue;
        }
        if (p.right - p.left) % 2 == 0 {
            out.push(Violation::EvenSpan {
                id: row.id,
                left: p.left,
                right: p.right,
            });
        }
        match row.parent {
            None => {
                if p.depth != 0 {
                    out.push(Violation::WrongDepth {
                        id: row.id,
                        depth: p.depth,
                        expected: 0,
                    });
                }
            }
            Some(parent_id) => match by_id.get(&parent_id) {
                None => out.push(Violation::MissingParent {
                    id: row.id,
                    parent: parent_id,
                }),
                Some(parent) => {
                    if parent.tree() != row.tree() {
                        out.push(Violation::TreeMismatch {
                            id: row.id,
                            parent: parent_id,
                        });
                    } else if !parent.placement.strictly_contains(&p) {
                        out.push(Violation::OutsideParent {
                            id: row.id,
                            parent: parent_id,
                        });
                    }
                    if p.depth != parent.depth() + 1 {
                        out.push(Violation::WrongDepth {
                            id: row.id,
                            depth: p.depth,
                            expected: parent.depth() + 1,
                        });
                    }
                }
            },
        }
    }

    for (tree, members) in &trees {
        let roots = members.iter().filter(|r| r.parent.is_none()).count();
        if roots != 1 {
            out.push(Violation::RootCount { tree: *tree, roots });
        } else if let Some(root) = members.iter().find(|r| r.parent.is_none()) {
            let expected = 2 * members.len() as i64;
            if root.left() != 1 || root.right() != expected {
                out.push(Violation::RootSpan {
                    tree: *tree,
                    left: root.left(),
                    right: root.right(),
                    expected,
                });
            }
        }

        // Nesting scan over the left-sorted members: a stack of open spans.
        let mut open: Vec<&NodeRow> = Vec::new();
        for pair in members.windows(2) {
            if pair[0].left() == pair[1].left() {
                out.push(Violation::DuplicateLeft {
                    tree: *tree,
                    left: pair[0].left(),
                });
            }
        }
        for row in members {
            while let Some(top) = open.last() {
                if top.right() < row.left() {
                    open.pop();
                } else {
                    break;
                }
            }
            if let Some(top) = open.last()
                && row.right() > top.right()
            {
                out.push(Violation::PartialOverlap {
                    a: top.id,
                    b: row.id,
                });
            }
            open.push(row);
        }

        for row in members {
            let encoded = (row.right() - row.left() - 1) / 2;
            let found = members
                .iter()
                .filter(|m| row.placement.strictly_contains(&m.placement))
                .count() as i64;
            if encoded != found {
                out.push(Violation::WrongDescendantCount {
                    id: row.id,
                    encoded,
                    found,
                });
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Placement;

    fn row(id: i64, parent: Option<i64>, tree: i64, left: i64, right: i64, depth: i64) -> NodeRow {
        NodeRow {
            id: RowId(id),
            parent: parent.map(RowId),
            placement: Placement::new(TreeId(tree), left, right, depth),
        }
    }

    fn sample_forest() -> Vec<NodeRow> {
        // tree 1: root(1,8){a(2,3), b(4,7){c(5,6)}}; tree 2: lone root.
        alloc::vec![
            row(1, None, 1, 1, 8, 0),
            row(2, Some(1), 1, 2, 3, 1),
            row(3, Some(1), 1, 4, 7, 1),
            row(4, Some(3), 1, 5, 6, 2),
            row(5, None, 2, 1, 2, 0),
        ]
    }

    #[test]
    fn well_formed_forest_passes() {
        assert_eq!(check(&sample_forest()), Vec::new());
    }

    #[test]
    fn even_span_is_reported() {
        let mut rows = sample_forest();
        rows[1].placement.right = 4; // span 2..4
        let vs = check(&rows);
        assert!(
            vs.contains(&Violation::EvenSpan {
                id: RowId(2),
                left: 2,
                right: 4
            }),
            "got {vs:?}"
        );
    }

    #[test]
    fn wrong_depth_is_reported() {
        let mut rows = sample_forest();
        rows[3].placement.depth = 1;
        let vs = check(&rows);
        assert!(
            vs.contains(&Violation::WrongDepth {
                id: RowId(4),
                depth: 1,
                expected: 2
            }),
            "got {vs:?}"
        );
    }

    #[test]
    fn partial_overlap_is_reported() {
        let rows = alloc::vec![
            row(1, None, 1, 1, 8, 0),
            row(2, Some(1), 1, 2, 5, 1),
            row(3, Some(1), 1, 4, 7, 1),
        ];
        let vs = check(&rows);
        assert!(
            vs.iter()
                .any(|v| matches!(v, Violation::PartialOverlap { a: RowId(2), b: RowId(3) })),
            "got {vs:?}"
        );
    }

    #[test]
    fn root_shape_is_checked() {
        let rows = alloc::vec![row(1, None, 1, 2, 3, 0)];
        let vs = check(&rows);
        assert!(
            vs.contains(&Violation::RootSpan {
                tree: TreeId(1),
                left: 2,
                right: 3,
                expected: 2
            }),
            "got {vs:?}"
        );

        let two_roots = alloc::vec![row(1, None, 1, 1, 2, 0), row(2, None, 1, 3, 4, 0)];
        let vs = check(&two_roots);
        assert!(
            vs.contains(&Violation::RootCount {
                tree: TreeId(1),
                roots: 2
            }),
            "got {vs:?}"
        );
    }

    #[test]
    fn dangling_parent_is_reported() {
        let rows = alloc::vec![row(1, Some(9), 1, 1, 2, 0)];
        let vs = check(&rows);
        assert!(
            vs.contains(&Violation::MissingParent {
                id: RowId(1),
                parent: RowId(9)
            }),
            "got {vs:?}"
        );
    }

    #[test]
    fn descendant_count_mismatch_is_reported() {
        // root claims one descendant but has none.
        let rows = alloc::vec![row(1, None, 1, 1, 4, 0)];
        let vs = check(&rows);
        assert!(
            vs.contains(&Violation::WrongDescendantCount {
                id: RowId(1),
                encoded: 1,
                found: 0
            }),
            "got {vs:?}"
        );
    }
}
