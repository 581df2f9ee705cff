// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Projection of structural relationships onto range predicates.
//!
//! [`project`] is a stateless translator: given a relationship, one or more
//! reference rows, and options, it produces the [`Predicate`] a store can
//! execute. Nothing here touches a store.
//!
//! Multi-row results selected with these predicates come back ordered by
//! ascending `left` only. Cross-tree ordering is deliberately unspecified;
//! callers that query several trees and care about grouping order by `tree`
//! themselves.

use alloc::vec::Vec;

use canopy_store::{Cmp, NodeRow, Predicate};

/// A structural relationship between nodes.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Relation {
    /// The root of the reference node's tree.
    Root,
    /// Nodes whose range strictly contains the reference range.
    Ancestors,
    /// Nodes whose range lies strictly inside the reference range.
    Descendants,
    /// Nodes whose parent is the reference node.
    Children,
    /// The reference node's parent.
    Parent,
    /// Nodes sharing the reference node's parent. Roots have no siblings.
    Siblings,
    /// Siblings ordered before the reference node.
    PrevSiblings,
    /// Siblings ordered after the reference node.
    NextSiblings,
    /// Leaves of the reference node's subtree, the node itself included
    /// when it is a leaf.
    Leaves,
}

/// Options applied when projecting a relationship.
#[derive(Clone, Copy, Debug)]
pub struct QueryOpts {
    /// Also match the reference node itself. For [`Relation::Ancestors`] and
    /// [`Relation::Descendants`] this relaxes the strict range comparison;
    /// for the other relations it unions `id = reference`.
    pub include_self: bool,
    /// With several reference nodes, `true` (the default) returns the union
    /// of the per-node results; `false` returns their intersection.
    pub disjoint: bool,
}

impl Default for QueryOpts {
    fn default() -> Self {
        Self {
            include_self: false,
            disjoint: true,
        }
    }
}

/// Build the predicate selecting `relation` of the given reference rows.
///
/// With no reference rows the result matches nothing.
pub fn project(relation: Relation, refs: &[NodeRow], opts: QueryOpts) -> Predicate {
    let per: Vec<Predicate> = refs
        .iter()
        .map(|r| project_one(relation, r, opts.include_self))
        .collect();
    if opts.disjoint {
        Predicate::Any(per)
    } else {
        Predicate::All(per)
    }
}

fn project_one(relation: Relation, n: &NodeRow, include_self: bool) -> Predicate {
    let tree = Predicate::TreeEq(n.tree());
    match relation {
        Relation::Root => tree.and(Predicate::DepthEq(0)),
        Relation::Ancestors => {
            let (lc, rc) = if include_self {
                (Cmp::Le, Cmp::Ge)
            } else {
                (Cmp::Lt, Cmp::Gt)
            };
            tree.and(Predicate::Left(lc, n.left()))
                .and(Predicate::Right(rc, n.right()))
        }
        Relation::Descendants => {
            let (lc, rc) = if include_self {
                (Cmp::Ge, Cmp::Le)
            } else {
                (Cmp::Gt, Cmp::Lt)
            };
            tree.and(Predicate::Left(lc, n.left()))
                .and(Predicate::Right(rc, n.right()))
        }
        Relation::Children => with_self(Predicate::ParentEq(Some(n.id)), n, include_self),
        Relation::Parent => {
            let base = match n.parent {
                Some(p) => Predicate::IdEq(p),
                None => Predicate::never(),
            };
            with_self(base, n, include_self)
        }
        Relation::Siblings => with_self(siblings_of(n), n, include_self),
        Relation::PrevSiblings => {
            with_self(siblings_of(n).and(Predicate::Left(Cmp::Lt, n.left())), n, include_self)
        }
        Relation::NextSiblings => {
            with_self(siblings_of(n).and(Predicate::Left(Cmp::Gt, n.left())), n, include_self)
        }
        // Descendants-or-self that have no descendants of their own.
        Relation::Leaves => tree
            .and(Predicate::Left(Cmp::Ge, n.left()))
            .and(Predicate::Right(Cmp::Le, n.right()))
            .and(Predicate::Leaf),
    }
}

fn siblings_of(n: &NodeRow) -> Predicate {
    match n.parent {
        Some(p) => Predicate::ParentEq(Some(p)).and(Predicate::IdNe(n.id)),
        None => Predicate::never(),
    }
}

fn with_self(base: Predicate, n: &NodeRow, include_self: bool) -> Predicate {
    if include_self {
        Predicate::Any(alloc::vec![base, Predicate::IdEq(n.id)])
    } else {
        base
    }
}
