// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The predicate algebra executed by stores.
//!
//! A [`Predicate`] is a small, pure description of a row filter over the node
//! relation. Projection code builds predicates; stores either evaluate them
//! in memory via [`Predicate::matches`] or render them to SQL via
//! [`ColumnMap`](crate::ColumnMap).

use alloc::vec::Vec;

use crate::types::{NodeRow, RowId, TreeId};

/// Comparison operator for the `left`/`right` range columns.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Cmp {
    /// Strictly less than.
    Lt,
    /// Less than or equal.
    Le,
    /// Strictly greater than.
    Gt,
    /// Greater than or equal.
    Ge,
}

impl Cmp {
    /// Evaluate `lhs <op> rhs`.
    pub fn eval(self, lhs: i64, rhs: i64) -> bool {
        match self {
            Self::Lt => lhs < rhs,
            Self::Le => lhs <= rhs,
            Self::Gt => lhs > rhs,
            Self::Ge => lhs >= rhs,
        }
    }
}

/// A row filter over the node relation.
///
/// `All(vec![])` matches every row and `Any(vec![])` matches none; use
/// [`Predicate::always`] and [`Predicate::never`] for those.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Predicate {
    /// Conjunction of sub-predicates.
    All(Vec<Predicate>),
    /// Disjunction of sub-predicates.
    Any(Vec<Predicate>),
    /// `id = ?`.
    IdEq(RowId),
    /// `id != ?`.
    IdNe(RowId),
    /// `parent_id = ?` (or `parent_id IS NULL` for `None`).
    ParentEq(Option<RowId>),
    /// `tree_id = ?`.
    TreeEq(TreeId),
    /// `depth = ?`.
    DepthEq(i64),
    /// `left <op> ?`.
    Left(Cmp, i64),
    /// `right <op> ?`.
    Right(Cmp, i64),
    /// `right = left + 1`, i.e. the row has no descendants.
    Leaf,
}

impl Predicate {
    /// The predicate matching every row.
    pub const fn always() -> Self {
        Self::All(Vec::new())
    }

    /// The predicate matching no row.
    pub const fn never() -> Self {
        Self::Any(Vec::new())
    }

    /// Conjoin with another predicate, flattening nested `All`s.
    pub fn and(self, other: Self) -> Self {
        match self {
            Self::All(mut ps) => {
                ps.push(other);
                Self::All(ps)
            }
            p => Self::All(alloc::vec![p, other]),
        }
    }

    /// Evaluate against a single row.
    pub fn matches(&self, row: &NodeRow) -> bool {
        match self {
            Self::All(ps) => ps.iter().all(|p| p.matches(row)),
            Self::Any(ps) => ps.iter().any(|p| p.matches(row)),
            Self::IdEq(id) => row.id == *id,
            Self::IdNe(id) => row.id != *id,
            Self::ParentEq(parent) => row.parent == *parent,
            Self::TreeEq(tree) => row.tree() == *tree,
            Self::DepthEq(depth) => row.depth() == *depth,
            Self::Left(cmp, v) => cmp.eval(row.left(), *v),
            Self::Right(cmp, v) => cmp.eval(row.right(), *v),
            Self::Leaf => row.placement.is_leaf(),
        }
    }
}
