// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=canopy_store --heading-base-level=0

//! Canopy Store: the relational layer under a nested-set forest.
//!
//! A nested-set (MPTT) forest keeps a whole hierarchy in one flat relation:
//! each row carries a `(tree, left, right, depth)` quadruple from which
//! ancestry, descent, sibling order, and subtree membership follow by pure
//! numeric range comparison. This crate owns the row model, the predicate
//! algebra those comparisons are expressed in, and the [`Store`] trait that
//! backends implement.
//!
//! - [`NodeRow`], [`Placement`], [`RowId`], [`TreeId`]: the row model.
//! - [`Predicate`] / [`Cmp`]: pure row filters, evaluated in memory or
//!   rendered to SQL.
//! - [`Store`]: ordered range reads, conditional bulk shifts, row writes —
//!   everything the shift engine in `canopy_forest` needs, nothing more.
//! - [`MemStore`]: the in-memory reference backend (linear scans).
//! - [`ColumnMap`]: explicit table/column names for SQL-backed stores,
//!   validated once at construction.
//! - [`check`]: pure invariant checker returning every [`Violation`] in a
//!   snapshot.
//!
//! # Example
//!
//! ```rust
//! use canopy_store::{Cmp, MemStore, Placement, Predicate, Store, TreeId};
//!
//! // One tree: root(1,6){a(2,3), b(4,5)}.
//! let mut store = MemStore::new();
//! let root = store.allocate(None, Placement::new(TreeId(1), 1, 6, 0));
//! let a = store.allocate(Some(root), Placement::new(TreeId(1), 2, 3, 1));
//! let b = store.allocate(Some(root), Placement::new(TreeId(1), 4, 5, 1));
//!
//! // Descendants of the root, by range comparison alone.
//! let pred = Predicate::TreeEq(TreeId(1))
//!     .and(Predicate::Left(Cmp::Gt, 1))
//!     .and(Predicate::Right(Cmp::Lt, 6));
//! let rows = store.select(&pred);
//! assert_eq!(rows.len(), 2);
//! assert_eq!(rows[0].id, a);
//! assert_eq!(rows[1].id, b);
//!
//! // The snapshot is a well-formed forest.
//! assert!(canopy_store::check(&store.snapshot()).is_empty());
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod check;
pub mod mem;
pub mod predicate;
pub mod sql;
pub mod store;
pub mod types;

pub use check::{Violation, check};
pub use mem::MemStore;
pub use predicate::{Cmp, Predicate};
pub use sql::{ColumnMap, ConfigError, RangeColumn};
pub use store::Store;
pub use types::{NodeRow, Placement, RowId, TreeId};
