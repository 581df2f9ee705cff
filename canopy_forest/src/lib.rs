// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=canopy_forest --heading-base-level=0

//! Canopy Forest: nested-set (MPTT) range maintenance over a store.
//!
//! Built on the row model from [`canopy_store`], this crate keeps the
//! `(tree, left, right, depth)` encoding consistent while trees change:
//!
//! - [`engine`]: the shift primitives. [`Position`] names a slot relative to
//!   a target node; insert widens the tree around it, delete closes the
//!   vacated gap, and a move detaches its subtree, re-resolves the slot in
//!   already-shifted coordinates, and replays the subtree's shape there.
//! - [`query`]: [`Relation`] plus [`project`] translate structural
//!   relationships (ancestors, children, leaves, ...) into store predicates.
//! - [`coordinator`]: [`PendingOp`] batching with order-independent delete
//!   merging, reported as a [`Summary`].
//! - [`Forest`]: the façade tying it together, with direct operations,
//!   persistence-style lifecycle hooks, and query helpers.
//!
//! # Example
//!
//! ```rust
//! use canopy_forest::{Forest, Position};
//! use canopy_store::MemStore;
//!
//! let mut forest = Forest::new(MemStore::new());
//! let root = forest.insert(None, Position::LastChild)?;
//! let a = forest.insert(Some(root), Position::LastChild)?;
//! let b = forest.insert(Some(root), Position::LastChild)?;
//!
//! // Reparent a under b; every affected range shifts to match.
//! forest.move_node(a, Some(b), Position::LastChild)?;
//! let below: Vec<_> = forest.descendants(root)?.iter().map(|r| r.id).collect();
//! assert_eq!(below, [b, a]);
//! assert!(forest.check().is_empty());
//! # Ok::<(), canopy_forest::TreeError>(())
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod coordinator;
pub mod engine;
pub mod error;
pub mod forest;
pub mod query;

pub use coordinator::{PendingOp, Summary};
pub use engine::Position;
pub use error::TreeError;
pub use forest::Forest;
pub use query::{QueryOpts, Relation, project};
