// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error taxonomy for structural operations.

use alloc::vec::Vec;

use canopy_store::{RowId, Violation};
use thiserror::Error;

/// Failure of a structural operation.
///
/// [`TreeError::InvalidMove`] is the only variant that is a normal, expected
/// outcome: it aborts the offending operation and leaves all prior state
/// intact, and the enclosing transaction may continue.
/// [`TreeError::InvariantViolation`] is a fatal post-condition failure; the
/// enclosing transaction must be rolled back and the operation is not
/// retried.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum TreeError {
    /// The move target is the node itself or one of its descendants.
    #[error("invalid move: target {target:?} is {node:?} or inside its subtree")]
    InvalidMove {
        /// The node being moved.
        node: RowId,
        /// The offending target.
        target: RowId,
    },
    /// An operation referenced a row the store does not have.
    #[error("unknown node {0:?}")]
    UnknownNode(RowId),
    /// The invariant checker found problems after a planned batch.
    #[error("nested-set invariants violated after commit ({} problems)", .0.len())]
    InvariantViolation(Vec<Violation>),
}
