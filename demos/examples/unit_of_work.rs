// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drive the forest the way a persistence framework would: entity lifecycle
//! hooks queue work, and a single commit flushes it as one plan.

use canopy_forest::{Forest, Position, TreeError};
use canopy_store::{MemStore, Store};

fn main() -> Result<(), TreeError> {
    env_logger::init();

    let mut forest = Forest::new(MemStore::new());
    let root = forest.insert(None, Position::LastChild)?;
    let a = forest.insert(Some(root), Position::LastChild)?;
    let b = forest.insert(Some(root), Position::LastChild)?;
    let c = forest.insert(Some(b), Position::LastChild)?;
    let d = forest.insert(Some(b), Position::LastChild)?;

    // One unit of work: the host deletes b and, redundantly, d inside it,
    // nullifies c's parent instead of cascading, and creates a new entity
    // under a.
    forest.on_node_deleted(b);
    forest.on_node_deleted(d);
    forest.on_parent_changed(c, None)?;
    forest.on_node_created(Some(a));

    println!("{} operations pending", forest.pending().len());
    let summary = forest.commit()?;
    println!(
        "committed: inserted {:?}, moved {:?}, deleted {:?} ({} rows removed)",
        summary.inserted, summary.moved, summary.deleted, summary.removed_rows,
    );

    // c detached before b's range was removed; the nested delete of d
    // merged into b's.
    let rescued = forest.store().read(c).ok_or(TreeError::UnknownNode(c))?;
    println!(
        "{c:?} rescued as root of tree {:?} at [{}, {}]",
        rescued.tree(),
        rescued.left(),
        rescued.right(),
    );
    assert!(forest.check().is_empty());
    Ok(())
}
