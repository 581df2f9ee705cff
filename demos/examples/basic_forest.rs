// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Build a small forest with direct operations and walk it with queries.
//!
//! Run with `RUST_LOG=trace` to watch the shift engine work.

use canopy_forest::{Forest, Position, TreeError};
use canopy_store::{MemStore, Store};

fn main() -> Result<(), TreeError> {
    env_logger::init();

    let mut forest = Forest::new(MemStore::new());

    let root = forest.insert(None, Position::LastChild)?;
    let docs = forest.insert(Some(root), Position::LastChild)?;
    let src = forest.insert(Some(root), Position::LastChild)?;
    let lib = forest.insert(Some(src), Position::LastChild)?;
    let tests = forest.insert(Some(src), Position::LastChild)?;
    let _readme = forest.insert(Some(docs), Position::FirstChild)?;

    println!("forest after construction:");
    for row in forest.store().snapshot() {
        println!(
            "  {:>4?} parent={:?} tree={:?} [{}, {}] depth={}",
            row.id,
            row.parent,
            row.tree(),
            row.left(),
            row.right(),
            row.depth(),
        );
    }

    println!("ancestors of {tests:?}:");
    for row in forest.ancestors(tests)? {
        println!("  {:?} at depth {}", row.id, row.depth());
    }

    println!("leaves under {root:?}:");
    for row in forest.leaves(root)? {
        println!("  {:?}", row.id);
    }

    // Hoist lib out as a tree of its own, then fold it back in.
    forest.move_node(lib, None, Position::LastChild)?;
    println!("{lib:?} detached into tree {:?}", forest.root_of(lib)?.tree());
    forest.move_node(lib, Some(docs), Position::RightSibling)?;
    println!("{lib:?} now follows {docs:?} under {root:?}");

    forest.delete(src)?;
    println!(
        "after deleting {src:?}: {} rows remain, {} invariant problems",
        forest.store().snapshot().len(),
        forest.check().len(),
    );
    Ok(())
}
