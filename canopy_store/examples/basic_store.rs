// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Basic usage of Canopy Store: rows, predicates, and the invariant checker.

use canopy_store::{Cmp, ColumnMap, MemStore, Placement, Predicate, Store, TreeId};

fn main() {
    // One tree: root(1,8){a(2,3), b(4,7){c(5,6)}}.
    let mut store = MemStore::new();
    let root = store.allocate(None, Placement::new(TreeId(1), 1, 8, 0));
    let _a = store.allocate(Some(root), Placement::new(TreeId(1), 2, 3, 1));
    let b = store.allocate(Some(root), Placement::new(TreeId(1), 4, 7, 1));
    let _c = store.allocate(Some(b), Placement::new(TreeId(1), 5, 6, 2));

    // Descendants of b by range comparison.
    let pred = Predicate::TreeEq(TreeId(1))
        .and(Predicate::Left(Cmp::Gt, 4))
        .and(Predicate::Right(Cmp::Lt, 7));
    println!("descendants of b: {:?}", store.select(&pred));

    // The same predicate as SQL, for a relational backend.
    let cols = ColumnMap::conventional();
    println!("as SQL: {}", cols.select_sql(&pred));

    // The snapshot is a well-formed forest.
    println!("violations: {:?}", canopy_store::check(&store.snapshot()));
}
