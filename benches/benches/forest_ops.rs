// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use canopy_forest::{Forest, Position};
use canopy_store::{MemStore, RowId};
use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};

// splitmix64, enough for deterministic shapes.
#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn pick(&mut self, n: usize) -> usize {
        self.0 = self.0.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        ((z ^ (z >> 31)) % n as u64) as usize
    }
}

/// One root with a random subtree of `count` nodes under it.
fn gen_random_forest(count: usize, seed: u64) -> (Forest<MemStore>, Vec<RowId>) {
    let mut forest = Forest::new(MemStore::new());
    forest.set_validate(false);
    let mut rng = Rng::new(seed);
    let root = forest.insert(None, Position::LastChild).unwrap();
    let mut ids = vec![root];
    for _ in 1..count {
        let parent = ids[rng.pick(ids.len())];
        ids.push(forest.insert(Some(parent), Position::LastChild).unwrap());
    }
    (forest, ids)
}

fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert");
    for &n in &[256usize, 1024, 4096] {
        group.throughput(Throughput::Elements(n as u64));
        group.bench_function(format!("fan_n{}", n), |b| {
            b.iter_batched(
                || {
                    let mut forest = Forest::new(MemStore::new());
                    forest.set_validate(false);
                    let root = forest.insert(None, Position::LastChild).unwrap();
                    (forest, root)
                },
                |(mut forest, root)| {
                    for _ in 0..n {
                        let _ = forest.insert(Some(root), Position::LastChild);
                    }
                    black_box(forest)
                },
                BatchSize::SmallInput,
            )
        });
        group.bench_function(format!("spine_n{}", n), |b| {
            b.iter_batched(
                || {
                    let mut forest = Forest::new(MemStore::new());
                    forest.set_validate(false);
                    let root = forest.insert(None, Position::LastChild).unwrap();
                    (forest, root)
                },
                |(mut forest, root)| {
                    let mut at = root;
                    for _ in 0..n {
                        at = forest.insert(Some(at), Position::FirstChild).unwrap();
                    }
                    black_box(forest)
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

fn bench_move(c: &mut Criterion) {
    let mut group = c.benchmark_group("move");
    for &n in &[256usize, 1024] {
        group.throughput(Throughput::Elements(64));
        group.bench_function(format!("random_n{}", n), |b| {
            b.iter_batched(
                || gen_random_forest(n, 0xCAFE_F00D_DEAD_BEEF),
                |(mut forest, ids)| {
                    let mut rng = Rng::new(0xBADC_F00D_1234_5678);
                    let mut moved = 0;
                    while moved < 64 {
                        let node = ids[rng.pick(ids.len())];
                        let target = ids[rng.pick(ids.len())];
                        if forest
                            .move_node(node, Some(target), Position::LastChild)
                            .is_ok()
                        {
                            moved += 1;
                        }
                    }
                    black_box(forest)
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

fn bench_query(c: &mut Criterion) {
    let mut group = c.benchmark_group("query");
    for &n in &[1024usize, 4096] {
        let (forest, ids) = gen_random_forest(n, 0xFACE_FEED_CAFE_BABE);
        group.throughput(Throughput::Elements(ids.len() as u64));
        group.bench_function(format!("ancestors_n{}", n), |b| {
            b.iter(|| {
                let mut total = 0;
                for id in &ids {
                    total += forest.ancestors(*id).unwrap().len();
                }
                black_box(total)
            })
        });
        group.bench_function(format!("descendants_root_n{}", n), |b| {
            b.iter(|| black_box(forest.descendants(ids[0]).unwrap().len()))
        });
    }
    group.finish();
}

fn bench_batched_delete(c: &mut Criterion) {
    let mut group = c.benchmark_group("commit");
    for &n in &[1024usize] {
        group.bench_function(format!("merged_deletes_n{}", n), |b| {
            b.iter_batched(
                || {
                    let (mut forest, ids) = gen_random_forest(n, 0xC1A5_7E55_9999_ABCD);
                    let mut rng = Rng::new(0x5EED_5EED_5EED_5EED);
                    for _ in 0..n / 8 {
                        forest.on_node_deleted(ids[1 + rng.pick(ids.len() - 1)]);
                    }
                    forest
                },
                |mut forest| black_box(forest.commit().unwrap()),
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_insert,
    bench_move,
    bench_query,
    bench_batched_delete,
);
criterion_main!(benches);
