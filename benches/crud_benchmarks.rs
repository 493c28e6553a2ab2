use std::collections::BTreeMap;
use std::hint::black_box;

use criterion::{BatchSize, BenchmarkId, Criterion, criterion_group, criterion_main};
use rb_collections::{DynArray, Position, RBTreeMap, RBTreeSet};

const N: usize = 10_000;

/// Deterministic xorshift keys, duplicates allowed.
fn shuffled_keys(n: usize) -> Vec<i64> {
    let mut state: u64 = 0x9E37_79B9_7F4A_7C15;
    (0..n)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            (state % (4 * n as u64)) as i64
        })
        .collect()
}

fn filled_map(keys: &[i64]) -> RBTreeMap<i64, i64> {
    keys.iter().map(|&k| (k, k)).collect()
}

// ─── Baseline ───────────────────────────────────────────────────────────────

fn bench_insert_against_std(c: &mut Criterion) {
    let keys = shuffled_keys(N);
    let mut group = c.benchmark_group("insert_shuffled");

    group.bench_function(BenchmarkId::new("RBTreeMap", N), |b| {
        b.iter(|| {
            let mut map = RBTreeMap::new();
            for &k in &keys {
                map.insert(k, k);
            }
            map
        });
    });

    group.bench_function(BenchmarkId::new("BTreeMap", N), |b| {
        b.iter(|| {
            let mut map = BTreeMap::new();
            for &k in &keys {
                map.entry(k).or_insert(k);
            }
            map
        });
    });

    group.finish();
}

// ─── Tree operations ────────────────────────────────────────────────────────

fn bench_erase_by_position(c: &mut Criterion) {
    let keys = shuffled_keys(N);
    let mut group = c.benchmark_group("tree_erase");

    group.bench_function(BenchmarkId::new("position", N), |b| {
        b.iter_batched(
            || {
                let map = filled_map(&keys);
                let positions: Vec<Position> = keys.iter().map(|k| map.find(k).position()).collect();
                (map, positions)
            },
            |(mut map, positions)| {
                // Duplicate keys leave stale positions behind; those are rejected.
                let erased = positions.into_iter().filter(|&p| map.erase(p).is_ok()).count();
                (map, erased)
            },
            BatchSize::SmallInput,
        );
    });

    group.bench_function(BenchmarkId::new("key", N), |b| {
        b.iter_batched(
            || filled_map(&keys),
            |mut map| {
                let erased = keys.iter().filter(|&&k| map.remove(&k).is_some()).count();
                (map, erased)
            },
            BatchSize::SmallInput,
        );
    });

    group.finish();
}

fn bench_insert_or_assign(c: &mut Criterion) {
    let keys = shuffled_keys(N);
    let mut group = c.benchmark_group("tree_insert_or_assign");

    group.bench_function(BenchmarkId::new("overwrite", N), |b| {
        b.iter_batched(
            || filled_map(&keys),
            |mut map| {
                for (value, &k) in keys.iter().enumerate() {
                    map.insert_or_assign(k, value as i64);
                }
                map
            },
            BatchSize::SmallInput,
        );
    });

    group.finish();
}

fn bench_merge(c: &mut Criterion) {
    let keys = shuffled_keys(2 * N);
    let (left, right) = keys.split_at(N);
    let mut group = c.benchmark_group("tree_merge");

    group.bench_function(BenchmarkId::new("map", N), |b| {
        b.iter_batched(
            || (filled_map(left), filled_map(right)),
            |(mut target, mut source)| {
                target.merge(&mut source);
                (target, source)
            },
            BatchSize::SmallInput,
        );
    });

    group.bench_function(BenchmarkId::new("set", N), |b| {
        b.iter_batched(
            || {
                (
                    left.iter().copied().collect::<RBTreeSet<i64>>(),
                    right.iter().copied().collect::<RBTreeSet<i64>>(),
                )
            },
            |(mut target, mut source)| {
                target.merge(&mut source);
                (target, source)
            },
            BatchSize::SmallInput,
        );
    });

    group.finish();
}

fn bench_cursor_walk(c: &mut Criterion) {
    let map = filled_map(&shuffled_keys(N));
    let mut group = c.benchmark_group("tree_cursor_walk");

    // Each lap starts and ends on the end marker.
    group.bench_function(BenchmarkId::new("forward_lap", map.len()), |b| {
        b.iter(|| {
            let mut cursor = map.cursor_end();
            let mut sum = 0i64;
            cursor.move_next();
            while let Some(&v) = cursor.value() {
                sum = sum.wrapping_add(v);
                cursor.move_next();
            }
            sum
        });
    });

    group.bench_function(BenchmarkId::new("backward_lap", map.len()), |b| {
        b.iter(|| {
            let mut cursor = map.cursor_end();
            let mut sum = 0i64;
            cursor.move_prev();
            while let Some(&v) = cursor.value() {
                sum = sum.wrapping_add(v);
                cursor.move_prev();
            }
            sum
        });
    });

    group.finish();
}

// ─── Dynamic array ──────────────────────────────────────────────────────────

fn bench_array_reserve(c: &mut Criterion) {
    let mut group = c.benchmark_group("array_fill");

    group.bench_function(BenchmarkId::new("doubling", N), |b| {
        b.iter(|| {
            let mut array = DynArray::new();
            for i in 0..N {
                array.push_back(i);
            }
            array
        });
    });

    group.bench_function(BenchmarkId::new("reserved", N), |b| {
        b.iter(|| {
            let mut array = DynArray::new();
            array.reserve(N);
            for i in 0..N {
                array.push_back(i);
            }
            array
        });
    });

    group.finish();
}

fn bench_array_shrink_to_fit(c: &mut Criterion) {
    let mut group = c.benchmark_group("array_shrink_to_fit");

    group.bench_function(BenchmarkId::new("half_full", N), |b| {
        b.iter_batched(
            || {
                let mut array: DynArray<usize> = (0..N).collect();
                array.reserve(2 * N);
                array
            },
            |mut array| {
                array.shrink_to_fit();
                black_box(array.capacity())
            },
            BatchSize::SmallInput,
        );
    });

    group.finish();
}

fn bench_array_insert(c: &mut Criterion) {
    let positions = shuffled_keys(N);
    let mut group = c.benchmark_group("array_insert");

    group.bench_function(BenchmarkId::new("shuffled_index", N), |b| {
        b.iter(|| {
            let mut array = DynArray::new();
            for (len, &p) in positions.iter().enumerate() {
                let index = p as usize % (len + 1);
                let _ = array.insert(index, p);
            }
            array
        });
    });

    group.bench_function(BenchmarkId::new("middle_erase", N), |b| {
        b.iter_batched(
            || positions.iter().copied().collect::<DynArray<i64>>(),
            |mut array| {
                while !array.is_empty() {
                    let _ = array.erase(array.len() / 2);
                }
                array
            },
            BatchSize::SmallInput,
        );
    });

    group.finish();
}

// ─── Criterion Groups ───────────────────────────────────────────────────────

criterion_group!(baseline_benches, bench_insert_against_std);

criterion_group!(tree_benches, bench_erase_by_position, bench_insert_or_assign, bench_merge, bench_cursor_walk);

criterion_group!(array_benches, bench_array_reserve, bench_array_shrink_to_fit, bench_array_insert);

criterion_main!(baseline_benches, tree_benches, array_benches);
