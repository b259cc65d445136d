//! Performance benchmarks for tote-engine

use chrono::{TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use tote_engine::{merge, Collection, CollectionItem, PersistedSnapshot, ProductSnapshot, RemoteItem};

fn local_collection(size: usize) -> Collection {
    let mut collection = Collection::new();
    for i in 0..size {
        let product = ProductSnapshot::titled(format!("Product {i}"));
        let _ = collection.insert(CollectionItem::new(format!("p{i}"), product, None));
    }
    collection
}

/// Server records overlapping the second half of the local collection.
fn remote_records(size: usize) -> Vec<RemoteItem> {
    (size / 2..size + size / 2)
        .map(|i| RemoteItem {
            id: format!("srv-{i}"),
            product_id: format!("p{i}"),
            product: ProductSnapshot::titled(format!("Product {i} (server)")),
            added_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        })
        .collect()
}

fn bench_merge(c: &mut Criterion) {
    let mut group = c.benchmark_group("merge");
    let owner = "alice".to_string();

    for size in [10, 100, 1000].iter() {
        group.bench_with_input(BenchmarkId::new("overlapping", size), size, |b, &size| {
            let local = local_collection(size);
            let remote = remote_records(size);
            b.iter(|| merge::merge(black_box(&local), black_box(&remote), &owner))
        });

        group.bench_with_input(BenchmarkId::new("already_merged", size), size, |b, &size| {
            let remote = remote_records(size);
            let merged = merge::merge(&local_collection(size), &remote, &owner).merged;
            b.iter(|| merge::merge(black_box(&merged), black_box(&remote), &owner))
        });
    }

    group.finish();
}

fn bench_membership(c: &mut Criterion) {
    let mut group = c.benchmark_group("membership");

    for size in [10, 100, 1000].iter() {
        group.bench_with_input(BenchmarkId::new("contains_product", size), size, |b, &size| {
            let collection = local_collection(size);
            let probe = format!("p{}", size - 1);
            b.iter(|| collection.contains_product(black_box(&probe)))
        });
    }

    group.finish();
}

fn bench_snapshot(c: &mut Criterion) {
    let mut group = c.benchmark_group("snapshot");

    for size in [10, 100, 1000].iter() {
        group.bench_with_input(BenchmarkId::new("encode", size), size, |b, &size| {
            let collection = local_collection(size);
            b.iter(|| PersistedSnapshot::capture(black_box(&collection)).to_json())
        });

        group.bench_with_input(BenchmarkId::new("decode", size), size, |b, &size| {
            let raw = PersistedSnapshot::capture(&local_collection(size))
                .to_json()
                .unwrap();
            b.iter(|| PersistedSnapshot::decode(black_box(&raw)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_merge, bench_membership, bench_snapshot);
criterion_main!(benches);
