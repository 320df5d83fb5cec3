//! 快照对账性能基准测试

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use trafficsheet::analytics::{
    AggregateEntry, AggregateTable, SnapshotReconciler, Stream, fold_snapshot,
};
use trafficsheet::storage::{MemorySheetStore, Row};

fn entries(n: usize, scale: u64) -> Vec<AggregateEntry> {
    (0..n)
        .map(|i| AggregateEntry::new(format!("/page/{}", i), (i as u64 % 97) * scale, i as u64 % 13))
        .collect()
}

fn sheet(entries: &[AggregateEntry]) -> Vec<Row> {
    let mut rows = vec![vec!["Path".to_string(), "Count".to_string(), "Uniques".to_string()]];
    rows.extend(entries.iter().map(AggregateEntry::to_row));
    rows
}

// ============== fold_snapshot ==============

fn bench_fold_snapshot(c: &mut Criterion) {
    let mut group = c.benchmark_group("reconcile/fold_snapshot");

    for size in [10usize, 100, 1_000, 10_000] {
        let total = AggregateTable::from_entries(entries(size, 10));
        let last = AggregateTable::from_entries(entries(size, 2));
        // 一半旧 key，一半新 key
        let snapshot = entries(size + size / 2, 3);

        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| {
                let mut total = total.clone();
                black_box(fold_snapshot(&mut total, &last, &snapshot));
                black_box(total.into_sorted_rows());
            });
        });
    }

    group.finish();
}

// ============== 完整对账（内存存储） ==============

fn bench_reconcile_memory(c: &mut Criterion) {
    let mut group = c.benchmark_group("reconcile/memory_store");

    for size in [100usize, 1_000] {
        let snapshot = entries(size, 3);
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            b.iter(|| {
                let store = MemorySheetStore::new()
                    .with_sheet("paths", sheet(&entries(size, 10)))
                    .with_sheet("paths-last", sheet(&entries(size, 2)));
                let outcome = SnapshotReconciler::new(&store, Stream::Paths)
                    .reconcile(Some(snapshot.as_slice()))
                    .unwrap();
                black_box(outcome);
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_fold_snapshot, bench_reconcile_memory);
criterion_main!(benches);
