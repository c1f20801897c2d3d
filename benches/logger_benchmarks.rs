//! Criterion benchmarks for rust_logger_hierarchy

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rust_logger_hierarchy::prelude::*;
use std::sync::Arc;

fn quiet_hierarchy() -> Hierarchy {
    Hierarchy::builder()
        .output(OutputHandle::new(MemoryAppender::new()))
        .registry(Arc::new(OutputRegistry::new()))
        .build()
}

fn wide_config(loggers: usize) -> HierarchyConfig {
    (0..loggers)
        .map(|i| {
            let level = if i % 3 == 0 { "debug" } else { "warn" };
            LoggerConfig::new(format!("svc{}.component{}", i % 10, i), level).local(i % 4 == 0)
        })
        .chain(std::iter::once(LoggerConfig::root("info")))
        .collect()
}

// ============================================================================
// Hot Path Benchmarks
// ============================================================================

fn bench_hot_path(c: &mut Criterion) {
    let mut group = c.benchmark_group("hot_path");
    group.throughput(Throughput::Elements(1));

    let hierarchy = quiet_hierarchy();
    hierarchy.apply_config(&wide_config(100)).unwrap();
    let logger = hierarchy.get_logger("svc3.component3.handler");

    group.bench_function("effective_level", |b| {
        b.iter(|| black_box(logger.effective_level()));
    });

    group.bench_function("filtered_log", |b| {
        b.iter(|| logger.trace(black_box("never written")));
    });

    group.bench_function("get_logger_existing", |b| {
        b.iter(|| black_box(hierarchy.get_logger(black_box("svc3.component3.handler"))));
    });

    group.bench_function("get_child_relative", |b| {
        let svc = hierarchy.get_logger("svc3");
        b.iter(|| black_box(svc.get_child(black_box("component3.handler"))));
    });

    group.finish();
}

// ============================================================================
// Reconfiguration Benchmarks
// ============================================================================

fn bench_apply_config(c: &mut Criterion) {
    let mut group = c.benchmark_group("apply_config");

    for size in [10, 100, 1000] {
        let hierarchy = quiet_hierarchy();
        let config = wide_config(size);
        hierarchy.apply_config(&config).unwrap();

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &config, |b, config| {
            b.iter(|| hierarchy.apply_config(black_box(config)).unwrap());
        });
    }

    group.finish();
}

fn bench_find_loggers(c: &mut Criterion) {
    let manager = LoggerManager::with_hierarchy(quiet_hierarchy());
    manager.apply_config(&wide_config(1000)).unwrap();

    c.bench_function("find_loggers_subtree", |b| {
        b.iter(|| black_box(manager.find_loggers(black_box("svc7.**")).unwrap()));
    });
}

criterion_group!(benches, bench_hot_path, bench_apply_config, bench_find_loggers);
criterion_main!(benches);
