use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use skywatch_sdk::{ParamRange, WeatherMonitor};

/// Benchmark collect() with varying parameter counts
fn bench_collect_varying_parameters(c: &mut Criterion) {
    let mut group = c.benchmark_group("collect");

    for param_count in [1, 5, 20, 100].iter() {
        let monitor = WeatherMonitor::new();
        for i in 0..*param_count {
            let name = format!("WEATHER_PARAM_{}", i);
            monitor
                .add_parameter(&name, &name, ParamRange::new(0.0, 100.0, 0.1).unwrap())
                .unwrap();
            monitor.set_parameter_value(&name, i as f64);
            if i % 2 == 0 {
                monitor.set_critical_parameter(&name);
            }
        }
        monitor.sync_critical_parameters();

        group.bench_with_input(
            BenchmarkId::from_parameter(param_count),
            param_count,
            |b, _| {
                b.iter(|| {
                    black_box(monitor.collect());
                });
            },
        );
    }
    group.finish();
}

/// Benchmark empty collect() to measure baseline overhead
fn bench_collect_empty(c: &mut Criterion) {
    let monitor = WeatherMonitor::new();

    c.bench_function("collect_empty", |b| {
        b.iter(|| {
            black_box(monitor.collect());
        });
    });
}

/// Benchmark snapshot JSON serialization, the per-cycle notifier cost
fn bench_snapshot_to_json(c: &mut Criterion) {
    let monitor = WeatherMonitor::new();
    for i in 0..20 {
        let name = format!("WEATHER_PARAM_{}", i);
        monitor
            .add_parameter(&name, &name, ParamRange::new(0.0, 100.0, 0.1).unwrap())
            .unwrap();
        monitor.set_parameter_value(&name, i as f64);
    }
    let snapshot = monitor.collect();

    c.bench_function("snapshot_to_json", |b| {
        b.iter(|| {
            black_box(serde_json::to_string(&snapshot).unwrap());
        });
    });
}

criterion_group!(
    benches,
    bench_collect_varying_parameters,
    bench_collect_empty,
    bench_snapshot_to_json
);
criterion_main!(benches);
