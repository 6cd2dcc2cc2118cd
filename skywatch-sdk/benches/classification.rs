use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use skywatch_sdk::{ParamRange, WeatherMonitor};

/// Benchmark the raw classifier over both warning modes
fn bench_classify(c: &mut Criterion) {
    let range = ParamRange::new(0.0, 20.0, 0.25).unwrap();
    let flipped = range.flipped();

    c.bench_function("classify_outward", |b| {
        b.iter(|| {
            for v in [-10.0, -3.0, 5.0, 19.0, 22.0, 40.0] {
                black_box(range.classify(black_box(v)));
            }
        });
    });

    c.bench_function("classify_flipped", |b| {
        b.iter(|| {
            for v in [-10.0, -3.0, 5.0, 19.0, 22.0, 40.0] {
                black_box(flipped.classify(black_box(v)));
            }
        });
    });
}

/// Benchmark check_parameter_state with varying store sizes
fn bench_check_state_varying_parameters(c: &mut Criterion) {
    let mut group = c.benchmark_group("check_state");

    for param_count in [1, 10, 50, 200].iter() {
        let monitor = WeatherMonitor::new();
        for i in 0..*param_count {
            let name = format!("WEATHER_PARAM_{}", i);
            monitor
                .add_parameter(&name, &name, ParamRange::new(0.0, 100.0, 0.1).unwrap())
                .unwrap();
            monitor.set_parameter_value(&name, i as f64);
        }

        group.bench_with_input(
            BenchmarkId::from_parameter(param_count),
            param_count,
            |b, _| {
                b.iter(|| {
                    black_box(monitor.check_parameter_state("WEATHER_PARAM_0"));
                });
            },
        );
    }
    group.finish();
}

/// Benchmark a full critical-set evaluation pass with no transitions
fn bench_sync_critical_steady_state(c: &mut Criterion) {
    let monitor = WeatherMonitor::new();
    for i in 0..20 {
        let name = format!("WEATHER_PARAM_{}", i);
        monitor
            .add_parameter(&name, &name, ParamRange::new(0.0, 100.0, 0.1).unwrap())
            .unwrap();
        monitor.set_parameter_value(&name, 50.0);
        monitor.set_critical_parameter(&name);
    }
    // Settle so the benched passes report no change.
    monitor.sync_critical_parameters();

    c.bench_function("sync_critical_steady_state", |b| {
        b.iter(|| {
            black_box(monitor.sync_critical_parameters());
        });
    });
}

criterion_group!(
    benches,
    bench_classify,
    bench_check_state_varying_parameters,
    bench_sync_critical_steady_state
);
criterion_main!(benches);
