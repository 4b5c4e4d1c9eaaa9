// Copyright 2026 Cycling Protocol Developers
// SPDX-License-Identifier: Apache-2.0

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use cycling_experiment::Experiment;
use cycling_experiment::dsl::OperatingCondition;
use std::hint::black_box;

fn aging_protocol(cycles: usize) -> Vec<OperatingCondition> {
    (0..cycles)
        .map(|i| {
            let rpt = if i % 50 == 0 { "[rpt]" } else { "[aging]" };
            OperatingCondition::cycle([
                format!("Discharge at 1C until 2.5 V {rpt}"),
                "Rest for 1 hour".to_string(),
                "Charge at C/2 until 4.2 V".to_string(),
                "Hold at 4.2 V until C/50".to_string(),
                "Rest for 1 hour".to_string(),
            ])
        })
        .collect()
}

fn bench_compile(c: &mut Criterion) {
    let sizes = [10, 100, 1000];

    let mut group = c.benchmark_group("compile");

    for &size in &sizes {
        let conditions = aging_protocol(size);
        group.bench_with_input(BenchmarkId::new("experiment", size), &size, |b, &_size| {
            b.iter(|| {
                let experiment = Experiment::builder(black_box(conditions.clone()))
                    .period("10 seconds")
                    .temperature(25.0)
                    .termination(["80% capacity", "2.5 V"])
                    .build();
                black_box(experiment)
            });
        });
    }

    group.finish();
}

fn bench_search_tag(c: &mut Criterion) {
    let sizes = [100, 1000];

    let mut group = c.benchmark_group("search_tag");

    for &size in &sizes {
        let Ok(experiment) = Experiment::new(aging_protocol(size)) else {
            panic!("benchmark protocol must compile");
        };
        group.bench_with_input(BenchmarkId::new("rpt", size), &size, |b, &_size| {
            b.iter(|| black_box(experiment.search_tag(black_box("rpt"))));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_compile, bench_search_tag);
criterion_main!(benches);
