use criterion::{black_box, criterion_group, criterion_main, Criterion};
use sdl_engine::{parse_sdl, parse_to_envelope};

/// Build a scenario with `n` virtual machines under the infrastructure block.
fn scenario_text(n: usize) -> String {
    let mut text = String::from(
        "scenario:\n\
         \x20 name: bench-scenario\n\
         \x20 start: 2022-01-20T13:00:00Z\n\
         \x20 end: 2022-01-20T23:00:00Z\n\
         \x20 description: generated for benchmarking\n\
         \x20 infrastructure:\n\
         \x20   virtualmachines:\n",
    );
    for i in 0..n {
        text.push_str(&format!(
            "      vm{i}:\n        name: \"machine {i}\"\n        cpu: {}\n        dependencies:\n          - vm0\n          - vm1\n",
            (i % 8) + 1
        ));
    }
    text
}

fn bench_parse(c: &mut Criterion) {
    let minimal = "name: test-scenario\nstart: 2022-01-20T13:00:00Z\nend: 2022-01-20T23:00:00Z";
    c.bench_function("parse_minimal", |b| {
        b.iter(|| parse_sdl(black_box(minimal)))
    });

    let medium = scenario_text(10);
    c.bench_function("parse_infrastructure_10", |b| {
        b.iter(|| parse_sdl(black_box(&medium)))
    });

    let large = scenario_text(200);
    c.bench_function("parse_infrastructure_200", |b| {
        b.iter(|| parse_sdl(black_box(&large)))
    });

    c.bench_function("parse_to_envelope_json", |b| {
        b.iter(|| parse_to_envelope(black_box(&medium)).to_json())
    });
}

criterion_group!(benches, bench_parse);
criterion_main!(benches);
