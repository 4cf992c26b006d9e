//! Benchmarks for port specification expansion

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use portcheck::utils::port_parser::{expand_endpoints, expand_ports};

fn bench_port_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("port_parsing");

    group.bench_function("full_range_default", |b| {
        b.iter(|| black_box(expand_ports(black_box(None))))
    });

    group.bench_function("list_common_ports", |b| {
        b.iter(|| {
            black_box(expand_ports(black_box(Some(
                "21,22,23,25,53,80,110,111,135,139,143,443,993,995",
            ))))
        })
    });

    group.bench_function("mixed_with_malformed", |b| {
        b.iter(|| {
            black_box(expand_ports(black_box(Some(
                "1-100,443,8000-8100,abc,70000,10-5,9000-9010",
            ))))
        })
    });

    group.finish();
}

fn bench_endpoint_expansion(c: &mut Criterion) {
    let mut group = c.benchmark_group("endpoint_expansion");

    group.bench_function("full_range_endpoints", |b| {
        b.iter(|| black_box(expand_endpoints(black_box("scanme.example"), None)))
    });

    group.finish();
}

criterion_group!(benches, bench_port_parsing, bench_endpoint_expansion);
criterion_main!(benches);
