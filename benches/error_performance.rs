//! Benchmarks for chain construction, wrapping, trace rendering, and the
//! status mapper tables.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use trellis_core::{codes, http_status, rpc_status, trace, wrap, BoxError, ChainError};

fn construct(c: &mut Criterion) {
    c.bench_function("construct_root", |b| {
        b.iter(|| {
            ChainError::new(
                black_box("db read failed"),
                black_box("try again later"),
                black_box(codes::TIMEOUT),
            )
        })
    });
}

fn wrap_chain(c: &mut Criterion) {
    c.bench_function("wrap_five_layers", |b| {
        b.iter(|| {
            let mut err: Option<BoxError> =
                Some(Box::new(ChainError::new("root", "", codes::TIMEOUT)));
            for i in 0..5 {
                err = wrap(err, format!("layer {i}"));
            }
            err
        })
    });
}

fn render_trace(c: &mut Criterion) {
    let mut err: Option<BoxError> = Some(Box::new(ChainError::new("root", "", codes::TIMEOUT)));
    for i in 0..8 {
        err = wrap(err, format!("layer {i}"));
    }
    let err = err.unwrap();

    c.bench_function("trace_nine_links", |b| b.iter(|| trace(black_box(&*err))));
}

fn mapper_lookup(c: &mut Criterion) {
    c.bench_function("mapper_both_tables", |b| {
        b.iter(|| {
            for (code, _) in codes::REGISTERED {
                black_box(http_status(code));
                black_box(rpc_status(code));
            }
        })
    });
}

criterion_group!(benches, construct, wrap_chain, render_trace, mapper_lookup);
criterion_main!(benches);
