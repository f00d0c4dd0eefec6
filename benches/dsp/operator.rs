//! Benchmarks for the FM operator.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use sixop_dsp::dsp::operator::Operator;

use crate::BLOCK_SIZES;

pub fn bench_operator(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/operator");

    for &size in BLOCK_SIZES {
        // Plain carrier: no feedback, no modulation input.
        let mut carrier = Operator::new();
        carrier.set_level(1.0);
        carrier.set_frequency(440.0, 48_000.0);
        group.bench_with_input(BenchmarkId::new("carrier", size), &size, |b, &n| {
            b.iter(|| {
                let mut acc = 0.0f32;
                for _ in 0..n {
                    acc += carrier.process();
                }
                black_box(acc)
            })
        });

        // Worst case per operator: self-feedback plus an external modulator.
        let mut driven = Operator::new();
        driven.set_level(1.0);
        driven.set_feedback(0.8);
        driven.set_frequency(440.0, 48_000.0);
        group.bench_with_input(BenchmarkId::new("driven", size), &size, |b, &n| {
            b.iter(|| {
                let mut acc = 0.0f32;
                for i in 0..n {
                    driven.set_modulator_input((i as f32 * 0.01).sin() * 5.0);
                    acc += driven.process();
                }
                black_box(acc)
            })
        });

        // The per-sample retune the vibrato path pays.
        let mut retuned = Operator::new();
        retuned.set_level(1.0);
        group.bench_with_input(BenchmarkId::new("retuned", size), &size, |b, &n| {
            b.iter(|| {
                let mut acc = 0.0f32;
                for i in 0..n {
                    retuned.set_frequency(440.0 + (i % 16) as f32, 48_000.0);
                    acc += retuned.process();
                }
                black_box(acc)
            })
        });
    }

    group.finish();
}
