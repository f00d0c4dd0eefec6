//! Benchmarks for the ADSR envelope.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use sixop_dsp::dsp::envelope::Envelope;

use crate::BLOCK_SIZES;

pub fn bench_envelope(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/envelope");

    for &size in BLOCK_SIZES {
        // Attack phase (ramping up).
        let mut attack = Envelope::new();
        attack.set_attack(5.0);
        attack.trigger();
        group.bench_with_input(BenchmarkId::new("attack", size), &size, |b, &n| {
            b.iter(|| {
                let mut acc = 0.0f32;
                for _ in 0..n {
                    acc += attack.process();
                }
                black_box(acc)
            })
        });

        // Sustain phase (holding steady).
        let mut sustain = Envelope::new();
        sustain.set_attack(0.001);
        sustain.set_decay(0.001);
        sustain.trigger();
        for _ in 0..500 {
            sustain.process();
        }
        group.bench_with_input(BenchmarkId::new("sustain", size), &size, |b, &n| {
            b.iter(|| {
                let mut acc = 0.0f32;
                for _ in 0..n {
                    acc += sustain.process();
                }
                black_box(acc)
            })
        });

        // Coefficient recomputation, the setter-path cost.
        let mut retimed = Envelope::new();
        retimed.trigger();
        group.bench_with_input(BenchmarkId::new("recompute", size), &size, |b, &n| {
            b.iter(|| {
                for i in 0..n {
                    retimed.set_decay(0.05 + (i % 8) as f32 * 0.01);
                }
                black_box(retimed.process())
            })
        });
    }

    group.finish();
}
