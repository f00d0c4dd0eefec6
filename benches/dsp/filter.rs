//! Benchmarks for the biquad filter.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use sixop_dsp::dsp::filter::{Filter, FilterType};

use crate::BLOCK_SIZES;

pub fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/filter");

    for &size in BLOCK_SIZES {
        let mut steady = Filter::new();
        steady.set_cutoff(2_000.0);
        steady.set_resonance(0.5);
        group.bench_with_input(BenchmarkId::new("steady", size), &size, |b, &n| {
            b.iter(|| {
                let mut acc = 0.0f32;
                for i in 0..n {
                    acc += steady.process((i as f32 * 0.1).sin());
                }
                black_box(acc)
            })
        });

        // The voice pipeline recomputes coefficients every sample when the
        // cutoff LFO runs; this measures that worst case.
        let mut modulated = Filter::new();
        modulated.set_type(FilterType::LowPass);
        group.bench_with_input(BenchmarkId::new("modulated", size), &size, |b, &n| {
            b.iter(|| {
                let mut acc = 0.0f32;
                for i in 0..n {
                    modulated.set_cutoff(2_000.0 + (i % 64) as f32 * 10.0);
                    acc += modulated.process((i as f32 * 0.1).sin());
                }
                black_box(acc)
            })
        });
    }

    group.finish();
}
