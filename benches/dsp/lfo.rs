//! Benchmarks for the control-rate oscillator.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use sixop_dsp::dsp::lfo::{Lfo, LfoWave};

use crate::BLOCK_SIZES;

pub fn bench_lfo(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/lfo");

    for &size in BLOCK_SIZES {
        for wave in [LfoWave::Sine, LfoWave::Saw, LfoWave::Square, LfoWave::Triangle] {
            let mut lfo = Lfo::new();
            lfo.set_wave(wave);
            lfo.set_rate(5.0);
            lfo.set_depth(1.0);
            group.bench_with_input(
                BenchmarkId::new(format!("{wave:?}").to_lowercase(), size),
                &size,
                |b, &n| {
                    b.iter(|| {
                        let mut acc = 0.0f32;
                        for _ in 0..n {
                            acc += lfo.process();
                        }
                        black_box(acc)
                    })
                },
            );
        }
    }

    group.finish();
}
