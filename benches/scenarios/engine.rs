//! The full engine under polyphony pressure: the numbers that decide
//! whether the audio callback makes its deadline.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use sixop_dsp::{FmEngine, NUM_OPERATORS, NUM_VOICES};

use crate::BLOCK_SIZES;

fn loaded_engine(voices: usize) -> FmEngine {
    let mut engine = FmEngine::new(48_000.0);
    engine.set_algorithm(2);
    for op in 0..NUM_OPERATORS {
        engine.set_operator_level(op, 0.8);
    }
    engine.set_lfo_depth(0, 0.3);
    engine.set_lfo_depth(1, 0.3);
    for i in 0..voices {
        engine.note_on(36 + i as u8 * 3, 0.9);
    }
    engine
}

pub fn bench_engine(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/engine");

    for &size in BLOCK_SIZES {
        let mut left = vec![0.0f32; size];
        let mut right = vec![0.0f32; size];

        for voices in [1, 8, NUM_VOICES] {
            let mut engine = loaded_engine(voices);
            group.bench_with_input(
                BenchmarkId::new(format!("{voices}v"), size),
                &size,
                |b, _| {
                    b.iter(|| {
                        engine.process(&mut left, &mut right);
                        black_box(left[0])
                    })
                },
            );
        }
    }

    group.finish();
}
