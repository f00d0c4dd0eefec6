//! One complete voice across the eight topologies.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use sixop_dsp::dsp::algorithm::ALGORITHMS;
use sixop_dsp::synth::voice::Voice;
use sixop_dsp::{EngineParams, NUM_ALGORITHMS, NUM_OPERATORS};

pub fn bench_voice(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/voice");

    let mut params = EngineParams::default();
    for op in 0..NUM_OPERATORS {
        params.set_operator_level(op, 0.8);
        params.set_operator_feedback(op, 0.3);
    }
    params.set_lfo_depth(0, 0.5);
    params.set_lfo_depth(1, 0.5);

    for algorithm in 0..NUM_ALGORITHMS {
        let mut voice = Voice::new(48_000.0);
        voice.note_on(69, 1.0, 1, &params);
        let def = &ALGORITHMS[algorithm];

        group.bench_with_input(
            BenchmarkId::new("block128/algo", algorithm),
            &algorithm,
            |b, _| {
                b.iter(|| {
                    let mut acc = 0.0f32;
                    for _ in 0..128 {
                        acc += voice.process(def, 0.7);
                    }
                    black_box(acc)
                })
            },
        );
    }

    group.finish();
}
