//! Render a chord offline and print block statistics.
//!
//! Run with: cargo run --example offline_render

use sixop_dsp::patch::Patch;
use sixop_dsp::{FmEngine, MAX_BLOCK_SIZE};

fn peak(buffer: &[f32]) -> f32 {
    buffer.iter().fold(0.0f32, |acc, &x| acc.max(x.abs()))
}

fn main() {
    let sample_rate = 48_000.0;
    let mut engine = FmEngine::new(sample_rate);

    // Start from a patch that routes level onto carriers.
    let presets = Patch::factory();
    presets[1].apply(&mut engine);
    println!("=== Offline render: '{}' ===\n", presets[1].name);

    println!("Note on: C4 / E4 / G4");
    engine.note_on(60, 0.9);
    engine.note_on(64, 0.8);
    engine.note_on(67, 0.8);

    let mut left = vec![0.0f32; MAX_BLOCK_SIZE];
    let mut right = vec![0.0f32; MAX_BLOCK_SIZE];

    // One second held, then release and let the tail ring out.
    let blocks_per_second = sample_rate as usize / MAX_BLOCK_SIZE;
    for block in 0..blocks_per_second {
        engine.process(&mut left, &mut right);
        if block % 8 == 0 {
            println!("  block {block:>3}  peak {:.3}", peak(&left));
        }
    }

    println!("\nNote off, rendering the release + delay tail");
    engine.note_off(60);
    engine.note_off(64);
    engine.note_off(67);

    for block in 0..blocks_per_second * 2 {
        engine.process(&mut left, &mut right);
        if block % 16 == 0 {
            println!("  tail {block:>3}   peak {:.3}", peak(&left));
        }
    }

    println!(
        "\nActive voices after tail: {}",
        engine.active_voice_count()
    );
}
