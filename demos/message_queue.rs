//! Drive the engine through the rtrb message ring, the way a control thread
//! feeds the audio callback.
//!
//! Run with: cargo run --example message_queue

use rtrb::RingBuffer;
use sixop_dsp::io::converter::midi_to_synth;
use sixop_dsp::io::midi::MidiEvent;
use sixop_dsp::patch::Patch;
use sixop_dsp::synth::message::{drain_messages, SynthMessage};
use sixop_dsp::FmEngine;

fn main() {
    let sample_rate = 48_000.0;
    let mut engine = FmEngine::new(sample_rate);
    Patch::init().apply(&mut engine);

    let (mut tx, mut rx) = RingBuffer::<SynthMessage>::new(64);

    println!("=== Message queue demo ===\n");
    println!("Queueing: NoteOn A3 (from a raw MIDI event), NoteOn A4, PitchBend A4 +50c");
    let wire = MidiEvent::NoteOn { channel: 0, key: 57, velocity: 114 };
    if let Some(msg) = midi_to_synth(wire, 0) {
        let _ = tx.push(msg);
    }
    let _ = tx.push(SynthMessage::NoteOn { note: 69, velocity: 0.7 });
    let _ = tx.push(SynthMessage::PitchBend { note: 69, cents: 50.0 });

    // The audio thread drains pending messages at the top of each block.
    let mut left = vec![0.0f32; 512];
    let mut right = vec![0.0f32; 512];
    drain_messages(&mut engine, &mut rx);
    engine.process(&mut left, &mut right);

    let peak = left.iter().fold(0.0f32, |m, &s| m.max(s.abs()));
    println!("Rendered one block: {} voices, peak {peak:.3}", engine.active_voice_count());

    println!("\nQueueing: AllNotesOff");
    let _ = tx.push(SynthMessage::AllNotesOff);
    drain_messages(&mut engine, &mut rx);

    // Default release is 300 ms; render half a second.
    for _ in 0..47 {
        engine.process(&mut left, &mut right);
    }
    println!("After release tail: {} voices", engine.active_voice_count());
}
