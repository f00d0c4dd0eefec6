//! sixop - terminal FM synthesizer
//!
//! Run with: cargo run --bin sixop
//!
//! The audio thread owns the engine inside the cpal callback; the UI thread
//! owns the terminal. They talk exclusively through wait-free rings: control
//! messages in, an audio tap and engine snapshots out.

mod keys;
mod state;
mod ui;

use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use rtrb::RingBuffer;

use sixop_dsp::patch::Patch;
use sixop_dsp::synth::message::apply_message;
use sixop_dsp::{FmEngine, MAX_BLOCK_SIZE};

use state::{ControlMessage, EngineSnapshot};
use ui::UiApp;

fn main() -> EyreResult<()> {
    color_eyre::install()?;

    let (control_tx, mut control_rx) = RingBuffer::<ControlMessage>::new(256);
    let (mut audio_tx, audio_rx) = RingBuffer::<f32>::new(8_192);
    let (mut snapshot_tx, snapshot_rx) = RingBuffer::<EngineSnapshot>::new(64);

    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or_else(|| eyre!("no default output device available"))?;
    let config = device
        .default_output_config()
        .wrap_err("failed to fetch default output config")?;
    let sample_rate = config.sample_rate().0 as f32;
    let channels = config.channels() as usize;

    let presets = Patch::factory();
    let preset_names: Vec<String> = presets.iter().map(|p| p.name.clone()).collect();

    let mut engine = FmEngine::new(sample_rate);
    let mut preset_index = 0usize;
    presets[preset_index].apply(&mut engine);

    let mut left = vec![0.0f32; MAX_BLOCK_SIZE];
    let mut right = vec![0.0f32; MAX_BLOCK_SIZE];

    let stream = device
        .build_output_stream(
            &config.into(),
            move |data: &mut [f32], _| {
                // Control events first, so they apply from the block start.
                while let Ok(message) = control_rx.pop() {
                    match message {
                        ControlMessage::Synth(msg) => apply_message(&mut engine, msg),
                        ControlMessage::Preset(index) => {
                            preset_index = index % presets.len();
                            presets[preset_index].apply(&mut engine);
                        }
                        ControlMessage::Algorithm(index) => engine.set_algorithm(index),
                    }
                }

                let total_frames = data.len() / channels;
                let mut written = 0;
                while written < total_frames {
                    let frames = (total_frames - written).min(MAX_BLOCK_SIZE);
                    engine.process(&mut left[..frames], &mut right[..frames]);

                    for i in 0..frames {
                        let base = (written + i) * channels;
                        data[base] = left[i];
                        for ch in 1..channels {
                            data[base + ch] = right[i];
                        }
                        // Mono tap for the scope and spectrum; dropped
                        // samples are fine, the UI only visualizes.
                        let _ = audio_tx.push(left[i]);
                    }
                    written += frames;
                }

                let _ = snapshot_tx.push(EngineSnapshot::capture(&engine, preset_index));
            },
            |err| eprintln!("audio error: {err}"),
            None,
        )
        .wrap_err("failed to open output stream")?;
    stream.play().wrap_err("failed to start output stream")?;

    let mut terminal = ratatui::init();
    let result = UiApp::new(control_tx, audio_rx, snapshot_rx, preset_names, sample_rate)
        .run(&mut terminal);
    ratatui::restore();
    result
}
