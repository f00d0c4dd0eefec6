//! Shared state types for the audio/UI boundary.
//!
//! Everything crossing the boundary is `Copy` and fixed-size, so pushing a
//! snapshot from the audio callback never allocates.

use sixop_dsp::synth::message::SynthMessage;
use sixop_dsp::{FmEngine, NUM_VOICES};

/// Commands sent from the UI thread to the audio thread.
#[derive(Clone, Copy, Debug)]
pub enum ControlMessage {
    /// Note event for the engine.
    Synth(SynthMessage),
    /// Switch to a factory preset by index.
    Preset(usize),
    /// Select a modulation topology.
    Algorithm(usize),
}

/// One voice slot as the meters see it.
#[derive(Clone, Copy, Debug, Default)]
pub struct VoiceSlot {
    pub active: bool,
    pub note: u8,
    pub level: f32,
}

/// Engine state published once per audio callback.
#[derive(Clone, Copy, Debug)]
pub struct EngineSnapshot {
    pub voices: [VoiceSlot; NUM_VOICES],
    pub active_voices: u8,
    pub algorithm: u8,
    pub preset: u8,
    pub master_volume: f32,
}

impl EngineSnapshot {
    pub fn capture(engine: &FmEngine, preset_index: usize) -> Self {
        let mut voices = [VoiceSlot::default(); NUM_VOICES];
        for (slot, (active, note, level)) in voices.iter_mut().zip(engine.voice_states()) {
            *slot = VoiceSlot {
                active,
                note,
                level,
            };
        }
        Self {
            voices,
            active_voices: engine.active_voice_count() as u8,
            algorithm: engine.algorithm() as u8,
            preset: preset_index as u8,
            master_volume: engine.master_volume(),
        }
    }
}

impl Default for EngineSnapshot {
    fn default() -> Self {
        Self {
            voices: [VoiceSlot::default(); NUM_VOICES],
            active_voices: 0,
            algorithm: 0,
            preset: 0,
            master_volume: 0.7,
        }
    }
}
