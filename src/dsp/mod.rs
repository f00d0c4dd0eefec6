//! Low-level DSP primitives that make up one synthesizer voice.
//!
//! These components are allocation-free and realtime-safe, so they can be
//! embedded directly inside voice structs and advanced sample by sample from
//! the audio callback. They stay focused on the signal-processing math; voice
//! orchestration and parameter plumbing live in [`crate::synth`].

/// Static FM routing topologies (who modulates whom).
pub mod algorithm;
/// Attack/decay/sustain/release amplitude generator.
pub mod envelope;
/// Two-pole resonant low-pass/high-pass filter.
pub mod filter;
/// Low-frequency oscillators for vibrato and cutoff modulation.
pub mod lfo;
/// Phase-modulated sine operator, the atomic FM sound source.
pub mod operator;

pub use envelope::EnvelopeStage;
pub use filter::FilterType;
pub use lfo::LfoWave;
